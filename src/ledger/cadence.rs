use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Recurrence period of a transaction template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Cadence {
    #[default]
    Single,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    pub fn is_single(&self) -> bool {
        matches!(self, Cadence::Single)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cadence::Single => "Once",
            Cadence::Daily => "Daily",
            Cadence::Weekly => "Weekly",
            Cadence::Monthly => "Monthly",
            Cadence::Yearly => "Yearly",
        }
    }
}

/// Moves `date` by `amount` cadence units.
///
/// Month and year steps clamp to the last valid day of the target month, so
/// Jan 30 plus one month lands on Feb 29 in leap years instead of spilling
/// into March. Results beyond the representable calendar saturate at its
/// bounds.
pub fn shift(date: NaiveDate, cadence: Cadence, amount: i32) -> NaiveDate {
    match cadence {
        Cadence::Single => date,
        Cadence::Daily => shift_days(date, amount as i64),
        Cadence::Weekly => shift_days(date, amount as i64 * 7),
        Cadence::Monthly => shift_month(date, amount),
        Cadence::Yearly => shift_year(date, amount),
    }
}

fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or_else(|| saturated(days))
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let index = date.year() as i64 * 12 + date.month0() as i64 + months as i64;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    clamped(year, month, date.day()).unwrap_or_else(|| saturated(months as i64))
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() as i64 + years as i64;
    clamped(year, date.month(), date.day()).unwrap_or_else(|| saturated(years as i64))
}

fn clamped(year: i64, month: u32, day: u32) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    let day = day.min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    match NaiveDate::from_ymd_opt(next_year, next_month, 1) {
        Some(first_next) => first_next.pred_opt().map(|last| last.day()),
        // December of the last representable year.
        None => Some(31),
    }
}

fn saturated(direction: i64) -> NaiveDate {
    if direction < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    }
}
