use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::cadence::{shift, Cadence};

/// Inclusive span of dates. A range whose start falls after its end is
/// malformed and contains nothing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Everything from the beginning of the calendar through `date`.
    pub fn through(date: NaiveDate) -> Self {
        Self::new(NaiveDate::MIN, date)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Calendar period a statement is usually browsed by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Period {
    Year(i32),
    Month { year: i32, month: u32 },
}

impl Period {
    /// The period containing `date`, at the requested granularity.
    pub fn containing(date: NaiveDate, granularity: PeriodKind) -> Period {
        match granularity {
            PeriodKind::Year => Period::Year(date.year()),
            PeriodKind::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Period::Year(_) => PeriodKind::Year,
            Period::Month { .. } => PeriodKind::Month,
        }
    }

    pub fn date_range(&self) -> DateRange {
        let (first, cadence) = match *self {
            Period::Year(year) => (first_day(year, 1), Cadence::Yearly),
            Period::Month { year, month } => (first_day(year, month), Cadence::Monthly),
        };
        let last = shift(first, cadence, 1).pred_opt().unwrap_or(NaiveDate::MAX);
        DateRange::new(first, last)
    }

    /// Moves by `amount` whole periods, carrying months into years.
    pub fn offset(&self, amount: i32) -> Period {
        match *self {
            Period::Year(year) => Period::Year(year.saturating_add(amount)),
            Period::Month { year, month } => {
                let index = year as i64 * 12 + (month as i64 - 1) + amount as i64;
                Period::Month {
                    year: index.div_euclid(12) as i32,
                    month: index.rem_euclid(12) as u32 + 1,
                }
            }
        }
    }

    /// `before` preceding periods, this one, then `after` following periods.
    pub fn stream(&self, before: u32, after: u32) -> Vec<Period> {
        let before = before as i32;
        (-before..=after as i32)
            .map(|relative| self.offset(relative))
            .collect()
    }

    pub fn year(&self) -> i32 {
        match *self {
            Period::Year(year) | Period::Month { year, .. } => year,
        }
    }

    /// Same month in another year; a year period just becomes that year.
    pub fn same_month_in(&self, year: i32) -> Period {
        match *self {
            Period::Year(_) => Period::Year(year),
            Period::Month { month, .. } => Period::Month { year, month },
        }
    }

    pub fn label(&self) -> String {
        match self {
            Period::Year(year) => year.to_string(),
            Period::Month { year, month } => format!("{year}-{month:02}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum PeriodKind {
    #[default]
    Month,
    Year,
}

impl PeriodKind {
    pub fn parse(raw: &str) -> Option<PeriodKind> {
        match raw.to_ascii_lowercase().as_str() {
            "month" | "monthly" => Some(PeriodKind::Month),
            "year" | "yearly" => Some(PeriodKind::Year),
            _ => None,
        }
    }
}

fn first_day(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month.clamp(1, 12), 1).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = DateRange::new(date(2020, 1, 1), date(2020, 1, 31));
        assert!(range.contains(date(2020, 1, 1)));
        assert!(range.contains(date(2020, 1, 31)));
        assert!(!range.contains(date(2020, 2, 1)));
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let range = DateRange::new(date(2020, 2, 1), date(2020, 1, 1));
        assert!(range.is_empty());
        assert!(!range.contains(date(2020, 1, 15)));
    }

    #[test]
    fn month_period_covers_whole_month() {
        let february = Period::Month {
            year: 2020,
            month: 2,
        };
        assert_eq!(
            february.date_range(),
            DateRange::new(date(2020, 2, 1), date(2020, 2, 29))
        );
        assert_eq!(
            Period::Year(2021).date_range(),
            DateRange::new(date(2021, 1, 1), date(2021, 12, 31))
        );
    }

    #[test]
    fn offset_carries_across_years() {
        let january = Period::Month {
            year: 2020,
            month: 1,
        };
        assert_eq!(
            january.offset(-1),
            Period::Month {
                year: 2019,
                month: 12
            }
        );
        assert_eq!(
            january.offset(25),
            Period::Month {
                year: 2022,
                month: 2
            }
        );
        assert_eq!(Period::Year(2020).offset(-3), Period::Year(2017));
    }

    #[test]
    fn stream_is_centered_on_self() {
        let periods = Period::Year(2020).stream(2, 1);
        assert_eq!(
            periods,
            vec![
                Period::Year(2018),
                Period::Year(2019),
                Period::Year(2020),
                Period::Year(2021)
            ]
        );
    }

    #[test]
    fn same_month_in_keeps_month() {
        let march = Period::Month {
            year: 2020,
            month: 3,
        };
        assert_eq!(
            march.same_month_in(2024),
            Period::Month {
                year: 2024,
                month: 3
            }
        );
        assert_eq!(march.label(), "2020-03");
    }
}
