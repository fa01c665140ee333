use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::cadence::shift;
use super::range::DateRange;
use super::template::{AccountId, TransactionKind, TransactionTemplate};

/// One concrete, dated instance of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub template: &'a TransactionTemplate,
    pub date: NaiveDate,
    /// 1-based position within the template's repetitions.
    pub sequence: u32,
}

impl<'a> Occurrence<'a> {
    pub fn kind(&self) -> TransactionKind {
        self.template.kind
    }

    pub fn title(&self) -> &'a str {
        &self.template.title
    }

    pub fn category(&self) -> &'a str {
        &self.template.category
    }

    pub fn amount(&self) -> Decimal {
        self.template.amount
    }

    pub fn account(&self) -> AccountId {
        self.template.account
    }

    pub fn repeatability(&self) -> Repeatability {
        if self.template.cadence.is_single() {
            return Repeatability::Single;
        }
        Repeatability::Many {
            number: self.sequence,
            of: self
                .template
                .repetitions
                .total()
                .map_or(Times::Indeterminate, Times::Determinate),
        }
    }
}

/// Presentation of "occurrence n of m".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeatability {
    Single,
    Many { number: u32, of: Times },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Determinate(u32),
    Indeterminate,
}

impl fmt::Display for Repeatability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repeatability::Single => Ok(()),
            Repeatability::Many {
                number,
                of: Times::Determinate(total),
            } => write!(f, "{number}/{total}"),
            Repeatability::Many {
                number,
                of: Times::Indeterminate,
            } => write!(f, "{number}"),
        }
    }
}

/// Expands `template` into the occurrences falling inside `window`.
///
/// Every date is computed from the original start date offset by the
/// sequence number, so a clamped month (Jan 31 -> Feb 28) does not drag the
/// following ones (Mar 31 stays Mar 31). The scan always begins at the
/// template's start and stops at the window end, which bounds indeterminate
/// templates.
pub fn expand<'a>(template: &'a TransactionTemplate, window: &DateRange) -> Vec<Occurrence<'a>> {
    let mut occurrences = Vec::new();
    if window.is_empty() {
        return occurrences;
    }

    let start = template.start_date;
    let mut current = start;
    let mut sequence = 1u32;

    while current <= window.end && may_repeat(template, sequence) {
        if window.contains(current) {
            occurrences.push(Occurrence {
                template,
                date: current,
                sequence,
            });
        }
        let next = shift(start, template.cadence, sequence as i32);
        if next <= current {
            // Saturated at the calendar bound.
            break;
        }
        current = next;
        sequence += 1;
    }

    occurrences
}

fn may_repeat(template: &TransactionTemplate, sequence: u32) -> bool {
    if template.cadence.is_single() {
        sequence == 1
    } else {
        template.repetitions.allows(sequence)
    }
}

/// Full history of `template` through `cutoff`, inclusive.
pub fn occurrences_before(template: &TransactionTemplate, cutoff: NaiveDate) -> Vec<Occurrence<'_>> {
    let window = DateRange::new(template.start_date.min(cutoff), cutoff);
    expand(template, &window)
}

/// Occurrences of `template` intersecting `range`.
pub fn occurrences_within<'a>(
    template: &'a TransactionTemplate,
    range: &DateRange,
) -> Vec<Occurrence<'a>> {
    expand(template, range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::cadence::Cadence;
    use crate::ledger::template::Repetitions;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn credit(start: NaiveDate, cadence: Cadence, repeat: u32) -> TransactionTemplate {
        TransactionTemplate::credit(dec!(10), start, Uuid::new_v4())
            .repeating(cadence, Repetitions::from_count(repeat))
    }

    fn dates(occurrences: &[Occurrence<'_>]) -> Vec<(NaiveDate, u32)> {
        occurrences.iter().map(|o| (o.date, o.sequence)).collect()
    }

    #[test]
    fn weekly_window_excludes_date_after_end() {
        let template = credit(date(2020, 1, 1), Cadence::Weekly, 3);
        let window = DateRange::new(date(2020, 1, 1), date(2020, 1, 14));
        assert_eq!(
            dates(&expand(&template, &window)),
            vec![(date(2020, 1, 1), 1), (date(2020, 1, 8), 2)]
        );
    }

    #[test]
    fn window_end_is_inclusive() {
        let template = credit(date(2020, 1, 1), Cadence::Weekly, 3);
        let found = occurrences_before(&template, date(2020, 1, 15));
        assert_eq!(found.len(), 3);
        assert_eq!(found[2].date, date(2020, 1, 15));
    }

    #[test]
    fn monthly_from_month_end_clamps_without_drifting() {
        let template = credit(date(2019, 11, 30), Cadence::Monthly, 5);
        let found = occurrences_before(&template, date(2021, 1, 1));
        assert_eq!(
            found.iter().map(|o| o.date).collect::<Vec<_>>(),
            vec![
                date(2019, 11, 30),
                date(2019, 12, 30),
                date(2020, 1, 30),
                date(2020, 2, 29),
                date(2020, 3, 30)
            ]
        );
    }

    #[test]
    fn thirty_first_returns_after_short_month() {
        let template = credit(date(2021, 1, 31), Cadence::Monthly, 3);
        let found = occurrences_before(&template, date(2021, 12, 31));
        assert_eq!(
            found.iter().map(|o| o.date).collect::<Vec<_>>(),
            vec![date(2021, 1, 31), date(2021, 2, 28), date(2021, 3, 31)]
        );
    }

    #[test]
    fn single_occurs_once_whatever_the_repeat() {
        let template = TransactionTemplate::credit(dec!(10), date(2020, 1, 1), Uuid::new_v4())
            .repeating(Cadence::Single, Repetitions::Times(9));
        let found = occurrences_before(&template, date(2030, 1, 1));
        assert_eq!(dates(&found), vec![(date(2020, 1, 1), 1)]);
        assert_eq!(found[0].repeatability(), Repeatability::Single);
    }

    #[test]
    fn indeterminate_is_bounded_by_window_end() {
        let template = credit(date(2020, 1, 1), Cadence::Daily, 0);
        let found = occurrences_before(&template, date(2020, 1, 10));
        assert_eq!(found.len(), 10);
        assert_eq!(found.last().unwrap().date, date(2020, 1, 10));
        assert_eq!(
            found[3].repeatability(),
            Repeatability::Many {
                number: 4,
                of: Times::Indeterminate
            }
        );
    }

    #[test]
    fn indeterminate_terminates_at_calendar_end() {
        let template = credit(NaiveDate::MAX.pred_opt().unwrap(), Cadence::Daily, 0);
        let found = expand(&template, &DateRange::through(NaiveDate::MAX));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn pre_range_occurrences_are_skipped() {
        let template = credit(date(2020, 1, 1), Cadence::Weekly, 3);
        let range = DateRange::new(date(2020, 1, 5), date(2020, 1, 15));
        assert_eq!(
            dates(&occurrences_within(&template, &range)),
            vec![(date(2020, 1, 8), 2), (date(2020, 1, 15), 3)]
        );
    }

    #[test]
    fn occurrence_on_range_start_is_kept_and_one_unit_earlier_is_not() {
        let template = credit(date(2020, 1, 1), Cadence::Weekly, 0);
        let range = DateRange::new(date(2020, 1, 8), date(2020, 1, 31));
        let found = dates(&occurrences_within(&template, &range));
        assert_eq!(found.first(), Some(&(date(2020, 1, 8), 2)));
        assert!(found.iter().all(|(day, _)| *day != date(2020, 1, 1)));
        assert_eq!(found.len(), 4);
    }

    #[test]
    fn zero_times_set_directly_runs_open_ended() {
        let mut template = credit(date(2020, 1, 1), Cadence::Monthly, 3);
        template.repetitions = Repetitions::Times(0);
        let found = occurrences_before(&template, date(2020, 12, 31));
        assert_eq!(found.len(), 12);
        assert_eq!(found[11].repeatability().to_string(), "12");
    }

    #[test]
    fn template_ending_before_range_yields_nothing() {
        let template = credit(date(2020, 1, 1), Cadence::Daily, 3);
        let range = DateRange::new(date(2020, 1, 5), date(2020, 1, 10));
        assert!(occurrences_within(&template, &range).is_empty());
    }

    #[test]
    fn template_starting_after_range_yields_nothing() {
        let template = credit(date(2020, 1, 20), Cadence::Daily, 3);
        let range = DateRange::new(date(2020, 1, 1), date(2020, 1, 10));
        assert!(occurrences_within(&template, &range).is_empty());
    }

    #[test]
    fn malformed_window_is_empty() {
        let template = credit(date(2020, 1, 1), Cadence::Daily, 0);
        let range = DateRange::new(date(2020, 1, 10), date(2020, 1, 1));
        assert!(expand(&template, &range).is_empty());
    }

    #[test]
    fn determinate_count_is_exhausted() {
        let template = credit(date(2020, 1, 1), Cadence::Yearly, 2);
        let found = occurrences_before(&template, date(2023, 1, 1));
        assert_eq!(
            dates(&found),
            vec![(date(2020, 1, 1), 1), (date(2021, 1, 1), 2)]
        );
        assert_eq!(found[1].repeatability().to_string(), "2/2");
    }

    #[test]
    fn cutoff_before_start_is_empty() {
        let template = credit(date(2020, 1, 2), Cadence::Single, 0);
        assert!(occurrences_before(&template, date(2020, 1, 1)).is_empty());
    }
}
