mod common;

use common::{date, range};
use rust_decimal_macros::dec;
use statement_core::ledger::{
    Cadence, Kind, Period, PeriodKind, RelativeKind, Repetitions, Statement, TransactionTemplate,
};
use uuid::Uuid;

struct Household {
    a: Uuid,
    b: Uuid,
    templates: Vec<TransactionTemplate>,
}

fn household() -> Household {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let templates = vec![
        TransactionTemplate::credit(dec!(1000), date(2020, 1, 1), a)
            .titled("Salary")
            .in_category("Work")
            .repeating(Cadence::Monthly, Repetitions::Indeterminate),
        TransactionTemplate::debit(dec!(50), date(2020, 1, 3), a)
            .titled("Groceries")
            .in_category("Food")
            .repeating(Cadence::Weekly, Repetitions::Indeterminate),
        TransactionTemplate::debit(dec!(35), date(2020, 1, 18), b)
            .titled("Restaurant")
            .in_category("Food"),
        TransactionTemplate::debit(dec!(600), date(2020, 1, 31), a)
            .titled("Rent")
            .in_category("Housing")
            .repeating(Cadence::Monthly, Repetitions::Times(12)),
        TransactionTemplate::transfer(dec!(15), date(2020, 1, 5), a, b)
            .titled("Allowance")
            .in_category("Family"),
    ];
    Household { a, b, templates }
}

#[test]
fn transfer_is_grouped_by_direction_for_each_account() {
    let house = household();
    let statement = Statement::new(&house.templates);
    let january = range((2020, 1, 1), (2020, 1, 31));

    let sender = statement.amounts_of_account_in(house.a, &january);
    assert_eq!(sender.get(&RelativeKind::SentTransference), Some(&dec!(15)));
    assert!(!sender.contains_key(&RelativeKind::ReceivedTransference));

    let receiver = statement.amounts_of_account_in(house.b, &january);
    assert_eq!(
        receiver.get(&RelativeKind::ReceivedTransference),
        Some(&dec!(15))
    );
    assert_eq!(receiver.get(&RelativeKind::Debit), Some(&dec!(35)));
    assert!(!receiver.contains_key(&RelativeKind::Credit));
}

#[test]
fn whole_ledger_amounts_hold_magnitudes_per_kind() {
    let house = household();
    let statement = Statement::new(&house.templates);
    let january = range((2020, 1, 1), (2020, 1, 31));

    let amounts = statement.amounts_in(&january);
    assert_eq!(amounts.get(&Kind::Credit), Some(&dec!(1000)));
    // Groceries on the 3rd, 10th, 17th, 24th and 31st, plus rent and dinner out.
    assert_eq!(amounts.get(&Kind::Debit), Some(&dec!(885)));
    assert_eq!(amounts.get(&Kind::Transfer), Some(&dec!(15)));
}

#[test]
fn category_totals_respect_the_allow_list() {
    let house = household();
    let statement = Statement::new(&house.templates);
    let february = Period::Month {
        year: 2020,
        month: 2,
    }
    .date_range();

    let all = statement.category_amounts_in(&february, Kind::Debit, &[]);
    assert_eq!(all.get("Food"), Some(&dec!(200)));
    assert_eq!(all.get("Housing"), Some(&dec!(600)));
    assert!(!all.contains_key("Work"));

    let housing_only =
        statement.category_amounts_in(&february, Kind::Debit, &["Housing".to_string()]);
    assert_eq!(housing_only.len(), 1);
    assert_eq!(housing_only.get("Housing"), Some(&dec!(600)));

    let per_account = statement.category_amounts_of_account_in(
        house.b,
        &range((2020, 1, 1), (2020, 1, 31)),
        RelativeKind::Debit,
        &[],
    );
    assert_eq!(per_account.len(), 1);
    assert_eq!(per_account.get("Food"), Some(&dec!(35)));
}

#[test]
fn filtered_transaction_lists_follow_kind_and_category() {
    let house = household();
    let statement = Statement::new(&house.templates);
    let january = range((2020, 1, 1), (2020, 1, 31));

    let food = statement.transactions_in(&january, Some(Kind::Debit), &["Food".to_string()]);
    assert_eq!(food.len(), 6);
    assert!(food.iter().all(|occurrence| occurrence.category() == "Food"));

    let received =
        statement.transactions_of_account_in(house.b, &january, Some(RelativeKind::ReceivedTransference), &[]);
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].title(), "Allowance");

    let everything = statement.transactions_of_account_in(house.a, &january, None, &[]);
    assert_eq!(everything.len(), 8);
}

#[test]
fn inverted_range_yields_no_amounts() {
    let house = household();
    let statement = Statement::new(&house.templates);
    let inverted = range((2020, 2, 1), (2020, 1, 1));
    assert!(statement.amounts_in(&inverted).is_empty());
    assert!(statement.transactions_in(&inverted, None, &[]).is_empty());
}

#[test]
fn period_navigation_crosses_year_boundaries() {
    let january = Period::containing(date(2020, 1, 15), PeriodKind::Month);
    let stream = january.stream(1, 1);
    let labels: Vec<String> = stream.iter().map(Period::label).collect();
    assert_eq!(labels, vec!["2019-12", "2020-01", "2020-02"]);

    let february = january.offset(1).date_range();
    assert_eq!(february.start, date(2020, 2, 1));
    assert_eq!(february.end, date(2020, 2, 29));

    let year = Period::containing(date(2020, 7, 4), PeriodKind::Year).date_range();
    assert_eq!((year.start, year.end), (date(2020, 1, 1), date(2020, 12, 31)));
    assert_eq!(
        january.same_month_in(2021).date_range().end,
        date(2021, 1, 31)
    );
}
