use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use statement_core::ledger::{
    Cadence, DateRange, Period, PeriodKind, Repetitions, Statement, TransactionTemplate,
};
use statement_core::utils::persistence::{load_templates, save_templates};
use tempfile::tempdir;
use uuid::Uuid;

fn build_sample_templates(count: usize) -> (Vec<TransactionTemplate>, Uuid) {
    let checking = Uuid::new_v4();
    let savings = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let cadences = [
        Cadence::Daily,
        Cadence::Weekly,
        Cadence::Monthly,
        Cadence::Yearly,
        Cadence::Single,
    ];

    let templates = (0..count)
        .map(|idx| {
            let amount = Decimal::from(10 + (idx % 90) as i64);
            let date = start + chrono::Duration::days((idx % 365) as i64);
            let base = match idx % 3 {
                0 => TransactionTemplate::credit(amount, date, checking),
                1 => TransactionTemplate::debit(amount, date, checking),
                _ => TransactionTemplate::transfer(amount, date, checking, savings),
            };
            let cadence = cadences[idx % cadences.len()];
            let repetitions = if idx % 2 == 0 {
                Repetitions::Indeterminate
            } else {
                Repetitions::Times(24)
            };
            base.titled(format!("Template {idx}"))
                .in_category(format!("Category {}", idx % 12))
                .repeating(cadence, repetitions)
        })
        .collect();
    (templates, checking)
}

fn bench_statement(c: &mut Criterion) {
    let (templates, checking) = build_sample_templates(black_box(500));
    let statement = Statement::new(&templates);
    let reference = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("total_balance_ten_years", |b| {
        b.iter(|| black_box(statement.total_balance_at(reference)))
    });

    c.bench_function("account_balance_ten_years", |b| {
        b.iter(|| black_box(statement.balance_at(checking, reference)))
    });

    let month = Period::containing(reference, PeriodKind::Month).date_range();
    c.bench_function("month_amounts_by_kind", |b| {
        b.iter(|| black_box(statement.amounts_in(&month)))
    });

    let year = DateRange::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
    );
    c.bench_function("year_timeline", |b| {
        b.iter(|| black_box(statement.transactions_in(&year, None, &[]).len()))
    });
}

fn bench_template_io(c: &mut Criterion) {
    let (templates, _) = build_sample_templates(black_box(2_000));
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("templates.json");
    save_templates(&templates, &path).expect("seed");

    c.bench_function("templates_load_2k", |b| {
        b.iter(|| black_box(load_templates(&path).expect("load templates")))
    });
}

criterion_group!(benches, bench_statement, bench_template_io);
criterion_main!(benches);
