use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::cadence::shift;
use super::range::DateRange;
use super::recurring::{occurrences_within, Occurrence};
use super::template::{AccountId, Kind, TransactionTemplate};
use super::timeline::{timeline_before, timeline_within, TemplateScope};
use super::value::{relative_kind, relative_value, Perspective, RelativeKind};

/// Sum of every scoped occurrence through `date`, signed from `perspective`.
///
/// For the whole ledger this is credits minus debits; transfers cancel out.
pub fn total_balance_as_of(
    templates: &[TransactionTemplate],
    date: NaiveDate,
    perspective: Perspective,
) -> Decimal {
    timeline_before(templates, date, &TemplateScope::of(perspective))
        .iter()
        .map(|occurrence| relative_value(occurrence, perspective))
        .sum()
}

/// Totals of the scoped occurrences inside `range`, grouped by `key`.
///
/// Groups hold magnitudes: a sent transfer of 15 adds 15 to its group.
/// Occurrences the key maps to `None` are left out.
pub fn amounts_grouped_by<K, F>(
    templates: &[TransactionTemplate],
    range: &DateRange,
    scope: &TemplateScope,
    key: F,
) -> BTreeMap<K, Decimal>
where
    K: Ord,
    F: Fn(&Occurrence<'_>) -> Option<K>,
{
    let mut groups = BTreeMap::new();
    for occurrence in timeline_within(templates, range, scope) {
        if let Some(group) = key(&occurrence) {
            *groups.entry(group).or_insert(Decimal::ZERO) += occurrence.amount();
        }
    }
    groups
}

/// Query facade over one snapshot of the template set.
///
/// Holds no state of its own; every call recomputes from the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Statement<'a> {
    templates: &'a [TransactionTemplate],
}

impl<'a> Statement<'a> {
    pub fn new(templates: &'a [TransactionTemplate]) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &'a [TransactionTemplate] {
        self.templates
    }

    pub fn total_balance_at(&self, date: NaiveDate) -> Decimal {
        total_balance_as_of(self.templates, date, Perspective::AllAccounts)
    }

    pub fn balance_at(&self, account: AccountId, date: NaiveDate) -> Decimal {
        total_balance_as_of(self.templates, date, Perspective::Account(account))
    }

    pub fn amounts_in(&self, range: &DateRange) -> BTreeMap<Kind, Decimal> {
        amounts_grouped_by(
            self.templates,
            range,
            &TemplateScope::all_accounts(),
            |occurrence| Some(occurrence.kind().tag()),
        )
    }

    pub fn amounts_of_account_in(
        &self,
        account: AccountId,
        range: &DateRange,
    ) -> BTreeMap<RelativeKind, Decimal> {
        amounts_grouped_by(
            self.templates,
            range,
            &TemplateScope::account(account),
            |occurrence| relative_kind(occurrence.template, account),
        )
    }

    /// Totals per category for one kind; an empty `categories` list means
    /// every category.
    pub fn category_amounts_in(
        &self,
        range: &DateRange,
        kind: Kind,
        categories: &[String],
    ) -> BTreeMap<String, Decimal> {
        let scope = TemplateScope::all_accounts()
            .with_kind(kind)
            .with_categories(categories.iter().cloned());
        amounts_grouped_by(self.templates, range, &scope, |occurrence| {
            Some(occurrence.category().to_string())
        })
    }

    pub fn category_amounts_of_account_in(
        &self,
        account: AccountId,
        range: &DateRange,
        kind: RelativeKind,
        categories: &[String],
    ) -> BTreeMap<String, Decimal> {
        let scope = TemplateScope::account(account)
            .with_relative_kind(kind)
            .with_categories(categories.iter().cloned());
        amounts_grouped_by(self.templates, range, &scope, |occurrence| {
            Some(occurrence.category().to_string())
        })
    }

    pub fn transactions_in(
        &self,
        range: &DateRange,
        kind: Option<Kind>,
        categories: &[String],
    ) -> Vec<Occurrence<'a>> {
        let mut scope = TemplateScope::all_accounts().with_categories(categories.iter().cloned());
        if let Some(kind) = kind {
            scope = scope.with_kind(kind);
        }
        timeline_within(self.templates, range, &scope)
    }

    pub fn transactions_of_account_in(
        &self,
        account: AccountId,
        range: &DateRange,
        kind: Option<RelativeKind>,
        categories: &[String],
    ) -> Vec<Occurrence<'a>> {
        let mut scope = TemplateScope::account(account).with_categories(categories.iter().cloned());
        if let Some(kind) = kind {
            scope = scope.with_relative_kind(kind);
        }
        timeline_within(self.templates, range, &scope)
    }

    pub fn all_transactions_before(
        &self,
        date: NaiveDate,
        account: Option<AccountId>,
    ) -> Vec<Occurrence<'a>> {
        let scope = match account {
            Some(account) => TemplateScope::account(account),
            None => TemplateScope::all_accounts(),
        };
        timeline_before(self.templates, date, &scope)
    }

    /// Earliest occurrence involving `account` strictly after `after`.
    pub fn next_occurrence(&self, account: AccountId, after: NaiveDate) -> Option<Occurrence<'a>> {
        let from = after.succ_opt()?;
        self.templates
            .iter()
            .filter(|template| template.involves(account))
            .filter_map(|template| first_on_or_after(template, from))
            .min_by_key(|occurrence| occurrence.date)
    }

    /// Distinct categories, sorted, optionally limited to one kind and to
    /// those containing `like` (case-insensitive).
    pub fn categories(&self, kind: Option<Kind>, like: &str) -> Vec<String> {
        self.distinct(
            |template| kind.map_or(true, |kind| template.kind.tag() == kind),
            |template| &template.category,
            like,
        )
    }

    pub fn titles(&self, kind: Option<Kind>, like: &str) -> Vec<String> {
        self.distinct(
            |template| kind.map_or(true, |kind| template.kind.tag() == kind),
            |template| &template.title,
            like,
        )
    }

    pub fn categories_of_account(&self, account: AccountId) -> Vec<String> {
        self.distinct(
            |template| template.involves(account),
            |template| &template.category,
            "",
        )
    }

    fn distinct<P, F>(&self, admit: P, field: F, like: &str) -> Vec<String>
    where
        P: Fn(&TransactionTemplate) -> bool,
        F: Fn(&'a TransactionTemplate) -> &'a String,
    {
        let needle = like.to_lowercase();
        self.templates
            .iter()
            .filter(|&template| admit(template))
            .map(field)
            .filter(|value| value.to_lowercase().contains(&needle))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// The next occurrence after an arbitrary date lies within one cadence unit
/// of it (month-end clamping only ever moves dates earlier), unless the
/// template has not started yet.
fn first_on_or_after(template: &TransactionTemplate, from: NaiveDate) -> Option<Occurrence<'_>> {
    let horizon = shift(from, template.cadence, 1).max(template.start_date);
    occurrences_within(template, &DateRange::new(from, horizon))
        .into_iter()
        .next()
}
