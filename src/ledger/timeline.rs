use chrono::NaiveDate;
use tracing::debug;

use super::range::DateRange;
use super::recurring::{occurrences_before, occurrences_within, Occurrence};
use super::template::{AccountId, Kind, TransactionTemplate};
use super::value::{relative_kind, Perspective, RelativeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    Any,
    Absolute(Kind),
    Relative(RelativeKind),
}

/// Selects which templates take part in a query before they are expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateScope {
    pub perspective: Perspective,
    pub kind: KindFilter,
    /// Allow-list of categories; empty admits every category.
    pub categories: Vec<String>,
}

impl TemplateScope {
    pub fn all_accounts() -> Self {
        Self::of(Perspective::AllAccounts)
    }

    pub fn account(account: AccountId) -> Self {
        Self::of(Perspective::Account(account))
    }

    pub fn of(perspective: Perspective) -> Self {
        Self {
            perspective,
            kind: KindFilter::Any,
            categories: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: Kind) -> Self {
        self.kind = KindFilter::Absolute(kind);
        self
    }

    pub fn with_relative_kind(mut self, kind: RelativeKind) -> Self {
        self.kind = KindFilter::Relative(kind);
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn admits(&self, template: &TransactionTemplate) -> bool {
        self.admits_account(template) && self.admits_kind(template) && self.admits_category(template)
    }

    fn admits_account(&self, template: &TransactionTemplate) -> bool {
        match self.perspective {
            Perspective::AllAccounts => true,
            Perspective::Account(account) => template.involves(account),
        }
    }

    fn admits_kind(&self, template: &TransactionTemplate) -> bool {
        match (self.kind, self.perspective) {
            (KindFilter::Any, _) => true,
            (KindFilter::Absolute(kind), _) => template.kind.tag() == kind,
            (KindFilter::Relative(kind), Perspective::Account(account)) => {
                relative_kind(template, account) == Some(kind)
            }
            (KindFilter::Relative(kind), Perspective::AllAccounts) => {
                template.kind.tag() == absolute(kind)
            }
        }
    }

    fn admits_category(&self, template: &TransactionTemplate) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|c| *c == template.category)
    }
}

fn absolute(kind: RelativeKind) -> Kind {
    match kind {
        RelativeKind::Credit => Kind::Credit,
        RelativeKind::Debit => Kind::Debit,
        RelativeKind::SentTransference | RelativeKind::ReceivedTransference => Kind::Transfer,
    }
}

/// Flattens occurrence streams into one list ordered by date. Same-day
/// occurrences keep their input order.
pub fn merge<'a, I, S>(streams: I) -> Vec<Occurrence<'a>>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Occurrence<'a>>,
{
    let mut merged: Vec<Occurrence<'a>> = streams.into_iter().flatten().collect();
    merged.sort_by_key(|occurrence| occurrence.date);
    merged
}

/// Every occurrence of the scoped templates through `cutoff`.
pub fn timeline_before<'a>(
    templates: &'a [TransactionTemplate],
    cutoff: NaiveDate,
    scope: &TemplateScope,
) -> Vec<Occurrence<'a>> {
    let merged = merge(
        templates
            .iter()
            .filter(|template| scope.admits(template))
            .map(|template| occurrences_before(template, cutoff)),
    );
    debug!(%cutoff, occurrences = merged.len(), "expanded timeline before cutoff");
    merged
}

/// Occurrences of the scoped templates intersecting `range`.
pub fn timeline_within<'a>(
    templates: &'a [TransactionTemplate],
    range: &DateRange,
    scope: &TemplateScope,
) -> Vec<Occurrence<'a>> {
    if range.is_empty() {
        return Vec::new();
    }
    let merged = merge(
        templates
            .iter()
            .filter(|template| template.start_date <= range.end && scope.admits(template))
            .map(|template| occurrences_within(template, range)),
    );
    debug!(
        start = %range.start,
        end = %range.end,
        occurrences = merged.len(),
        "expanded timeline within range"
    );
    merged
}
