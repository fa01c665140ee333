use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cadence::Cadence;
use crate::errors::StatementError;

pub type AccountId = Uuid;
pub type TemplateId = Uuid;

/// Absolute transaction kind, as seen from the whole ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Credit,
    Debit,
    Transfer,
}

impl Kind {
    pub fn parse(raw: &str) -> Option<Kind> {
        match raw.to_ascii_lowercase().as_str() {
            "credit" => Some(Kind::Credit),
            "debit" => Some(Kind::Debit),
            "transfer" | "transference" => Some(Kind::Transfer),
            _ => None,
        }
    }
}

/// Kind of a template together with the data only some kinds carry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Credit,
    Debit,
    Transfer { recipient: AccountId },
}

impl TransactionKind {
    pub fn tag(&self) -> Kind {
        match self {
            TransactionKind::Credit => Kind::Credit,
            TransactionKind::Debit => Kind::Debit,
            TransactionKind::Transfer { .. } => Kind::Transfer,
        }
    }

    pub fn recipient(&self) -> Option<AccountId> {
        match self {
            TransactionKind::Transfer { recipient } => Some(*recipient),
            _ => None,
        }
    }
}

/// How many times a recurring template repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Repetitions {
    Times(u32),
    Indeterminate,
}

impl Repetitions {
    /// Decodes the stored repeat count, where zero means "no end".
    pub fn from_count(count: u32) -> Repetitions {
        match count {
            0 => Repetitions::Indeterminate,
            n => Repetitions::Times(n),
        }
    }

    pub fn count(&self) -> u32 {
        match self {
            Repetitions::Times(n) => *n,
            Repetitions::Indeterminate => 0,
        }
    }

    /// Last sequence number of the series, or `None` when it has no end.
    ///
    /// `Times(0)` reads as no end, the same as a stored repeat count of zero.
    pub fn total(&self) -> Option<u32> {
        match self {
            Repetitions::Times(0) | Repetitions::Indeterminate => None,
            Repetitions::Times(n) => Some(*n),
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        self.total().is_none()
    }

    pub(crate) fn allows(&self, sequence: u32) -> bool {
        self.total().map_or(true, |total| sequence <= total)
    }
}

/// A stored, possibly recurring transaction definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionTemplate {
    pub id: TemplateId,
    pub kind: TransactionKind,
    pub title: String,
    pub category: String,
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub cadence: Cadence,
    pub repetitions: Repetitions,
    pub account: AccountId,
}

impl TransactionTemplate {
    /// Creates a single, non-recurring template.
    pub fn new(
        kind: TransactionKind,
        title: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        start_date: NaiveDate,
        account: AccountId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            category: category.into(),
            amount,
            start_date,
            cadence: Cadence::Single,
            repetitions: Repetitions::Times(1),
            account,
        }
    }

    pub fn credit(amount: Decimal, start_date: NaiveDate, account: AccountId) -> Self {
        Self::new(TransactionKind::Credit, "", "", amount, start_date, account)
    }

    pub fn debit(amount: Decimal, start_date: NaiveDate, account: AccountId) -> Self {
        Self::new(TransactionKind::Debit, "", "", amount, start_date, account)
    }

    pub fn transfer(
        amount: Decimal,
        start_date: NaiveDate,
        from: AccountId,
        to: AccountId,
    ) -> Self {
        Self::new(
            TransactionKind::Transfer { recipient: to },
            "",
            "",
            amount,
            start_date,
            from,
        )
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn repeating(mut self, cadence: Cadence, repetitions: Repetitions) -> Self {
        self.cadence = cadence;
        self.repetitions = Repetitions::from_count(repetitions.count());
        self
    }

    pub fn recipient(&self) -> Option<AccountId> {
        self.kind.recipient()
    }

    /// Whether `account` owns the template or, for transfers, receives it.
    pub fn involves(&self, account: AccountId) -> bool {
        self.account == account || self.recipient() == Some(account)
    }
}

/// Flat record shape supplied by persistence collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TemplateId>,
    pub kind: Kind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub amount: Decimal,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub cadence: Cadence,
    #[serde(default)]
    pub repeat: u32,
    pub account: AccountId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<AccountId>,
}

impl TryFrom<TemplateRecord> for TransactionTemplate {
    type Error = StatementError;

    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        if record.amount.is_sign_negative() {
            return Err(StatementError::NegativeAmount {
                title: record.title,
                amount: record.amount,
            });
        }
        let kind = match (record.kind, record.recipient) {
            (Kind::Credit, None) => TransactionKind::Credit,
            (Kind::Debit, None) => TransactionKind::Debit,
            (Kind::Transfer, Some(recipient)) => TransactionKind::Transfer { recipient },
            (Kind::Transfer, None) => {
                return Err(StatementError::MissingRecipient(record.title));
            }
            (_, Some(_)) => return Err(StatementError::UnexpectedRecipient(record.title)),
        };
        let repetitions = match record.cadence {
            Cadence::Single => Repetitions::Times(1),
            _ => Repetitions::from_count(record.repeat),
        };
        Ok(Self {
            id: record.id.unwrap_or_else(Uuid::new_v4),
            kind,
            title: record.title,
            category: record.category,
            amount: record.amount,
            start_date: record.start_date,
            cadence: record.cadence,
            repetitions,
            account: record.account,
        })
    }
}

impl From<&TransactionTemplate> for TemplateRecord {
    fn from(template: &TransactionTemplate) -> Self {
        Self {
            id: Some(template.id),
            kind: template.kind.tag(),
            title: template.title.clone(),
            category: template.category.clone(),
            amount: template.amount,
            start_date: template.start_date,
            cadence: template.cadence,
            repeat: template.repetitions.count(),
            account: template.account,
            recipient: template.recipient(),
        }
    }
}
