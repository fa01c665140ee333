use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::recurring::Occurrence;
use super::template::{AccountId, TransactionKind, TransactionTemplate};

/// Account (or whole ledger) a signed value is computed against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Perspective {
    AllAccounts,
    Account(AccountId),
}

/// Direction of a transfer as seen from one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferDirection {
    Sent,
    Received,
    Unrelated,
}

/// Kind of a template relative to one account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelativeKind {
    Credit,
    Debit,
    SentTransference,
    ReceivedTransference,
}

impl RelativeKind {
    pub fn parse(raw: &str) -> Option<RelativeKind> {
        match raw.to_ascii_lowercase().as_str() {
            "credit" => Some(RelativeKind::Credit),
            "debit" => Some(RelativeKind::Debit),
            "sent" | "senttransference" => Some(RelativeKind::SentTransference),
            "received" | "receivedtransference" => Some(RelativeKind::ReceivedTransference),
            _ => None,
        }
    }
}

/// A sender sending to itself counts as sent.
pub fn transfer_direction(
    owner: AccountId,
    recipient: AccountId,
    account: AccountId,
) -> TransferDirection {
    if owner == account {
        TransferDirection::Sent
    } else if recipient == account {
        TransferDirection::Received
    } else {
        TransferDirection::Unrelated
    }
}

/// Classifies `template` from `account`'s point of view; `None` when the
/// account takes no part in it.
pub fn relative_kind(template: &TransactionTemplate, account: AccountId) -> Option<RelativeKind> {
    match template.kind {
        TransactionKind::Credit if template.account == account => Some(RelativeKind::Credit),
        TransactionKind::Debit if template.account == account => Some(RelativeKind::Debit),
        TransactionKind::Credit | TransactionKind::Debit => None,
        TransactionKind::Transfer { recipient } => {
            match transfer_direction(template.account, recipient, account) {
                TransferDirection::Sent => Some(RelativeKind::SentTransference),
                TransferDirection::Received => Some(RelativeKind::ReceivedTransference),
                TransferDirection::Unrelated => None,
            }
        }
    }
}

/// Signed effect of `occurrence` on the balance seen from `perspective`.
///
/// Credits and debits keep their sign whatever the perspective; transfers
/// cancel out across the whole ledger.
pub fn relative_value(occurrence: &Occurrence<'_>, perspective: Perspective) -> Decimal {
    let amount = occurrence.amount();
    match (occurrence.kind(), perspective) {
        (TransactionKind::Credit, _) => amount,
        (TransactionKind::Debit, _) => -amount,
        (TransactionKind::Transfer { .. }, Perspective::AllAccounts) => Decimal::ZERO,
        (TransactionKind::Transfer { recipient }, Perspective::Account(account)) => {
            match transfer_direction(occurrence.account(), recipient, account) {
                TransferDirection::Sent => -amount,
                TransferDirection::Received => amount,
                TransferDirection::Unrelated => Decimal::ZERO,
            }
        }
    }
}
