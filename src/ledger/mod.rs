//! Transaction templates, their recurrence expansion, and the statement
//! calculations built on top of it.

pub mod cadence;
pub mod range;
pub mod recurring;
pub mod statement;
pub mod template;
pub mod timeline;
pub mod value;

pub use cadence::{shift, Cadence};
pub use range::{DateRange, Period, PeriodKind};
pub use recurring::{
    expand, occurrences_before, occurrences_within, Occurrence, Repeatability, Times,
};
pub use statement::{amounts_grouped_by, total_balance_as_of, Statement};
pub use template::{
    AccountId, Kind, Repetitions, TemplateId, TemplateRecord, TransactionKind, TransactionTemplate,
};
pub use timeline::{merge, timeline_before, timeline_within, KindFilter, TemplateScope};
pub use value::{
    relative_kind, relative_value, transfer_direction, Perspective, RelativeKind,
    TransferDirection,
};
