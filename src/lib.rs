#![doc(test(attr(deny(warnings))))]

//! Statement Core expands recurring transaction templates into dated
//! occurrences and derives balances and period totals from them.

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod store;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Statement Core tracing initialized.");
    });
}
