#![doc(test(attr(deny(warnings))))]

//! Expense Core offers the split-ledger and spend-aggregation primitives
//! behind a travel-expense companion built on an external bill-splitting
//! service.
//!
//! Two pure engines cooperate: [`core::services::SplitService`] keeps a
//! per-member paid/owed table reconciled through single-field edits, and
//! [`core::services::AnalyticsService`] turns a flat expense history into
//! grouped, time-apportioned totals. Fetching, persisting, and rendering
//! all live with external collaborators.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
