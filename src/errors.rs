use rust_decimal::Decimal;
use thiserror::Error;

/// Error type that captures the recoverable split-ledger failures.
///
/// Every variant is a local condition: the operation that raised it is a
/// no-op and the ledger is left exactly as it was.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unknown member: {0}")]
    UnknownMember(String),
    #[error("Not submittable: paid {paid_total} does not reconcile with total {total_cost}")]
    NotSubmittable {
        paid_total: Decimal,
        total_cost: Decimal,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
