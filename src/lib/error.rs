use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{CustomerId, InstallmentId, MonetaryAmount, PurchaseId, Revision};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Every failure the ledger reports. Nothing is clamped or dropped silently: a rejected
/// operation leaves the store exactly as it found it.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("payment amount must be positive, got {0}")]
    InvalidPayment(MonetaryAmount),

    #[error("payment of {amount} exceeds outstanding balance of {outstanding}")]
    Overpayment {
        amount: MonetaryAmount,
        outstanding: MonetaryAmount,
    },

    #[error("customer {0} not found")]
    CustomerNotFound(CustomerId),

    #[error("purchase {0} not found")]
    PurchaseNotFound(PurchaseId),

    #[error("installment {0} not found")]
    InstallmentNotFound(InstallmentId),

    #[error("purchase {purchase} changed concurrently (read revision {expected}, found {found})")]
    ConcurrencyConflict {
        purchase: PurchaseId,
        expected: Revision,
        found: Revision,
    },

    #[error("customer {0} is already registered")]
    DuplicateCustomer(CustomerId),

    #[error("amount {0} cannot be represented in minor currency units")]
    InvalidAmount(String),

    #[error("amount total exceeds the representable range")]
    AmountOverflow,

    #[error("date arithmetic out of range from {0}")]
    DateOutOfRange(NaiveDate),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("decimal error: {0}")]
    Decimal(#[from] rust_decimal::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LedgerError {
    /// Conflicts are the only failures a caller may resubmit unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::ConcurrencyConflict { .. })
    }
}
