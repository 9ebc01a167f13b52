//! Error types for ledger operations.

use thiserror::Error;
use uuid::Uuid;

use super::types::RecordStatus;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Amount is zero or negative.
    #[error("Amount must be positive")]
    AmountNotPositive,

    /// Income record without a fund attribution.
    #[error("Income records must reference a fund")]
    MissingFund,

    /// Record attributable to no ledger dimension.
    #[error("Record must reference a fund or a bank account")]
    MissingLedgerDimension,

    /// Transfer payment without a bank account.
    #[error("Transfer payments must reference a bank account")]
    TransferRequiresBankAccount,

    /// Description missing.
    #[error("Description is required")]
    DescriptionRequired,

    /// Unknown balance dimension in a query.
    #[error("Unknown balance dimension: {0}")]
    InvalidDimension(String),

    /// Record not found.
    #[error("Transaction record {0} not found")]
    RecordNotFound(Uuid),

    /// Operation requires a pending record.
    #[error("Only pending records can be modified (status is {status})")]
    NotPending {
        /// The record's current status.
        status: RecordStatus,
    },

    /// Role or ownership check failed.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::AmountNotPositive
            | Self::MissingFund
            | Self::MissingLedgerDimension
            | Self::TransferRequiresBankAccount
            | Self::DescriptionRequired
            | Self::InvalidDimension(_) => 400,
            Self::Forbidden(_) => 403,
            Self::RecordNotFound(_) => 404,
            Self::NotPending { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AmountNotPositive => "AMOUNT_NOT_POSITIVE",
            Self::MissingFund => "MISSING_FUND",
            Self::MissingLedgerDimension => "MISSING_LEDGER_DIMENSION",
            Self::TransferRequiresBankAccount => "TRANSFER_REQUIRES_BANK_ACCOUNT",
            Self::DescriptionRequired => "DESCRIPTION_REQUIRED",
            Self::InvalidDimension(_) => "INVALID_DIMENSION",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::NotPending { .. } => "NOT_PENDING",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_400() {
        assert_eq!(LedgerError::AmountNotPositive.status_code(), 400);
        assert_eq!(LedgerError::MissingFund.status_code(), 400);
        assert_eq!(LedgerError::TransferRequiresBankAccount.status_code(), 400);
    }

    #[test]
    fn test_not_pending_is_conflict() {
        let err = LedgerError::NotPending {
            status: RecordStatus::Approved,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "NOT_PENDING");
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_not_found_and_forbidden() {
        assert_eq!(LedgerError::RecordNotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(LedgerError::Forbidden(String::new()).status_code(), 403);
    }
}
