//! Receipt issuance error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while issuing or combining receipts.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A combined receipt was requested with no source records.
    #[error("A combined receipt requires at least one transaction")]
    EmptyReferences,

    /// The client-declared total does not equal the sum of references.
    #[error("Declared total {declared} does not match the sum of records ({actual})")]
    TotalMismatch {
        /// The amount the client declared.
        declared: Decimal,
        /// The actual sum of the referenced records.
        actual: Decimal,
    },

    /// A referenced record is not approved.
    #[error("Transaction {0} is not approved; only approved records can be receipted")]
    NotApproved(Uuid),

    /// A referenced record already belongs to an active receipt.
    #[error("Transaction {0} already has a receipt")]
    AlreadyReceipted(Uuid),

    /// Income and expense records cannot share a receipt.
    #[error("Cannot combine income and expense records into one receipt")]
    MixedKinds,

    /// Records from different parishes cannot share a receipt.
    #[error("All records on a combined receipt must belong to the same parish")]
    MixedParishes,

    /// A referenced record does not exist.
    #[error("Transaction record {0} not found")]
    RecordNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReceiptError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::EmptyReferences | Self::TotalMismatch { .. } => 400,
            Self::RecordNotFound(_) => 404,
            Self::NotApproved(_)
            | Self::AlreadyReceipted(_)
            | Self::MixedKinds
            | Self::MixedParishes => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyReferences => "EMPTY_REFERENCES",
            Self::TotalMismatch { .. } => "TOTAL_MISMATCH",
            Self::NotApproved(_) => "RECORD_NOT_APPROVED",
            Self::AlreadyReceipted(_) => "ALREADY_RECEIPTED",
            Self::MixedKinds => "MIXED_RECORD_KINDS",
            Self::MixedParishes => "MIXED_PARISHES",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_total_mismatch_is_bad_request() {
        let err = ReceiptError::TotalMismatch {
            declared: dec!(100),
            actual: dec!(150),
        };
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("150"));
    }

    #[test]
    fn test_state_violations_are_conflicts() {
        assert_eq!(ReceiptError::NotApproved(Uuid::nil()).status_code(), 409);
        assert_eq!(
            ReceiptError::AlreadyReceipted(Uuid::nil()).status_code(),
            409
        );
        assert_eq!(ReceiptError::MixedKinds.status_code(), 409);
        assert_eq!(ReceiptError::MixedParishes.status_code(), 409);
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(ReceiptError::EmptyReferences.error_code(), "EMPTY_REFERENCES");
        assert_eq!(ReceiptError::MixedKinds.error_code(), "MIXED_RECORD_KINDS");
    }
}
