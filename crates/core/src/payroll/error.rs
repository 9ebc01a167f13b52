//! Payroll bridge error types.

use thiserror::Error;

/// Errors that can occur while staging a payroll batch.
#[derive(Debug, Error)]
pub enum PayrollError {
    /// No draft rows exist for the requested period.
    #[error("No draft payroll rows for period {period}; nothing to approve")]
    NothingToApprove {
        /// The requested period token.
        period: String,
    },

    /// The period token is not of the `MM/YYYY` form.
    #[error("Invalid payroll period '{0}'; expected MM/YYYY")]
    InvalidPeriod(String),

    /// A bank transfer batch was requested without a bank account.
    #[error("Payment method 'transfer' requires a bank account")]
    TransferRequiresBankAccount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl PayrollError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPeriod(_) | Self::TransferRequiresBankAccount => 400,
            Self::NothingToApprove { .. } => 404,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NothingToApprove { .. } => "NOTHING_TO_APPROVE",
            Self::InvalidPeriod(_) => "INVALID_PERIOD",
            Self::TransferRequiresBankAccount => "TRANSFER_REQUIRES_BANK_ACCOUNT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_to_approve_carries_period() {
        let err = PayrollError::NothingToApprove {
            period: "01/2024".to_string(),
        };
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOTHING_TO_APPROVE");
        assert!(err.to_string().contains("01/2024"));
    }

    #[test]
    fn test_invalid_period_is_bad_request() {
        assert_eq!(PayrollError::InvalidPeriod("1/24".into()).status_code(), 400);
        assert_eq!(
            PayrollError::TransferRequiresBankAccount.status_code(),
            400
        );
    }
}
