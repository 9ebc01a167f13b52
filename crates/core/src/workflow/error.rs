//! Workflow error types for record lifecycle management.

use thiserror::Error;
use uuid::Uuid;

use curia_shared::Role;

use crate::ledger::RecordStatus;
use crate::workflow::permissions::Action;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Attempted to decide a record that is no longer pending.
    #[error("Record has already been processed (status is {status})")]
    AlreadyDecided {
        /// The record's current status.
        status: RecordStatus,
    },

    /// Record not found.
    #[error("Transaction record {0} not found")]
    RecordNotFound(Uuid),

    /// Receipt not found.
    #[error("Receipt {0} not found")]
    ReceiptNotFound(Uuid),

    /// Attempted to cancel a receipt that is already cancelled.
    #[error("Receipt {receipt_no} is already cancelled")]
    AlreadyCancelled {
        /// The human-readable receipt number.
        receipt_no: String,
    },

    /// Role does not permit the action.
    #[error("Role {role} is not allowed to {action}")]
    RoleNotAllowed {
        /// The caller's role.
        role: Role,
        /// The attempted action.
        action: Action,
    },

    /// Caller is neither the creator nor a super-admin.
    #[error("Only the original creator or a super-admin may modify this record")]
    NotRecordOwner,

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::RoleNotAllowed { .. } | Self::NotRecordOwner => 403,
            Self::RecordNotFound(_) | Self::ReceiptNotFound(_) => 404,
            Self::AlreadyDecided { .. } | Self::AlreadyCancelled { .. } => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyDecided { .. } => "ALREADY_DECIDED",
            Self::RecordNotFound(_) => "RECORD_NOT_FOUND",
            Self::ReceiptNotFound(_) => "RECEIPT_NOT_FOUND",
            Self::AlreadyCancelled { .. } => "ALREADY_CANCELLED",
            Self::RoleNotAllowed { .. } => "ROLE_NOT_ALLOWED",
            Self::NotRecordOwner => "NOT_RECORD_OWNER",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_decided_is_conflict() {
        let err = WorkflowError::AlreadyDecided {
            status: RecordStatus::Approved,
        };
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "ALREADY_DECIDED");
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_already_cancelled_is_conflict() {
        let err = WorkflowError::AlreadyCancelled {
            receipt_no: "REC-2024-0001".to_string(),
        };
        assert_eq!(err.status_code(), 409);
        assert!(err.to_string().contains("REC-2024-0001"));
    }

    #[test]
    fn test_permission_errors_are_forbidden() {
        let err = WorkflowError::RoleNotAllowed {
            role: Role::Secretary,
            action: Action::CancelReceipt,
        };
        assert_eq!(err.status_code(), 403);
        assert_eq!(WorkflowError::NotRecordOwner.status_code(), 403);
    }

    #[test]
    fn test_not_found_errors() {
        assert_eq!(WorkflowError::RecordNotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(
            WorkflowError::ReceiptNotFound(Uuid::nil()).status_code(),
            404
        );
    }
}
