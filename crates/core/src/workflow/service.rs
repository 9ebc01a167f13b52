//! Approval state machine for record transitions.
//!
//! Validates the pending → approved/rejected transition and produces
//! the audit-stamped action. The database layer additionally guards
//! the write with a conditional update on `status = pending`, so two
//! concurrent approvers can never both succeed.

use chrono::Utc;

use curia_shared::types::UserId;

use crate::ledger::RecordStatus;
use crate::workflow::error::WorkflowError;
use crate::workflow::types::{Decision, DecisionAction};

/// Stateless service for validating record state transitions.
pub struct ApprovalService;

impl ApprovalService {
    /// Validates a decision against the record's current status.
    ///
    /// Only a pending record may be decided; anything else is a
    /// conflict, never a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::AlreadyDecided` if the record is not
    /// pending.
    pub fn decide(
        current_status: RecordStatus,
        decision: Decision,
        decided_by: UserId,
        notes: Option<String>,
    ) -> Result<DecisionAction, WorkflowError> {
        if current_status != RecordStatus::Pending {
            return Err(WorkflowError::AlreadyDecided {
                status: current_status,
            });
        }

        let now = Utc::now();
        Ok(match decision {
            Decision::Approved => DecisionAction::Approve {
                new_status: RecordStatus::Approved,
                approved_by: decided_by,
                approved_at: now,
                notes,
            },
            Decision::Rejected => DecisionAction::Reject {
                new_status: RecordStatus::Rejected,
                rejected_by: decided_by,
                rejected_at: now,
                notes,
            },
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    /// - Approved → Pending (receipt cancellation)
    #[must_use]
    pub fn is_valid_transition(from: RecordStatus, to: RecordStatus) -> bool {
        matches!(
            (from, to),
            (
                RecordStatus::Pending,
                RecordStatus::Approved | RecordStatus::Rejected
            ) | (RecordStatus::Approved, RecordStatus::Pending)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approve_from_pending() {
        let user_id = UserId::new();
        let action =
            ApprovalService::decide(RecordStatus::Pending, Decision::Approved, user_id, None)
                .expect("pending records can be approved");
        assert_eq!(action.new_status(), RecordStatus::Approved);
        match action {
            DecisionAction::Approve { approved_by, .. } => assert_eq!(approved_by, user_id),
            DecisionAction::Reject { .. } => panic!("expected approve action"),
        }
    }

    #[test]
    fn test_reject_from_pending() {
        let action = ApprovalService::decide(
            RecordStatus::Pending,
            Decision::Rejected,
            UserId::new(),
            Some("missing evidence".to_string()),
        )
        .expect("pending records can be rejected");
        assert_eq!(action.new_status(), RecordStatus::Rejected);
    }

    #[test]
    fn test_approve_already_approved_conflicts() {
        let result = ApprovalService::decide(
            RecordStatus::Approved,
            Decision::Approved,
            UserId::new(),
            None,
        );
        assert!(matches!(
            result,
            Err(WorkflowError::AlreadyDecided {
                status: RecordStatus::Approved
            })
        ));
    }

    #[test]
    fn test_decide_rejected_record_conflicts() {
        let result = ApprovalService::decide(
            RecordStatus::Rejected,
            Decision::Approved,
            UserId::new(),
            None,
        );
        assert!(matches!(result, Err(WorkflowError::AlreadyDecided { .. })));
    }

    #[test]
    fn test_valid_transitions() {
        assert!(ApprovalService::is_valid_transition(
            RecordStatus::Pending,
            RecordStatus::Approved
        ));
        assert!(ApprovalService::is_valid_transition(
            RecordStatus::Pending,
            RecordStatus::Rejected
        ));
        // Cancellation path.
        assert!(ApprovalService::is_valid_transition(
            RecordStatus::Approved,
            RecordStatus::Pending
        ));

        assert!(!ApprovalService::is_valid_transition(
            RecordStatus::Rejected,
            RecordStatus::Pending
        ));
        assert!(!ApprovalService::is_valid_transition(
            RecordStatus::Approved,
            RecordStatus::Rejected
        ));
    }
}
