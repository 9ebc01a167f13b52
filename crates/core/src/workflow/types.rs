//! Workflow domain types for record lifecycle management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use curia_shared::types::UserId;

use crate::ledger::RecordStatus;

/// The decision an approver takes on a pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Approve the record; a receipt will be issued.
    Approved,
    /// Reject the record; no further side effect.
    Rejected,
}

impl Decision {
    /// Parses a decision from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns the record status this decision produces.
    #[must_use]
    pub const fn target_status(&self) -> RecordStatus {
        match self {
            Self::Approved => RecordStatus::Approved,
            Self::Rejected => RecordStatus::Rejected,
        }
    }
}

/// A validated state transition with audit data.
///
/// Each variant captures the resulting status and the audit trail
/// (who, when, why).
#[derive(Debug, Clone)]
pub enum DecisionAction {
    /// Approve a pending record.
    Approve {
        /// The new status after approval.
        new_status: RecordStatus,
        /// The user who approved the record.
        approved_by: UserId,
        /// When the record was approved.
        approved_at: DateTime<Utc>,
        /// Optional notes from the approver.
        notes: Option<String>,
    },
    /// Reject a pending record.
    Reject {
        /// The new status after rejection.
        new_status: RecordStatus,
        /// The user who rejected the record.
        rejected_by: UserId,
        /// When the record was rejected.
        rejected_at: DateTime<Utc>,
        /// Optional notes from the approver.
        notes: Option<String>,
    },
}

impl DecisionAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> RecordStatus {
        match self {
            Self::Approve { new_status, .. } | Self::Reject { new_status, .. } => *new_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_parse() {
        assert_eq!(Decision::parse("approved"), Some(Decision::Approved));
        assert_eq!(Decision::parse("REJECTED"), Some(Decision::Rejected));
        assert_eq!(Decision::parse("posted"), None);
    }

    #[test]
    fn test_decision_target_status() {
        assert_eq!(Decision::Approved.target_status(), RecordStatus::Approved);
        assert_eq!(Decision::Rejected.target_status(), RecordStatus::Rejected);
    }
}
