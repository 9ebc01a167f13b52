//! Capability table mapping (role, action) to allowed.
//!
//! A single table shared by the income and expense paths, so the two
//! permission lists cannot drift apart. Ownership is checked
//! separately: edit/delete additionally require being the creator
//! unless the caller is a super-admin.

use std::fmt;

use curia_shared::types::UserId;
use curia_shared::{Caller, Role};

use super::error::WorkflowError;

/// Actions gated by the capability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a pending income or expense record.
    CreateRecord,
    /// Edit a pending record.
    EditRecord,
    /// Delete a pending record.
    DeleteRecord,
    /// Approve or reject a pending record.
    DecideRecord,
    /// Create an immediately-effective adjustment.
    CreateAdjustment,
    /// Merge approved records into a combined receipt.
    CombineReceipts,
    /// Cancel a receipt and revert its transactions.
    CancelReceipt,
    /// Stage a payroll batch into pending expenses.
    ApprovePayroll,
    /// Read balances and listings.
    View,
}

impl Action {
    /// Returns a short description used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRecord => "create records",
            Self::EditRecord => "edit records",
            Self::DeleteRecord => "delete records",
            Self::DecideRecord => "approve or reject records",
            Self::CreateAdjustment => "create adjustments",
            Self::CombineReceipts => "combine receipts",
            Self::CancelReceipt => "cancel receipts",
            Self::ApprovePayroll => "approve payroll batches",
            Self::View => "view records",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns true if the role may perform the action.
#[must_use]
pub const fn allows(role: Role, action: Action) -> bool {
    match action {
        Action::View => true,
        Action::CreateRecord | Action::EditRecord | Action::DeleteRecord => {
            matches!(
                role,
                Role::Secretary | Role::Priest | Role::Accountant | Role::SuperAdmin
            )
        }
        Action::DecideRecord
        | Action::CreateAdjustment
        | Action::CombineReceipts
        | Action::ApprovePayroll => {
            matches!(role, Role::Accountant | Role::SuperAdmin)
        }
        // Deliberately narrow escape hatch, not a workflow step.
        Action::CancelReceipt => matches!(role, Role::SuperAdmin),
    }
}

/// Checks the capability table, returning a typed error on refusal.
///
/// # Errors
///
/// Returns `WorkflowError::RoleNotAllowed` if the role lacks the
/// capability.
pub const fn ensure(role: Role, action: Action) -> Result<(), WorkflowError> {
    if allows(role, action) {
        Ok(())
    } else {
        Err(WorkflowError::RoleNotAllowed { role, action })
    }
}

/// Ownership rule for edit/delete: the original creator, or a
/// super-admin acting on anyone's record.
#[must_use]
pub fn can_modify_record(caller: &Caller, created_by: UserId) -> bool {
    caller.role == Role::SuperAdmin || caller.user_id == created_by
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ROLES: [Role; 5] = [
        Role::Viewer,
        Role::Secretary,
        Role::Priest,
        Role::Accountant,
        Role::SuperAdmin,
    ];

    #[test]
    fn test_viewer_can_only_view() {
        assert!(allows(Role::Viewer, Action::View));
        assert!(!allows(Role::Viewer, Action::CreateRecord));
        assert!(!allows(Role::Viewer, Action::DecideRecord));
        assert!(!allows(Role::Viewer, Action::CancelReceipt));
    }

    #[test]
    fn test_creator_set() {
        for role in [Role::Secretary, Role::Priest, Role::Accountant, Role::SuperAdmin] {
            assert!(allows(role, Action::CreateRecord), "{role} should create");
        }
        assert!(!allows(Role::Viewer, Action::CreateRecord));
    }

    #[test]
    fn test_decider_set_is_smaller_than_creator_set() {
        let creators: Vec<_> = ALL_ROLES
            .iter()
            .filter(|r| allows(**r, Action::CreateRecord))
            .collect();
        let deciders: Vec<_> = ALL_ROLES
            .iter()
            .filter(|r| allows(**r, Action::DecideRecord))
            .collect();
        assert!(deciders.len() < creators.len());
        assert!(allows(Role::Accountant, Action::DecideRecord));
        assert!(!allows(Role::Priest, Action::DecideRecord));
    }

    #[test]
    fn test_cancel_receipt_is_super_admin_only() {
        for role in ALL_ROLES {
            assert_eq!(allows(role, Action::CancelReceipt), role == Role::SuperAdmin);
        }
    }

    #[test]
    fn test_ensure_returns_typed_error() {
        assert!(ensure(Role::SuperAdmin, Action::CancelReceipt).is_ok());
        assert!(matches!(
            ensure(Role::Secretary, Action::CancelReceipt),
            Err(WorkflowError::RoleNotAllowed {
                role: Role::Secretary,
                action: Action::CancelReceipt,
            })
        ));
    }

    #[test]
    fn test_ownership_rule() {
        let creator = UserId::new();
        let owner = Caller::new(creator, Role::Secretary);
        let other = Caller::new(UserId::new(), Role::Accountant);
        let admin = Caller::new(UserId::new(), Role::SuperAdmin);

        assert!(can_modify_record(&owner, creator));
        assert!(!can_modify_record(&other, creator));
        assert!(can_modify_record(&admin, creator));
    }
}
