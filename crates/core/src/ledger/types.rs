//! Ledger domain types for income/expense records and adjustments.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use curia_shared::types::{BankAccountId, ContactId, FundId, ParishId, UserId};

use crate::sequence::CodePrefix;

/// Record kind: the two transaction variants share one lifecycle shape
/// with opposite cash direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Cash inflow.
    Income,
    /// Cash outflow.
    Expense,
}

impl RecordKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the code prefix for this record kind.
    #[must_use]
    pub const fn code_prefix(&self) -> CodePrefix {
        match self {
            Self::Income => CodePrefix::Income,
            Self::Expense => CodePrefix::Expense,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Approved → Pending (receipt cancellation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Awaiting a decision; the only editable state.
    Pending,
    /// Approved; a receipt exists for this record.
    Approved,
    /// Rejected; terminal, no side effects.
    Rejected,
}

impl RecordStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if the record can be edited or deleted.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash payment.
    Cash,
    /// Bank transfer; requires a bank account reference.
    Transfer,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
        }
    }

    /// Parses a payment method from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

/// Expense classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    /// Ordinary operational expense.
    General,
    /// Staged from a payroll batch; carries a salary snapshot.
    Salary,
}

impl ExpenseKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Salary => "salary",
        }
    }
}

/// Adjustment direction. Amounts are stored absolute; the sign is
/// applied only at aggregation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    /// Adds to the computed balance.
    Increase,
    /// Subtracts from the computed balance.
    Decrease,
}

impl AdjustmentKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }

    /// Parses an adjustment kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            _ => None,
        }
    }
}

/// Adjustment target: exactly one ledger dimension, enforced at the
/// type level rather than as two nullable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "dimension", content = "id")]
pub enum AdjustmentTarget {
    /// Adjusts a fund balance.
    Fund(FundId),
    /// Adjusts a bank account balance.
    BankAccount(BankAccountId),
}

/// Policy controlling whether adjustments take effect immediately.
///
/// The source behaviour (no review gate) is preserved, but isolated
/// here so a review workflow can be added without touching the data
/// model or the aggregation fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdjustmentPolicy {
    /// Adjustments apply as soon as they are created.
    #[default]
    Immediate,
}

impl AdjustmentPolicy {
    /// Returns true if a freshly created adjustment counts toward
    /// balances without further review.
    #[must_use]
    pub const fn effective_on_create(self) -> bool {
        matches!(self, Self::Immediate)
    }
}

/// Input for creating a new income or expense record.
#[derive(Debug, Clone)]
pub struct CreateRecordInput {
    /// Income or expense.
    pub kind: RecordKind,
    /// The owning parish.
    pub parish_id: ParishId,
    /// Fund attribution (required for income).
    pub fund_id: Option<FundId>,
    /// Bank account attribution.
    pub bank_account_id: Option<BankAccountId>,
    /// Positive amount in whole currency units.
    pub amount: Decimal,
    /// Cash or transfer.
    pub payment_method: PaymentMethod,
    /// Free-text counterparty name.
    pub counterparty_name: Option<String>,
    /// Resolved counterparty contact, if any.
    pub contact_id: Option<ContactId>,
    /// What the money was for.
    pub description: String,
    /// Business date; fixes the fiscal stamp.
    pub date: NaiveDate,
    /// Opaque evidence URLs.
    pub images: Vec<String>,
    /// Optional notes.
    pub notes: Option<String>,
    /// The user creating the record.
    pub created_by: UserId,
}

/// Patch applied to a pending record.
///
/// `None` fields are left unchanged. Changing the date re-derives the
/// fiscal stamp; that is the only path that ever recomputes it.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    /// New fund attribution.
    pub fund_id: Option<FundId>,
    /// New bank account attribution.
    pub bank_account_id: Option<BankAccountId>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New payment method.
    pub payment_method: Option<PaymentMethod>,
    /// New counterparty name.
    pub counterparty_name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New business date.
    pub date: Option<NaiveDate>,
    /// Replacement evidence URLs.
    pub images: Option<Vec<String>>,
    /// New notes.
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RecordStatus::Pending,
            RecordStatus::Approved,
            RecordStatus::Rejected,
        ] {
            assert_eq!(RecordStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RecordStatus::parse("voided"), None);
    }

    #[test]
    fn test_only_pending_is_editable() {
        assert!(RecordStatus::Pending.is_editable());
        assert!(!RecordStatus::Approved.is_editable());
        assert!(!RecordStatus::Rejected.is_editable());
    }

    #[test]
    fn test_kind_code_prefix() {
        assert_eq!(RecordKind::Income.code_prefix().as_str(), "INC");
        assert_eq!(RecordKind::Expense.code_prefix().as_str(), "EXP");
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("cash"), Some(PaymentMethod::Cash));
        assert_eq!(
            PaymentMethod::parse("TRANSFER"),
            Some(PaymentMethod::Transfer)
        );
        assert_eq!(PaymentMethod::parse("cheque"), None);
    }

    #[test]
    fn test_adjustment_policy_default_is_immediate() {
        assert!(AdjustmentPolicy::default().effective_on_create());
    }
}
