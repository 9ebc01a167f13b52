//! Postgres enum mappings with conversions to the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use curia_core::ledger;
use curia_core::payroll;
use curia_core::receipt;

/// Record kind: income or expense.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "record_kind")]
pub enum RecordKind {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Record workflow status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "record_status")]
pub enum RecordStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved and receipted.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Payment method.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    /// Cash payment.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer.
    #[sea_orm(string_value = "transfer")]
    Transfer,
}

/// Expense kind.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "expense_kind")]
pub enum ExpenseKind {
    /// Ordinary expense.
    #[sea_orm(string_value = "general")]
    General,
    /// Staged from a payroll batch.
    #[sea_orm(string_value = "salary")]
    Salary,
}

/// Adjustment direction.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "adjustment_kind")]
pub enum AdjustmentKind {
    /// Adds to the balance.
    #[sea_orm(string_value = "increase")]
    Increase,
    /// Subtracts from the balance.
    #[sea_orm(string_value = "decrease")]
    Decrease,
}

/// Receipt status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "receipt_status")]
pub enum ReceiptStatus {
    /// Receipt is in force.
    #[sea_orm(string_value = "active")]
    Active,
    /// Receipt was voided.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Payroll row status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payroll_status")]
pub enum PayrollStatus {
    /// Editable, not yet staged.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Staged into a pending salary expense.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Backed by an approved salary expense.
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<ledger::RecordKind> for RecordKind {
    fn from(kind: ledger::RecordKind) -> Self {
        match kind {
            ledger::RecordKind::Income => Self::Income,
            ledger::RecordKind::Expense => Self::Expense,
        }
    }
}

impl From<&RecordKind> for ledger::RecordKind {
    fn from(kind: &RecordKind) -> Self {
        match kind {
            RecordKind::Income => Self::Income,
            RecordKind::Expense => Self::Expense,
        }
    }
}

impl From<ledger::RecordStatus> for RecordStatus {
    fn from(status: ledger::RecordStatus) -> Self {
        match status {
            ledger::RecordStatus::Pending => Self::Pending,
            ledger::RecordStatus::Approved => Self::Approved,
            ledger::RecordStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<&RecordStatus> for ledger::RecordStatus {
    fn from(status: &RecordStatus) -> Self {
        match status {
            RecordStatus::Pending => Self::Pending,
            RecordStatus::Approved => Self::Approved,
            RecordStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ledger::PaymentMethod> for PaymentMethod {
    fn from(method: ledger::PaymentMethod) -> Self {
        match method {
            ledger::PaymentMethod::Cash => Self::Cash,
            ledger::PaymentMethod::Transfer => Self::Transfer,
        }
    }
}

impl From<&PaymentMethod> for ledger::PaymentMethod {
    fn from(method: &PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::Transfer => Self::Transfer,
        }
    }
}

impl From<ledger::ExpenseKind> for ExpenseKind {
    fn from(kind: ledger::ExpenseKind) -> Self {
        match kind {
            ledger::ExpenseKind::General => Self::General,
            ledger::ExpenseKind::Salary => Self::Salary,
        }
    }
}

impl From<&ExpenseKind> for ledger::ExpenseKind {
    fn from(kind: &ExpenseKind) -> Self {
        match kind {
            ExpenseKind::General => Self::General,
            ExpenseKind::Salary => Self::Salary,
        }
    }
}

impl From<ledger::AdjustmentKind> for AdjustmentKind {
    fn from(kind: ledger::AdjustmentKind) -> Self {
        match kind {
            ledger::AdjustmentKind::Increase => Self::Increase,
            ledger::AdjustmentKind::Decrease => Self::Decrease,
        }
    }
}

impl From<&AdjustmentKind> for ledger::AdjustmentKind {
    fn from(kind: &AdjustmentKind) -> Self {
        match kind {
            AdjustmentKind::Increase => Self::Increase,
            AdjustmentKind::Decrease => Self::Decrease,
        }
    }
}

impl From<receipt::ReceiptStatus> for ReceiptStatus {
    fn from(status: receipt::ReceiptStatus) -> Self {
        match status {
            receipt::ReceiptStatus::Active => Self::Active,
            receipt::ReceiptStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<&ReceiptStatus> for receipt::ReceiptStatus {
    fn from(status: &ReceiptStatus) -> Self {
        match status {
            ReceiptStatus::Active => Self::Active,
            ReceiptStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<payroll::PayrollStatus> for PayrollStatus {
    fn from(status: payroll::PayrollStatus) -> Self {
        match status {
            payroll::PayrollStatus::Draft => Self::Draft,
            payroll::PayrollStatus::Approved => Self::Approved,
            payroll::PayrollStatus::Paid => Self::Paid,
        }
    }
}

impl From<&PayrollStatus> for payroll::PayrollStatus {
    fn from(status: &PayrollStatus) -> Self {
        match status {
            PayrollStatus::Draft => Self::Draft,
            PayrollStatus::Approved => Self::Approved,
            PayrollStatus::Paid => Self::Paid,
        }
    }
}
