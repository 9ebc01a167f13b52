//! Payroll domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use curia_shared::types::{ParishId, PayrollId, StaffId};

use crate::fiscal::PayrollPeriod;

/// Payroll row lifecycle.
///
/// Draft rows are editable by the payroll module upstream; approved
/// rows have been staged as pending expenses; paid rows are backed by
/// an approved salary expense with a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    /// Editable, not yet staged.
    Draft,
    /// Staged into a pending salary expense.
    Approved,
    /// The salary expense was approved and receipted.
    Paid,
}

impl PayrollStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Paid => "paid",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "approved" => Some(Self::Approved),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The salary line items frozen onto the staged expense.
///
/// Copied verbatim at staging time so the expense stays auditable
/// even if the payroll row is edited later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySnapshot {
    /// Base salary before additions and deductions.
    pub basic_salary: Decimal,
    /// Allowances added on top.
    pub allowances: Decimal,
    /// Advances already paid out, subtracted.
    pub advances: Decimal,
    /// Other deductions.
    pub deductions: Decimal,
    /// The net amount the expense is created for.
    pub net_salary: Decimal,
}

impl SalarySnapshot {
    /// Net amount implied by the line items.
    #[must_use]
    pub fn computed_net(&self) -> Decimal {
        self.basic_salary + self.allowances - self.advances - self.deductions
    }
}

/// Contact details of the staff member, used to resolve-or-create a
/// counterparty contact when staging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffContact {
    /// Display name.
    pub name: String,
    /// Phone number, the contact lookup key.
    pub phone: Option<String>,
    /// Bank name, backfilled onto a reused contact when missing.
    pub bank_name: Option<String>,
    /// Bank account number, backfilled likewise.
    pub bank_account_no: Option<String>,
}

/// A payroll row as seen by the bridge.
#[derive(Debug, Clone)]
pub struct PayrollRow {
    /// The payroll row id.
    pub id: PayrollId,
    /// The staff member the row pays.
    pub staff_id: StaffId,
    /// The owning parish.
    pub parish_id: ParishId,
    /// The salary period.
    pub period: PayrollPeriod,
    /// Current status.
    pub status: PayrollStatus,
    /// Contact details for counterparty resolution.
    pub staff: StaffContact,
    /// The frozen line items.
    pub snapshot: SalarySnapshot,
}
