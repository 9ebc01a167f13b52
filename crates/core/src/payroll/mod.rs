//! Payroll-to-expense staging.
//!
//! Approving a payroll batch does not move money: it stages one
//! pending salary expense per draft payroll row and flips the rows to
//! approved. The staged expenses then go through the normal approval
//! workflow like any other expense.

pub mod bridge;
pub mod error;
pub mod types;

pub use bridge::{PayrollBridge, StagedBatch, StagedExpense};
pub use error::PayrollError;
pub use types::{PayrollRow, PayrollStatus, SalarySnapshot, StaffContact};
