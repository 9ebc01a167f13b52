//! Income/expense records, adjustments, and balance aggregation.
//!
//! This module implements the cash-basis ledger:
//! - Record kinds, statuses, and payment methods
//! - Creation-time validation rules
//! - The tagged adjustment target (fund XOR bank account)
//! - The pure balance fold used by the aggregation engine

pub mod balance;
pub mod error;
pub mod types;
pub mod validation;

pub use balance::{BalanceDimension, BalanceRow, DimensionRef, fold_balances};
pub use error::LedgerError;
pub use types::{
    AdjustmentKind, AdjustmentPolicy, AdjustmentTarget, CreateRecordInput, ExpenseKind,
    PaymentMethod, RecordKind, RecordPatch, RecordStatus,
};
pub use validation::{validate_create, validate_patch};
