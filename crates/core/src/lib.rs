//! Core business logic for Curia.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `sequence` - Year-scoped sequential code formatting
//! - `fiscal` - Fiscal year/period stamps and payroll periods
//! - `ledger` - Income/expense records, adjustments, balance aggregation
//! - `workflow` - Approval state machine, permissions, cancellation planning
//! - `receipt` - Receipt issuance and combined receipts
//! - `payroll` - Payroll-to-expense staging

pub mod fiscal;
pub mod ledger;
pub mod payroll;
pub mod receipt;
pub mod sequence;
pub mod workflow;
