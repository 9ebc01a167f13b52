//! Fiscal year/period stamps and payroll periods.

pub mod period;

pub use period::{FiscalStamp, PayrollPeriod};
