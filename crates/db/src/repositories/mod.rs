//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Validation and planning happen in `curia-core`; the
//! repositories execute the resulting writes, multi-statement ones
//! inside a single database transaction.

pub mod adjustment;
pub mod balance;
pub mod contact;
pub mod payroll;
pub mod receipt;
pub mod sequence;
pub mod transaction;
pub mod workflow;

pub use adjustment::{AdjustmentRepository, CreateAdjustmentInput};
pub use balance::BalanceRepository;
pub use contact::ContactRepository;
pub use payroll::{BatchOutcome, PayrollRepository};
pub use receipt::{CombineReceiptInput, ReceiptRepository};
pub use sequence::SequenceRepository;
pub use transaction::{TransactionFilter, TransactionRepository};
pub use workflow::{CancelOutcome, DecisionOutcome, WorkflowRepository};
