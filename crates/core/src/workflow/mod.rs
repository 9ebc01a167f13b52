//! Approval workflow for income/expense records.
//!
//! This module implements:
//! - The pending → approved/rejected state machine
//! - The capability table gating every money-moving action
//! - Cancellation planning (the only path back to pending)

pub mod error;
pub mod permissions;
pub mod reversal;
pub mod service;
pub mod types;

pub use error::WorkflowError;
pub use permissions::{Action, allows, can_modify_record, ensure};
pub use reversal::{CancellationPlan, CancellationService, ReceiptView, RevertibleRecord};
pub use service::ApprovalService;
pub use types::{Decision, DecisionAction};
