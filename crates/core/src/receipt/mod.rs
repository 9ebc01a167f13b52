//! Receipt issuance.
//!
//! Receipts are minted exactly once, inside the approval transition,
//! and are immutable afterwards: correction is only ever via
//! cancellation. Combined receipts merge several already-approved
//! records into one printed document.

pub mod error;
pub mod issuer;
pub mod types;

pub use error::ReceiptError;
pub use issuer::ReceiptIssuer;
pub use types::{ReceiptDraft, ReceiptStatus, SourceRecord};
