//! Receipt domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use curia_shared::types::{ParishId, ReceiptId, TransactionId, UserId};

use crate::ledger::{RecordKind, RecordStatus};

/// Receipt lifecycle: created once, logically destroyed never.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    /// Receipt is in force.
    Active,
    /// Receipt was voided; it remains as a cancelled record.
    Cancelled,
}

impl ReceiptStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The slice of a transaction record the issuer needs.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    /// The record id.
    pub id: TransactionId,
    /// Income or expense.
    pub kind: RecordKind,
    /// The owning parish.
    pub parish_id: ParishId,
    /// The record amount.
    pub amount: Decimal,
    /// Counterparty name, if recorded.
    pub counterparty: Option<String>,
    /// What the money was for.
    pub description: String,
    /// Business date.
    pub date: NaiveDate,
    /// Current workflow status.
    pub status: RecordStatus,
    /// Existing receipt back-reference, if any.
    pub receipt_id: Option<ReceiptId>,
}

/// A receipt ready to be persisted.
///
/// The receipt number is allocated by the caller from the shared
/// `REC` sequence; income and expense receipts share one numbering
/// space.
#[derive(Debug, Clone)]
pub struct ReceiptDraft {
    /// Income or expense receipt.
    pub kind: RecordKind,
    /// The parish the receipt belongs to.
    pub parish_id: ParishId,
    /// The records this receipt covers (one, or several when combined).
    pub reference_ids: Vec<TransactionId>,
    /// Total amount; for combined receipts, the sum of all references.
    pub amount: Decimal,
    /// Payer (income) or payee (expense).
    pub payer_payee: Option<String>,
    /// Copied description.
    pub description: String,
    /// Receipt date.
    pub receipt_date: NaiveDate,
    /// The user the receipt was issued by.
    pub issued_by: UserId,
}
