//! Balance aggregation fold.
//!
//! No balance is ever stored: the engine recomputes every request from
//! approved records plus adjustments. The database layer fetches the
//! grouped sums; this module owns the arithmetic and the guarantee
//! that every active dimension yields a row, zero activity included.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// The two ledger dimensions balances are kept along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceDimension {
    /// Per-fund balances.
    Fund,
    /// Per-bank-account balances.
    BankAccount,
}

impl BalanceDimension {
    /// Returns the string representation of the dimension.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fund => "fund",
            Self::BankAccount => "bank_account",
        }
    }

    /// Parses a dimension from a query string value.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InvalidDimension` for unknown values.
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s {
            "fund" => Ok(Self::Fund),
            "bank_account" => Ok(Self::BankAccount),
            other => Err(LedgerError::InvalidDimension(other.to_string())),
        }
    }
}

/// An active fund or bank account the fold must emit a row for.
#[derive(Debug, Clone)]
pub struct DimensionRef {
    /// The fund or bank account id.
    pub id: Uuid,
    /// Reference code (e.g. fund code or account number).
    pub code: String,
    /// Display name.
    pub name: String,
}

/// Computed balance for one fund or bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRow {
    /// The fund or bank account id.
    pub id: Uuid,
    /// Reference code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Sum of approved income amounts.
    pub total_income: Decimal,
    /// Sum of approved expense amounts.
    pub total_expense: Decimal,
    /// Sum of increase adjustments.
    pub total_adjustment_increase: Decimal,
    /// Sum of decrease adjustments.
    pub total_adjustment_decrease: Decimal,
    /// income − expense + increase − decrease.
    pub balance: Decimal,
}

/// Folds per-dimension sums into balance rows.
///
/// One row per entry in `refs`, in the given order; dimensions absent
/// from every sum map still produce a zero row. Sums for ids not in
/// `refs` (inactive dimensions) are ignored.
#[must_use]
pub fn fold_balances(
    refs: &[DimensionRef],
    income: &HashMap<Uuid, Decimal>,
    expense: &HashMap<Uuid, Decimal>,
    increases: &HashMap<Uuid, Decimal>,
    decreases: &HashMap<Uuid, Decimal>,
) -> Vec<BalanceRow> {
    refs.iter()
        .map(|r| {
            let total_income = income.get(&r.id).copied().unwrap_or(Decimal::ZERO);
            let total_expense = expense.get(&r.id).copied().unwrap_or(Decimal::ZERO);
            let total_increase = increases.get(&r.id).copied().unwrap_or(Decimal::ZERO);
            let total_decrease = decreases.get(&r.id).copied().unwrap_or(Decimal::ZERO);

            BalanceRow {
                id: r.id,
                code: r.code.clone(),
                name: r.name.clone(),
                total_income,
                total_expense,
                total_adjustment_increase: total_increase,
                total_adjustment_decrease: total_decrease,
                balance: total_income - total_expense + total_increase - total_decrease,
            }
        })
        .collect()
}
