//! Balance aggregation repository.
//!
//! Fetches grouped sums per source table and hands them to the pure
//! fold in `curia_core::ledger::balance`. No stored totals exist
//! anywhere; every request recomputes from approved records plus
//! adjustments.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use curia_core::ledger::{fold_balances, BalanceDimension, BalanceRow, DimensionRef, LedgerError};

use crate::entities::{adjustments, bank_accounts, funds, sea_orm_active_enums as db_enums, transactions};

/// Repository for computed fund and bank account balances.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes balances along a dimension.
    ///
    /// Without an id, returns one row per active fund or bank
    /// account, zero-activity dimensions included. With an id, the
    /// result holds exactly that dimension's row.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` for an unknown or inactive id, or a
    /// database error.
    pub async fn balances(
        &self,
        dimension: BalanceDimension,
        id: Option<Uuid>,
    ) -> Result<Vec<BalanceRow>, LedgerError> {
        let refs = self.dimension_refs(dimension, id).await?;
        if let Some(id) = id {
            if refs.is_empty() {
                return Err(LedgerError::RecordNotFound(id));
            }
        }

        let income = self
            .record_sums(dimension, db_enums::RecordKind::Income)
            .await?;
        let expense = self
            .record_sums(dimension, db_enums::RecordKind::Expense)
            .await?;
        let increases = self
            .adjustment_sums(dimension, db_enums::AdjustmentKind::Increase)
            .await?;
        let decreases = self
            .adjustment_sums(dimension, db_enums::AdjustmentKind::Decrease)
            .await?;

        Ok(fold_balances(&refs, &income, &expense, &increases, &decreases))
    }

    async fn dimension_refs(
        &self,
        dimension: BalanceDimension,
        id: Option<Uuid>,
    ) -> Result<Vec<DimensionRef>, LedgerError> {
        match dimension {
            BalanceDimension::Fund => {
                let mut query = funds::Entity::find().filter(funds::Column::IsActive.eq(true));
                if let Some(id) = id {
                    query = query.filter(funds::Column::Id.eq(id));
                }
                let rows = query
                    .order_by_asc(funds::Column::Code)
                    .all(&self.db)
                    .await
                    .map_err(|e| LedgerError::Database(e.to_string()))?;
                Ok(rows
                    .into_iter()
                    .map(|f| DimensionRef {
                        id: f.id,
                        code: f.code,
                        name: f.name,
                    })
                    .collect())
            }
            BalanceDimension::BankAccount => {
                let mut query = bank_accounts::Entity::find()
                    .filter(bank_accounts::Column::IsActive.eq(true));
                if let Some(id) = id {
                    query = query.filter(bank_accounts::Column::Id.eq(id));
                }
                let rows = query
                    .order_by_asc(bank_accounts::Column::Code)
                    .all(&self.db)
                    .await
                    .map_err(|e| LedgerError::Database(e.to_string()))?;
                Ok(rows
                    .into_iter()
                    .map(|a| DimensionRef {
                        id: a.id,
                        code: a.code,
                        name: a.name,
                    })
                    .collect())
            }
        }
    }

    /// Sums approved record amounts grouped by the dimension key.
    async fn record_sums(
        &self,
        dimension: BalanceDimension,
        kind: db_enums::RecordKind,
    ) -> Result<HashMap<Uuid, Decimal>, LedgerError> {
        let key_column = match dimension {
            BalanceDimension::Fund => transactions::Column::FundId,
            BalanceDimension::BankAccount => transactions::Column::BankAccountId,
        };

        let rows: Vec<(Option<Uuid>, Option<Decimal>)> = transactions::Entity::find()
            .select_only()
            .column(key_column)
            .column_as(transactions::Column::Amount.sum(), "total")
            .filter(transactions::Column::Status.eq(db_enums::RecordStatus::Approved))
            .filter(transactions::Column::RecordKind.eq(kind))
            .filter(key_column.is_not_null())
            .group_by(key_column)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(collect_sums(rows))
    }

    /// Sums adjustment amounts of one direction grouped by the
    /// dimension key. Adjustments are never gated by approval.
    async fn adjustment_sums(
        &self,
        dimension: BalanceDimension,
        kind: db_enums::AdjustmentKind,
    ) -> Result<HashMap<Uuid, Decimal>, LedgerError> {
        let key_column = match dimension {
            BalanceDimension::Fund => adjustments::Column::FundId,
            BalanceDimension::BankAccount => adjustments::Column::BankAccountId,
        };

        let rows: Vec<(Option<Uuid>, Option<Decimal>)> = adjustments::Entity::find()
            .select_only()
            .column(key_column)
            .column_as(adjustments::Column::Amount.sum(), "total")
            .filter(adjustments::Column::AdjustmentKind.eq(kind))
            .filter(key_column.is_not_null())
            .group_by(key_column)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(collect_sums(rows))
    }
}

fn collect_sums(rows: Vec<(Option<Uuid>, Option<Decimal>)>) -> HashMap<Uuid, Decimal> {
    rows.into_iter()
        .filter_map(|(id, total)| Some((id?, total.unwrap_or(Decimal::ZERO))))
        .collect()
}
