//! Manual balance adjustment repository.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use curia_shared::types::{PageRequest, ParishId, UserId};

use curia_core::fiscal::FiscalStamp;
use curia_core::ledger::{AdjustmentKind, AdjustmentTarget, LedgerError};
use curia_core::sequence::CodePrefix;

use crate::entities::{adjustments, sea_orm_active_enums as db_enums};
use crate::repositories::sequence::SequenceRepository;

/// Input for creating an adjustment.
#[derive(Debug, Clone)]
pub struct CreateAdjustmentInput {
    /// The owning parish.
    pub parish_id: ParishId,
    /// The single dimension the adjustment applies to.
    pub target: AdjustmentTarget,
    /// Increase or decrease.
    pub kind: AdjustmentKind,
    /// Positive amount; direction comes from `kind`.
    pub amount: Decimal,
    /// Why the balance is being corrected.
    pub description: String,
    /// Business date.
    pub date: NaiveDate,
    /// The user creating the adjustment.
    pub created_by: UserId,
}

/// Repository for manual balance adjustments.
///
/// Adjustments take effect immediately on creation; there is no
/// approval state and no receipt.
#[derive(Debug, Clone)]
pub struct AdjustmentRepository {
    db: DatabaseConnection,
}

impl AdjustmentRepository {
    /// Creates a new adjustment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an adjustment with the next `ADJ` code.
    ///
    /// # Errors
    ///
    /// Returns a validation error or a database error.
    pub async fn create(
        &self,
        input: CreateAdjustmentInput,
    ) -> Result<adjustments::Model, LedgerError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::AmountNotPositive);
        }
        if input.description.trim().is_empty() {
            return Err(LedgerError::DescriptionRequired);
        }

        let (fund_id, bank_account_id) = match input.target {
            AdjustmentTarget::Fund(id) => (Some(id.into_inner()), None),
            AdjustmentTarget::BankAccount(id) => (None, Some(id.into_inner())),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let stamp = FiscalStamp::from_date(input.date);
        let code = SequenceRepository::next_code(&txn, CodePrefix::Adjustment, stamp.year)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let adjustment = adjustments::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code),
            parish_id: Set(input.parish_id.into_inner()),
            fund_id: Set(fund_id),
            bank_account_id: Set(bank_account_id),
            adjustment_kind: Set(input.kind.into()),
            amount: Set(input.amount),
            description: Set(input.description),
            adjustment_date: Set(input.date),
            created_by: Set(input.created_by.into_inner()),
            created_at: Set(Utc::now().into()),
        };

        let inserted = adjustment
            .insert(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Lists adjustments newest-first with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        parish_id: Option<Uuid>,
        kind: Option<AdjustmentKind>,
        page: PageRequest,
    ) -> Result<(Vec<adjustments::Model>, u64), LedgerError> {
        let mut query = adjustments::Entity::find();

        if let Some(parish_id) = parish_id {
            query = query.filter(adjustments::Column::ParishId.eq(parish_id));
        }
        if let Some(kind) = kind {
            query = query.filter(
                adjustments::Column::AdjustmentKind.eq(db_enums::AdjustmentKind::from(kind)),
            );
        }

        let paginator = query
            .order_by_desc(adjustments::Column::AdjustmentDate)
            .order_by_desc(adjustments::Column::Code)
            .paginate(&self.db, page.limit().max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;
        let models = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok((models, total))
    }
}
