//! Receipt repository: combined receipts and lookups.
//!
//! Single-record receipts are minted by the workflow repository
//! during approval; this repository owns the caller-initiated
//! combined receipt and read access.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use curia_shared::types::{PageRequest, ParishId, ReceiptId, TransactionId, UserId};

use curia_core::fiscal::FiscalStamp;
use curia_core::ledger::{RecordKind, RecordStatus};
use curia_core::receipt::{ReceiptError, ReceiptIssuer, SourceRecord};
use curia_core::sequence::CodePrefix;

use crate::entities::{receipts, sea_orm_active_enums as db_enums, transactions};
use crate::repositories::sequence::SequenceRepository;

/// Input for combining approved records into one receipt.
#[derive(Debug, Clone)]
pub struct CombineReceiptInput {
    /// The approved records to merge.
    pub reference_ids: Vec<Uuid>,
    /// Client-declared total, validated against the actual sum.
    pub declared_total: Option<Decimal>,
    /// Payer (income) or payee (expense) printed on the receipt.
    pub payer_payee: Option<String>,
    /// Printed description.
    pub description: String,
    /// Receipt date.
    pub receipt_date: NaiveDate,
    /// The issuing user.
    pub issued_by: UserId,
}

/// Repository for receipts.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    db: DatabaseConnection,
}

impl ReceiptRepository {
    /// Creates a new receipt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Issues a combined receipt over several approved records.
    ///
    /// All rules (approved, unreceipted, one kind, one parish, total
    /// matches) are checked against the rows as read inside the same
    /// database transaction that writes the receipt. The back-reference
    /// write claims each row with `receipt_id IS NULL`, so when two
    /// combines race over the same record the loser rolls back instead
    /// of keeping a receipt that silently dropped a reference.
    ///
    /// # Errors
    ///
    /// Returns a `ReceiptError` describing the violated rule, or a
    /// database error.
    pub async fn combine(
        &self,
        input: CombineReceiptInput,
    ) -> Result<receipts::Model, ReceiptError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        let records = transactions::Entity::find()
            .filter(transactions::Column::Id.is_in(input.reference_ids.clone()))
            .all(&txn)
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        for id in &input.reference_ids {
            if !records.iter().any(|r| r.id == *id) {
                return Err(ReceiptError::RecordNotFound(*id));
            }
        }

        let sources: Vec<SourceRecord> = records
            .iter()
            .map(|r| SourceRecord {
                id: TransactionId::from_uuid(r.id),
                kind: RecordKind::from(&r.record_kind),
                parish_id: ParishId::from_uuid(r.parish_id),
                amount: r.amount,
                counterparty: r.counterparty_name.clone(),
                description: r.description.clone(),
                date: r.transaction_date,
                status: RecordStatus::from(&r.status),
                receipt_id: r.receipt_id.map(ReceiptId::from_uuid),
            })
            .collect();

        let draft = ReceiptIssuer::combine(
            &sources,
            input.declared_total,
            input.payer_payee,
            input.description,
            input.issued_by,
            input.receipt_date,
        )?;

        let year = FiscalStamp::from_date(draft.receipt_date).year;
        let receipt_no = SequenceRepository::next_code(&txn, CodePrefix::Receipt, year)
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        let now = chrono::Utc::now().into();
        let receipt_id = Uuid::now_v7();
        let receipt = receipts::ActiveModel {
            id: Set(receipt_id),
            receipt_no: Set(receipt_no),
            record_kind: Set(draft.kind.into()),
            parish_id: Set(draft.parish_id.into_inner()),
            amount: Set(draft.amount),
            payer_payee: Set(draft.payer_payee),
            description: Set(draft.description),
            receipt_date: Set(draft.receipt_date),
            status: Set(db_enums::ReceiptStatus::Active),
            issued_by: Set(input.issued_by.into_inner()),
            cancelled_by: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = receipt
            .insert(&txn)
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        // CAS on receipt_id = NULL; a row claimed by a concurrent
        // combine stays with its winner and shows up here as a short
        // count, rolling this receipt back.
        let claimed = transactions::Entity::update_many()
            .col_expr(
                transactions::Column::ReceiptId,
                Expr::value(Some(receipt_id)),
            )
            .col_expr(transactions::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(transactions::Column::Id.is_in(input.reference_ids.clone()))
            .filter(transactions::Column::ReceiptId.is_null())
            .exec(&txn)
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        if claimed.rows_affected != input.reference_ids.len() as u64 {
            let taken = transactions::Entity::find()
                .filter(transactions::Column::Id.is_in(input.reference_ids))
                .filter(transactions::Column::ReceiptId.ne(receipt_id))
                .one(&txn)
                .await
                .map_err(|e| ReceiptError::Database(e.to_string()))?;
            return Err(ReceiptError::AlreadyReceipted(
                taken.map_or_else(Uuid::nil, |r| r.id),
            ));
        }

        txn.commit()
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Fetches one receipt with the records it covers.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if no receipt exists.
    pub async fn get(
        &self,
        id: Uuid,
    ) -> Result<(receipts::Model, Vec<transactions::Model>), ReceiptError> {
        let receipt = receipts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?
            .ok_or(ReceiptError::RecordNotFound(id))?;

        let covered = transactions::Entity::find()
            .filter(transactions::Column::ReceiptId.eq(id))
            .order_by_asc(transactions::Column::Code)
            .all(&self.db)
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        Ok((receipt, covered))
    }

    /// Lists receipts newest-first with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        parish_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<(Vec<receipts::Model>, u64), ReceiptError> {
        let mut query = receipts::Entity::find();
        if let Some(parish_id) = parish_id {
            query = query.filter(receipts::Column::ParishId.eq(parish_id));
        }

        let paginator = query
            .order_by_desc(receipts::Column::ReceiptDate)
            .order_by_desc(receipts::Column::ReceiptNo)
            .paginate(&self.db, page.limit().max(1));

        let total = paginator
            .num_items()
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;
        let models = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(|e| ReceiptError::Database(e.to_string()))?;

        Ok((models, total))
    }
}
