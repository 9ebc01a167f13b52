//! Transaction record repository: create, list, edit, delete.
//!
//! Approval and cancellation live in the workflow repository; this
//! one only handles the pending-record lifecycle.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use curia_shared::types::{PageRequest, UserId};
use curia_shared::Caller;

use curia_core::fiscal::FiscalStamp;
use curia_core::ledger::{
    validate_create, validate_patch, CreateRecordInput, LedgerError, RecordKind, RecordPatch,
    RecordStatus,
};
use curia_core::workflow::permissions;

use crate::entities::{sea_orm_active_enums as db_enums, transactions};
use crate::repositories::sequence::SequenceRepository;

/// Filters for the record listing.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to one parish.
    pub parish_id: Option<Uuid>,
    /// Restrict to income or expense.
    pub kind: Option<RecordKind>,
    /// Restrict to one workflow status.
    pub status: Option<RecordStatus>,
    /// Restrict to one fiscal year.
    pub fiscal_year: Option<i32>,
}

/// Repository for income/expense records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending record.
    ///
    /// Validates the input, allocates the next `INC`/`EXP` code, and
    /// derives the fiscal stamp from the business date. Code
    /// allocation and insert share one database transaction so an
    /// insert failure does not burn a code visible to readers.
    ///
    /// # Errors
    ///
    /// Returns a validation error or a database error.
    pub async fn create(
        &self,
        input: CreateRecordInput,
    ) -> Result<transactions::Model, LedgerError> {
        validate_create(&input)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let stamp = FiscalStamp::from_date(input.date);
        let code = SequenceRepository::next_code(&txn, input.kind.code_prefix(), stamp.year)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let expense_kind = match input.kind {
            RecordKind::Expense => Some(db_enums::ExpenseKind::General),
            RecordKind::Income => None,
        };

        let now = Utc::now().into();
        let record = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code),
            record_kind: Set(input.kind.into()),
            parish_id: Set(input.parish_id.into_inner()),
            fund_id: Set(input.fund_id.map(curia_shared::types::FundId::into_inner)),
            bank_account_id: Set(input
                .bank_account_id
                .map(curia_shared::types::BankAccountId::into_inner)),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method.into()),
            expense_kind: Set(expense_kind),
            counterparty_name: Set(input.counterparty_name),
            contact_id: Set(input.contact_id.map(curia_shared::types::ContactId::into_inner)),
            description: Set(input.description),
            transaction_date: Set(input.date),
            fiscal_year: Set(stamp.year),
            fiscal_period: Set(i16::from(stamp.period)),
            images: Set(serde_json::json!(input.images)),
            notes: Set(input.notes),
            status: Set(db_enums::RecordStatus::Pending),
            created_by: Set(input.created_by.into_inner()),
            approved_by: Set(None),
            approved_at: Set(None),
            decision_notes: Set(None),
            receipt_id: Set(None),
            staff_id: Set(None),
            payroll_id: Set(None),
            salary_period: Set(None),
            salary_snapshot: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = record
            .insert(&txn)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(inserted)
    }

    /// Fetches one record by id.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record exists.
    pub async fn get(&self, id: Uuid) -> Result<transactions::Model, LedgerError> {
        transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or(LedgerError::RecordNotFound(id))
    }

    /// Lists records newest-first with pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &TransactionFilter,
        page: PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), LedgerError> {
        let mut query = transactions::Entity::find();

        if let Some(parish_id) = filter.parish_id {
            query = query.filter(transactions::Column::ParishId.eq(parish_id));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(
                transactions::Column::RecordKind.eq(db_enums::RecordKind::from(kind)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(
                transactions::Column::Status.eq(db_enums::RecordStatus::from(status)),
            );
        }
        if let Some(year) = filter.fiscal_year {
            query = query.filter(transactions::Column::FiscalYear.eq(year));
        }

        let paginator = query
            .order_by_desc(transactions::Column::TransactionDate)
            .order_by_desc(transactions::Column::Code)
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

    /// Applies a patch to a pending record.
    ///
    /// Only the original creator or a super-admin may edit, and only
    /// while the record is pending. The write itself is conditioned on
    /// `status = 'pending'`, so a decision that commits after the
    /// ownership check cannot be edited over. A changed date
    /// re-derives the fiscal stamp.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound`, `NotPending`, `Forbidden`, a
    /// validation error, or a database error.
    pub async fn edit(
        &self,
        caller: &Caller,
        id: Uuid,
        patch: RecordPatch,
    ) -> Result<transactions::Model, LedgerError> {
        validate_patch(&patch)?;

        let record = self.get(id).await?;
        Self::ensure_can_modify(caller, &record)?;

        let mut update = transactions::Entity::update_many();

        if let Some(fund_id) = patch.fund_id {
            update = update.col_expr(
                transactions::Column::FundId,
                Expr::value(Some(fund_id.into_inner())),
            );
        }
        if let Some(bank_account_id) = patch.bank_account_id {
            update = update.col_expr(
                transactions::Column::BankAccountId,
                Expr::value(Some(bank_account_id.into_inner())),
            );
        }
        if let Some(amount) = patch.amount {
            update = update.col_expr(transactions::Column::Amount, Expr::value(amount));
        }
        if let Some(method) = patch.payment_method {
            update = update.col_expr(
                transactions::Column::PaymentMethod,
                Expr::value(db_enums::PaymentMethod::from(method)),
            );
        }
        if let Some(name) = patch.counterparty_name {
            update = update.col_expr(
                transactions::Column::CounterpartyName,
                Expr::value(Some(name)),
            );
        }
        if let Some(description) = patch.description {
            update = update.col_expr(transactions::Column::Description, Expr::value(description));
        }
        if let Some(date) = patch.date {
            let stamp = FiscalStamp::from_date(date);
            update = update
                .col_expr(transactions::Column::TransactionDate, Expr::value(date))
                .col_expr(transactions::Column::FiscalYear, Expr::value(stamp.year))
                .col_expr(
                    transactions::Column::FiscalPeriod,
                    Expr::value(i16::from(stamp.period)),
                );
        }
        if let Some(images) = patch.images {
            update = update.col_expr(
                transactions::Column::Images,
                Expr::value(serde_json::json!(images)),
            );
        }
        if let Some(notes) = patch.notes {
            update = update.col_expr(transactions::Column::Notes, Expr::value(Some(notes)));
        }

        // CAS on status = pending; a decision that lands between the
        // ownership check and this write makes it a no-op.
        let updated = update
            .col_expr(transactions::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Status.eq(db_enums::RecordStatus::Pending))
            .exec(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        if updated.rows_affected == 0 {
            let status = RecordStatus::from(&self.get(id).await?.status);
            return Err(LedgerError::NotPending { status });
        }

        self.get(id).await
    }

    /// Deletes a pending record.
    ///
    /// Same ownership and state rules as `edit`, with the same
    /// conditional write. Approved or rejected records are history and
    /// can never be deleted.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound`, `NotPending`, `Forbidden`, or a
    /// database error.
    pub async fn delete(&self, caller: &Caller, id: Uuid) -> Result<(), LedgerError> {
        let record = self.get(id).await?;
        Self::ensure_can_modify(caller, &record)?;

        let deleted = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::Status.eq(db_enums::RecordStatus::Pending))
            .exec(&self.db)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        if deleted.rows_affected == 0 {
            let status = RecordStatus::from(&self.get(id).await?.status);
            return Err(LedgerError::NotPending { status });
        }

        Ok(())
    }

    fn ensure_can_modify(caller: &Caller, record: &transactions::Model) -> Result<(), LedgerError> {
        if !permissions::can_modify_record(caller, UserId::from_uuid(record.created_by)) {
            return Err(LedgerError::Forbidden(
                "only the original creator or a super-admin may modify this record".to_string(),
            ));
        }

        Ok(())
    }
}
