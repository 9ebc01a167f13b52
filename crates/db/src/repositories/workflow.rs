//! Workflow repository: approve/reject decisions and receipt
//! cancellation.
//!
//! Both operations are multi-statement and run inside a single
//! database transaction, with the status transition guarded by a
//! conditional update so concurrent callers cannot double-apply it.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use curia_shared::types::{ReceiptId, TransactionId, UserId};

use curia_core::fiscal::PayrollPeriod;
use curia_core::ledger::{RecordKind, RecordStatus};
use curia_core::receipt::{ReceiptIssuer, ReceiptStatus, SourceRecord};
use curia_core::sequence::CodePrefix;
use curia_core::workflow::{
    ApprovalService, CancellationService, Decision, DecisionAction, ReceiptView,
    RevertibleRecord, WorkflowError,
};

use crate::entities::{payrolls, receipts, sea_orm_active_enums as db_enums, transactions};
use crate::repositories::sequence::SequenceRepository;

/// Result of an approve/reject decision.
#[derive(Debug, Clone)]
pub struct DecisionOutcome {
    /// The decided record.
    pub transaction: transactions::Model,
    /// The receipt minted on approval; `None` on rejection.
    pub receipt: Option<receipts::Model>,
}

/// Result of a receipt cancellation.
#[derive(Debug, Clone)]
pub struct CancelOutcome {
    /// The cancelled receipt's number.
    pub receipt_no: String,
    /// How many records were reverted to pending.
    pub transactions_reverted: u64,
    /// How many payroll rows were reverted to approved.
    pub payrolls_reverted: u64,
}

/// Repository for record decisions and receipt cancellation.
#[derive(Debug, Clone)]
pub struct WorkflowRepository {
    db: DatabaseConnection,
}

impl WorkflowRepository {
    /// Creates a new workflow repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Approves or rejects a pending record.
    ///
    /// Approval mints the receipt inside the same database
    /// transaction and, for salary expenses, flips the backing
    /// payroll row to paid. The status write is conditioned on the
    /// record still being pending; a lost race surfaces as
    /// `AlreadyDecided`, never a double receipt.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound`, `AlreadyDecided`, or a database
    /// error.
    pub async fn decide(
        &self,
        transaction_id: Uuid,
        decision: Decision,
        decided_by: UserId,
        notes: Option<String>,
    ) -> Result<DecisionOutcome, WorkflowError> {
        let record = transactions::Entity::find_by_id(transaction_id)
            .one(&self.db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::RecordNotFound(transaction_id))?;

        let current_status = RecordStatus::from(&record.status);
        let action = ApprovalService::decide(current_status, decision, decided_by, notes)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let now = Utc::now();
        let new_status = db_enums::RecordStatus::from(action.new_status());
        let decision_notes = match &action {
            DecisionAction::Approve { notes, .. } | DecisionAction::Reject { notes, .. } => {
                notes.clone()
            }
        };

        // CAS on status = pending; a concurrent decision makes this a no-op.
        let updated = transactions::Entity::update_many()
            .col_expr(transactions::Column::Status, Expr::value(new_status))
            .col_expr(
                transactions::Column::ApprovedBy,
                Expr::value(Some(decided_by.into_inner())),
            )
            .col_expr(transactions::Column::ApprovedAt, Expr::value(Some(now)))
            .col_expr(
                transactions::Column::DecisionNotes,
                Expr::value(decision_notes),
            )
            .col_expr(transactions::Column::UpdatedAt, Expr::value(now))
            .filter(transactions::Column::Id.eq(transaction_id))
            .filter(transactions::Column::Status.eq(db_enums::RecordStatus::Pending))
            .exec(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        if updated.rows_affected == 0 {
            let status = Self::current_status(&self.db, transaction_id).await?;
            return Err(WorkflowError::AlreadyDecided { status });
        }

        // Re-read inside the transaction: the receipt must copy the
        // row as it was actually approved, not the snapshot fetched
        // before the transaction began (a pending edit may have
        // committed in between).
        let approved_row = transactions::Entity::find_by_id(transaction_id)
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::RecordNotFound(transaction_id))?;

        let receipt = match action {
            DecisionAction::Approve { .. } => {
                Some(Self::issue_receipt(&txn, &approved_row, decided_by).await?)
            }
            DecisionAction::Reject { .. } => None,
        };

        if let Some(receipt) = &receipt {
            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::ReceiptId,
                    Expr::value(Some(receipt.id)),
                )
                .filter(transactions::Column::Id.eq(transaction_id))
                .exec(&txn)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?;

            if approved_row.expense_kind == Some(db_enums::ExpenseKind::Salary) {
                Self::mark_payroll_paid(&txn, &approved_row).await?;
            }
        }

        let transaction = transactions::Model {
            receipt_id: receipt.as_ref().map(|r| r.id),
            ..approved_row
        };

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        Ok(DecisionOutcome {
            transaction,
            receipt,
        })
    }

    /// Cancels an active receipt, reverting everything it covers.
    ///
    /// One database transaction: void the receipt (conditioned on it
    /// still being active), flip every covered record back to pending
    /// with approver fields and `receipt_id` cleared, and revert paid
    /// payroll rows for the periods of any reverted salary expense.
    /// The receipt row itself survives as cancelled history.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptNotFound`, `AlreadyCancelled`, or a database
    /// error.
    pub async fn cancel_receipt(
        &self,
        receipt_id: Uuid,
        cancelled_by: UserId,
    ) -> Result<CancelOutcome, WorkflowError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let receipt = receipts::Entity::find_by_id(receipt_id)
            .one(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::ReceiptNotFound(receipt_id))?;

        let covered = transactions::Entity::find()
            .filter(transactions::Column::ReceiptId.eq(receipt_id))
            .all(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let view = ReceiptView {
            id: ReceiptId::from_uuid(receipt.id),
            receipt_no: receipt.receipt_no.clone(),
            status: ReceiptStatus::from(&receipt.status),
            reference_ids: covered
                .iter()
                .map(|r| TransactionId::from_uuid(r.id))
                .collect(),
        };
        let revertible: Vec<RevertibleRecord> = covered
            .iter()
            .map(|r| RevertibleRecord {
                id: TransactionId::from_uuid(r.id),
                status: RecordStatus::from(&r.status),
                expense_kind: r.expense_kind.as_ref().map(Into::into),
                salary_period: r.salary_period.as_deref().and_then(PayrollPeriod::parse),
            })
            .collect();

        let plan = CancellationService::plan(&view, &revertible)?;

        let now = Utc::now();

        // CAS on status = active; a concurrent cancel makes this a no-op.
        let voided = receipts::Entity::update_many()
            .col_expr(
                receipts::Column::Status,
                Expr::value(db_enums::ReceiptStatus::Cancelled),
            )
            .col_expr(
                receipts::Column::CancelledBy,
                Expr::value(Some(cancelled_by.into_inner())),
            )
            .col_expr(receipts::Column::CancelledAt, Expr::value(Some(now)))
            .col_expr(receipts::Column::UpdatedAt, Expr::value(now))
            .filter(receipts::Column::Id.eq(receipt_id))
            .filter(receipts::Column::Status.eq(db_enums::ReceiptStatus::Active))
            .exec(&txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        if voided.rows_affected == 0 {
            return Err(WorkflowError::AlreadyCancelled {
                receipt_no: plan.receipt_no,
            });
        }

        let revert_ids: Vec<Uuid> = plan
            .revert_record_ids
            .iter()
            .map(|id| id.into_inner())
            .collect();

        let mut transactions_reverted = 0;
        if !revert_ids.is_empty() {
            let reverted = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::Status,
                    Expr::value(db_enums::RecordStatus::Pending),
                )
                .col_expr(transactions::Column::ApprovedBy, Expr::value(None::<Uuid>))
                .col_expr(
                    transactions::Column::ApprovedAt,
                    Expr::value(None::<chrono::DateTime<Utc>>),
                )
                .col_expr(
                    transactions::Column::DecisionNotes,
                    Expr::value(None::<String>),
                )
                .col_expr(transactions::Column::ReceiptId, Expr::value(None::<Uuid>))
                .col_expr(transactions::Column::UpdatedAt, Expr::value(now))
                .filter(transactions::Column::Id.is_in(revert_ids))
                .exec(&txn)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?;
            transactions_reverted = reverted.rows_affected;
        }

        let mut payrolls_reverted = 0;
        for period in &plan.payroll_periods {
            let reverted = payrolls::Entity::update_many()
                .col_expr(
                    payrolls::Column::Status,
                    Expr::value(db_enums::PayrollStatus::Approved),
                )
                .col_expr(
                    payrolls::Column::PaidAt,
                    Expr::value(None::<chrono::DateTime<Utc>>),
                )
                .col_expr(payrolls::Column::UpdatedAt, Expr::value(now))
                .filter(payrolls::Column::SalaryPeriod.eq(period.to_string()))
                .filter(payrolls::Column::Status.eq(db_enums::PayrollStatus::Paid))
                .exec(&txn)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?;
            payrolls_reverted += reverted.rows_affected;
        }

        txn.commit()
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        Ok(CancelOutcome {
            receipt_no: plan.receipt_no,
            transactions_reverted,
            payrolls_reverted,
        })
    }

    async fn issue_receipt(
        txn: &sea_orm::DatabaseTransaction,
        record: &transactions::Model,
        issued_by: UserId,
    ) -> Result<receipts::Model, WorkflowError> {
        let source = SourceRecord {
            id: TransactionId::from_uuid(record.id),
            kind: RecordKind::from(&record.record_kind),
            parish_id: curia_shared::types::ParishId::from_uuid(record.parish_id),
            amount: record.amount,
            counterparty: record.counterparty_name.clone(),
            description: record.description.clone(),
            date: record.transaction_date,
            status: RecordStatus::Approved,
            receipt_id: None,
        };
        let draft = ReceiptIssuer::for_record(&source, issued_by, record.transaction_date);

        let receipt_no =
            SequenceRepository::next_code(txn, CodePrefix::Receipt, record.fiscal_year)
                .await
                .map_err(|e| WorkflowError::Database(e.to_string()))?;

        let now = Utc::now().into();
        let receipt = receipts::ActiveModel {
            id: Set(Uuid::now_v7()),
            receipt_no: Set(receipt_no),
            record_kind: Set(draft.kind.into()),
            parish_id: Set(draft.parish_id.into_inner()),
            amount: Set(draft.amount),
            payer_payee: Set(draft.payer_payee),
            description: Set(draft.description),
            receipt_date: Set(draft.receipt_date),
            status: Set(db_enums::ReceiptStatus::Active),
            issued_by: Set(issued_by.into_inner()),
            cancelled_by: Set(None),
            cancelled_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        receipt
            .insert(txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))
    }

    async fn mark_payroll_paid(
        txn: &sea_orm::DatabaseTransaction,
        record: &transactions::Model,
    ) -> Result<(), WorkflowError> {
        let (Some(staff_id), Some(period)) = (record.staff_id, record.salary_period.as_deref())
        else {
            return Ok(());
        };

        payrolls::Entity::update_many()
            .col_expr(
                payrolls::Column::Status,
                Expr::value(db_enums::PayrollStatus::Paid),
            )
            .col_expr(payrolls::Column::PaidAt, Expr::value(Some(Utc::now())))
            .col_expr(payrolls::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(payrolls::Column::StaffId.eq(staff_id))
            .filter(payrolls::Column::SalaryPeriod.eq(period))
            .filter(payrolls::Column::Status.eq(db_enums::PayrollStatus::Approved))
            .exec(txn)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?;

        Ok(())
    }

    async fn current_status(
        db: &DatabaseConnection,
        transaction_id: Uuid,
    ) -> Result<RecordStatus, WorkflowError> {
        let record = transactions::Entity::find_by_id(transaction_id)
            .one(db)
            .await
            .map_err(|e| WorkflowError::Database(e.to_string()))?
            .ok_or(WorkflowError::RecordNotFound(transaction_id))?;
        Ok(RecordStatus::from(&record.status))
    }
}
