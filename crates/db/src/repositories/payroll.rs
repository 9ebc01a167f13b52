//! Payroll batch approval repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use curia_shared::types::{BankAccountId, ParishId, PayrollId, StaffId, UserId};

use curia_core::fiscal::PayrollPeriod;
use curia_core::ledger::PaymentMethod;
use curia_core::payroll::{
    PayrollBridge, PayrollError, PayrollRow, SalarySnapshot, StaffContact,
};
use curia_core::sequence::CodePrefix;

use crate::entities::{payrolls, sea_orm_active_enums as db_enums, transactions};
use crate::repositories::contact::ContactRepository;
use crate::repositories::sequence::SequenceRepository;

/// Result of approving a payroll batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Pending salary expenses created.
    pub expenses_created: u64,
    /// Payroll rows flipped from draft to approved.
    pub payrolls_approved: u64,
    /// Sum of the staged net salaries.
    pub total_amount: Decimal,
}

/// Repository for the payroll-to-expense bridge.
#[derive(Debug, Clone)]
pub struct PayrollRepository {
    db: DatabaseConnection,
}

impl PayrollRepository {
    /// Creates a new payroll repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stages a period's draft payroll rows into pending salary
    /// expenses and flips the rows to approved.
    ///
    /// Everything runs inside one database transaction. A retried
    /// batch is additionally guarded by the partial unique index on
    /// `(staff_id, salary_period)` for salary expenses, so a crash
    /// between commit and response cannot double-stage anyone.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriod`, `TransferRequiresBankAccount`,
    /// `NothingToApprove`, or a database error.
    pub async fn approve_batch(
        &self,
        parish_id: Uuid,
        period_token: &str,
        payment_method: PaymentMethod,
        bank_account_id: Option<Uuid>,
        approved_by: UserId,
    ) -> Result<BatchOutcome, PayrollError> {
        let period = PayrollPeriod::parse(period_token)
            .ok_or_else(|| PayrollError::InvalidPeriod(period_token.to_string()))?;

        let rows = payrolls::Entity::find()
            .filter(payrolls::Column::ParishId.eq(parish_id))
            .filter(payrolls::Column::SalaryPeriod.eq(period.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| PayrollError::Database(e.to_string()))?;

        let core_rows: Vec<PayrollRow> = rows
            .iter()
            .filter_map(|r| {
                Some(PayrollRow {
                    id: PayrollId::from_uuid(r.id),
                    staff_id: StaffId::from_uuid(r.staff_id),
                    parish_id: ParishId::from_uuid(r.parish_id),
                    period: PayrollPeriod::parse(&r.salary_period)?,
                    status: (&r.status).into(),
                    staff: StaffContact {
                        name: r.staff_name.clone(),
                        phone: r.staff_phone.clone(),
                        bank_name: r.bank_name.clone(),
                        bank_account_no: r.bank_account_no.clone(),
                    },
                    snapshot: SalarySnapshot {
                        basic_salary: r.basic_salary,
                        allowances: r.allowances,
                        advances: r.advances,
                        deductions: r.deductions,
                        net_salary: r.net_salary,
                    },
                })
            })
            .collect();

        let batch = PayrollBridge::stage(
            ParishId::from_uuid(parish_id),
            period,
            payment_method,
            bank_account_id.map(BankAccountId::from_uuid),
            &core_rows,
        )?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| PayrollError::Database(e.to_string()))?;

        let stamp = period.fiscal_stamp();
        let today = Utc::now().date_naive();
        let now = Utc::now();

        for staged in &batch.expenses {
            let contact_id = ContactRepository::resolve(&txn, &staged.staff)
                .await
                .map_err(|e| PayrollError::Database(e.to_string()))?;

            let code = SequenceRepository::next_code(&txn, CodePrefix::Expense, stamp.year)
                .await
                .map_err(|e| PayrollError::Database(e.to_string()))?;

            let snapshot = serde_json::to_value(&staged.snapshot)
                .map_err(|e| PayrollError::Database(e.to_string()))?;

            let expense = transactions::ActiveModel {
                id: Set(Uuid::now_v7()),
                code: Set(code),
                record_kind: Set(db_enums::RecordKind::Expense),
                parish_id: Set(parish_id),
                fund_id: Set(None),
                bank_account_id: Set(bank_account_id),
                amount: Set(staged.amount),
                payment_method: Set(batch.payment_method.into()),
                expense_kind: Set(Some(db_enums::ExpenseKind::Salary)),
                counterparty_name: Set(Some(staged.staff.name.clone())),
                contact_id: Set(Some(contact_id)),
                description: Set(staged.description.clone()),
                transaction_date: Set(today),
                fiscal_year: Set(stamp.year),
                fiscal_period: Set(i16::from(stamp.period)),
                images: Set(serde_json::json!([])),
                notes: Set(None),
                status: Set(db_enums::RecordStatus::Pending),
                created_by: Set(approved_by.into_inner()),
                approved_by: Set(None),
                approved_at: Set(None),
                decision_notes: Set(None),
                receipt_id: Set(None),
                staff_id: Set(Some(staged.staff_id.into_inner())),
                payroll_id: Set(Some(staged.payroll_id.into_inner())),
                salary_period: Set(Some(period.to_string())),
                salary_snapshot: Set(Some(snapshot)),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };

            expense
                .insert(&txn)
                .await
                .map_err(|e| PayrollError::Database(e.to_string()))?;
        }

        let flip_ids: Vec<Uuid> = batch
            .payroll_ids
            .iter()
            .map(|id| id.into_inner())
            .collect();

        let flipped = payrolls::Entity::update_many()
            .col_expr(
                payrolls::Column::Status,
                Expr::value(db_enums::PayrollStatus::Approved),
            )
            .col_expr(
                payrolls::Column::ApprovedBy,
                Expr::value(Some(approved_by.into_inner())),
            )
            .col_expr(payrolls::Column::ApprovedAt, Expr::value(Some(now)))
            .col_expr(payrolls::Column::UpdatedAt, Expr::value(now))
            .filter(payrolls::Column::Id.is_in(flip_ids))
            .filter(payrolls::Column::Status.eq(db_enums::PayrollStatus::Draft))
            .exec(&txn)
            .await
            .map_err(|e| PayrollError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| PayrollError::Database(e.to_string()))?;

        Ok(BatchOutcome {
            expenses_created: batch.expenses.len() as u64,
            payrolls_approved: flipped.rows_affected,
            total_amount: batch.total_amount,
        })
    }
}
