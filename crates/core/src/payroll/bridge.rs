//! Stages draft payroll rows into pending salary expenses.

use rust_decimal::Decimal;

use curia_shared::types::{BankAccountId, ParishId, PayrollId, StaffId};

use crate::fiscal::PayrollPeriod;
use crate::ledger::PaymentMethod;
use crate::payroll::error::PayrollError;
use crate::payroll::types::{PayrollRow, PayrollStatus, SalarySnapshot, StaffContact};

/// One salary expense to be inserted, derived from a draft row.
#[derive(Debug, Clone)]
pub struct StagedExpense {
    /// The source payroll row.
    pub payroll_id: PayrollId,
    /// The staff member being paid.
    pub staff_id: StaffId,
    /// Contact details for counterparty resolution.
    pub staff: StaffContact,
    /// Net salary, the expense amount.
    pub amount: Decimal,
    /// Generated expense description.
    pub description: String,
    /// Line items frozen onto the expense.
    pub snapshot: SalarySnapshot,
}

/// The computed batch: expenses to insert and rows to flip.
#[derive(Debug, Clone)]
pub struct StagedBatch {
    /// The owning parish.
    pub parish_id: ParishId,
    /// The salary period.
    pub period: PayrollPeriod,
    /// How the salaries are paid out.
    pub payment_method: PaymentMethod,
    /// The paying bank account, required for transfers.
    pub bank_account_id: Option<BankAccountId>,
    /// One staged expense per draft row.
    pub expenses: Vec<StagedExpense>,
    /// The rows flipped from draft to approved.
    pub payroll_ids: Vec<PayrollId>,
    /// Sum of the staged net salaries.
    pub total_amount: Decimal,
}

/// Stateless planner for payroll batch approval.
///
/// The bridge only computes what to write. The repository resolves
/// contacts, allocates expense codes, inserts the expenses, and flips
/// the rows, all inside one database transaction; a partial unique
/// index on `(staff_id, salary_period)` keeps a retried batch from
/// duplicating salary expenses.
pub struct PayrollBridge;

impl PayrollBridge {
    /// Computes the staged batch from the period's payroll rows.
    ///
    /// Rows that are not draft are skipped, so re-running the batch
    /// after a partial failure only stages what is still missing.
    ///
    /// # Errors
    ///
    /// Returns `PayrollError::TransferRequiresBankAccount` for a
    /// transfer batch without a bank account, and
    /// `PayrollError::NothingToApprove` when no draft rows exist.
    pub fn stage(
        parish_id: ParishId,
        period: PayrollPeriod,
        payment_method: PaymentMethod,
        bank_account_id: Option<BankAccountId>,
        rows: &[PayrollRow],
    ) -> Result<StagedBatch, PayrollError> {
        if payment_method == PaymentMethod::Transfer && bank_account_id.is_none() {
            return Err(PayrollError::TransferRequiresBankAccount);
        }

        let drafts: Vec<&PayrollRow> = rows
            .iter()
            .filter(|r| r.status == PayrollStatus::Draft && r.period == period)
            .collect();
        if drafts.is_empty() {
            return Err(PayrollError::NothingToApprove {
                period: period.to_string(),
            });
        }

        let mut expenses = Vec::with_capacity(drafts.len());
        let mut payroll_ids = Vec::with_capacity(drafts.len());
        let mut total_amount = Decimal::ZERO;

        for row in drafts {
            total_amount += row.snapshot.net_salary;
            payroll_ids.push(row.id);
            expenses.push(StagedExpense {
                payroll_id: row.id,
                staff_id: row.staff_id,
                staff: row.staff.clone(),
                amount: row.snapshot.net_salary,
                description: format!("Salary {} - {}", row.staff.name, period),
                snapshot: row.snapshot.clone(),
            });
        }

        Ok(StagedBatch {
            parish_id,
            period,
            payment_method,
            bank_account_id,
            expenses,
            payroll_ids,
            total_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot(net: Decimal) -> SalarySnapshot {
        SalarySnapshot {
            basic_salary: net,
            allowances: Decimal::ZERO,
            advances: Decimal::ZERO,
            deductions: Decimal::ZERO,
            net_salary: net,
        }
    }

    fn draft_row(parish_id: ParishId, period: PayrollPeriod, name: &str, net: Decimal) -> PayrollRow {
        PayrollRow {
            id: PayrollId::new(),
            staff_id: StaffId::new(),
            parish_id,
            period,
            status: PayrollStatus::Draft,
            staff: StaffContact {
                name: name.to_string(),
                phone: Some("081234567890".to_string()),
                bank_name: None,
                bank_account_no: None,
            },
            snapshot: snapshot(net),
        }
    }

    #[test]
    fn test_stage_two_draft_rows() {
        let parish = ParishId::new();
        let period = PayrollPeriod::parse("01/2024").unwrap();
        let rows = vec![
            draft_row(parish, period, "Maria", dec!(5000000)),
            draft_row(parish, period, "Yosef", dec!(6000000)),
        ];

        let batch = PayrollBridge::stage(parish, period, PaymentMethod::Cash, None, &rows)
            .expect("two draft rows");
        assert_eq!(batch.expenses.len(), 2);
        assert_eq!(batch.payroll_ids.len(), 2);
        assert_eq!(batch.total_amount, dec!(11000000));
        assert!(batch.expenses[0].description.contains("Maria"));
        assert!(batch.expenses[0].description.contains("01/2024"));
    }

    #[test]
    fn test_stage_skips_non_draft_rows() {
        let parish = ParishId::new();
        let period = PayrollPeriod::parse("01/2024").unwrap();
        let mut already = draft_row(parish, period, "Maria", dec!(5000000));
        already.status = PayrollStatus::Approved;
        let rows = vec![already, draft_row(parish, period, "Yosef", dec!(6000000))];

        let batch = PayrollBridge::stage(parish, period, PaymentMethod::Cash, None, &rows)
            .expect("one draft row remains");
        assert_eq!(batch.expenses.len(), 1);
        assert_eq!(batch.total_amount, dec!(6000000));
    }

    #[test]
    fn test_stage_empty_period_fails() {
        let parish = ParishId::new();
        let period = PayrollPeriod::parse("02/2024").unwrap();
        let other_period = PayrollPeriod::parse("01/2024").unwrap();
        let rows = vec![draft_row(parish, other_period, "Maria", dec!(5000000))];

        let result = PayrollBridge::stage(parish, period, PaymentMethod::Cash, None, &rows);
        assert!(matches!(
            result,
            Err(PayrollError::NothingToApprove { period }) if period == "02/2024"
        ));
    }

    #[test]
    fn test_transfer_requires_bank_account() {
        let parish = ParishId::new();
        let period = PayrollPeriod::parse("01/2024").unwrap();
        let rows = vec![draft_row(parish, period, "Maria", dec!(5000000))];

        assert!(matches!(
            PayrollBridge::stage(parish, period, PaymentMethod::Transfer, None, &rows),
            Err(PayrollError::TransferRequiresBankAccount)
        ));
        assert!(PayrollBridge::stage(
            parish,
            period,
            PaymentMethod::Transfer,
            Some(BankAccountId::new()),
            &rows
        )
        .is_ok());
    }

    #[test]
    fn test_snapshot_net_consistency() {
        let s = SalarySnapshot {
            basic_salary: dec!(5000000),
            allowances: dec!(500000),
            advances: dec!(200000),
            deductions: dec!(300000),
            net_salary: dec!(5000000),
        };
        assert_eq!(s.computed_net(), dec!(5000000));
    }
}
