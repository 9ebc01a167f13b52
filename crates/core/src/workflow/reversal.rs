//! Cancellation planning for issued receipts.
//!
//! Cancelling a receipt voids the document and reverts every
//! transaction it covers back to pending, undoing their effect on
//! balances. Salary expenses additionally drag their payroll rows
//! back to approved so the batch can be corrected and re-staged. The
//! planner computes the full set of writes; the repository executes
//! them in one database transaction.

use curia_shared::types::{ReceiptId, TransactionId};

use crate::fiscal::PayrollPeriod;
use crate::ledger::{ExpenseKind, RecordStatus};
use crate::receipt::ReceiptStatus;
use crate::workflow::error::WorkflowError;

/// The slice of a receipt the planner needs.
#[derive(Debug, Clone)]
pub struct ReceiptView {
    /// The receipt id.
    pub id: ReceiptId,
    /// Human-readable receipt number.
    pub receipt_no: String,
    /// Current receipt status.
    pub status: ReceiptStatus,
    /// The transactions the receipt covers.
    pub reference_ids: Vec<TransactionId>,
}

/// The slice of a covered transaction the planner needs.
#[derive(Debug, Clone)]
pub struct RevertibleRecord {
    /// The record id.
    pub id: TransactionId,
    /// Current workflow status.
    pub status: RecordStatus,
    /// Set for expense records; `None` for income.
    pub expense_kind: Option<ExpenseKind>,
    /// Set for salary expenses staged from payroll.
    pub salary_period: Option<PayrollPeriod>,
}

/// Everything a cancellation must write, computed up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPlan {
    /// The receipt being voided.
    pub receipt_id: ReceiptId,
    /// Its receipt number, echoed in the response.
    pub receipt_no: String,
    /// Approved records to flip back to pending.
    pub revert_record_ids: Vec<TransactionId>,
    /// Payroll periods whose rows revert from paid to approved.
    pub payroll_periods: Vec<PayrollPeriod>,
}

/// Stateless planner for receipt cancellation.
pub struct CancellationService;

impl CancellationService {
    /// Plans a cancellation.
    ///
    /// Only approved records are reverted; a record that was already
    /// moved on by an earlier correction is left alone rather than
    /// failing the whole cancellation. Salary periods are deduplicated
    /// so a batch receipt reverts each payroll period once.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::AlreadyCancelled` if the receipt is not
    /// active.
    pub fn plan(
        receipt: &ReceiptView,
        records: &[RevertibleRecord],
    ) -> Result<CancellationPlan, WorkflowError> {
        if receipt.status != ReceiptStatus::Active {
            return Err(WorkflowError::AlreadyCancelled {
                receipt_no: receipt.receipt_no.clone(),
            });
        }

        let mut revert_record_ids = Vec::new();
        let mut payroll_periods: Vec<PayrollPeriod> = Vec::new();

        for record in records {
            if record.status != RecordStatus::Approved {
                continue;
            }
            revert_record_ids.push(record.id);

            if record.expense_kind == Some(ExpenseKind::Salary) {
                if let Some(period) = record.salary_period {
                    if !payroll_periods.contains(&period) {
                        payroll_periods.push(period);
                    }
                }
            }
        }

        Ok(CancellationPlan {
            receipt_id: receipt.id,
            receipt_no: receipt.receipt_no.clone(),
            revert_record_ids,
            payroll_periods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_receipt(references: Vec<TransactionId>) -> ReceiptView {
        ReceiptView {
            id: ReceiptId::new(),
            receipt_no: "REC-2024-0042".to_string(),
            status: ReceiptStatus::Active,
            reference_ids: references,
        }
    }

    fn approved(expense_kind: Option<ExpenseKind>, salary_period: Option<PayrollPeriod>) -> RevertibleRecord {
        RevertibleRecord {
            id: TransactionId::new(),
            status: RecordStatus::Approved,
            expense_kind,
            salary_period,
        }
    }

    #[test]
    fn test_plan_reverts_approved_records() {
        let records = vec![
            approved(Some(ExpenseKind::General), None),
            approved(Some(ExpenseKind::General), None),
        ];
        let receipt = active_receipt(records.iter().map(|r| r.id).collect());

        let plan = CancellationService::plan(&receipt, &records).expect("active receipt");
        assert_eq!(plan.receipt_id, receipt.id);
        assert_eq!(plan.revert_record_ids.len(), 2);
        assert!(plan.payroll_periods.is_empty());
    }

    #[test]
    fn test_plan_rejects_cancelled_receipt() {
        let mut receipt = active_receipt(vec![]);
        receipt.status = ReceiptStatus::Cancelled;

        let result = CancellationService::plan(&receipt, &[]);
        assert!(matches!(
            result,
            Err(WorkflowError::AlreadyCancelled { receipt_no }) if receipt_no == "REC-2024-0042"
        ));
    }

    #[test]
    fn test_plan_skips_records_no_longer_approved() {
        let mut pending = approved(None, None);
        pending.status = RecordStatus::Pending;
        let records = vec![approved(None, None), pending];
        let receipt = active_receipt(records.iter().map(|r| r.id).collect());

        let plan = CancellationService::plan(&receipt, &records).expect("active receipt");
        assert_eq!(plan.revert_record_ids, vec![records[0].id]);
    }

    #[test]
    fn test_plan_collects_salary_periods_once() {
        let march = PayrollPeriod::parse("03/2024").unwrap();
        let records = vec![
            approved(Some(ExpenseKind::Salary), Some(march)),
            approved(Some(ExpenseKind::Salary), Some(march)),
            approved(Some(ExpenseKind::General), None),
        ];
        let receipt = active_receipt(records.iter().map(|r| r.id).collect());

        let plan = CancellationService::plan(&receipt, &records).expect("active receipt");
        assert_eq!(plan.revert_record_ids.len(), 3);
        assert_eq!(plan.payroll_periods, vec![march]);
    }

    #[test]
    fn test_general_expenses_never_touch_payroll() {
        let stray = PayrollPeriod::parse("04/2024").unwrap();
        // A general expense with a stray period column is not a payroll
        // bridge record and must not revert the batch.
        let records = vec![approved(Some(ExpenseKind::General), Some(stray))];
        let receipt = active_receipt(records.iter().map(|r| r.id).collect());

        let plan = CancellationService::plan(&receipt, &records).expect("active receipt");
        assert!(plan.payroll_periods.is_empty());
    }
}
