//! Builds receipt drafts from approved transaction records.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use curia_shared::types::UserId;

use crate::ledger::RecordStatus;
use crate::receipt::error::ReceiptError;
use crate::receipt::types::{ReceiptDraft, SourceRecord};

/// Stateless builder for receipt drafts.
///
/// The issuer only shapes and validates; number allocation and
/// persistence happen in the repository, inside the same transaction
/// that flips the record to approved.
pub struct ReceiptIssuer;

impl ReceiptIssuer {
    /// Builds the single-record receipt minted during approval.
    ///
    /// Called after the approval transition has been validated, so the
    /// record is taken as-is; counterparty and description are copied
    /// onto the receipt.
    #[must_use]
    pub fn for_record(record: &SourceRecord, issued_by: UserId, receipt_date: NaiveDate) -> ReceiptDraft {
        ReceiptDraft {
            kind: record.kind,
            parish_id: record.parish_id,
            reference_ids: vec![record.id],
            amount: record.amount,
            payer_payee: record.counterparty.clone(),
            description: record.description.clone(),
            receipt_date,
            issued_by,
        }
    }

    /// Builds a combined receipt over several approved records.
    ///
    /// All records must be approved, not yet receipted, of one kind,
    /// and from one parish. When the client declares an expected total
    /// it must equal the sum of the records.
    ///
    /// # Errors
    ///
    /// Returns a `ReceiptError` describing the first violated rule.
    pub fn combine(
        records: &[SourceRecord],
        declared_total: Option<Decimal>,
        payer_payee: Option<String>,
        description: String,
        issued_by: UserId,
        receipt_date: NaiveDate,
    ) -> Result<ReceiptDraft, ReceiptError> {
        let Some(first) = records.first() else {
            return Err(ReceiptError::EmptyReferences);
        };

        for record in records {
            if record.kind != first.kind {
                return Err(ReceiptError::MixedKinds);
            }
            if record.parish_id != first.parish_id {
                return Err(ReceiptError::MixedParishes);
            }
            if record.status != RecordStatus::Approved {
                return Err(ReceiptError::NotApproved(record.id.into_inner()));
            }
            if record.receipt_id.is_some() {
                return Err(ReceiptError::AlreadyReceipted(record.id.into_inner()));
            }
        }

        let actual: Decimal = records.iter().map(|r| r.amount).sum();
        if let Some(declared) = declared_total {
            if declared != actual {
                return Err(ReceiptError::TotalMismatch { declared, actual });
            }
        }

        Ok(ReceiptDraft {
            kind: first.kind,
            parish_id: first.parish_id,
            reference_ids: records.iter().map(|r| r.id).collect(),
            amount: actual,
            payer_payee,
            description,
            receipt_date,
            issued_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use curia_shared::types::{ParishId, ReceiptId, TransactionId};

    use crate::ledger::RecordKind;

    fn record(kind: RecordKind, parish_id: ParishId, amount: Decimal) -> SourceRecord {
        SourceRecord {
            id: TransactionId::new(),
            kind,
            parish_id,
            amount,
            counterparty: Some("Alfa Omega Supplies".to_string()),
            description: "Candles".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            status: RecordStatus::Approved,
            receipt_id: None,
        }
    }

    fn combine_defaults(records: &[SourceRecord], declared: Option<Decimal>) -> Result<ReceiptDraft, ReceiptError> {
        ReceiptIssuer::combine(
            records,
            declared,
            Some("Alfa Omega Supplies".to_string()),
            "Combined purchases".to_string(),
            UserId::new(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        )
    }

    #[test]
    fn test_for_record_copies_source_fields() {
        let parish = ParishId::new();
        let source = record(RecordKind::Income, parish, dec!(250000));
        let issued_by = UserId::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();

        let draft = ReceiptIssuer::for_record(&source, issued_by, date);
        assert_eq!(draft.kind, RecordKind::Income);
        assert_eq!(draft.parish_id, parish);
        assert_eq!(draft.reference_ids, vec![source.id]);
        assert_eq!(draft.amount, dec!(250000));
        assert_eq!(draft.payer_payee.as_deref(), Some("Alfa Omega Supplies"));
        assert_eq!(draft.issued_by, issued_by);
    }

    #[test]
    fn test_combine_sums_amounts() {
        let parish = ParishId::new();
        let records = vec![
            record(RecordKind::Expense, parish, dec!(100000)),
            record(RecordKind::Expense, parish, dec!(50000)),
            record(RecordKind::Expense, parish, dec!(25000)),
        ];

        let draft = combine_defaults(&records, None).expect("valid combination");
        assert_eq!(draft.amount, dec!(175000));
        assert_eq!(draft.reference_ids.len(), 3);
    }

    #[test]
    fn test_combine_rejects_empty() {
        assert!(matches!(
            combine_defaults(&[], None),
            Err(ReceiptError::EmptyReferences)
        ));
    }

    #[test]
    fn test_combine_checks_declared_total() {
        let parish = ParishId::new();
        let records = vec![
            record(RecordKind::Expense, parish, dec!(100000)),
            record(RecordKind::Expense, parish, dec!(50000)),
        ];

        assert!(combine_defaults(&records, Some(dec!(150000))).is_ok());
        assert!(matches!(
            combine_defaults(&records, Some(dec!(160000))),
            Err(ReceiptError::TotalMismatch {
                declared,
                actual,
            }) if declared == dec!(160000) && actual == dec!(150000)
        ));
    }

    #[test]
    fn test_combine_rejects_mixed_kinds() {
        let parish = ParishId::new();
        let records = vec![
            record(RecordKind::Income, parish, dec!(100000)),
            record(RecordKind::Expense, parish, dec!(50000)),
        ];
        assert!(matches!(
            combine_defaults(&records, None),
            Err(ReceiptError::MixedKinds)
        ));
    }

    #[test]
    fn test_combine_rejects_mixed_parishes() {
        let records = vec![
            record(RecordKind::Expense, ParishId::new(), dec!(100000)),
            record(RecordKind::Expense, ParishId::new(), dec!(50000)),
        ];
        assert!(matches!(
            combine_defaults(&records, None),
            Err(ReceiptError::MixedParishes)
        ));
    }

    #[test]
    fn test_combine_rejects_unapproved_record() {
        let parish = ParishId::new();
        let mut pending = record(RecordKind::Expense, parish, dec!(50000));
        pending.status = RecordStatus::Pending;
        let records = vec![record(RecordKind::Expense, parish, dec!(100000)), pending];

        assert!(matches!(
            combine_defaults(&records, None),
            Err(ReceiptError::NotApproved(_))
        ));
    }

    #[test]
    fn test_combine_rejects_already_receipted_record() {
        let parish = ParishId::new();
        let mut receipted = record(RecordKind::Expense, parish, dec!(50000));
        receipted.receipt_id = Some(ReceiptId::new());
        let records = vec![record(RecordKind::Expense, parish, dec!(100000)), receipted];

        assert!(matches!(
            combine_defaults(&records, None),
            Err(ReceiptError::AlreadyReceipted(_))
        ));
    }
}
