//! Creation-time validation rules for income/expense records.
//!
//! Everything here runs before any write; a failed rule rejects the
//! request without touching the store.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{CreateRecordInput, PaymentMethod, RecordKind, RecordPatch};

/// Validates a record creation request.
///
/// Rules:
/// - amount must be strictly positive
/// - description must be non-empty
/// - income must reference a fund
/// - every record must be attributable to at least one ledger
///   dimension (fund or bank account)
/// - transfer payments must reference a bank account
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_create(input: &CreateRecordInput) -> Result<(), LedgerError> {
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::AmountNotPositive);
    }

    if input.description.trim().is_empty() {
        return Err(LedgerError::DescriptionRequired);
    }

    if input.kind == RecordKind::Income && input.fund_id.is_none() {
        return Err(LedgerError::MissingFund);
    }

    if input.fund_id.is_none() && input.bank_account_id.is_none() {
        return Err(LedgerError::MissingLedgerDimension);
    }

    if input.payment_method == PaymentMethod::Transfer && input.bank_account_id.is_none() {
        return Err(LedgerError::TransferRequiresBankAccount);
    }

    Ok(())
}

/// Validates a patch against a pending record.
///
/// # Errors
///
/// Returns an error if a patched field violates a creation rule.
pub fn validate_patch(patch: &RecordPatch) -> Result<(), LedgerError> {
    if let Some(amount) = patch.amount
        && amount <= Decimal::ZERO
    {
        return Err(LedgerError::AmountNotPositive);
    }

    if let Some(description) = &patch.description
        && description.trim().is_empty()
    {
        return Err(LedgerError::DescriptionRequired);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use curia_shared::types::{BankAccountId, FundId, ParishId, UserId};
    use rust_decimal_macros::dec;

    fn base_input(kind: RecordKind) -> CreateRecordInput {
        CreateRecordInput {
            kind,
            parish_id: ParishId::new(),
            fund_id: Some(FundId::new()),
            bank_account_id: None,
            amount: dec!(500_000),
            payment_method: PaymentMethod::Cash,
            counterparty_name: Some("Parish kiosk".to_string()),
            contact_id: None,
            description: "Sunday collection".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            images: vec![],
            notes: None,
            created_by: UserId::new(),
        }
    }

    #[test]
    fn test_valid_income() {
        assert!(validate_create(&base_input(RecordKind::Income)).is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut input = base_input(RecordKind::Income);
        input.amount = Decimal::ZERO;
        assert!(matches!(
            validate_create(&input),
            Err(LedgerError::AmountNotPositive)
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut input = base_input(RecordKind::Expense);
        input.amount = dec!(-1);
        assert!(matches!(
            validate_create(&input),
            Err(LedgerError::AmountNotPositive)
        ));
    }

    #[test]
    fn test_income_requires_fund() {
        let mut input = base_input(RecordKind::Income);
        input.fund_id = None;
        input.bank_account_id = Some(BankAccountId::new());
        assert!(matches!(
            validate_create(&input),
            Err(LedgerError::MissingFund)
        ));
    }

    #[test]
    fn test_expense_without_fund_allowed_with_bank_account() {
        let mut input = base_input(RecordKind::Expense);
        input.fund_id = None;
        input.bank_account_id = Some(BankAccountId::new());
        assert!(validate_create(&input).is_ok());
    }

    #[test]
    fn test_expense_needs_some_dimension() {
        let mut input = base_input(RecordKind::Expense);
        input.fund_id = None;
        input.bank_account_id = None;
        assert!(matches!(
            validate_create(&input),
            Err(LedgerError::MissingLedgerDimension)
        ));
    }

    #[test]
    fn test_transfer_requires_bank_account() {
        let mut input = base_input(RecordKind::Income);
        input.payment_method = PaymentMethod::Transfer;
        input.bank_account_id = None;
        assert!(matches!(
            validate_create(&input),
            Err(LedgerError::TransferRequiresBankAccount)
        ));
    }

    #[test]
    fn test_blank_description_rejected() {
        let mut input = base_input(RecordKind::Income);
        input.description = "   ".to_string();
        assert!(matches!(
            validate_create(&input),
            Err(LedgerError::DescriptionRequired)
        ));
    }

    #[test]
    fn test_patch_amount_must_be_positive() {
        let patch = RecordPatch {
            amount: Some(Decimal::ZERO),
            ..RecordPatch::default()
        };
        assert!(matches!(
            validate_patch(&patch),
            Err(LedgerError::AmountNotPositive)
        ));
    }

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(validate_patch(&RecordPatch::default()).is_ok());
    }
}
