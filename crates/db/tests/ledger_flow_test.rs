//! End-to-end repository tests against a real Postgres database.
//!
//! These tests run only when `DATABASE_URL` is set; without it they
//! are skipped so the suite passes on machines without Postgres.
//! Point `DATABASE_URL` at a throwaway database; migrations are
//! applied on first use. Tests seed their own parishes and funds and
//! filter on them, so the suite can run in parallel and repeatedly
//! against the same database.

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use curia_core::ledger::{
    BalanceDimension, CreateRecordInput, LedgerError, PaymentMethod, RecordKind, RecordPatch,
};
use curia_core::payroll::PayrollError;
use curia_core::receipt::ReceiptError;
use curia_core::workflow::{Decision, WorkflowError};
use curia_db::entities::{
    bank_accounts, funds, parishes, payrolls, sea_orm_active_enums as db_enums, transactions,
};
use curia_db::migration::{Migrator, MigratorTrait};
use curia_db::repositories::{
    BalanceRepository, CombineReceiptInput, PayrollRepository, ReceiptRepository,
    TransactionRepository, WorkflowRepository,
};
use curia_shared::types::{BankAccountId, FundId, ParishId, UserId};
use curia_shared::{Caller, Role};

static MIGRATIONS: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

async fn connect() -> Option<DatabaseConnection> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let db = curia_db::connect(&url).await.expect("connect to test database");
    // Tests run in parallel; apply migrations exactly once.
    MIGRATIONS
        .get_or_init(|| async {
            Migrator::up(&db, None).await.expect("run migrations");
        })
        .await;
    Some(db)
}

async fn seed_parish(db: &DatabaseConnection) -> ParishId {
    let id = ParishId::new();
    parishes::ActiveModel {
        id: Set(id.into_inner()),
        code: Set(format!("PAR-{}", &id.to_string()[..8])),
        name: Set("St. Test Parish".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("seed parish");
    id
}

async fn seed_fund(db: &DatabaseConnection, code: &str) -> FundId {
    let id = FundId::new();
    // Codes are unique; suffix with the id so the suite can re-run.
    let code = format!("{code}-{}", &id.to_string()[..8]);
    funds::ActiveModel {
        id: Set(id.into_inner()),
        code: Set(code.clone()),
        name: Set(format!("Fund {code}")),
        category: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("seed fund");
    id
}

async fn seed_bank_account(db: &DatabaseConnection, code: &str) -> BankAccountId {
    let id = BankAccountId::new();
    let code = format!("{code}-{}", &id.to_string()[..8]);
    bank_accounts::ActiveModel {
        id: Set(id.into_inner()),
        code: Set(code.clone()),
        name: Set(format!("Account {code}")),
        bank_name: Set("Test Bank".to_string()),
        account_no: Set("0012345678".to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("seed bank account");
    id
}

fn income_input(parish_id: ParishId, fund_id: FundId, amount: rust_decimal::Decimal) -> CreateRecordInput {
    CreateRecordInput {
        kind: RecordKind::Income,
        parish_id,
        fund_id: Some(fund_id),
        bank_account_id: None,
        amount,
        payment_method: PaymentMethod::Cash,
        counterparty_name: Some("Sunday collection".to_string()),
        contact_id: None,
        description: "Weekly offering".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
        images: vec![],
        notes: None,
        created_by: UserId::new(),
    }
}

#[tokio::test]
async fn test_create_approve_issues_receipt_and_updates_balance() {
    let Some(db) = connect().await else { return };

    let parish = seed_parish(&db).await;
    let fund = seed_fund(&db, "FND-OPS").await;

    let transactions = TransactionRepository::new(db.clone());
    let workflow = WorkflowRepository::new(db.clone());
    let balances = BalanceRepository::new(db.clone());

    let record = transactions
        .create(income_input(parish, fund, dec!(1000000)))
        .await
        .expect("create income");
    assert!(record.code.starts_with("INC-2024-"));
    assert_eq!(record.status, db_enums::RecordStatus::Pending);

    let outcome = workflow
        .decide(record.id, Decision::Approved, UserId::new(), None)
        .await
        .expect("approve");
    let receipt = outcome.receipt.expect("approval mints a receipt");
    assert!(receipt.receipt_no.starts_with("REC-2024-"));
    assert_eq!(outcome.transaction.receipt_id, Some(receipt.id));

    // A second decision on the same record conflicts.
    let second = workflow
        .decide(record.id, Decision::Rejected, UserId::new(), None)
        .await;
    assert!(matches!(second, Err(WorkflowError::AlreadyDecided { .. })));

    let rows = balances
        .balances(BalanceDimension::Fund, Some(fund.into_inner()))
        .await
        .expect("fund balance");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].total_income, dec!(1000000));
    assert_eq!(rows[0].balance, dec!(1000000));
}

#[tokio::test]
async fn test_pending_records_do_not_count_toward_balances() {
    let Some(db) = connect().await else { return };

    let parish = seed_parish(&db).await;
    let fund = seed_fund(&db, "FND-PND").await;

    let transactions = TransactionRepository::new(db.clone());
    let balances = BalanceRepository::new(db.clone());

    transactions
        .create(income_input(parish, fund, dec!(250000)))
        .await
        .expect("create income");

    let rows = balances
        .balances(BalanceDimension::Fund, Some(fund.into_inner()))
        .await
        .expect("fund balance");
    assert_eq!(rows[0].total_income, dec!(0));
    assert_eq!(rows[0].balance, dec!(0));
}

#[tokio::test]
async fn test_zero_activity_bank_account_yields_zero_row() {
    let Some(db) = connect().await else { return };

    let account = seed_bank_account(&db, "ACC-IDLE").await;
    let balances = BalanceRepository::new(db.clone());

    let rows = balances
        .balances(BalanceDimension::BankAccount, Some(account.into_inner()))
        .await
        .expect("bank balance");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].balance, dec!(0));
}

async fn seed_approved_expense(
    db: &DatabaseConnection,
    parish: ParishId,
    fund: FundId,
    amount: rust_decimal::Decimal,
) -> Uuid {
    let id = Uuid::now_v7();
    transactions::ActiveModel {
        id: Set(id),
        code: Set(format!("EXP-2024-T{}", &id.to_string()[..8])),
        record_kind: Set(db_enums::RecordKind::Expense),
        parish_id: Set(parish.into_inner()),
        fund_id: Set(Some(fund.into_inner())),
        bank_account_id: Set(None),
        amount: Set(amount),
        payment_method: Set(db_enums::PaymentMethod::Cash),
        expense_kind: Set(Some(db_enums::ExpenseKind::General)),
        counterparty_name: Set(Some("Alfa Omega Supplies".to_string())),
        contact_id: Set(None),
        description: Set("Supplies".to_string()),
        transaction_date: Set(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
        fiscal_year: Set(2024),
        fiscal_period: Set(3),
        images: Set(serde_json::json!([])),
        notes: Set(None),
        status: Set(db_enums::RecordStatus::Approved),
        created_by: Set(UserId::new().into_inner()),
        approved_by: Set(Some(UserId::new().into_inner())),
        approved_at: Set(Some(Utc::now().into())),
        decision_notes: Set(None),
        receipt_id: Set(None),
        staff_id: Set(None),
        payroll_id: Set(None),
        salary_period: Set(None),
        salary_snapshot: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("seed approved expense");
    id
}

#[tokio::test]
async fn test_decided_records_resist_edit_and_delete() {
    let Some(db) = connect().await else { return };

    let parish = seed_parish(&db).await;
    let fund = seed_fund(&db, "FND-LCK").await;

    let transactions_repo = TransactionRepository::new(db.clone());
    let workflow = WorkflowRepository::new(db.clone());

    let creator = UserId::new();
    let mut input = income_input(parish, fund, dec!(100000));
    input.created_by = creator;
    let record = transactions_repo.create(input).await.expect("create income");

    workflow
        .decide(record.id, Decision::Approved, UserId::new(), None)
        .await
        .expect("approve");

    // Owner or not, a decided record can no longer be mutated: the
    // write is conditioned on status = pending and affects zero rows.
    let owner = Caller::new(creator, Role::Secretary);
    let edit = transactions_repo
        .edit(
            &owner,
            record.id,
            RecordPatch {
                amount: Some(dec!(200000)),
                ..RecordPatch::default()
            },
        )
        .await;
    assert!(matches!(edit, Err(LedgerError::NotPending { .. })));

    let delete = transactions_repo.delete(&owner, record.id).await;
    assert!(matches!(delete, Err(LedgerError::NotPending { .. })));

    let unchanged = transactions_repo.get(record.id).await.expect("still present");
    assert_eq!(unchanged.amount, dec!(100000));
    assert_eq!(unchanged.status, db_enums::RecordStatus::Approved);
}

#[tokio::test]
async fn test_receipt_copies_the_edited_record_state() {
    let Some(db) = connect().await else { return };

    let parish = seed_parish(&db).await;
    let fund = seed_fund(&db, "FND-EDT").await;

    let transactions_repo = TransactionRepository::new(db.clone());
    let workflow = WorkflowRepository::new(db.clone());

    let creator = UserId::new();
    let mut input = income_input(parish, fund, dec!(100000));
    input.created_by = creator;
    let record = transactions_repo.create(input).await.expect("create income");

    let owner = Caller::new(creator, Role::Secretary);
    let edited = transactions_repo
        .edit(
            &owner,
            record.id,
            RecordPatch {
                amount: Some(dec!(175000)),
                description: Some("Corrected offering".to_string()),
                ..RecordPatch::default()
            },
        )
        .await
        .expect("edit pending record");
    assert_eq!(edited.amount, dec!(175000));

    // The receipt reflects the row as approved, edits included.
    let outcome = workflow
        .decide(record.id, Decision::Approved, UserId::new(), None)
        .await
        .expect("approve");
    let receipt = outcome.receipt.expect("approval mints a receipt");
    assert_eq!(receipt.amount, dec!(175000));
    assert_eq!(receipt.description, "Corrected offering");
    assert_eq!(outcome.transaction.amount, dec!(175000));
}

#[tokio::test]
async fn test_combine_claims_each_record_once() {
    let Some(db) = connect().await else { return };

    let parish = seed_parish(&db).await;
    let fund = seed_fund(&db, "FND-CMB").await;

    let a = seed_approved_expense(&db, parish, fund, dec!(100000)).await;
    let b = seed_approved_expense(&db, parish, fund, dec!(50000)).await;

    let receipts_repo = ReceiptRepository::new(db.clone());
    let workflow = WorkflowRepository::new(db.clone());

    let input = CombineReceiptInput {
        reference_ids: vec![a, b],
        declared_total: Some(dec!(150000)),
        payer_payee: Some("Alfa Omega Supplies".to_string()),
        description: "Combined supplies".to_string(),
        receipt_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        issued_by: UserId::new(),
    };
    let receipt = receipts_repo.combine(input.clone()).await.expect("combine");
    assert!(receipt.receipt_no.starts_with("REC-2024-"));
    assert_eq!(receipt.amount, dec!(150000));

    // Every reference carries the back-reference.
    let (_, covered) = receipts_repo
        .get(receipt.id)
        .await
        .expect("fetch combined receipt");
    assert_eq!(covered.len(), 2);

    // Re-running the same combination finds the rows already claimed.
    let again = receipts_repo.combine(input).await;
    assert!(matches!(again, Err(ReceiptError::AlreadyReceipted(_))));

    // Cancelling reverts exactly the covered records.
    let cancel = workflow
        .cancel_receipt(receipt.id, UserId::new())
        .await
        .expect("cancel combined receipt");
    assert_eq!(cancel.transactions_reverted, 2);
    assert_eq!(cancel.payrolls_reverted, 0);
}

async fn seed_payroll_row(
    db: &DatabaseConnection,
    parish: ParishId,
    name: &str,
    phone: &str,
    net: rust_decimal::Decimal,
) -> Uuid {
    let id = Uuid::now_v7();
    payrolls::ActiveModel {
        id: Set(id),
        staff_id: Set(Uuid::now_v7()),
        staff_name: Set(name.to_string()),
        staff_phone: Set(Some(phone.to_string())),
        bank_name: Set(None),
        bank_account_no: Set(None),
        parish_id: Set(parish.into_inner()),
        salary_period: Set("01/2024".to_string()),
        basic_salary: Set(net),
        allowances: Set(dec!(0)),
        advances: Set(dec!(0)),
        deductions: Set(dec!(0)),
        net_salary: Set(net),
        status: Set(db_enums::PayrollStatus::Draft),
        approved_by: Set(None),
        approved_at: Set(None),
        paid_at: Set(None),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .expect("seed payroll row");
    id
}

#[tokio::test]
async fn test_payroll_batch_stages_expenses_then_cancel_reverts() {
    let Some(db) = connect().await else { return };

    let parish = seed_parish(&db).await;
    seed_payroll_row(&db, parish, "Maria", "081111111111", dec!(5000000)).await;
    seed_payroll_row(&db, parish, "Yosef", "082222222222", dec!(6000000)).await;

    let payroll = PayrollRepository::new(db.clone());
    let workflow = WorkflowRepository::new(db.clone());

    let outcome = payroll
        .approve_batch(
            parish.into_inner(),
            "01/2024",
            PaymentMethod::Cash,
            None,
            UserId::new(),
        )
        .await
        .expect("approve batch");
    assert_eq!(outcome.expenses_created, 2);
    assert_eq!(outcome.payrolls_approved, 2);
    assert_eq!(outcome.total_amount, dec!(11000000));

    // Re-running the period finds nothing left in draft.
    let retry = payroll
        .approve_batch(
            parish.into_inner(),
            "01/2024",
            PaymentMethod::Cash,
            None,
            UserId::new(),
        )
        .await;
    assert!(matches!(retry, Err(PayrollError::NothingToApprove { .. })));

    // Approve one staged salary expense and cancel its receipt; the
    // payroll rows for the period drop back from paid to approved.
    let staged = transactions::Entity::find()
        .filter(transactions::Column::ExpenseKind.eq(db_enums::ExpenseKind::Salary))
        .filter(transactions::Column::ParishId.eq(parish.into_inner()))
        .all(&db)
        .await
        .expect("fetch staged expenses");
    assert_eq!(staged.len(), 2);

    let decided = workflow
        .decide(staged[0].id, Decision::Approved, UserId::new(), None)
        .await
        .expect("approve salary expense");
    let receipt = decided.receipt.expect("receipt for salary expense");

    let paid = payrolls::Entity::find()
        .filter(payrolls::Column::ParishId.eq(parish.into_inner()))
        .filter(payrolls::Column::Status.eq(db_enums::PayrollStatus::Paid))
        .all(&db)
        .await
        .expect("fetch paid rows");
    assert_eq!(paid.len(), 1);

    let cancel = workflow
        .cancel_receipt(receipt.id, UserId::new())
        .await
        .expect("cancel receipt");
    assert_eq!(cancel.transactions_reverted, 1);
    assert_eq!(cancel.payrolls_reverted, 1);

    // Cancelling again conflicts.
    let again = workflow.cancel_receipt(receipt.id, UserId::new()).await;
    assert!(matches!(again, Err(WorkflowError::AlreadyCancelled { .. })));

    let reverted = transactions::Entity::find_by_id(staged[0].id)
        .one(&db)
        .await
        .expect("fetch reverted record")
        .expect("record still exists");
    assert_eq!(reverted.status, db_enums::RecordStatus::Pending);
    assert_eq!(reverted.receipt_id, None);
    assert_eq!(reverted.approved_by, None);
}
