//! Income/expense record routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use curia_core::ledger::{
    CreateRecordInput, ExpenseKind, PaymentMethod, RecordKind, RecordPatch, RecordStatus,
};
use curia_core::workflow::{permissions, Action, Decision};
use curia_db::entities::transactions;
use curia_db::repositories::{
    transaction::TransactionFilter, TransactionRepository, WorkflowRepository,
};
use curia_shared::types::{
    BankAccountId, ContactId, FundId, PageRequest, PageResponse, ParishId,
};

use crate::middleware::CallerIdentity;
use crate::routes::{bad_request, ledger_error, workflow_error};
use crate::AppState;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions))
        .route("/transactions", post(create_transaction))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}", patch(edit_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
        .route("/transactions/{id}/decision", post(decide_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing records.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by parish.
    pub parish_id: Option<Uuid>,
    /// Filter by record kind ("income" or "expense").
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by fiscal year.
    pub fiscal_year: Option<i32>,
    /// Pagination.
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Request body for creating a record.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The owning parish.
    pub parish_id: Uuid,
    /// Fund attribution (required for income).
    pub fund_id: Option<Uuid>,
    /// Bank account attribution.
    pub bank_account_id: Option<Uuid>,
    /// Positive amount.
    pub amount: Decimal,
    /// "cash" or "transfer".
    pub payment_method: String,
    /// Free-text counterparty name.
    pub counterparty: Option<String>,
    /// Resolved counterparty contact id.
    pub contact_id: Option<Uuid>,
    /// What the money was for.
    pub description: String,
    /// Business date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Evidence image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Optional notes.
    pub notes: Option<String>,
}

/// Request body for editing a pending record.
#[derive(Debug, Deserialize)]
pub struct EditTransactionRequest {
    /// New fund attribution.
    pub fund_id: Option<Uuid>,
    /// New bank account attribution.
    pub bank_account_id: Option<Uuid>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New payment method.
    pub payment_method: Option<String>,
    /// New counterparty name.
    pub counterparty: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New business date.
    pub date: Option<NaiveDate>,
    /// Replacement evidence URLs.
    pub images: Option<Vec<String>>,
    /// New notes.
    pub notes: Option<String>,
}

/// Request body for deciding a pending record.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// "approved" or "rejected".
    pub decision: String,
    /// Optional decision notes.
    pub notes: Option<String>,
}

/// Response for a record.
#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    /// Record id.
    pub id: Uuid,
    /// Year-scoped code, e.g. `EXP-2024-0007`.
    pub code: String,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The owning parish.
    pub parish_id: Uuid,
    /// Fund attribution.
    pub fund_id: Option<Uuid>,
    /// Bank account attribution.
    pub bank_account_id: Option<Uuid>,
    /// Amount.
    pub amount: Decimal,
    /// "cash" or "transfer".
    pub payment_method: String,
    /// "general" or "salary" for expenses.
    pub expense_kind: Option<String>,
    /// Counterparty name.
    pub counterparty: Option<String>,
    /// Description.
    pub description: String,
    /// Business date.
    pub date: String,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// Fiscal period (month).
    pub fiscal_period: i16,
    /// Evidence image URLs.
    pub images: serde_json::Value,
    /// Notes.
    pub notes: Option<String>,
    /// Workflow status.
    pub status: String,
    /// Creator.
    pub created_by: Uuid,
    /// Decider, once decided.
    pub approved_by: Option<Uuid>,
    /// Decision timestamp.
    pub approved_at: Option<String>,
    /// Decision notes.
    pub decision_notes: Option<String>,
    /// Receipt back-reference, once approved.
    pub receipt_id: Option<Uuid>,
    /// Salary period for payroll-staged expenses.
    pub salary_period: Option<String>,
    /// Created at.
    pub created_at: String,
    /// Updated at.
    pub updated_at: String,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(m: transactions::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            kind: RecordKind::from(&m.record_kind).as_str().to_string(),
            parish_id: m.parish_id,
            fund_id: m.fund_id,
            bank_account_id: m.bank_account_id,
            amount: m.amount,
            payment_method: PaymentMethod::from(&m.payment_method).as_str().to_string(),
            expense_kind: m
                .expense_kind
                .as_ref()
                .map(|k| ExpenseKind::from(k).as_str().to_string()),
            counterparty: m.counterparty_name,
            description: m.description,
            date: m.transaction_date.to_string(),
            fiscal_year: m.fiscal_year,
            fiscal_period: m.fiscal_period,
            images: m.images,
            notes: m.notes,
            status: RecordStatus::from(&m.status).as_str().to_string(),
            created_by: m.created_by,
            approved_by: m.approved_by,
            approved_at: m.approved_at.map(|t| t.to_rfc3339()),
            decision_notes: m.decision_notes,
            receipt_id: m.receipt_id,
            salary_period: m.salary_period,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/transactions` - List records with filters.
async fn list_transactions(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let kind = match query.kind.as_deref() {
        None => None,
        Some(s) => match RecordKind::parse(s) {
            Some(kind) => Some(kind),
            None => return bad_request("INVALID_TYPE", "type must be income or expense"),
        },
    };
    let status = match query.status.as_deref() {
        None => None,
        Some(s) => match RecordStatus::parse(s) {
            Some(status) => Some(status),
            None => {
                return bad_request(
                    "INVALID_STATUS",
                    "status must be pending, approved, or rejected",
                )
            }
        },
    };

    let filter = TransactionFilter {
        parish_id: query.parish_id,
        kind,
        status,
        fiscal_year: query.fiscal_year,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.list(&filter, query.page).await {
        Ok((models, total)) => {
            let items: Vec<TransactionResponse> =
                models.into_iter().map(Into::into).collect();
            let body = PageResponse::new(items, query.page.page, query.page.per_page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// POST `/transactions` - Create a pending record.
async fn create_transaction(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::CreateRecord) {
        return workflow_error(&e);
    }

    let Some(kind) = RecordKind::parse(&payload.kind) else {
        return bad_request("INVALID_TYPE", "type must be income or expense");
    };
    let Some(payment_method) = PaymentMethod::parse(&payload.payment_method) else {
        return bad_request("INVALID_PAYMENT_METHOD", "payment_method must be cash or transfer");
    };

    let input = CreateRecordInput {
        kind,
        parish_id: ParishId::from_uuid(payload.parish_id),
        fund_id: payload.fund_id.map(FundId::from_uuid),
        bank_account_id: payload.bank_account_id.map(BankAccountId::from_uuid),
        amount: payload.amount,
        payment_method,
        counterparty_name: payload.counterparty,
        contact_id: payload.contact_id.map(ContactId::from_uuid),
        description: payload.description,
        date: payload.date,
        images: payload.images,
        notes: payload.notes,
        created_by: caller.user_id(),
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.create(input).await {
        Ok(model) => {
            info!(code = %model.code, "transaction created");
            (
                StatusCode::CREATED,
                Json(TransactionResponse::from(model)),
            )
                .into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// GET `/transactions/{id}` - Fetch one record.
async fn get_transaction(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok(model) => (StatusCode::OK, Json(TransactionResponse::from(model))).into_response(),
        Err(e) => ledger_error(&e),
    }
}

/// PATCH `/transactions/{id}` - Edit a pending record.
async fn edit_transaction(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(payload): Json<EditTransactionRequest>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::EditRecord) {
        return workflow_error(&e);
    }

    let payment_method = match payload.payment_method.as_deref() {
        None => None,
        Some(s) => match PaymentMethod::parse(s) {
            Some(m) => Some(m),
            None => {
                return bad_request(
                    "INVALID_PAYMENT_METHOD",
                    "payment_method must be cash or transfer",
                )
            }
        },
    };

    let patch = RecordPatch {
        fund_id: payload.fund_id.map(FundId::from_uuid),
        bank_account_id: payload.bank_account_id.map(BankAccountId::from_uuid),
        amount: payload.amount,
        payment_method,
        counterparty_name: payload.counterparty,
        description: payload.description,
        date: payload.date,
        images: payload.images,
        notes: payload.notes,
    };

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.edit(caller.caller(), id, patch).await {
        Ok(model) => (StatusCode::OK, Json(TransactionResponse::from(model))).into_response(),
        Err(e) => ledger_error(&e),
    }
}

/// DELETE `/transactions/{id}` - Delete a pending record.
async fn delete_transaction(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::DeleteRecord) {
        return workflow_error(&e);
    }

    let repo = TransactionRepository::new((*state.db).clone());
    match repo.delete(caller.caller(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ledger_error(&e),
    }
}

/// POST `/transactions/{id}/decision` - Approve or reject a pending
/// record. Approval mints the receipt in the same database
/// transaction.
async fn decide_transaction(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::DecideRecord) {
        return workflow_error(&e);
    }

    let Some(decision) = Decision::parse(&payload.decision) else {
        return bad_request("INVALID_DECISION", "decision must be approved or rejected");
    };

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo
        .decide(id, decision, caller.user_id(), payload.notes)
        .await
    {
        Ok(outcome) => {
            info!(
                transaction = %outcome.transaction.code,
                receipt = outcome.receipt.as_ref().map(|r| r.receipt_no.as_str()),
                "transaction decided"
            );
            let receipt = outcome
                .receipt
                .map(crate::routes::receipts::ReceiptResponse::from);
            (
                StatusCode::OK,
                Json(json!({
                    "transaction": TransactionResponse::from(outcome.transaction),
                    "receipt": receipt,
                })),
            )
                .into_response()
        }
        Err(e) => workflow_error(&e),
    }
}
