//! Receipt routes: combined issuance, lookups, and cancellation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use curia_core::ledger::RecordKind;
use curia_core::receipt::ReceiptStatus;
use curia_core::workflow::{permissions, Action};
use curia_db::entities::receipts;
use curia_db::repositories::{
    receipt::CombineReceiptInput, ReceiptRepository, WorkflowRepository,
};
use curia_shared::types::{PageRequest, PageResponse};

use crate::middleware::CallerIdentity;
use crate::routes::transactions::TransactionResponse;
use crate::routes::{receipt_error, workflow_error};
use crate::AppState;

/// Creates the receipt routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receipts", get(list_receipts))
        .route("/receipts/combined", post(combine_receipts))
        .route("/receipts/{id}", get(get_receipt))
        .route("/receipts/{id}/cancel", post(cancel_receipt))
}

/// Query parameters for listing receipts.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by parish.
    pub parish_id: Option<Uuid>,
    /// Pagination.
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Request body for a combined receipt.
#[derive(Debug, Deserialize)]
pub struct CombineReceiptRequest {
    /// The approved records to merge.
    pub reference_ids: Vec<Uuid>,
    /// Client-declared total; rejected when it disagrees with the
    /// actual sum.
    pub total: Option<Decimal>,
    /// Payer or payee printed on the receipt.
    pub payer_payee: Option<String>,
    /// Printed description.
    pub description: String,
    /// Receipt date (YYYY-MM-DD).
    pub date: NaiveDate,
}

/// Response for a receipt.
#[derive(Debug, Serialize)]
pub struct ReceiptResponse {
    /// Receipt id.
    pub id: Uuid,
    /// Year-scoped receipt number, e.g. `REC-2024-0012`.
    pub receipt_no: String,
    /// "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The owning parish.
    pub parish_id: Uuid,
    /// Receipt total.
    pub amount: Decimal,
    /// Payer or payee.
    pub payer_payee: Option<String>,
    /// Description.
    pub description: String,
    /// Receipt date.
    pub date: String,
    /// "active" or "cancelled".
    pub status: String,
    /// Issuer.
    pub issued_by: Uuid,
    /// Canceller, once cancelled.
    pub cancelled_by: Option<Uuid>,
    /// Cancellation timestamp.
    pub cancelled_at: Option<String>,
    /// Created at.
    pub created_at: String,
}

impl From<receipts::Model> for ReceiptResponse {
    fn from(m: receipts::Model) -> Self {
        Self {
            id: m.id,
            receipt_no: m.receipt_no,
            kind: RecordKind::from(&m.record_kind).as_str().to_string(),
            parish_id: m.parish_id,
            amount: m.amount,
            payer_payee: m.payer_payee,
            description: m.description,
            date: m.receipt_date.to_string(),
            status: ReceiptStatus::from(&m.status).as_str().to_string(),
            issued_by: m.issued_by,
            cancelled_by: m.cancelled_by,
            cancelled_at: m.cancelled_at.map(|t| t.to_rfc3339()),
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// GET `/receipts` - List receipts.
async fn list_receipts(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let repo = ReceiptRepository::new((*state.db).clone());
    match repo.list(query.parish_id, query.page).await {
        Ok((models, total)) => {
            let items: Vec<ReceiptResponse> = models.into_iter().map(Into::into).collect();
            let body = PageResponse::new(items, query.page.page, query.page.per_page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => receipt_error(&e),
    }
}

/// GET `/receipts/{id}` - Fetch a receipt with the records it covers.
async fn get_receipt(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ReceiptRepository::new((*state.db).clone());
    match repo.get(id).await {
        Ok((receipt, covered)) => {
            let references: Vec<TransactionResponse> =
                covered.into_iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "receipt": ReceiptResponse::from(receipt),
                    "references": references,
                })),
            )
                .into_response()
        }
        Err(e) => receipt_error(&e),
    }
}

/// POST `/receipts/combined` - Merge several approved records of one
/// kind and parish into a single receipt.
async fn combine_receipts(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(payload): Json<CombineReceiptRequest>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::CombineReceipts) {
        return workflow_error(&e);
    }

    let input = CombineReceiptInput {
        reference_ids: payload.reference_ids,
        declared_total: payload.total,
        payer_payee: payload.payer_payee,
        description: payload.description,
        receipt_date: payload.date,
        issued_by: caller.user_id(),
    };

    let repo = ReceiptRepository::new((*state.db).clone());
    match repo.combine(input).await {
        Ok(model) => {
            info!(receipt = %model.receipt_no, "combined receipt issued");
            (StatusCode::CREATED, Json(ReceiptResponse::from(model))).into_response()
        }
        Err(e) => receipt_error(&e),
    }
}

/// POST `/receipts/{id}/cancel` - Void a receipt and revert the
/// records it covered to pending. Salary expenses additionally pull
/// their payroll periods back from paid.
async fn cancel_receipt(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::CancelReceipt) {
        return workflow_error(&e);
    }

    let repo = WorkflowRepository::new((*state.db).clone());
    match repo.cancel_receipt(id, caller.user_id()).await {
        Ok(outcome) => {
            info!(
                receipt = %outcome.receipt_no,
                transactions = outcome.transactions_reverted,
                payrolls = outcome.payrolls_reverted,
                "receipt cancelled"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "receipt_no": outcome.receipt_no,
                    "transactions_reverted": outcome.transactions_reverted,
                    "payrolls_reverted": outcome.payrolls_reverted,
                })),
            )
                .into_response()
        }
        Err(e) => workflow_error(&e),
    }
}
