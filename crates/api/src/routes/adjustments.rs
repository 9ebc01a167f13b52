//! Manual balance adjustment routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use curia_core::ledger::{AdjustmentKind, AdjustmentTarget};
use curia_core::workflow::{permissions, Action};
use curia_db::entities::adjustments;
use curia_db::repositories::{adjustment::CreateAdjustmentInput, AdjustmentRepository};
use curia_shared::types::{BankAccountId, FundId, PageRequest, PageResponse, ParishId};

use crate::middleware::CallerIdentity;
use crate::routes::{bad_request, ledger_error, workflow_error};
use crate::AppState;

/// Creates the adjustment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/adjustments", get(list_adjustments))
        .route("/adjustments", post(create_adjustment))
}

/// Query parameters for listing adjustments.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by parish.
    pub parish_id: Option<Uuid>,
    /// Filter by direction ("increase" or "decrease").
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Pagination.
    #[serde(flatten)]
    pub page: PageRequest,
}

/// Request body for creating an adjustment.
#[derive(Debug, Deserialize)]
pub struct CreateAdjustmentRequest {
    /// The owning parish.
    pub parish_id: Uuid,
    /// "fund" or "bank_account".
    pub dimension: String,
    /// The fund or bank account being corrected.
    pub id: Uuid,
    /// "increase" or "decrease".
    #[serde(rename = "type")]
    pub kind: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Why the balance is being corrected.
    pub description: String,
    /// Business date (YYYY-MM-DD).
    pub date: NaiveDate,
}

/// Response for an adjustment.
#[derive(Debug, Serialize)]
pub struct AdjustmentResponse {
    /// Adjustment id.
    pub id: Uuid,
    /// Year-scoped code, e.g. `ADJ-2024-0003`.
    pub code: String,
    /// The owning parish.
    pub parish_id: Uuid,
    /// Fund target, when the adjustment corrects a fund.
    pub fund_id: Option<Uuid>,
    /// Bank account target, when the adjustment corrects an account.
    pub bank_account_id: Option<Uuid>,
    /// "increase" or "decrease".
    #[serde(rename = "type")]
    pub kind: String,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// Business date.
    pub date: String,
    /// Creator.
    pub created_by: Uuid,
    /// Created at.
    pub created_at: String,
}

impl From<adjustments::Model> for AdjustmentResponse {
    fn from(m: adjustments::Model) -> Self {
        Self {
            id: m.id,
            code: m.code,
            parish_id: m.parish_id,
            fund_id: m.fund_id,
            bank_account_id: m.bank_account_id,
            kind: AdjustmentKind::from(&m.adjustment_kind).as_str().to_string(),
            amount: m.amount,
            description: m.description,
            date: m.adjustment_date.to_string(),
            created_by: m.created_by,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

/// GET `/adjustments` - List adjustments.
async fn list_adjustments(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let kind = match query.kind.as_deref() {
        None => None,
        Some(s) => match AdjustmentKind::parse(s) {
            Some(kind) => Some(kind),
            None => return bad_request("INVALID_TYPE", "type must be increase or decrease"),
        },
    };

    let repo = AdjustmentRepository::new((*state.db).clone());
    match repo.list(query.parish_id, kind, query.page).await {
        Ok((models, total)) => {
            let items: Vec<AdjustmentResponse> = models.into_iter().map(Into::into).collect();
            let body = PageResponse::new(items, query.page.page, query.page.per_page, total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}

/// POST `/adjustments` - Create an adjustment. Takes effect on
/// balances immediately; there is no approval step.
async fn create_adjustment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(payload): Json<CreateAdjustmentRequest>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::CreateAdjustment) {
        return workflow_error(&e);
    }

    let target = match payload.dimension.as_str() {
        "fund" => AdjustmentTarget::Fund(FundId::from_uuid(payload.id)),
        "bank_account" => AdjustmentTarget::BankAccount(BankAccountId::from_uuid(payload.id)),
        _ => return bad_request("INVALID_DIMENSION", "dimension must be fund or bank_account"),
    };
    let Some(kind) = AdjustmentKind::parse(&payload.kind) else {
        return bad_request("INVALID_TYPE", "type must be increase or decrease");
    };

    let input = CreateAdjustmentInput {
        parish_id: ParishId::from_uuid(payload.parish_id),
        target,
        kind,
        amount: payload.amount,
        description: payload.description,
        date: payload.date,
        created_by: caller.user_id(),
    };

    let repo = AdjustmentRepository::new((*state.db).clone());
    match repo.create(input).await {
        Ok(model) => {
            info!(code = %model.code, "adjustment created");
            (StatusCode::CREATED, Json(AdjustmentResponse::from(model))).into_response()
        }
        Err(e) => ledger_error(&e),
    }
}
