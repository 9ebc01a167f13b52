//! Payroll batch approval route.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use curia_core::ledger::PaymentMethod;
use curia_core::workflow::{permissions, Action};
use curia_db::repositories::PayrollRepository;

use crate::middleware::CallerIdentity;
use crate::routes::{bad_request, payroll_error, workflow_error};
use crate::AppState;

/// Creates the payroll routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payroll/approve", post(approve_batch))
}

/// Request body for approving a payroll period.
#[derive(Debug, Deserialize)]
pub struct ApproveBatchRequest {
    /// The parish whose payroll is being approved.
    pub parish_id: Uuid,
    /// Salary period in `MM/YYYY` form, e.g. "03/2024".
    pub period: String,
    /// "cash" or "transfer".
    pub payment_method: String,
    /// Disbursing account; required for transfers.
    pub bank_account_id: Option<Uuid>,
}

/// Response for an approved payroll batch.
#[derive(Debug, Serialize)]
pub struct ApproveBatchResponse {
    /// Pending salary expenses created.
    pub expenses_created: u64,
    /// Payroll rows flipped from draft to approved.
    pub payrolls_approved: u64,
    /// Sum of the staged net salaries.
    pub total_amount: Decimal,
}

/// POST `/payroll/approve` - Stage a period's draft payroll rows into
/// pending salary expenses. The expenses then travel the ordinary
/// approval workflow; payroll rows reach paid only when their salary
/// expense is approved.
async fn approve_batch(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(payload): Json<ApproveBatchRequest>,
) -> impl IntoResponse {
    if let Err(e) = permissions::ensure(caller.role(), Action::ApprovePayroll) {
        return workflow_error(&e);
    }

    let Some(payment_method) = PaymentMethod::parse(&payload.payment_method) else {
        return bad_request(
            "INVALID_PAYMENT_METHOD",
            "payment_method must be cash or transfer",
        );
    };

    let repo = PayrollRepository::new((*state.db).clone());
    match repo
        .approve_batch(
            payload.parish_id,
            &payload.period,
            payment_method,
            payload.bank_account_id,
            caller.user_id(),
        )
        .await
    {
        Ok(outcome) => {
            info!(
                period = %payload.period,
                expenses = outcome.expenses_created,
                total = %outcome.total_amount,
                "payroll batch staged"
            );
            (
                StatusCode::OK,
                Json(ApproveBatchResponse {
                    expenses_created: outcome.expenses_created,
                    payrolls_approved: outcome.payrolls_approved,
                    total_amount: outcome.total_amount,
                }),
            )
                .into_response()
        }
        Err(e) => payroll_error(&e),
    }
}
