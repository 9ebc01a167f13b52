//! API route definitions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{middleware, Json, Router};
use serde_json::json;

use curia_core::ledger::LedgerError;
use curia_core::payroll::PayrollError;
use curia_core::receipt::ReceiptError;
use curia_core::workflow::WorkflowError;

use crate::middleware::identity_middleware;
use crate::AppState;

pub mod adjustments;
pub mod balances;
pub mod health;
pub mod payroll;
pub mod receipts;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    let protected = Router::new()
        .merge(transactions::routes())
        .merge(adjustments::routes())
        .merge(balances::routes())
        .merge(receipts::routes())
        .merge(payroll::routes())
        .layer(middleware::from_fn(identity_middleware));

    Router::new().merge(health::routes()).merge(protected)
}

fn error_body(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}

pub(crate) fn ledger_error(e: &LedgerError) -> Response {
    error_body(e.status_code(), e.error_code(), &e.to_string())
}

pub(crate) fn workflow_error(e: &WorkflowError) -> Response {
    error_body(e.status_code(), e.error_code(), &e.to_string())
}

pub(crate) fn receipt_error(e: &ReceiptError) -> Response {
    error_body(e.status_code(), e.error_code(), &e.to_string())
}

pub(crate) fn payroll_error(e: &PayrollError) -> Response {
    error_body(e.status_code(), e.error_code(), &e.to_string())
}

pub(crate) fn bad_request(code: &str, message: &str) -> Response {
    error_body(400, code, message)
}
