//! Balance aggregation routes.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use curia_core::ledger::BalanceDimension;
use curia_db::repositories::BalanceRepository;

use crate::middleware::CallerIdentity;
use crate::routes::ledger_error;
use crate::AppState;

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/balances", get(get_balances))
}

/// Query parameters for the balance endpoint.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// "fund" or "bank_account".
    pub dimension: String,
    /// Restrict to one fund or bank account.
    pub id: Option<Uuid>,
}

/// GET `/balances` - Recompute balances along one dimension.
///
/// Balances are never stored; every call folds approved records and
/// adjustments. With `id` set the response is a single object,
/// otherwise an array with one row per active dimension, zero rows
/// included.
async fn get_balances(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(query): Query<BalanceQuery>,
) -> impl IntoResponse {
    let dimension = match BalanceDimension::parse(&query.dimension) {
        Ok(dimension) => dimension,
        Err(e) => return ledger_error(&e),
    };

    let repo = BalanceRepository::new((*state.db).clone());
    match repo.balances(dimension, query.id).await {
        Ok(rows) => {
            if query.id.is_some() {
                // An unknown id was already rejected as not-found.
                match rows.into_iter().next() {
                    Some(row) => (StatusCode::OK, Json(row)).into_response(),
                    None => StatusCode::NOT_FOUND.into_response(),
                }
            } else {
                (StatusCode::OK, Json(rows)).into_response()
            }
        }
        Err(e) => ledger_error(&e),
    }
}
