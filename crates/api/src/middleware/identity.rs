//! Caller identity middleware.
//!
//! Session verification lives in the gateway in front of this
//! service; verified requests arrive with `x-user-id` and
//! `x-user-role` headers. This middleware turns them into a typed
//! `Caller` in the request extensions, rejecting requests where the
//! pair is missing or malformed.

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::str::FromStr;

use curia_shared::types::UserId;
use curia_shared::{Caller, Role};

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "UNAUTHORIZED",
            "message": message
        })),
    )
        .into_response()
}

/// Parses the identity headers into a `Caller` request extension.
pub async fn identity_middleware(mut request: Request, next: Next) -> Response {
    fn header(request: &Request, name: &str) -> Option<String> {
        request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    let Some(user_id) = header(&request, USER_ID_HEADER) else {
        return unauthorized("x-user-id header is required");
    };
    let Some(role) = header(&request, USER_ROLE_HEADER) else {
        return unauthorized("x-user-role header is required");
    };

    let Ok(user_id) = UserId::from_str(&user_id) else {
        return unauthorized("x-user-id must be a UUID");
    };
    let Some(role) = Role::parse(&role) else {
        return unauthorized("x-user-role is not a known role");
    };

    request.extensions_mut().insert(Caller::new(user_id, role));
    next.run(request).await
}

/// Extractor for the verified caller identity.
///
/// Use this in handlers behind the identity middleware:
///
/// ```ignore
/// async fn handler(caller: CallerIdentity) -> impl IntoResponse {
///     let role = caller.role();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Caller);

impl CallerIdentity {
    /// Returns the caller's user id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.0.user_id
    }

    /// Returns the caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.0.role
    }

    /// Returns the inner caller.
    #[must_use]
    pub const fn caller(&self) -> &Caller {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .map(CallerIdentity)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "UNAUTHORIZED",
                        "message": "Caller identity is required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    async fn whoami(caller: CallerIdentity) -> String {
        format!("{}:{}", caller.user_id(), caller.role())
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn(identity_middleware))
    }

    #[tokio::test]
    async fn test_missing_headers_rejected() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_headers_build_caller() {
        let id = UserId::new();
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/whoami")
                    .header("x-user-id", id.to_string())
                    .header("x-user-role", "accountant")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/whoami")
                    .header("x-user-id", UserId::new().to_string())
                    .header("x-user-role", "bishop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
