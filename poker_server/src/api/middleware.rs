//! Admin-token gating middleware for protected endpoints.
//!
//! Grounded on the teacher's `auth_middleware` (extract a header, validate
//! it against shared state, inject the outcome or reject with 401) —
//! generalized from per-user JWT bearer tokens to the single shared-secret
//! header spec 6's admin/query surface calls for ("gated by a shared secret
//! in a header; unauthorised requests receive a 401-equivalent").

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use super::AppState;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Rejects any request whose `x-admin-token` header does not match the
/// server's configured `admin_token`.
///
/// # Behavior
///
/// - **Success**: Header matches → calls the next handler.
/// - **Missing or mismatched header**: Returns `401 Unauthorized`.
#[allow(dead_code)]
pub async fn admin_token_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let supplied = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    match supplied {
        Some(token) if token == state.admin_token => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use poker_engine::adapters::persistence::InMemoryPersistenceAdapter;
    use poker_engine::adapters::auth::InMemoryAuthAdapter;
    use poker_engine::session::{SessionCoordinator, SessionTimings};
    use poker_engine::table::TableManager;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let persistence = Arc::new(InMemoryPersistenceAdapter::new());
        let auth = Arc::new(InMemoryAuthAdapter::new(300));
        let tables = Arc::new(TableManager::new(persistence.clone()));
        let coordinator = SessionCoordinator::new(auth.clone(), persistence.clone(), tables.clone(), SessionTimings::default());
        AppState {
            auth,
            persistence,
            tables,
            coordinator,
            admin_token: "secret-token".to_string(),
        }
    }

    async fn handler() -> &'static str {
        "ok"
    }

    #[tokio::test]
    async fn rejects_missing_token() {
        let state = test_state();
        let app = Router::new()
            .route("/admin", get(handler))
            .layer(middleware::from_fn_with_state(state.clone(), admin_token_middleware))
            .with_state(state);

        let response = app
            .oneshot(HttpRequest::builder().uri("/admin").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn accepts_matching_token() {
        let state = test_state();
        let app = Router::new()
            .route("/admin", get(handler))
            .layer(middleware::from_fn_with_state(state.clone(), admin_token_middleware))
            .with_state(state);

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin")
                    .header(ADMIN_TOKEN_HEADER, "secret-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
