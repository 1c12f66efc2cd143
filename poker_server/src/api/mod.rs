//! HTTP/WebSocket API for the poker server.
//!
//! This module provides the complete REST and WebSocket API for the real-time
//! poker platform. It handles challenge/verify authentication, the live game
//! WebSocket surface, and operator-facing admin/query endpoints.
//!
//! # Architecture
//!
//! The API is built with:
//! - **Axum**: Async web framework for HTTP/WebSocket
//! - **Tower**: Middleware for CORS, request IDs, admin-token gating
//! - **Session Coordinator**: Identity/transport/seat bookkeeping shared by
//!   every table, handed straight to handlers via `AppState`
//! - **Actor Model**: Table state managed by dedicated actor tasks, reached
//!   only through the coordinator
//!
//! # Modules
//!
//! - [`auth`]: Challenge/verify/session identity handshake (no passwords)
//! - [`admin`]: Operator-facing table/hand/player reads and ban/unban writes
//! - [`websocket`]: Real-time bidirectional game communication
//! - [`middleware`]: Admin-token gating for the query/admin surface
//!
//! # Endpoints Overview
//!
//! ## Authentication (No Auth Required)
//! - `POST /api/v1/auth/challenge` - Issue a nonce
//! - `POST /api/v1/auth/verify` - Exchange a signed envelope for a session
//! - `GET  /api/v1/auth/session` - Resolve a session token to a profile
//!
//! ## Admin/Query (Gated by `x-admin-token`)
//! - `GET  /api/v1/admin/tables` - List active tables
//! - `GET  /api/v1/admin/tables/count` - Aggregate table count
//! - `GET  /api/v1/admin/hands/:hand_id` - Archived hand by id
//! - `GET  /api/v1/admin/players/:identity/hands` - Archived hands by identity
//! - `GET  /api/v1/admin/players/:identity` - Player record
//! - `POST /api/v1/admin/players/:identity/ban` - Ban an identity
//! - `POST /api/v1/admin/players/:identity/unban` - Lift a ban
//! - `POST /api/v1/admin/ip-bans/:ip` - Ban an IP
//! - `POST /api/v1/admin/ip-bans/:ip/unban` - Lift an IP ban
//!
//! ## WebSocket
//! - `GET /ws/:table_id?session_token=<token>` - Establish the game connection
//!
//! ## Health Check
//! - `GET /health` - Server health status

pub mod admin;
pub mod auth;
pub mod middleware;
pub mod rate_limiter;
pub mod request_id;
pub mod websocket;

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};

use poker_engine::adapters::auth::AuthAdapter;
use poker_engine::adapters::persistence::PersistenceAdapter;
use poker_engine::session::SessionCoordinator;
use poker_engine::table::TableManager;

/// Application state shared across all HTTP handlers and WebSocket connections.
///
/// Cloned for each request (cheap: every field is an `Arc` or already
/// `Clone`-able) and gives every handler access to the core services.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthAdapter>,
    pub persistence: Arc<dyn PersistenceAdapter>,
    pub tables: Arc<TableManager>,
    pub coordinator: SessionCoordinator,
    pub admin_token: String,
}

fn cors_layer(cors_origin: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any);

    if cors_origin.iter().any(|o| o == "*") {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = cors_origin
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the complete API router with all endpoints and middleware.
///
/// `cors_origin` is threaded in separately from `state` rather than stored
/// on it, since `AppState` is also constructed directly in tests that have
/// no use for a CORS policy.
pub fn create_router(state: AppState, cors_origin: &[String]) -> Router {
    let v1_routes = create_v1_router(state.clone());

    let root_routes = Router::new()
        .route("/health", get(health_check))
        .route("/ws/{table_id}", get(websocket::websocket_handler));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

/// Build the versioned API router.
///
/// Allows future API evolution (v2, v3, etc.) without breaking existing
/// clients pinned to `/api/v1`.
fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/auth/challenge", post(auth::challenge))
        .route("/auth/verify", post(auth::verify))
        .route("/auth/session", get(auth::session));

    let admin_routes = Router::new()
        .route("/admin/tables", get(admin::list_tables))
        .route("/admin/tables/count", get(admin::table_count))
        .route("/admin/hands/{hand_id}", get(admin::hand_by_id))
        .route("/admin/players/{identity}/hands", get(admin::hands_by_identity))
        .route("/admin/players/{identity}", get(admin::player_record))
        .route("/admin/players/{identity}/ban", post(admin::ban_identity))
        .route("/admin/players/{identity}/unban", post(admin::unban_identity))
        .route("/admin/ip-bans/{ip}", post(admin::ban_ip))
        .route("/admin/ip-bans/{ip}/unban", post(admin::unban_ip))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::admin_token_middleware,
        ));

    Router::new().merge(public_routes).merge(admin_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Reports whether the table manager is responsive. Persistence and auth
/// adapters have no cheap liveness probe of their own (an in-memory adapter
/// has nothing to ping); a failing Postgres/HTTP-relay adapter instead
/// surfaces through request-path errors, per spec 7's "persistence failures
/// are logged and swallowed, never surfaced as a fatal health signal".
///
/// # Response
///
/// `200 OK` with `{"status": "healthy", "tables": {...}}`.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let tables = state.tables.list_tables().await;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "tables": {
            "active_count": tables.len(),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
