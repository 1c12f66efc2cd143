//! Admin/query HTTP endpoints (spec 6): hand by id, hand list by identity,
//! player record, table list, aggregate counts, ban/unban.
//!
//! Grounded on the teacher's `api/tables.rs` handler shape (`State<AppState>`
//! extraction, `Result<Json<T>, (StatusCode, Json<ErrorResponse>)>` returns,
//! curl-documented doc comments) generalized from player-facing table reads
//! to operator-facing reads/writes over `PersistenceAdapter` and
//! `TableManager`. Every route here is mounted behind
//! `middleware::admin_token_middleware`; handlers themselves do no further
//! authorization.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use poker_engine::adapters::persistence::PlayerRecord;
use poker_engine::table::TableMetadata;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn internal_error(e: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() }))
}

/// `GET /admin/tables`: every currently spawned table's metadata.
///
/// # Response
///
/// ```json
/// [{"id": "t1", "name": "Table 1", "num_seats": 6, "small_blind": 50, "big_blind": 100}]
/// ```
pub async fn list_tables(State(state): State<AppState>) -> Json<Vec<TableMetadata>> {
    Json(state.tables.list_tables().await)
}

#[derive(Debug, Serialize)]
pub struct TableCounts {
    pub active_tables: usize,
}

/// `GET /admin/tables/count`: aggregate table count.
pub async fn table_count(State(state): State<AppState>) -> Json<TableCounts> {
    Json(TableCounts { active_tables: state.tables.list_tables().await.len() })
}

/// `GET /admin/hands/{hand_id}`: a single archived hand by id.
///
/// # Errors
///
/// - `404 Not Found`: no hand with that id has been archived.
pub async fn hand_by_id(
    State(state): State<AppState>,
    Path(hand_id): Path<u64>,
) -> Result<Json<poker_engine::table::history::HandRecord>, (StatusCode, Json<ErrorResponse>)> {
    match state.persistence.hand_by_id(hand_id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err((StatusCode::NOT_FOUND, Json(ErrorResponse { error: "hand not found".to_string() }))),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct HandsByIdentityQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// `GET /admin/players/{identity}/hands?limit=50`: the identity's most
/// recent archived hands.
pub async fn hands_by_identity(
    State(state): State<AppState>,
    Path(identity): Path<String>,
    Query(query): Query<HandsByIdentityQuery>,
) -> Result<Json<Vec<poker_engine::table::history::HandRecord>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .persistence
        .hands_by_identity(&identity, query.limit)
        .await
        .map(Json)
        .map_err(|e| internal_error(e))
}

/// `GET /admin/players/{identity}`: the persisted player record.
///
/// # Errors
///
/// - `404 Not Found`: the identity has never been seen.
pub async fn player_record(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<Json<PlayerRecord>, (StatusCode, Json<ErrorResponse>)> {
    match state.persistence.find_player(&identity).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err((StatusCode::NOT_FOUND, Json(ErrorResponse { error: "player not found".to_string() }))),
        Err(e) => Err(internal_error(e)),
    }
}

#[derive(Debug, Deserialize)]
pub struct BanIdentityRequest {
    pub reason: String,
}

/// `POST /admin/players/{identity}/ban`: ban an identity.
pub async fn ban_identity(
    State(state): State<AppState>,
    Path(identity): Path<String>,
    Json(request): Json<BanIdentityRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .persistence
        .ban_identity(&identity, &request.reason)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| internal_error(e))
}

/// `POST /admin/players/{identity}/unban`: lift a ban on an identity.
pub async fn unban_identity(
    State(state): State<AppState>,
    Path(identity): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .persistence
        .unban_identity(&identity)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| internal_error(e))
}

#[derive(Debug, Deserialize)]
pub struct BanIpRequest {
    pub reason: String,
    pub banned_by: String,
}

/// `POST /admin/ip-bans/{ip}`: ban an IP address.
pub async fn ban_ip(
    State(state): State<AppState>,
    Path(ip): Path<String>,
    Json(request): Json<BanIpRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .persistence
        .ban_ip(&ip, &request.reason, &request.banned_by)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| internal_error(e))
}

/// `POST /admin/ip-bans/{ip}/unban`: lift a ban on an IP address.
pub async fn unban_ip(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    state
        .persistence
        .unban_ip(&ip)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| internal_error(e))
}
