//! Authentication API handlers (spec 6).
//!
//! Grounded on the teacher's `api/auth.rs` (`register`/`login`/`logout`/
//! `refresh_token`: a `Json<Payload>` in, `Result<Json<Response>, (StatusCode,
//! Json<ErrorResponse>)>` out, doc comments with curl examples) — the
//! username/password account model is replaced wholesale by the
//! challenge/verify/session handshake spec 1/4.6/6 describe, relayed
//! straight through to the configured `AuthAdapter`.
//!
//! # Examples
//!
//! Request a challenge:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/auth/challenge
//! ```
//!
//! Verify a signed envelope:
//! ```bash
//! curl -X POST http://localhost:6969/api/v1/auth/verify \
//!   -H "Content-Type: application/json" \
//!   -d '{"challenge_id": "...", "signed_event": {...}}'
//! ```

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use poker_engine::adapters::auth::{AuthError, Challenge, IdentityProfile, VerifyRequest};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponsePayload {
    pub session_token: String,
    pub identity: String,
    pub profile: IdentityProfile,
}

fn status_for(err: &AuthError) -> StatusCode {
    match err {
        AuthError::InvalidChallenge | AuthError::ChallengeExpired => StatusCode::BAD_REQUEST,
        AuthError::TimestampSkew | AuthError::BadSignature => StatusCode::UNAUTHORIZED,
        AuthError::Upstream(_) => StatusCode::BAD_GATEWAY,
    }
}

/// `POST /auth/challenge`: issue a fresh one-use nonce.
///
/// # Response
///
/// `200 OK` with `{challenge_id, nonce, expires_at, used}`.
pub async fn challenge(
    State(state): State<AppState>,
) -> Result<Json<Challenge>, (StatusCode, Json<ErrorResponse>)> {
    state
        .auth
        .issue_challenge()
        .await
        .map(Json)
        .map_err(|e| (status_for(&e), Json(ErrorResponse { error: e.to_string() })))
}

/// `POST /auth/verify`: consume a challenge and exchange a signed envelope
/// for a session token plus identity profile.
///
/// # Request Body
///
/// ```json
/// {"challenge_id": "...", "signed_event": {"identity": "...", "handle": "..."}}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: challenge unknown, already used, or expired.
/// - `401 Unauthorized`: signature verification failed or timestamp skew.
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponsePayload>, (StatusCode, Json<ErrorResponse>)> {
    match state.auth.verify(request).await {
        Ok(response) => Ok(Json(VerifyResponsePayload {
            session_token: response.session_token,
            identity: response.profile.identity.clone(),
            profile: response.profile,
        })),
        Err(e) => Err((status_for(&e), Json(ErrorResponse { error: e.to_string() }))),
    }
}

/// `GET /auth/session` with `x-session-token` header: resolve a session
/// token back to its profile, or `401` if missing or invalid.
pub async fn session(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<IdentityProfile>, (StatusCode, Json<ErrorResponse>)> {
    let token = headers
        .get("x-session-token")
        .and_then(|v| v.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse { error: "missing x-session-token header".to_string() }),
        ))?;

    match state.auth.resolve_session(token).await {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse { error: "session not found or expired".to_string() }),
        )),
        Err(e) => Err((status_for(&e), Json(ErrorResponse { error: e.to_string() }))),
    }
}
