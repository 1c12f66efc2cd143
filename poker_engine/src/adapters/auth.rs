//! The `AuthAdapter` trait boundary (spec 4.6, 6).
//!
//! The teacher's `auth` module owns a whole password/JWT/TOTP account
//! model (`auth::manager`, `auth::models::{User, SessionTokens,
//! AccessTokenClaims}`). Spec §1/§6 describes a different identity model
//! entirely — a challenge/nonce handshake verified against an externally
//! signed envelope whose signature scheme this engine never inspects. We
//! keep the teacher's *shapes* (a `Challenge` record mirroring
//! `auth::models::Session`'s id/expiry/used-flag fields, a trait boundary
//! in place of a concrete stack) and drop argon2/JWT/TOTP entirely: this
//! engine is not the thing that verifies signatures, so it carries no
//! cryptographic account-auth crate of its own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::pot::Chips;
use crate::game::state_machine::Identity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub challenge_id: String,
    pub nonce: String,
    pub expires_at: i64,
    pub used: bool,
}

/// The identity record the coordinator receives on a successful
/// `verify`/`session` lookup (spec 4.6: "handle, avatar, lightning
/// address, current persisted chips").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub identity: Identity,
    pub handle: String,
    pub avatar_url: Option<String>,
    pub lightning_address: Option<String>,
    pub current_chips: Chips,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("challenge not found or already used")]
    InvalidChallenge,
    #[error("challenge has expired")]
    ChallengeExpired,
    #[error("signed envelope timestamp outside the allowed skew window")]
    TimestampSkew,
    #[error("signed envelope failed verification")]
    BadSignature,
    #[error("upstream auth service error: {0}")]
    Upstream(String),
}

/// A signed verification envelope as relayed from the transport. The
/// engine treats `signed_event` opaquely and forwards it untouched; only
/// the adapter implementation knows how to check it (spec 1: "the engine
/// never inspects signatures").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub challenge_id: String,
    pub signed_event: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub session_token: String,
    pub profile: IdentityProfile,
}

#[async_trait]
pub trait AuthAdapter: Send + Sync {
    /// `POST /auth/challenge`: issue a fresh one-use nonce (spec 6, default
    /// `challenge_ttl_s = 300`).
    async fn issue_challenge(&self) -> Result<Challenge, AuthError>;

    /// `POST /auth/verify`: consume the challenge and hand back a session
    /// token plus profile. Must mark the challenge used to prevent replay.
    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, AuthError>;

    /// `GET /auth/session`: resolve a bare session token to a profile, or
    /// `None` if missing/expired. This is the lookup the session
    /// coordinator calls on every `join-table`.
    async fn resolve_session(&self, session_token: &str) -> Result<Option<IdentityProfile>, AuthError>;
}

/// In-memory reference implementation: a local test double, not a
/// production auth boundary. Mirrors the teacher's in-memory
/// `SessionRepository` test doubles in spirit.
pub struct InMemoryAuthAdapter {
    challenges: std::sync::Mutex<std::collections::HashMap<String, Challenge>>,
    sessions: std::sync::Mutex<std::collections::HashMap<String, IdentityProfile>>,
    challenge_ttl_s: i64,
}

impl InMemoryAuthAdapter {
    pub fn new(challenge_ttl_s: i64) -> Self {
        Self {
            challenges: std::sync::Mutex::new(std::collections::HashMap::new()),
            sessions: std::sync::Mutex::new(std::collections::HashMap::new()),
            challenge_ttl_s,
        }
    }

    /// Test helper: register an identity as already-authenticated under
    /// `session_token`, bypassing the challenge/verify dance.
    pub fn seed_session(&self, session_token: impl Into<String>, profile: IdentityProfile) {
        self.sessions.lock().unwrap().insert(session_token.into(), profile);
    }
}

#[async_trait]
impl AuthAdapter for InMemoryAuthAdapter {
    async fn issue_challenge(&self) -> Result<Challenge, AuthError> {
        let challenge_id = uuid::Uuid::new_v4().to_string();
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let challenge = Challenge {
            challenge_id: challenge_id.clone(),
            nonce,
            expires_at: chrono::Utc::now().timestamp() + self.challenge_ttl_s,
            used: false,
        };
        self.challenges.lock().unwrap().insert(challenge_id, challenge.clone());
        Ok(challenge)
    }

    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, AuthError> {
        let mut challenges = self.challenges.lock().unwrap();
        let challenge = challenges
            .get_mut(&request.challenge_id)
            .ok_or(AuthError::InvalidChallenge)?;
        if challenge.used {
            return Err(AuthError::InvalidChallenge);
        }
        if challenge.expires_at < chrono::Utc::now().timestamp() {
            return Err(AuthError::ChallengeExpired);
        }
        challenge.used = true;

        let identity = request
            .signed_event
            .get("identity")
            .and_then(|v| v.as_str())
            .ok_or(AuthError::BadSignature)?
            .to_string();
        let handle = request
            .signed_event
            .get("handle")
            .and_then(|v| v.as_str())
            .unwrap_or(&identity)
            .to_string();

        let profile = IdentityProfile {
            identity: identity.clone(),
            handle,
            avatar_url: None,
            lightning_address: None,
            current_chips: 0,
        };
        let session_token = uuid::Uuid::new_v4().to_string();
        self.sessions.lock().unwrap().insert(session_token.clone(), profile.clone());
        Ok(VerifyResponse { session_token, profile })
    }

    async fn resolve_session(&self, session_token: &str) -> Result<Option<IdentityProfile>, AuthError> {
        Ok(self.sessions.lock().unwrap().get(session_token).cloned())
    }
}

/// Production implementation: relays challenge/verify/session calls to an
/// external auth service over HTTP, exactly per spec 6's three endpoints.
/// The engine still never inspects `signed_event` — it is passed straight
/// through as an opaque JSON blob.
pub struct HttpRelayAuthAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRelayAuthAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AuthAdapter for HttpRelayAuthAdapter {
    async fn issue_challenge(&self) -> Result<Challenge, AuthError> {
        self.client
            .post(format!("{}/auth/challenge", self.base_url))
            .send()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?
            .json::<Challenge>()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))
    }

    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/verify", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AuthError::BadSignature);
        }
        response
            .json::<VerifyResponse>()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))
    }

    async fn resolve_session(&self, session_token: &str) -> Result<Option<IdentityProfile>, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/session", self.base_url))
            .header("x-session-token", session_token)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        Ok(Some(
            response
                .json::<IdentityProfile>()
                .await
                .map_err(|e| AuthError::Upstream(e.to_string()))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn challenge_is_single_use() {
        let adapter = InMemoryAuthAdapter::new(300);
        let challenge = adapter.issue_challenge().await.unwrap();
        let request = VerifyRequest {
            challenge_id: challenge.challenge_id.clone(),
            signed_event: serde_json::json!({"identity": "alice", "handle": "Alice"}),
        };
        let first = adapter.verify(request.clone()).await;
        assert!(first.is_ok());

        let replay = adapter.verify(request).await;
        assert!(matches!(replay, Err(AuthError::InvalidChallenge)));
    }

    #[tokio::test]
    async fn session_resolves_to_the_verified_profile() {
        let adapter = InMemoryAuthAdapter::new(300);
        let challenge = adapter.issue_challenge().await.unwrap();
        let response = adapter
            .verify(VerifyRequest {
                challenge_id: challenge.challenge_id,
                signed_event: serde_json::json!({"identity": "bob", "handle": "Bob"}),
            })
            .await
            .unwrap();

        let resolved = adapter.resolve_session(&response.session_token).await.unwrap();
        assert_eq!(resolved.unwrap().identity, "bob");
    }
}
