//! Trait boundaries to the outside world: authentication and persistence.
//!
//! Grounded on the teacher's `db::repository` trait-per-concern pattern
//! (`UserRepository`, `SessionRepository`, ... as `#[async_trait]` traits
//! with both a `sqlx` implementation and test doubles) generalized to the
//! challenge/nonce identity model spec 4.6/6 calls for, which the teacher's
//! password/JWT/TOTP `auth` module does not implement directly.

pub mod auth;
pub mod persistence;

pub use auth::{AuthAdapter, AuthError, Challenge, IdentityProfile};
pub use persistence::{PersistenceAdapter, PersistenceError};
