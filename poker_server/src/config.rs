//! Server configuration management.
//!
//! Grounded on the teacher's `ServerConfig`/`from_env`/`validate()`/
//! `ConfigError` shape, re-columned from the JWT/password/wallet-era option
//! list to spec 6's "Configuration" option list, and extended with the two
//! knobs that select which adapter implementation runs (`database_url`,
//! `auth_base_url`): absent, each falls back to the in-memory reference
//! adapter rather than the production Postgres/HTTP-relay one.

use std::net::SocketAddr;

use poker_engine::session::SessionTimings;
use poker_engine::table::TableConfig;

/// Complete server configuration loaded from environment variables
/// (spec 6's "Configuration").
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub cors_origin: Vec<String>,
    /// Shared secret gating every admin/query endpoint (spec 6: "mandatory,
    /// refuse start if unset").
    pub admin_token: String,
    pub starting_stack: i64,
    pub small_blind: i64,
    pub big_blind: i64,
    pub num_seats: usize,
    pub base_action_ms: u64,
    pub default_time_bank_ms: u64,
    pub time_bank_cap_ms: u64,
    pub time_bank_growth_ms: u64,
    pub time_bank_growth_hands: u32,
    pub sit_out_kick_ms: u64,
    pub disconnect_grace_ms: u64,
    pub reconnect_swap_grace_ms: u64,
    pub min_buyin: i64,
    pub max_buyin: i64,
    pub rathole_window_ms: u64,
    pub runout_reveal_delay_ms: u64,
    pub runout_flop_delay_ms: u64,
    pub runout_turn_delay_ms: u64,
    pub runout_river_delay_ms: u64,
    pub challenge_ttl_s: i64,
    pub session_ttl_s: i64,
    /// `None` selects `InMemoryPersistenceAdapter`; `Some` selects
    /// `PostgresPersistenceAdapter`.
    pub database_url: Option<String>,
    /// `None` selects `InMemoryAuthAdapter`; `Some` selects
    /// `HttpRelayAuthAdapter` against the given base URL.
    pub auth_base_url: Option<String>,
    pub num_tables: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` if `ADMIN_TOKEN` is unset, and
    /// `ConfigError::Invalid` if any loaded value fails `validate()`.
    pub fn from_env(bind_override: Option<SocketAddr>) -> Result<Self, ConfigError> {
        let bind = bind_override
            .or_else(|| std::env::var("SERVER_BIND").ok().and_then(|s| s.parse().ok()))
            .unwrap_or_else(|| "127.0.0.1:6969".parse().expect("default bind address is valid"));

        let admin_token = std::env::var("ADMIN_TOKEN").map_err(|_| ConfigError::MissingRequired {
            var: "ADMIN_TOKEN".to_string(),
            hint: "Generate with: openssl rand -hex 32".to_string(),
        })?;
        if admin_token.len() < 16 {
            return Err(ConfigError::Invalid {
                var: "ADMIN_TOKEN".to_string(),
                reason: "Must be at least 16 characters".to_string(),
            });
        }

        let cors_origin = std::env::var("CORS_ORIGIN")
            .ok()
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|| vec!["*".to_string()]);

        let config = ServerConfig {
            bind,
            cors_origin,
            admin_token,
            starting_stack: parse_env_or("STARTING_STACK", 10_000),
            small_blind: parse_env_or("SMALL_BLIND", 50),
            big_blind: parse_env_or("BIG_BLIND", 100),
            num_seats: parse_env_or("NUM_SEATS", 6),
            base_action_ms: parse_env_or("BASE_ACTION_MS", 15_000),
            default_time_bank_ms: parse_env_or("DEFAULT_TIME_BANK_MS", 15_000),
            time_bank_cap_ms: parse_env_or("TIME_BANK_CAP_MS", 60_000),
            time_bank_growth_ms: parse_env_or("TIME_BANK_GROWTH_MS", 5_000),
            time_bank_growth_hands: parse_env_or("TIME_BANK_GROWTH_HANDS", 10),
            sit_out_kick_ms: parse_env_or("SIT_OUT_KICK_MS", 300_000),
            disconnect_grace_ms: parse_env_or("DISCONNECT_GRACE_MS", 60_000),
            reconnect_swap_grace_ms: parse_env_or("RECONNECT_SWAP_GRACE_MS", 10_000),
            min_buyin: parse_env_or("MIN_BUYIN", 2_000),
            max_buyin: parse_env_or("MAX_BUYIN", 10_000),
            rathole_window_ms: parse_env_or("RATHOLE_WINDOW_MS", 7_200_000),
            runout_reveal_delay_ms: parse_env_or("RUNOUT_REVEAL_DELAY_MS", 2_000),
            runout_flop_delay_ms: parse_env_or("RUNOUT_FLOP_DELAY_MS", 2_000),
            runout_turn_delay_ms: parse_env_or("RUNOUT_TURN_DELAY_MS", 3_000),
            runout_river_delay_ms: parse_env_or("RUNOUT_RIVER_DELAY_MS", 2_000),
            challenge_ttl_s: parse_env_or("CHALLENGE_TTL_S", 300),
            session_ttl_s: parse_env_or("SESSION_TTL_S", 86_400),
            database_url: std::env::var("DATABASE_URL").ok(),
            auth_base_url: std::env::var("AUTH_BASE_URL").ok(),
            num_tables: parse_env_or("MAX_TABLES", 1),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 {
            return Err(ConfigError::Invalid {
                var: "SMALL_BLIND".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        if self.big_blind <= self.small_blind {
            return Err(ConfigError::Invalid {
                var: "BIG_BLIND".to_string(),
                reason: format!("Must be greater than small blind ({})", self.small_blind),
            });
        }
        if self.max_buyin <= self.min_buyin {
            return Err(ConfigError::Invalid {
                var: "MAX_BUYIN".to_string(),
                reason: format!("Must be greater than min_buyin ({})", self.min_buyin),
            });
        }
        if self.num_seats == 0 || self.num_seats > 10 {
            return Err(ConfigError::Invalid {
                var: "NUM_SEATS".to_string(),
                reason: "Must be between 1 and 10".to_string(),
            });
        }
        if self.time_bank_cap_ms < self.default_time_bank_ms {
            return Err(ConfigError::Invalid {
                var: "TIME_BANK_CAP_MS".to_string(),
                reason: "Must be >= default_time_bank_ms".to_string(),
            });
        }
        Ok(())
    }

    /// Project onto the engine's per-table configuration (analogous to the
    /// teacher's per-table `TableConfig` literal built from the same env
    /// reads in `main.rs`).
    pub fn table_config(&self, name: String) -> TableConfig {
        TableConfig {
            name,
            num_seats: self.num_seats,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            min_buyin: self.min_buyin,
            max_buyin: self.max_buyin,
            base_action_ms: self.base_action_ms,
            default_time_bank_ms: self.default_time_bank_ms,
            time_bank_cap_ms: self.time_bank_cap_ms,
            time_bank_growth_ms: self.time_bank_growth_ms,
            time_bank_growth_hands: self.time_bank_growth_hands,
            sit_out_kick_ms: self.sit_out_kick_ms,
            disconnect_grace_ms: self.disconnect_grace_ms,
            reconnect_swap_grace_ms: self.reconnect_swap_grace_ms,
            rathole_window_ms: self.rathole_window_ms,
            hand_start_delay_ms: 2_000,
            runout_reveal_delay_ms: self.runout_reveal_delay_ms,
            runout_flop_delay_ms: self.runout_flop_delay_ms,
            runout_turn_delay_ms: self.runout_turn_delay_ms,
            runout_river_delay_ms: self.runout_river_delay_ms,
        }
    }

    /// Projects the two disconnect-cascade knobs spec 6 names
    /// (`disconnect_grace_ms`, `sit_out_kick_ms`) onto the coordinator's
    /// three-stage cascade, splitting the gap between them for the
    /// intermediate auto-sit-out trigger.
    pub fn session_timings(&self) -> SessionTimings {
        let kick_ms = self.disconnect_grace_ms.max(self.sit_out_kick_ms);
        let auto_sit_out_ms = self.disconnect_grace_ms + (kick_ms - self.disconnect_grace_ms) / 2;
        SessionTimings {
            disconnect_grace_ms: self.disconnect_grace_ms,
            auto_sit_out_ms,
            kick_ms,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}
