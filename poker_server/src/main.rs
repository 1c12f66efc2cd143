//! Multi-table poker server using the async actor model.
//!
//! Spawns one `TableActor` per configured table under a shared
//! `TableManager`, wires a `SessionCoordinator` on top, and serves the
//! challenge/verify auth, WebSocket game, and admin/query HTTP surfaces
//! over a single Axum router.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use axum::extract::Extension;
use ctrlc::set_handler;
use pico_args::Arguments;
use tracing::info;

use poker_engine::adapters::auth::{AuthAdapter, HttpRelayAuthAdapter, InMemoryAuthAdapter};
use poker_engine::adapters::persistence::{InMemoryPersistenceAdapter, PersistenceAdapter, PostgresPersistenceAdapter};
use poker_engine::session::SessionCoordinator;
use poker_engine::table::TableManager;

use poker_server::config::ServerConfig;
use poker_server::{api, logging, metrics};

const HELP: &str = "\
Run a multi-table poker server

USAGE:
  poker_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:6969]
  --tables     N           Number of tables to create  [default: env MAX_TABLES or 1]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  ADMIN_TOKEN              Shared secret gating the admin/query surface (required)
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             Postgres connection string; absent uses the in-memory persistence adapter
  AUTH_BASE_URL            Upstream auth relay base URL; absent uses the in-memory auth adapter
  (See .env file for the complete configuration option list)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.value_from_str("--bind").ok();
    let num_tables_override: Option<usize> = pargs.value_from_str("--tables").ok();

    logging::init();

    let mut server_config = ServerConfig::from_env(bind_override)?;
    if let Some(n) = num_tables_override {
        server_config.num_tables = n;
    }

    info!("Starting poker server at {}", server_config.bind);

    if let Err(e) = metrics::init_metrics(metrics_addr(server_config.bind)) {
        tracing::warn!("Prometheus exporter not started: {e}");
    }

    set_handler(|| std::process::exit(0))?;

    let auth: Arc<dyn AuthAdapter> = match &server_config.auth_base_url {
        Some(base_url) => {
            info!("Relaying authentication to {base_url}");
            Arc::new(HttpRelayAuthAdapter::new(base_url.clone()))
        }
        None => {
            info!("Using in-memory authentication adapter (no AUTH_BASE_URL configured)");
            Arc::new(InMemoryAuthAdapter::new(server_config.challenge_ttl_s))
        }
    };

    let persistence: Arc<dyn PersistenceAdapter> = match &server_config.database_url {
        Some(database_url) => {
            info!("Connecting to database");
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(20)
                .connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;
            Arc::new(PostgresPersistenceAdapter::new(pool))
        }
        None => {
            info!("Using in-memory persistence adapter (no DATABASE_URL configured)");
            Arc::new(InMemoryPersistenceAdapter::new())
        }
    };

    let tables = Arc::new(TableManager::new(persistence.clone()));

    info!("Creating {} table(s)...", server_config.num_tables);
    for i in 0..server_config.num_tables {
        let table_id = format!("table-{}", i + 1);
        let table_config = server_config.table_config(format!("Table {}", i + 1));
        tables.spawn_table(table_id.clone(), table_config).await;
        info!("created {table_id}");
    }

    let coordinator = SessionCoordinator::new(auth.clone(), persistence.clone(), tables.clone(), server_config.session_timings());

    let state = api::AppState {
        auth,
        persistence,
        tables,
        coordinator,
        admin_token: server_config.admin_token.clone(),
    };

    let app = api::create_router(state, &server_config.cors_origin)
        .layer(Extension(server_config.starting_stack));

    let listener = tokio::net::TcpListener::bind(server_config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {}: {e}", server_config.bind))?;

    info!("Server is running at http://{}. Press Ctrl+C to stop.", server_config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    info!("Shutting down server...");
    Ok(())
}

fn metrics_addr(bind: SocketAddr) -> SocketAddr {
    SocketAddr::new(bind.ip(), bind.port() + 1)
}

/// Graceful shutdown signal.
async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("failed to install CTRL+C signal handler");
}
