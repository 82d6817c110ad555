//! Pulse auth API server binary.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use pulse_api::config::ApiConfig;
use pulse_api::services::session::SessionAdapter;
use pulse_core::auth::token::TokenCodec;
use pulse_core::auth::vault::{FileVault, MemoryVault, SessionVault};
use pulse_core::mail::TracingMailer;
use pulse_core::store::postgres::PgUserStore;

/// CLI arguments for the auth API server.
#[derive(Parser, Debug)]
#[command(name = "pulse_api_server", about = "Pulse auth API server")]
struct Args {
    /// Port to listen on (0 = use BIND_ADDR / the configured default).
    #[arg(long, default_value_t = 0)]
    port: u16,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/pulse"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

/// Swap the port of a bind address, keeping the configured host.
fn with_port(addr: &str, port: u16) -> String {
    match addr.rsplit_once(':') {
        Some((host, _)) => format!("{host}:{port}"),
        None => format!("{addr}:{port}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pulse_api=debug,pulse_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    // Missing secrets abort startup here; there is no baked-in fallback.
    let mut config = ApiConfig::from_env()?;
    if args.port != 0 {
        config.bind_addr = with_port(&config.bind_addr, args.port);
    }

    info!(bind_addr = %config.bind_addr, "starting pulse_api_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    pulse_core::migrate::migrate(&pool).await?;

    let vault: Arc<dyn SessionVault> = match FileVault::open_default() {
        Ok(vault) => Arc::new(vault),
        Err(e) => {
            warn!(error = %e, "file session vault unavailable, sessions will not survive restarts");
            Arc::new(MemoryVault::new())
        }
    };

    let codec = TokenCodec::new(&config.auth)?;
    let sessions = SessionAdapter::new(vault, config.auth.session_window);

    let state = pulse_api::AppState {
        store: Arc::new(PgUserStore::new(pool)),
        mailer: Arc::new(TracingMailer),
        codec: Arc::new(codec),
        sessions: Arc::new(sessions),
        config: config.clone(),
    };

    let app = pulse_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "auth API listening");

    axum::serve(listener, app).await?;

    Ok(())
}
