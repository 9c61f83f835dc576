#![forbid(unsafe_code)]

use showready_server::{build_router, validate_startup_config, ApiConfig, AppState};
use showready_store::{Db, SqliteDirectory};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("SHOWREADY_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("SHOWREADY_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let db_path = env::var("SHOWREADY_DB_PATH").unwrap_or_else(|_| "showready.db".to_string());

    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("SHOWREADY_MAX_BODY_BYTES", 64 * 1024),
        shutdown_drain: Duration::from_millis(env_u64("SHOWREADY_SHUTDOWN_DRAIN_MS", 5000)),
    };
    validate_startup_config(&api_cfg)?;

    let db = Db::open(&db_path).map_err(|e| format!("open database {db_path}: {e}"))?;
    let directory = Arc::new(SqliteDirectory::new(db.clone()));
    let state = AppState::with_config(db, directory, api_cfg);
    let drain = state.api.shutdown_drain;
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr}: {e}"))?;
    info!("showready-server listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            // Keep accepting in-flight work for a moment so proxies can
            // finish handing requests over.
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
