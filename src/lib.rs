//! # University
//!
//! Course catalog web service. HTTP handlers validate request shape, call a
//! thin client for the backing Couchbase document store, and render HTML or
//! JSON. Request counters and latency histograms are exposed on `/metrics`,
//! and an append-only audit log records route entries, search terms, and
//! errors.

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;
pub mod couchbase;
pub mod course;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod store;
pub mod templates;

use config::Config;
use routes::{create_course_handler, home_handler, metrics_handler, search_handler};
use state::AppState;

/// Assembles the router around shared state. Separate from [`start_server`]
/// so tests can drive the same routes with an injected store.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/pyuniversity/courses", post(create_course_handler))
        .route("/pyuniversity/home", get(home_handler).post(search_handler))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    let config = Config::load()?;
    let _guard = init_logging(&config.audit_log_dir)?;

    info!("initializing state...");
    let state = AppState::new(config).await?;

    info!("starting server...");
    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

/// Stdout logging plus the append-only audit log file. The returned guard
/// must stay alive for the process lifetime or buffered audit lines are lost.
fn init_logging(audit_log_dir: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(audit_log_dir)?;
    let file_appender = tracing_appender::rolling::never(audit_log_dir, "audit.log");
    let (audit_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .with(fmt::layer().with_writer(audit_writer).with_ansi(false))
        .init();

    Ok(guard)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
