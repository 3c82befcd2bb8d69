// `server.rs` composes the process: it loads settings, registers Prometheus
// metrics, connects the gateway client, starts the polling loop in the
// background, and mounts the observability HTTP endpoints.
use axum::{Extension, Router, routing::get};
use prometheus::Registry;
use std::sync::Arc;
use tokio::task;
use tokio::time::Duration;
use tracing::info;

use crate::client::GatewayClient;
use crate::config::WorkerSettings;
use crate::handlers;
use crate::job::{EvaluationHandler, JobHandler};
use crate::score::ScoreMode;
use crate::worker::{self, WorkerMetrics};

/// Start the worker with the given score mode. Loads `.env` first so local
/// runs can keep cluster credentials out of the shell, exactly like the
/// original deployment did.
pub async fn run(mode: ScoreMode) -> anyhow::Result<()> {
    // Missing .env is fine; the environment may be set directly.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = WorkerSettings::from_env()?;
    info!(
        gateway = %settings.gateway_url,
        task_type = %settings.task_type,
        authenticated = settings.oauth.is_some(),
        "starting evaluation worker"
    );

    let registry = Arc::new(Registry::new());
    let metrics = WorkerMetrics::register(&registry)?;

    let client = GatewayClient::connect(&settings).await?;
    let handler: Arc<dyn JobHandler> =
        Arc::new(EvaluationHandler::new(settings.task_type.clone(), mode));

    let poll_delay = Duration::from_millis(settings.poll_delay_ms);
    task::spawn(worker::run_poll_loop(client, handler, metrics, poll_delay));

    let app = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .route("/health", get(handlers::health_handler))
        .layer(Extension(registry));

    info!("observability endpoints listening on {}", settings.http_bind);
    let listener = tokio::net::TcpListener::bind(&settings.http_bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
