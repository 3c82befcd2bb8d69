// `main.rs` is intentionally tiny: it only picks the score mode and
// delegates to `server::run()`. The real implementation lives in the
// library modules so the random-score binary and the integration tests
// share it.
use camunda_evaluation_worker::score::ScoreMode;
use camunda_evaluation_worker::server;

/// Fixed-score variant: every job is completed with confidenceScore 0.2,
/// forcing the auto-approval branch of the evaluation process.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run(ScoreMode::default()).await
}
