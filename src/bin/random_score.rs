// Random-score variant of the evaluation worker. Identical to the default
// binary except that each job gets a fresh uniform score from [0, 1), so
// process instances spread across the approval branches instead of all
// taking the auto-approval path.
use camunda_evaluation_worker::score::ScoreMode;
use camunda_evaluation_worker::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::run(ScoreMode::Random).await
}
