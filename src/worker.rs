// The polling loop. Each round long-polls the gateway for jobs of the
// registered task type, runs the handler per job, and reports completion.
// The gateway owns locking, reassignment, and retries; this loop only has
// to keep polling and keep its counters honest.
use prometheus::{IntCounter, Registry};
use std::sync::Arc;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use crate::client::GatewayClient;
use crate::job::{JobHandler, JobOutcome};

/// Back-off after a failed activation round so a down gateway does not turn
/// the loop into a busy spin.
const ERROR_BACKOFF: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct WorkerMetrics {
    pub jobs_activated: IntCounter,
    pub jobs_completed: IntCounter,
    pub completion_failures: IntCounter,
}

impl WorkerMetrics {
    /// Create the worker counters and register them on the shared registry
    /// that the `/metrics` endpoint gathers from.
    pub fn register(registry: &Registry) -> anyhow::Result<Self> {
        let jobs_activated =
            IntCounter::new("evaluation_jobs_activated_total", "Jobs received from the gateway")?;
        let jobs_completed =
            IntCounter::new("evaluation_jobs_completed_total", "Jobs completed successfully")?;
        let completion_failures = IntCounter::new(
            "evaluation_job_completion_failures_total",
            "Completion calls rejected by the gateway",
        )?;

        registry.register(Box::new(jobs_activated.clone()))?;
        registry.register(Box::new(jobs_completed.clone()))?;
        registry.register(Box::new(completion_failures.clone()))?;

        Ok(Self {
            jobs_activated,
            jobs_completed,
            completion_failures,
        })
    }

    /// Counters without a registry, for tests that only care about values.
    #[doc(hidden)]
    pub fn unregistered() -> Self {
        Self {
            jobs_activated: IntCounter::new("test_jobs_activated", "test").unwrap(),
            jobs_completed: IntCounter::new("test_jobs_completed", "test").unwrap(),
            completion_failures: IntCounter::new("test_completion_failures", "test").unwrap(),
        }
    }
}

/// One activation round: activate, execute the handler per job, complete
/// each job exactly once. Returns how many jobs were handled. A rejected
/// completion is logged and counted but does not abort the round — the
/// gateway will time the job out and hand it to another worker.
pub async fn poll_once(
    client: &GatewayClient,
    handler: &dyn JobHandler,
    metrics: &WorkerMetrics,
) -> anyhow::Result<usize> {
    let jobs = client.activate_jobs().await?;
    let handled = jobs.len();

    for job in jobs {
        metrics.jobs_activated.inc();

        let JobOutcome::Complete(variables) = handler.execute(&job).await;

        match client.complete_job(&job.job_key, variables).await {
            Ok(()) => {
                metrics.jobs_completed.inc();
                info!(job_key = %job.job_key, "job completed successfully");
            }
            Err(e) => {
                metrics.completion_failures.inc();
                error!(job_key = %job.job_key, "failed to complete job: {}", e);
            }
        }
    }

    Ok(handled)
}

/// Long-running worker loop. Never returns under normal operation; it is
/// intended to be spawned with `tokio::task::spawn` from `server::run()`.
pub async fn run_poll_loop(
    client: GatewayClient,
    handler: Arc<dyn JobHandler>,
    metrics: WorkerMetrics,
    poll_delay: Duration,
) {
    info!(task_type = %client.task_type(), "worker connected, polling for jobs");

    loop {
        match poll_once(&client, handler.as_ref(), &metrics).await {
            // The activation request long-polls on the gateway side, so an
            // empty round only needs a short pause before the next one.
            Ok(0) => sleep(poll_delay).await,
            Ok(_) => {}
            Err(e) => {
                error!("activation round failed: {}", e);
                sleep(ERROR_BACKOFF).await;
            }
        }
    }
}
