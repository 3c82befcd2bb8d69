// Job model and handler seam. The gateway dispatches jobs of one task type;
// a `JobHandler` turns each job into the output variables to report. The
// worker loop owns the completion call, so a handler runs exactly once per
// activated job and produces exactly one variables document.
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Map;
use tracing::info;

use crate::score::ScoreMode;

/// A job handed out by the gateway in an activation response. Field names
/// follow the REST API's camelCase wire format; keys are strings on the
/// wire even though they are int64 internally.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatedJob {
    pub job_key: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub process_instance_key: String,
    #[serde(default)]
    pub retries: i32,
    #[serde(default)]
    pub variables: serde_json::Value,
}

/// What the handler wants done with the job. Completion is currently the
/// only outcome; the evaluation handler cannot fail on its own.
#[derive(Debug)]
pub enum JobOutcome {
    Complete(Map<String, serde_json::Value>),
}

#[async_trait]
pub trait JobHandler: Send + Sync {
    /// The task type this handler is registered for.
    fn task_type(&self) -> &str;

    async fn execute(&self, job: &ActivatedJob) -> JobOutcome;
}

/// The one handler this worker registers: compute a placeholder confidence
/// score and report it as the job's single output variable.
pub struct EvaluationHandler {
    task_type: String,
    mode: ScoreMode,
}

impl EvaluationHandler {
    pub fn new(task_type: impl Into<String>, mode: ScoreMode) -> Self {
        Self {
            task_type: task_type.into(),
            mode,
        }
    }
}

#[async_trait]
impl JobHandler for EvaluationHandler {
    fn task_type(&self) -> &str {
        &self.task_type
    }

    async fn execute(&self, job: &ActivatedJob) -> JobOutcome {
        info!(job_key = %job.job_key, "processing job");

        let confidence_score = self.mode.sample();
        info!(job_key = %job.job_key, confidence_score, "calculated confidenceScore");

        let mut variables = Map::new();
        variables.insert(
            "confidenceScore".to_string(),
            serde_json::json!(confidence_score),
        );
        JobOutcome::Complete(variables)
    }
}
