// Job worker for the `automated-evaluation` task type of a Camunda 8
// cluster. Polls the gateway's REST job API, computes a placeholder
// confidence score per job, and completes each job with that score as its
// single output variable. Packaged as a library so the two binary variants
// (fixed score vs. random score) and the integration tests share one
// implementation.
pub mod client;
pub mod config;
pub mod handlers;
pub mod job;
pub mod score;
pub mod server;
pub mod worker;
