// Worker configuration. Everything comes from environment variables so the
// worker can be pointed at a Camunda SaaS cluster or a local gateway without
// a config file. Variable names follow the Camunda 8 SDK conventions
// (ZEEBE_REST_ADDRESS, ZEEBE_CLIENT_ID, ...) so existing cluster credential
// files work unchanged.
use anyhow::{Context, bail};
use tracing::warn;

pub const DEFAULT_OAUTH_URL: &str = "https://login.cloud.camunda.io/oauth/token";
pub const DEFAULT_TOKEN_AUDIENCE: &str = "zeebe.camunda.io";
pub const DEFAULT_TASK_TYPE: &str = "automated-evaluation";
pub const DEFAULT_WORKER_NAME: &str = "evaluation-worker";
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:3000";

const DEFAULT_JOB_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_MAX_JOBS: u32 = 32;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_POLL_DELAY_MS: u64 = 1_000;

/// OAuth client-credentials settings for Camunda SaaS. Absent when the
/// worker talks to an unauthenticated local gateway.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: String,
    pub audience: String,
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Base URL of the gateway's REST API, e.g. `https://<cluster>.zeebe.camunda.io`.
    pub gateway_url: String,
    pub oauth: Option<OAuthSettings>,
    pub task_type: String,
    pub worker_name: String,
    /// How long the gateway keeps an activated job locked for this worker.
    pub job_timeout_ms: u64,
    pub max_jobs: u32,
    /// Long-poll window for each activation request.
    pub request_timeout_ms: u64,
    /// Delay between polls that returned no jobs.
    pub poll_delay_ms: u64,
    pub http_bind: String,
}

impl WorkerSettings {
    /// Read settings from the process environment. Missing optional values
    /// fall back to defaults; malformed numeric values are startup errors
    /// rather than silent fallbacks.
    pub fn from_env() -> anyhow::Result<Self> {
        let gateway_url = match std::env::var("ZEEBE_REST_ADDRESS") {
            Ok(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => bail!("ZEEBE_REST_ADDRESS must be set to the gateway REST base URL"),
        };

        let client_id = std::env::var("ZEEBE_CLIENT_ID").ok();
        let client_secret = std::env::var("ZEEBE_CLIENT_SECRET").ok();
        let oauth = match (client_id, client_secret) {
            (Some(id), Some(secret)) => Some(OAuthSettings {
                client_id: id,
                client_secret: secret,
                token_url: env_or("CAMUNDA_OAUTH_URL", DEFAULT_OAUTH_URL),
                audience: env_or("CAMUNDA_TOKEN_AUDIENCE", DEFAULT_TOKEN_AUDIENCE),
            }),
            (Some(_), None) | (None, Some(_)) => {
                // Half-configured credentials are almost certainly a typo in
                // the .env file, but a local gateway still works without auth.
                warn!(
                    "credentials incomplete: both ZEEBE_CLIENT_ID and ZEEBE_CLIENT_SECRET \
                     must be set to enable OAuth; connecting unauthenticated"
                );
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            gateway_url,
            oauth,
            task_type: env_or("EVALUATION_TASK_TYPE", DEFAULT_TASK_TYPE),
            worker_name: env_or("EVALUATION_WORKER_NAME", DEFAULT_WORKER_NAME),
            job_timeout_ms: parse_env("EVALUATION_JOB_TIMEOUT_MS", DEFAULT_JOB_TIMEOUT_MS)?,
            max_jobs: parse_env("EVALUATION_MAX_JOBS", DEFAULT_MAX_JOBS)?,
            request_timeout_ms: parse_env(
                "EVALUATION_REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?,
            poll_delay_ms: parse_env("EVALUATION_POLL_DELAY_MS", DEFAULT_POLL_DELAY_MS)?,
            http_bind: env_or("HTTP_BIND", DEFAULT_HTTP_BIND),
        })
    }

    /// Settings for tests and local experiments: unauthenticated, pointed at
    /// the given gateway, defaults everywhere else.
    pub fn for_gateway(gateway_url: impl Into<String>) -> Self {
        Self {
            gateway_url: gateway_url.into(),
            oauth: None,
            task_type: DEFAULT_TASK_TYPE.to_string(),
            worker_name: DEFAULT_WORKER_NAME.to_string(),
            job_timeout_ms: DEFAULT_JOB_TIMEOUT_MS,
            max_jobs: DEFAULT_MAX_JOBS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            poll_delay_ms: DEFAULT_POLL_DELAY_MS,
            http_bind: DEFAULT_HTTP_BIND.to_string(),
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid {} value: {:?}", name, raw)),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_evaluation_task() {
        let settings = WorkerSettings::for_gateway("http://localhost:8080");
        assert_eq!(settings.task_type, "automated-evaluation");
        assert_eq!(settings.worker_name, "evaluation-worker");
        assert_eq!(settings.job_timeout_ms, 60_000);
        assert_eq!(settings.max_jobs, 32);
        assert!(settings.oauth.is_none());
    }

    #[test]
    fn parse_env_falls_back_when_unset() {
        // Uses a name no test environment sets.
        let value: u64 = parse_env("EVALUATION_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
