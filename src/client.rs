// Thin client for the Camunda 8 gateway REST API. Only the two calls this
// worker needs are wrapped: job activation (long poll) and job completion.
// The gateway owns the job lifecycle; this client just speaks its HTTP
// surface and reports anything unexpected as a typed error.
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::WorkerSettings;
use crate::job::ActivatedJob;

/// Slack added on top of the long-poll window so the HTTP timeout never
/// fires before the gateway closes an empty activation request.
const HTTP_TIMEOUT_SLACK_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token request rejected ({status}): {body}")]
    TokenDenied { status: StatusCode, body: String },
    #[error("gateway returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid gateway response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivationRequest<'a> {
    r#type: &'a str,
    worker: &'a str,
    timeout: u64,
    max_jobs_to_activate: u32,
    request_timeout: u64,
}

#[derive(Debug, Deserialize)]
struct ActivationResponse {
    #[serde(default)]
    jobs: Vec<ActivatedJob>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    variables: Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct GatewayClient {
    http: Client,
    base_url: String,
    task_type: String,
    worker_name: String,
    job_timeout_ms: u64,
    max_jobs: u32,
    request_timeout_ms: u64,
    bearer: Option<String>,
}

impl GatewayClient {
    /// Build the client and, when credentials are configured, perform the
    /// one client-credentials exchange. The token is held for the process
    /// lifetime; there is no refresh.
    pub async fn connect(settings: &WorkerSettings) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(
                settings.request_timeout_ms + HTTP_TIMEOUT_SLACK_MS,
            ))
            .build()?;

        let bearer = match &settings.oauth {
            Some(oauth) => {
                debug!("requesting access token from {}", oauth.token_url);
                let response = http
                    .post(&oauth.token_url)
                    .form(&[
                        ("grant_type", "client_credentials"),
                        ("audience", oauth.audience.as_str()),
                        ("client_id", oauth.client_id.as_str()),
                        ("client_secret", oauth.client_secret.as_str()),
                    ])
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(GatewayError::TokenDenied { status, body });
                }

                let token: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
                info!("authenticated against {}", oauth.token_url);
                Some(token.access_token)
            }
            None => None,
        };

        Ok(Self {
            http,
            base_url: settings.gateway_url.clone(),
            task_type: settings.task_type.clone(),
            worker_name: settings.worker_name.clone(),
            job_timeout_ms: settings.job_timeout_ms,
            max_jobs: settings.max_jobs,
            request_timeout_ms: settings.request_timeout_ms,
            bearer,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer.is_some()
    }

    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// One long-poll activation round. An empty `jobs` array (or a gateway
    /// that answers 204 to an empty poll) yields an empty vec, not an error.
    pub async fn activate_jobs(&self) -> Result<Vec<ActivatedJob>, GatewayError> {
        let request = ActivationRequest {
            r#type: &self.task_type,
            worker: &self.worker_name,
            timeout: self.job_timeout_ms,
            max_jobs_to_activate: self.max_jobs,
            request_timeout: self.request_timeout_ms,
        };

        let response = self
            .post(&format!("{}/v2/jobs/activation", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let activation: ActivationResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(activation.jobs)
    }

    /// Report a job as complete, attaching the given output variables.
    pub async fn complete_job(
        &self,
        job_key: &str,
        variables: Map<String, serde_json::Value>,
    ) -> Result<(), GatewayError> {
        let response = self
            .post(&format!("{}/v2/jobs/{}/completion", self.base_url, job_key))
            .json(&CompletionRequest { variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }
        Ok(())
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.post(url);
        match &self.bearer {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}
