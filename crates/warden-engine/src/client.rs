//! RemoteEngine: REST/JSON client for the external data-protection engine

use crate::api::ProtectionEngine;
use crate::error::EngineError;
use crate::types::{ActionDescriptor, EngineResource, PolicyExecution, ResourceAction, WorkloadPolicy};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timeout used for the first readiness-probe attempts, before falling back
/// to the configured request timeout.
const EARLY_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of short-timeout probe attempts before punting to the configured
/// timeout.
const EARLY_PROBE_ATTEMPTS: u32 = 10;

/// Delay between readiness-probe attempts when the engine refuses the
/// connection outright instead of timing out.
const PROBE_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Connection settings for the engine endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine API (e.g. "http://dr-engine.internal:8780")
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional bearer token attached to every request
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8780".to_string()
}

fn default_timeout_secs() -> u64 {
    600
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            auth_token: None,
        }
    }
}

/// REST/JSON implementation of [`ProtectionEngine`].
///
/// The client is cheap to clone and safe to share behind an `Arc`; all
/// methods take `&self`.
pub struct RemoteEngine {
    http: reqwest::Client,
    base: String,
    auth_token: Option<String>,
    timeout: Duration,
}

impl RemoteEngine {
    /// Build a client from connection settings.
    ///
    /// Fails if the endpoint is not a valid absolute URL.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let base = config.endpoint.trim_end_matches('/').to_string();
        Url::parse(&base).map_err(|e| EngineError::InvalidEndpoint(format!("{}: {}", base, e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base,
            auth_token: config.auth_token,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(self.url(path)))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.post(self.url(path)))
    }

    fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.delete(self.url(path)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a non-2xx response into an [`EngineError::Status`].
    async fn check(response: Response) -> Result<Response, EngineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(EngineError::Status {
            code: status.as_u16(),
            body,
        })
    }

    /// Block until the engine answers its health endpoint.
    ///
    /// Probes with a short timeout for the first attempts, then drops back
    /// to the configured request timeout. If a timeout was reported, a
    /// matching "established" line is logged once the engine responds so
    /// operators are not left guessing.
    pub async fn wait_until_ready(&self) {
        let mut attempt: u32 = 0;
        let mut has_timed_out = false;

        loop {
            attempt += 1;
            let timeout = if attempt <= EARLY_PROBE_ATTEMPTS {
                EARLY_PROBE_TIMEOUT
            } else {
                self.timeout
            };

            let probe = self.get("health").timeout(timeout).send().await;
            match probe {
                Ok(response) if response.status() == StatusCode::OK => {
                    if has_timed_out {
                        info!("engine connection established");
                    }
                    debug!("engine is ready at {}", self.base);
                    return;
                }
                Ok(response) => {
                    warn!(
                        "engine at {} answered with HTTP {}; retrying",
                        self.base,
                        response.status()
                    );
                }
                Err(e) => {
                    has_timed_out = true;
                    warn!(
                        "waiting for engine at {} (attempt {}): {}",
                        self.base, attempt, e
                    );
                }
            }

            tokio::time::sleep(PROBE_RETRY_DELAY).await;
        }
    }
}

#[async_trait]
impl ProtectionEngine for RemoteEngine {
    async fn list_actions(
        &self,
        resource_type_id: u32,
    ) -> Result<Vec<ActionDescriptor>, EngineError> {
        let response = self
            .get(&format!("resource-types/{}/actions", resource_type_id))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn list_workload_policies(&self) -> Result<Vec<WorkloadPolicy>, EngineError> {
        let response = self.get("workload-policies").send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_workload_policy(&self, name: &str) -> Result<WorkloadPolicy, EngineError> {
        let response = self
            .post("workload-policies")
            .json(&json!({ "name": name }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_resource(
        &self,
        resource_id: &str,
        name: &str,
        resource_type_id: u32,
    ) -> Result<(), EngineError> {
        let response = self
            .post("resources")
            .json(&json!({
                "id": resource_id,
                "name": name,
                "resource_type_id": resource_type_id,
            }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn create_resource_action(
        &self,
        resource_id: &str,
        action_id: &str,
        policy_id: &str,
    ) -> Result<(), EngineError> {
        let response = self
            .post(&format!("workload-policies/{}/resource-actions", policy_id))
            .json(&json!({
                "resource_id": resource_id,
                "action_id": action_id,
            }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn protect(&self, policy_id: &str) -> Result<(), EngineError> {
        let response = self
            .post(&format!("workload-policies/{}/protect", policy_id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn recover(&self, execution_id: &str) -> Result<(), EngineError> {
        let response = self
            .post(&format!("recovery/executions/{}/recover", execution_id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn recovery_list_policies(&self) -> Result<Vec<WorkloadPolicy>, EngineError> {
        let response = self.get("recovery/policies").send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn recovery_list_policy_executions(
        &self,
        policy_id: &str,
    ) -> Result<Vec<PolicyExecution>, EngineError> {
        let response = self
            .get(&format!("recovery/policies/{}/executions", policy_id))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_policy_execution(&self, execution_id: &str) -> Result<(), EngineError> {
        let response = self
            .delete(&format!("recovery/executions/{}", execution_id))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn get_resource(&self, resource_id: &str) -> Result<EngineResource, EngineError> {
        let response = self.get(&format!("resources/{}", resource_id)).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_resource_action(
        &self,
        policy_id: &str,
        resource_id: &str,
    ) -> Result<ResourceAction, EngineError> {
        let response = self
            .get(&format!(
                "workload-policies/{}/resources/{}/action",
                policy_id, resource_id
            ))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
