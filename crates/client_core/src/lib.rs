use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{CampaignBrief, GenerationResult},
    protocol::{HealthResponse, GENERATE_PATH, HEALTH_PATH},
};
use tracing::{debug, info};

mod brief_store;
mod controller;
pub mod error;
pub mod render;

pub use brief_store::{BriefEdit, BriefEditError, BriefStore};
pub use controller::{
    SubmissionController, SubmissionEvent, SubmissionStatus, SubmissionView, SubmitOutcome,
};
pub use error::{FailureKind, SubmissionError};

/// The external generator reachable through `/generate`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, brief: &CampaignBrief)
        -> std::result::Result<GenerationResult, SubmissionError>;
    async fn health(&self) -> Result<()>;
}

pub struct MissingGenerationBackend;

#[async_trait]
impl GenerationBackend for MissingGenerationBackend {
    async fn generate(
        &self,
        _brief: &CampaignBrief,
    ) -> std::result::Result<GenerationResult, SubmissionError> {
        Err(SubmissionError::Transport(
            "generation endpoint is not configured".to_string(),
        ))
    }

    async fn health(&self) -> Result<()> {
        Err(anyhow!("generation endpoint is not configured"))
    }
}

pub struct HttpGenerationBackend {
    http: Client,
    server_url: String,
}

impl HttpGenerationBackend {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            server_url: trim_server_url(server_url.into()),
        }
    }

    /// Like [`HttpGenerationBackend::new`], with a transport-level timeout.
    pub fn with_timeout(server_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build generation http client")?;
        Ok(Self {
            http,
            server_url: trim_server_url(server_url.into()),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

fn trim_server_url(server_url: String) -> String {
    server_url.trim().trim_end_matches('/').to_string()
}

#[async_trait]
impl GenerationBackend for HttpGenerationBackend {
    async fn generate(
        &self,
        brief: &CampaignBrief,
    ) -> std::result::Result<GenerationResult, SubmissionError> {
        let url = format!("{}{GENERATE_PATH}", self.server_url);
        debug!(%url, product = %brief.product, "posting campaign brief");

        let response = self.http.post(&url).json(brief).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(SubmissionError::status(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        let result: GenerationResult = serde_json::from_slice(&body)
            .map_err(|err| SubmissionError::MalformedResponse(err.to_string()))?;
        info!(
            asset_count = result.top_assets.len(),
            has_report = result.report.is_some(),
            "generation response received"
        );
        Ok(result)
    }

    async fn health(&self) -> Result<()> {
        let health: HealthResponse = self
            .http
            .get(format!("{}{HEALTH_PATH}", self.server_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !health.is_ok() {
            return Err(anyhow!(
                "generator reported unhealthy status `{}`",
                health.status
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
