// content safety - asks the remote classifier whether a message should be blocked

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Config, Settings};
use crate::Error;

/// Anything that can decide whether a message is allowed through.
#[async_trait]
pub trait Moderator: Send + Sync {
    /// `true` means the message must not reach the model.
    async fn check(&self, text: &str) -> bool;
}

pub struct ContentSafety {
    client: reqwest::Client,
    endpoint: Option<String>,
    key: Option<String>,
    /// What a failed check reports. Open lets the message through.
    pub fail_open: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest<'a> {
    text: &'a str,
    categories: [&'static str; 4],
    severity_threshold: u8,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    blocked: Option<bool>,
}

impl ContentSafety {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.moderation_endpoint.clone(),
            key: config.moderation_key.clone(),
            fail_open: Settings::MODERATION_FAIL_OPEN,
        }
    }

    async fn analyze(&self, text: &str) -> Result<bool, Error> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| Error::Config("AZURE_CONTENT_SAFETY_ENDPOINT".to_string()))?;

        let url = format!(
            "{}/contentsafety/text:analyze?api-version={}",
            endpoint.trim_end_matches('/'),
            Settings::MODERATION_API_VERSION
        );

        let body = AnalyzeRequest {
            text,
            categories: Settings::MODERATION_CATEGORIES,
            severity_threshold: Settings::SEVERITY_THRESHOLD,
        };

        let response = self
            .client
            .post(url)
            .header("Ocp-Apim-Subscription-Key", self.key.as_deref().unwrap_or_default())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("{status}: {error}")));
        }

        let verdict: AnalyzeResponse = response.json().await?;
        Ok(verdict.blocked == Some(true))
    }
}

#[async_trait]
impl Moderator for ContentSafety {
    async fn check(&self, text: &str) -> bool {
        match self.analyze(text).await {
            Ok(blocked) => {
                debug!(blocked, "moderation verdict");
                blocked
            }
            Err(e) => {
                warn!(error = %e, fail_open = self.fail_open, "content moderation failed");
                !self.fail_open
            }
        }
    }
}
