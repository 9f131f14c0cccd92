// azure openai integration - answers questions grounded in the search index

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::{Config, Settings};
use crate::Error;

/// What the relay hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
}

#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, message: &str) -> Result<Completion, Error>;
}

pub struct AzureOpenAi {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    deployment: String,
    search_endpoint: Option<String>,
    search_key: Option<String>,
}

// what we send
#[derive(Serialize)]
struct Request<'a> {
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
    data_sources: Vec<DataSource<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct DataSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    parameters: SearchParameters<'a>,
}

#[derive(Serialize)]
struct SearchParameters<'a> {
    endpoint: &'a str,
    authentication: SearchAuth<'a>,
    index_name: &'static str,
}

#[derive(Serialize)]
struct SearchAuth<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    key: &'a str,
}

// what comes back
#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl AzureOpenAi {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.openai_endpoint.clone(),
            api_key: config.openai_key.clone(),
            deployment: config.openai_deployment.clone(),
            search_endpoint: config.search_endpoint.clone(),
            search_key: config.search_key.clone(),
        }
    }

    fn request<'a>(&'a self, message: &'a str) -> Request<'a> {
        Request {
            messages: vec![
                Message {
                    role: "system",
                    content: Settings::SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: Settings::MAX_TOKENS,
            temperature: Settings::TEMPERATURE,
            stream: Settings::STREAM,
            data_sources: vec![DataSource {
                kind: "azure_search",
                parameters: SearchParameters {
                    endpoint: self.search_endpoint.as_deref().unwrap_or_default(),
                    authentication: SearchAuth {
                        kind: "api_key",
                        key: self.search_key.as_deref().unwrap_or_default(),
                    },
                    index_name: Settings::SEARCH_INDEX,
                },
            }],
        }
    }

    async fn call(&self, message: &str) -> Result<Completion, Error> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| Error::Config("AZURE_OPENAI_ENDPOINT".to_string()))?;

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            self.deployment,
            Settings::COMPLETION_API_VERSION
        );

        debug!(%url, "sending completion request");

        let response = self
            .client
            .post(url)
            .header("api-key", self.api_key.as_deref().unwrap_or_default())
            .json(&self.request(message))
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let error = response
                .text()
                .await
                .map_err(|e| Error::Upstream(e.to_string()))?;
            return Err(Error::Upstream(error));
        }

        let response: Response = response
            .json()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                Error::Upstream("Unexpected response format from completion service".to_string())
            })?;

        Ok(Completion {
            text,
            model: response.model.unwrap_or_else(|| self.deployment.clone()),
        })
    }
}

#[async_trait]
impl Completer for AzureOpenAi {
    async fn complete(&self, message: &str) -> Result<Completion, Error> {
        self.call(message).await.inspect_err(|e| {
            error!(error = %e, deployment = %self.deployment, "completion request failed");
        })
    }
}
