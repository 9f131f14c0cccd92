// relay client - what the chat ui uses to talk to the server

use crate::Error;
use crate::core::ChatReply;
use serde_json::json;

pub struct ChatClient {
    client: reqwest::Client,
    api_base: String,
}

impl ChatClient {
    pub fn new(api_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub async fn send(&self, message: &str) -> Result<ChatReply, Error> {
        let response = self
            .client
            .post(format!("{}/chat", self.api_base))
            .json(&json!({ "message": message }))
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "API responded with status: {}",
                response.status().as_u16()
            )));
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}
