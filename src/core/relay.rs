// chat relay - validate, moderate, complete, answer

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::Error;
use crate::core::{Completer, Moderator, Telemetry};

/// The answer sent back to the ui.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatReply {
    pub text: String,
    pub model: String,
    /// Wall time spent after moderation cleared, e.g. `"412ms"`.
    pub response_time: String,
}

/// One relay serves every request. It only holds read-only clients, so requests
/// never share mutable state.
#[derive(Clone)]
pub struct Relay {
    moderator: Arc<dyn Moderator>,
    completer: Arc<dyn Completer>,
    telemetry: Arc<dyn Telemetry>,
}

impl Relay {
    pub fn new(
        moderator: Arc<dyn Moderator>,
        completer: Arc<dyn Completer>,
        telemetry: Arc<dyn Telemetry>,
    ) -> Self {
        Self {
            moderator,
            completer,
            telemetry,
        }
    }

    pub async fn handle(&self, message: &str) -> Result<ChatReply, Error> {
        if message.trim().is_empty() {
            return Err(Error::Validation("Message is required".to_string()));
        }

        // moderation sees the raw message, untrimmed
        if self.moderator.check(message).await {
            warn!("message rejected by moderation");
            return Err(Error::ModerationBlocked);
        }

        let started = Instant::now();
        self.telemetry.track_query(message);

        let completion = self.completer.complete(message).await?;
        let elapsed = started.elapsed().as_millis();

        info!(model = %completion.model, elapsed_ms = elapsed as u64, "chat answered");

        Ok(ChatReply {
            text: completion.text,
            model: completion.model,
            response_time: format!("{elapsed}ms"),
        })
    }
}
