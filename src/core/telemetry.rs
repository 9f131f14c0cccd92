// telemetry - best effort usage events, never allowed to get in the way of a request

use chrono::Utc;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::{Config, Settings};
use crate::Error;

pub trait Telemetry: Send + Sync {
    /// Records an inbound query. Must return immediately and never fail.
    fn track_query(&self, query: &str);
}

/// Sends events to an Application Insights ingestion endpoint.
#[derive(Clone)]
pub struct AppInsights {
    client: reqwest::Client,
    endpoint: String,
    key: Option<String>,
}

impl AppInsights {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.telemetry_endpoint.clone(),
            key: config.telemetry_key.clone(),
        }
    }

    async fn send(&self, key: &str, query: &str) -> Result<(), Error> {
        let envelope = json!({
            "name": "Microsoft.ApplicationInsights.Event",
            "time": Utc::now().to_rfc3339(),
            "iKey": key,
            "data": {
                "baseType": "EventData",
                "baseData": {
                    "ver": 2,
                    "name": Settings::TELEMETRY_EVENT,
                    "properties": { "userQuery": query }
                }
            }
        });

        let url = format!("{}/v2/track", self.endpoint.trim_end_matches('/'));
        let response = self.client.post(url).json(&envelope).send().await?;

        if !response.status().is_success() {
            return Err(Error::Server(format!(
                "telemetry rejected with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

impl Telemetry for AppInsights {
    fn track_query(&self, query: &str) {
        let Some(key) = self.key.clone() else {
            debug!("no instrumentation key, skipping telemetry");
            return;
        };

        // detached so a slow collector never holds up the answer
        let sink = self.clone();
        let query = query.to_string();
        tokio::spawn(async move {
            if let Err(e) = sink.send(&key, &query).await {
                warn!(error = %e, "telemetry event not recorded");
            }
        });
    }
}

/// Drops every event.
pub struct NoTelemetry;

impl Telemetry for NoTelemetry {
    fn track_query(&self, _query: &str) {}
}
