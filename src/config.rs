// configuration - endpoints and keys from the environment, fixed knobs as constants

use std::env;

/// Fixed behavior of the relay. Changing anything here changes what users see,
/// so it all lives in one place.
pub struct Settings;

impl Settings {
    pub const SYSTEM_PROMPT: &'static str = "You are CloudSageAI, a helpful assistant for DevOps and Cloud engineers. When answering questions, prioritize information from the provided context over your general knowledge. If relevant information is found in the context, use it to provide specific answers. Always cite the source (Jira ticket ID or Confluence page) when using information from the context. If no relevant information is found in the context, clearly state that you don't have specific information on that topic but provide a helpful general response based on your knowledge.";

    pub const MAX_TOKENS: u32 = 800;
    pub const TEMPERATURE: f32 = 0.7;
    pub const STREAM: bool = false;

    pub const SEARCH_INDEX: &'static str = "jira_confluence_knowledge";
    pub const DEFAULT_DEPLOYMENT: &'static str = "gpt-4-turbo";
    pub const COMPLETION_API_VERSION: &'static str = "2023-12-01-preview";

    pub const MODERATION_API_VERSION: &'static str = "2023-10-01-preview";
    pub const MODERATION_CATEGORIES: [&'static str; 4] = ["Hate", "Sexual", "SelfHarm", "Violence"];
    pub const SEVERITY_THRESHOLD: u8 = 3;

    /// A moderation check that cannot be completed lets the message through.
    pub const MODERATION_FAIL_OPEN: bool = true;

    pub const TELEMETRY_EVENT: &'static str = "Chatbot Request";
    pub const DEFAULT_TELEMETRY_ENDPOINT: &'static str = "https://dc.services.visualstudio.com";
}

/// Process-wide settings read once at startup. Every field is optional so the
/// server still answers preflight, health and debug requests when unconfigured.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub moderation_endpoint: Option<String>,
    pub moderation_key: Option<String>,

    pub openai_endpoint: Option<String>,
    pub openai_key: Option<String>,
    pub openai_deployment: String,

    pub search_endpoint: Option<String>,
    pub search_key: Option<String>,

    // identity provider, consumed by the ui layer
    pub ad_client_id: Option<String>,
    pub ad_client_secret: Option<String>,
    pub ad_tenant_id: Option<String>,
    pub auth_url: Option<String>,
    pub session_secret: Option<String>,

    pub telemetry_key: Option<String>,
    pub telemetry_endpoint: String,

    pub api_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any name -> value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            moderation_endpoint: get("AZURE_CONTENT_SAFETY_ENDPOINT"),
            moderation_key: get("AZURE_CONTENT_SAFETY_KEY"),
            openai_endpoint: get("AZURE_OPENAI_ENDPOINT"),
            openai_key: get("AZURE_OPENAI_API_KEY"),
            openai_deployment: get("AZURE_OPENAI_DEPLOYMENT")
                .unwrap_or_else(|| Settings::DEFAULT_DEPLOYMENT.to_string()),
            search_endpoint: get("AZURE_COGNITIVE_SEARCH_ENDPOINT"),
            search_key: get("AZURE_COGNITIVE_SEARCH_API_KEY"),
            ad_client_id: get("AZURE_AD_CLIENT_ID"),
            ad_client_secret: get("AZURE_AD_CLIENT_SECRET"),
            ad_tenant_id: get("AZURE_AD_TENANT_ID"),
            auth_url: get("NEXTAUTH_URL"),
            session_secret: get("NEXTAUTH_SECRET"),
            telemetry_key: get("APPINSIGHTS_INSTRUMENTATIONKEY"),
            telemetry_endpoint: get("APPINSIGHTS_ENDPOINT")
                .unwrap_or_else(|| Settings::DEFAULT_TELEMETRY_ENDPOINT.to_string()),
            api_base_url: get("NEXT_PUBLIC_API_BASE_URL"),
        }
    }
}
