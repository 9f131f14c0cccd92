// http server mode - the chat relay endpoint

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{
        HeaderValue, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::config::Config;
use crate::core::{AppInsights, AzureOpenAi, ContentSafety, Relay};
use crate::Error;

const ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version, Authorization";

struct AppState {
    relay: Relay,
    config: Arc<Config>,
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DebugResponse {
    next_auth_url: Option<String>,
    azure_ad_client_id: &'static str,
    azure_ad_client_secret: &'static str,
    azure_ad_tenant_id: &'static str,
    next_auth_secret: &'static str,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Error::Validation(_) | Error::ModerationBlocked | Error::Upstream(_) => ErrorBody {
                error: self.to_string(),
                details: None,
            },
            _ => ErrorBody {
                error: "Internal Server Error".to_string(),
                details: Some(self.to_string()),
            },
        };
        (status, Json(body)).into_response()
    }
}

pub struct Server;

impl Server {
    /// Wires the real remote clients from `config` and serves until shutdown.
    pub async fn run(config: Config, host: &str, port: u16) -> Result<(), Error> {
        let relay = Relay::new(
            Arc::new(ContentSafety::new(&config)),
            Arc::new(AzureOpenAi::new(&config)),
            Arc::new(AppInsights::new(&config)),
        );

        let app = Self::router(relay, Arc::new(config));

        let addr = format!("{host}:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        info!("server running at http://{addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }

    pub fn router(relay: Relay, config: Arc<Config>) -> Router {
        let state = Arc::new(AppState { relay, config });

        Router::new()
            .route(
                "/chat",
                post(chat).options(preflight).fallback(method_not_allowed),
            )
            .route("/health", get(health))
            .route("/debug", get(debug_config))
            .layer(TraceLayer::new_for_http())
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            ))
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOW_HEADERS),
            ))
            .with_state(state)
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody {
            error: "Method Not Allowed".to_string(),
            details: None,
        }),
    )
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn debug_config(State(state): State<Arc<AppState>>) -> Json<DebugResponse> {
    fn presence(value: &Option<String>) -> &'static str {
        if value.is_some() { "Set" } else { "Not set" }
    }

    let config = &state.config;
    Json(DebugResponse {
        next_auth_url: config.auth_url.clone(),
        azure_ad_client_id: presence(&config.ad_client_id),
        azure_ad_client_secret: presence(&config.ad_client_secret),
        azure_ad_tenant_id: presence(&config.ad_tenant_id),
        next_auth_secret: presence(&config.session_secret),
    })
}

async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Invalid request body".to_string(),
                    details: Some(rejection.body_text()),
                }),
            )
                .into_response();
        }
    };

    let message = req.message.unwrap_or_default();

    match state.relay.handle(&message).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => {
            if e.status().is_server_error() {
                error!(error = %e, "chat request failed");
            }
            e.into_response()
        }
    }
}
