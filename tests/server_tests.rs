// tests for the http endpoint

use async_trait::async_trait;
use axum::{Json, Router, routing::post};
use cloudsage::{
    AzureOpenAi, ChatClient, Completer, Completion, Config, ContentSafety, Error, Moderator,
    NoTelemetry, Relay, Server,
};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Verdict(bool);

#[async_trait]
impl Moderator for Verdict {
    async fn check(&self, _text: &str) -> bool {
        self.0
    }
}

#[derive(Default)]
struct Scripted {
    fail: Option<&'static str>,
    calls: AtomicUsize,
}

#[async_trait]
impl Completer for Scripted {
    async fn complete(&self, _message: &str) -> Result<Completion, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail {
            Some(diagnostic) => Err(Error::Upstream(diagnostic.to_string())),
            None => Ok(Completion {
                text: "answer".to_string(),
                model: "gpt-4-turbo".to_string(),
            }),
        }
    }
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn serve(
    moderator: Arc<dyn Moderator>,
    completer: Arc<dyn Completer>,
    config: Config,
) -> String {
    let relay = Relay::new(moderator, completer, Arc::new(NoTelemetry));
    spawn(Server::router(relay, Arc::new(config))).await
}

async fn serve_default(blocked: bool) -> (String, Arc<Scripted>) {
    let completer = Arc::new(Scripted::default());
    let base = serve(Arc::new(Verdict(blocked)), completer.clone(), Config::default()).await;
    (base, completer)
}

async fn post_chat(base: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

fn assert_cors(headers: &reqwest::header::HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(
        headers["access-control-allow-methods"]
            .to_str()
            .unwrap()
            .contains("POST")
    );
    assert!(
        headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .contains("Content-Type")
    );
}

#[tokio::test]
async fn test_preflight() {
    let (base, completer) = serve_default(false).await;

    let response = reqwest::Client::new()
        .request(Method::OPTIONS, format!("{base}/chat"))
        .header("Origin", "https://ui.example")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_cors(response.headers());
    assert!(response.text().await.unwrap().is_empty());
    assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_method() {
    let (base, _) = serve_default(false).await;

    let response = reqwest::get(format!("{base}/chat")).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_cors(response.headers());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"error": "Method Not Allowed"}));
}

#[tokio::test]
async fn test_empty_message() {
    let (base, completer) = serve_default(false).await;

    for body in [json!({"message": ""}), json!({"message": "   "}), json!({})] {
        let (status, reply) = post_chat(&base, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply["error"], "Message is required");
    }
    assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_body() {
    let (base, _) = serve_default(false).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/chat"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid request body");
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn test_blocked_message() {
    let (base, completer) = serve_default(true).await;

    let (status, reply) = post_chat(&base, json!({"message": "bad words"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply["error"],
        "Inappropriate content detected. Please rephrase your query."
    );
    assert_eq!(completer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_successful_answer() {
    let (base, completer) = serve_default(false).await;

    let (status, reply) = post_chat(&base, json!({"message": "How do I restart pod X?"})).await;

    assert_eq!(status, StatusCode::OK);
    let fields = reply.as_object().unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(reply["text"], "answer");
    assert_eq!(reply["model"], "gpt-4-turbo");

    let time = reply["responseTime"].as_str().unwrap();
    assert!(time.ends_with("ms"));
    assert!(time.trim_end_matches("ms").parse::<u64>().is_ok());
    assert_eq!(completer.calls.load(Ordering::SeqCst), 1);
}

// both azure services stood up locally, answering like the real ones
async fn azure_stand_ins(answer: &'static str) -> String {
    let router = Router::new()
        .route(
            "/contentsafety/text:analyze",
            post(|| async { Json(json!({"blocked": false})) }),
        )
        .route(
            "/openai/deployments/gpt-4-turbo/chat/completions",
            post(move || async move {
                Json(json!({
                    "choices": [{"message": {"role": "assistant", "content": answer}}],
                    "model": "gpt-4-turbo"
                }))
            }),
        );
    spawn(router).await
}

#[tokio::test]
async fn test_answer_through_azure_clients() {
    let answer = "See JIRA OPS-1  \n restart it";
    let azure = azure_stand_ins(answer).await;
    let config = Config {
        moderation_endpoint: Some(azure.clone()),
        moderation_key: Some("safety-key".to_string()),
        openai_endpoint: Some(azure),
        openai_key: Some("openai-key".to_string()),
        openai_deployment: "gpt-4-turbo".to_string(),
        ..Config::default()
    };
    let base = serve(
        Arc::new(ContentSafety::new(&config)),
        Arc::new(AzureOpenAi::new(&config)),
        config,
    )
    .await;

    let (status, reply) = post_chat(&base, json!({"message": "How do I restart pod X?"})).await;

    assert_eq!(status, StatusCode::OK);
    let fields = reply.as_object().unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(reply["text"], answer);
    assert_eq!(reply["model"], "gpt-4-turbo");
    assert!(reply["responseTime"].as_str().unwrap().ends_with("ms"));
}

#[tokio::test]
async fn test_upstream_failure() {
    let completer = Arc::new(Scripted {
        fail: Some("rate limit exceeded"),
        ..Scripted::default()
    });
    let base = serve(Arc::new(Verdict(false)), completer.clone(), Config::default()).await;

    let (status, reply) = post_chat(&base, json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(reply["error"].as_str().unwrap().contains("rate limit exceeded"));
    assert_eq!(completer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unreachable_moderation_fails_open() {
    let config = Config {
        moderation_endpoint: Some("http://127.0.0.1:1".to_string()),
        ..Config::default()
    };
    let completer = Arc::new(Scripted::default());
    let base = serve(
        Arc::new(ContentSafety::new(&config)),
        completer.clone(),
        config,
    )
    .await;

    let (status, reply) = post_chat(&base, json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["text"], "answer");
    assert_eq!(completer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_health_and_debug() {
    let config = Config {
        ad_client_id: Some("client".to_string()),
        auth_url: Some("https://ui.example".to_string()),
        ..Config::default()
    };
    let base = serve(Arc::new(Verdict(false)), Arc::new(Scripted::default()), config).await;

    let health: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let debug: Value = reqwest::get(format!("{base}/debug"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(debug["nextAuthUrl"], "https://ui.example");
    assert_eq!(debug["azureAdClientId"], "Set");
    assert_eq!(debug["azureAdClientSecret"], "Not set");
    assert_eq!(debug["nextAuthSecret"], "Not set");
}

#[tokio::test]
async fn test_chat_client_round_trip() {
    let (base, _) = serve_default(false).await;
    let client = ChatClient::new(&format!("{base}/"));

    let reply = client.send("How do I restart pod X?").await.unwrap();
    assert_eq!(reply.text, "answer");
    assert_eq!(reply.model, "gpt-4-turbo");
}

#[tokio::test]
async fn test_chat_client_reports_status() {
    let (base, _) = serve_default(true).await;
    let client = ChatClient::new(&base);

    match client.send("bad words").await {
        Err(Error::Transport(msg)) => assert_eq!(msg, "API responded with status: 400"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_client_unreachable() {
    let client = ChatClient::new("http://127.0.0.1:1");
    assert!(matches!(
        client.send("hello").await,
        Err(Error::Transport(_))
    ));
}
