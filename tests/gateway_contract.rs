//! Chat-completions gateway contract tests
//!
//! These tests pin the HTTP shape of the summarisation gateway:
//! - request body and auth header
//! - response parsing, including citations
//! - mapping of non-2xx, transport and malformed responses to `GatewayError`
//! - resource-list parsing through the same endpoint

use kenning::config::GatewayConfig;
use kenning::gateway::{
    ChatCompletionsGateway, GatewayError, ResourceParse, SummarizationGateway,
};
use kenning::types::SourceTag;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway_for(server: &MockServer) -> ChatCompletionsGateway {
    let config = GatewayConfig {
        api_url: server.uri(),
        model: "sonar-test".into(),
        timeout_secs: 5,
        ..Default::default()
    };
    ChatCompletionsGateway::new(&config, "test-key").expect("gateway")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-1",
        "model": "sonar-test",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Request format
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn summarize_sends_model_messages_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "sonar-test",
            "return_citations": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("- summary")))
        .expect(1)
        .mount(&server)
        .await;

    let summary = gateway_for(&server)
        .summarize("Example", "Some body text")
        .await
        .expect("summary");
    assert_eq!(summary.text, "- summary");
    assert!(summary.citations.is_empty());
}

#[tokio::test]
async fn summarize_prompt_carries_title_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&server)
        .await;

    gateway_for(&server)
        .summarize("My Page", "paragraph one")
        .await
        .expect("summary");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    assert_eq!(body["messages"][0]["role"], "system");
    let user = body["messages"][1]["content"].as_str().unwrap_or_default();
    assert!(user.contains("'My Page'"));
    assert!(user.contains("paragraph one"));
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn top_level_citations_are_returned() {
    let server = MockServer::start().await;
    let mut body = completion("- cited summary");
    body["citations"] = json!(["https://a.example", "https://b.example"]);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let summary = gateway_for(&server).summarize("t", "b").await.expect("summary");
    assert_eq!(summary.citations, vec!["https://a.example", "https://b.example"]);
}

#[tokio::test]
async fn empty_choices_are_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = gateway_for(&server).summarize("t", "b").await.unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn blank_content_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
        .mount(&server)
        .await;

    let err = gateway_for(&server).summarize("t", "b").await.unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

#[tokio::test]
async fn non_json_success_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server).summarize("t", "b").await.unwrap_err();
    assert!(matches!(err, GatewayError::Malformed(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Error mapping
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unauthorized_maps_to_remote_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Invalid API key", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = gateway_for(&server).summarize("t", "b").await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Remote {
            status: 401,
            detail: "Invalid API key".into()
        }
    );
    assert_eq!(err.fallback_reason(), "401 Unauthorized: Invalid API key");
}

#[tokio::test]
async fn server_error_with_text_body_keeps_excerpt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = gateway_for(&server).summarize("t", "b").await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Remote {
            status: 502,
            detail: "upstream exploded".into()
        }
    );
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    let config = GatewayConfig {
        api_url: "http://127.0.0.1:1".into(),
        timeout_secs: 2,
        ..Default::default()
    };

    let gateway = ChatCompletionsGateway::new(&config, "k").expect("gateway");
    let err = gateway.summarize("t", "b").await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Resource lists
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn research_resources_parses_array_in_prose() {
    let server = MockServer::start().await;
    let content = "Here are resources:\n```json\n[{\"title\": \"OWASP XSS\", \"summary\": \"Cheat sheet\", \"url\": \"https://cheatsheetseries.owasp.org/\"}, {\"title\": \"PortSwigger\"}]\n```";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{"role": "system", "content": "You output valid JSON arrays only."}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .expect(1)
        .mount(&server)
        .await;

    let parse = gateway_for(&server)
        .research_resources("XSS")
        .await
        .expect("resources");
    let ResourceParse::Parsed(items) = parse else {
        panic!("expected parsed resources");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "OWASP XSS");
    assert_eq!(items[1].url, "");
    assert!(items.iter().all(|i| i.source_tag == SourceTag::Primary));
}

#[tokio::test]
async fn research_resources_without_array_is_malformed_not_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("I cannot help with that.")),
        )
        .mount(&server)
        .await;

    let parse = gateway_for(&server)
        .research_resources("XSS")
        .await
        .expect("parse outcome");
    assert!(matches!(parse, ResourceParse::Malformed { .. }));
}
