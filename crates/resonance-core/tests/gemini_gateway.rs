use resonance_core::{
    GeminiClient, GatewayError, ModelGateway, Reply, CONNECTION_FALLBACK, NO_CONTENT_FALLBACK,
    SYSTEM_INSTRUCTION,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key")
        .with_model("gemini-test")
        .with_base_url(&server.uri())
}

fn answer_body(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn sends_prompt_and_system_instruction_with_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .and(body_json(json!({
            "contents": [{ "parts": [{ "text": "hello there" }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body("Find leverage.")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).query("hello there", SYSTEM_INSTRUCTION).await;
    assert_eq!(reply, Reply::Answer("Find leverage.".to_string()));
}

#[tokio::test]
async fn missing_candidates_gives_no_content_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).query("x", SYSTEM_INSTRUCTION).await;
    assert_eq!(reply, Reply::NoContent);
    assert_eq!(reply.text(), NO_CONTENT_FALLBACK);
}

#[tokio::test]
async fn empty_text_gives_no_content_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(answer_body("")))
        .mount(&server)
        .await;

    let reply = client_for(&server).query("x", SYSTEM_INSTRUCTION).await;
    assert_eq!(reply, Reply::NoContent);
}

#[tokio::test]
async fn server_error_gives_connection_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server).query("x", SYSTEM_INSTRUCTION).await;
    assert_eq!(reply, Reply::Broken);
    assert_eq!(reply.text(), CONNECTION_FALLBACK);
}

#[tokio::test]
async fn authorization_failure_surfaces_status_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.generate("x", SYSTEM_INSTRUCTION).await {
        Err(GatewayError::Status { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected status error, got {:?}", other),
    }
    assert_eq!(client.query("x", SYSTEM_INSTRUCTION).await, Reply::Broken);
}

#[tokio::test]
async fn non_json_body_gives_connection_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>sugar rush</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.generate("x", SYSTEM_INSTRUCTION).await,
        Err(GatewayError::Parse(_))
    ));
    assert_eq!(client.query("x", SYSTEM_INSTRUCTION).await, Reply::Broken);
}

#[tokio::test]
async fn unreachable_host_gives_connection_fallback() {
    // Nothing listens on port 1
    let client = GeminiClient::new("test-key").with_base_url("http://127.0.0.1:1");

    match client.generate("x", SYSTEM_INSTRUCTION).await {
        Err(GatewayError::Http(e)) => assert!(!e.to_string().contains("test-key")),
        other => panic!("expected transport error, got {:?}", other),
    }
    assert_eq!(client.query("x", SYSTEM_INSTRUCTION).await, Reply::Broken);
}
