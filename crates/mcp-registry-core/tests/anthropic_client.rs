use mcp_registry_core::llm::{
    AnthropicClient, AnthropicOptions, CompletionClient, CompletionError,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AnthropicClient {
    AnthropicClient::new(
        AnthropicOptions::new("test-key")
            .with_model("claude-test")
            .with_temperature(0.1)
            .with_base_url(server.uri()),
    )
    .unwrap()
}

#[tokio::test]
async fn completion_sends_headers_and_joins_text_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-test",
            "max_tokens": 4096,
            "system": "be helpful",
            "messages": [{"role": "user", "content": "describe"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                {"type": "text", "text": "{\"id\": "},
                {"type": "tool_use", "id": "t1"},
                {"type": "text", "text": "\"a/b\"}"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server)
        .complete("be helpful", "describe")
        .await
        .unwrap();
    assert_eq!(reply, "{\"id\": \"a/b\"}");
}

#[tokio::test]
async fn unauthorized_maps_to_api_key_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "p").await.unwrap_err();
    match &err {
        CompletionError::Unauthorized { status, message } => {
            assert_eq!(*status, 401);
            assert_eq!(message, "invalid x-api-key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("API key"));
}

#[tokio::test]
async fn server_error_keeps_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "p").await.unwrap_err();
    assert!(matches!(
        err,
        CompletionError::Status { status: 529, ref message } if message == "overloaded"
    ));
}

#[tokio::test]
async fn undecodable_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).complete("s", "p").await.unwrap_err();
    assert!(matches!(err, CompletionError::InvalidResponse(_)));
}

#[test]
fn empty_api_key_is_rejected() {
    let err = AnthropicClient::new(AnthropicOptions::new("  ")).unwrap_err();
    assert_eq!(err.to_string(), "Anthropic API key is required");
}
