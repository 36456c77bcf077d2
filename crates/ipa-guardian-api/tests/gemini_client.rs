use ipa_guardian_api::{GeminiClient, GeminiError, Schema};
use mockito::Matcher;
use serde_json::json;

const ENDPOINT: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
    GeminiClient::with_base_url(
        "test-key".to_string(),
        "gemini-2.5-flash".to_string(),
        server.url(),
        None,
    )
    .unwrap()
}

fn candidate_body(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

#[tokio::test]
async fn test_generate_content_sends_schema_and_returns_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "list apps" }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": { "type": "ARRAY", "items": { "type": "STRING" } }
            }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body(r#"["Photon","Ledger"]"#))
        .create_async()
        .await;

    let client = client_for(&server);
    let text = client
        .generate_content("list apps", &Schema::array(Schema::string()))
        .await
        .unwrap();

    assert_eq!(text, r#"["Photon","Ledger"]"#);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_required() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(403)
        .with_body(r#"{"error":{"message":"API key not valid"}}"#)
        .create_async()
        .await;

    let result = client_for(&server)
        .generate_content("prompt", &Schema::string())
        .await;

    assert!(matches!(result, Err(GeminiError::AuthRequired)));
}

#[tokio::test]
async fn test_rate_limit() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(429)
        .create_async()
        .await;

    let result = client_for(&server)
        .generate_content("prompt", &Schema::string())
        .await;

    assert!(matches!(result, Err(GeminiError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", ENDPOINT)
        .with_status(503)
        .with_body("overloaded")
        .expect(1)
        .create_async()
        .await;

    let result = client_for(&server)
        .generate_content("prompt", &Schema::string())
        .await;

    match result {
        Err(GeminiError::RequestFailed { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "overloaded");
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_envelope() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", ENDPOINT)
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let result = client_for(&server)
        .generate_content("prompt", &Schema::string())
        .await;

    assert!(matches!(result, Err(GeminiError::ParseError(_))));
}
