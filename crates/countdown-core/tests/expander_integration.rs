//! Prompt expander against a mock generateContent endpoint.

use countdown_core::storage::ExpanderConfig;
use countdown_core::{ExpanderError, GeminiExpander, PromptExpander};
use mockito::Matcher;

const PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn expander(url: &str) -> GeminiExpander {
    let config = ExpanderConfig {
        model: "gemini-test".into(),
        endpoint: url.into(),
        timeout_secs: 5,
    };
    GeminiExpander::new("test-key", &config).unwrap()
}

fn envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
    .to_string()
}

#[tokio::test]
async fn expands_prompt_into_records() {
    let mut server = mockito::Server::new_async().await;
    let text = r#"[
        {"title": "Physics Final", "time": "2099-05-10T09:00:00Z", "description": "Hall B"},
        {"id": "keep-me", "title": "Chemistry Final", "time": "2099-05-14T09:00:00Z"}
    ]"#;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::Regex("semester exams".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(text))
        .create_async()
        .await;

    let records = expander(&server.url()).expand("semester exams").await;
    mock.assert_async().await;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Physics Final");
    assert_eq!(records[0].description, "Hall B");
    assert!(!records[0].id.is_empty());
    assert_eq!(records[1].id, "keep-me");
}

#[tokio::test]
async fn server_error_yields_empty_list() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let ex = expander(&server.url());
    assert!(ex.expand("anything").await.is_empty());
    assert!(matches!(
        ex.try_expand("anything").await,
        Err(ExpanderError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn malformed_payload_yields_empty_list() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope(r#"{"title": "not an array"}"#))
        .create_async()
        .await;

    let ex = expander(&server.url());
    assert!(ex.expand("anything").await.is_empty());
    assert!(matches!(
        ex.try_expand("anything").await,
        Err(ExpanderError::Schema(_))
    ));
}

#[tokio::test]
async fn missing_candidates_yields_empty_list() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates": []}"#)
        .create_async()
        .await;

    assert!(expander(&server.url()).expand("anything").await.is_empty());
}

#[tokio::test]
async fn unreachable_service_yields_empty_list() {
    // Nothing listens on the discard port.
    let records = expander("http://127.0.0.1:9").expand("anything").await;
    assert!(records.is_empty());
}
