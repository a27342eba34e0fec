//! HTTP backend wire behavior against a local mock server.

#![cfg(feature = "http")]

use httpmock::prelude::*;
use serde_json::json;

use imagineer::backends::{
    BackendError, ChatBackend, GenerationParams, HttpChatBackend, HttpImageBackend, ImageBackend,
};
use imagineer::message::Message;

#[tokio::test]
async fn chat_backend_extracts_completion_content() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer test-key")
                .json_body_partial(r#"{"model": "test-model"}"#);
            then.status(200).json_body(json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Paris."}}
                ]
            }));
        })
        .await;

    let backend = HttpChatBackend::new(server.base_url(), "test-key", "test-model");
    let reply = backend
        .complete(&[Message::user("what is the capital of France")])
        .await
        .unwrap();

    assert_eq!(reply, "Paris.");
    mock.assert_async().await;
}

#[tokio::test]
async fn chat_backend_rejects_response_without_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({"choices": []}));
        })
        .await;

    let backend = HttpChatBackend::new(server.base_url(), "test-key", "test-model");
    let result = backend.complete(&[Message::user("hello")]).await;

    assert!(matches!(result, Err(BackendError::Provider { .. })));
}

#[tokio::test]
async fn chat_backend_surfaces_http_errors() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(500).body("upstream exploded");
        })
        .await;

    let backend = HttpChatBackend::new(server.base_url(), "test-key", "test-model");
    let result = backend.complete(&[Message::user("hello")]).await;

    assert!(matches!(result, Err(BackendError::Http(_))));
}

#[tokio::test]
async fn image_backend_posts_params_and_returns_raw_json() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/images/generations")
                .header("authorization", "Bearer test-key")
                .json_body(json!({
                    "model": "black-forest-labs/FLUX.1-schnell-Free",
                    "prompt": "a cat in space, detailed",
                    "steps": 4,
                    "n": 4,
                }));
            then.status(200).json_body(json!({
                "data": [{"url": "https://img.example/0.png"}]
            }));
        })
        .await;

    let backend = HttpImageBackend::new(server.base_url(), "test-key");
    let response = backend
        .generate("a cat in space, detailed", &GenerationParams::default())
        .await
        .unwrap();

    assert_eq!(
        response["data"][0]["url"].as_str(),
        Some("https://img.example/0.png")
    );
    mock.assert_async().await;
}
