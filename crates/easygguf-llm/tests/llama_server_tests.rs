mod fixtures;

use easygguf_llm::{BackendType, ClientFactory, CompletionModel, LlamaServerClient};
use easygguf_types::{GenerationError, GenerationParams, LoadError, ModelParams};
use fixtures::LlamaMockServer;
use pretty_assertions::assert_eq;

const PROMPT: &str = "<|system|>\nBe nice.\n<|end|>\n<|user|>\nHi\n<|end|>\n<|assistant|>\n";

async fn connected(server: &LlamaMockServer) -> LlamaServerClient {
    server.mock_healthy().await;
    LlamaServerClient::connect(&server.uri(), &ModelParams::default())
        .await
        .expect("healthy server should connect")
}

#[tokio::test]
async fn test_connect_fails_when_server_is_down() {
    // Nothing listens on port 9 (discard) in the test environment
    let result = LlamaServerClient::connect("http://127.0.0.1:9", &ModelParams::default()).await;
    assert!(matches!(result, Err(LoadError::Unreachable { .. })));
}

#[tokio::test]
async fn test_connect_fails_while_model_is_loading() {
    let server = LlamaMockServer::new().await;
    server.mock_loading().await;

    match LlamaServerClient::connect(&server.uri(), &ModelParams::default()).await {
        Err(LoadError::Unreachable { reason, .. }) => assert!(reason.contains("503")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("loading server should not be reported healthy"),
    }
}

#[tokio::test]
async fn test_factory_loads_server_backend() {
    let server = LlamaMockServer::new().await;
    server.mock_healthy().await;
    server.mock_completion("Hello!").await;

    let model = ClientFactory::load(BackendType::Server, &ModelParams::default(), &server.uri())
        .await
        .expect("server backend should load");

    assert!(model.describe().starts_with("llama.cpp server at "));
    let completion = model.complete(PROMPT, &GenerationParams::default()).await.unwrap();
    assert_eq!(completion.first_text(), Some("Hello!"));
}

#[tokio::test]
async fn test_complete_returns_first_choice() {
    let server = LlamaMockServer::new().await;
    let client = connected(&server).await;
    server.mock_completion("  Hello there!  ").await;

    let completion = client.complete(PROMPT, &GenerationParams::default()).await.unwrap();

    assert_eq!(completion.choices.len(), 1);
    assert_eq!(completion.first_text(), Some("  Hello there!  "));
    assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_complete_with_no_choices() {
    let server = LlamaMockServer::new().await;
    let client = connected(&server).await;
    server.mock_no_choices().await;

    let completion = client.complete(PROMPT, &GenerationParams::default()).await.unwrap();
    assert!(completion.choices.is_empty());
    assert_eq!(completion.first_text(), None);
}

#[tokio::test]
async fn test_complete_reports_http_status() {
    let server = LlamaMockServer::new().await;
    let client = connected(&server).await;
    server.mock_error(500, "context overflow").await;

    match client.complete(PROMPT, &GenerationParams::default()).await {
        Err(GenerationError::Status { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "context overflow");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_reports_undecodable_body() {
    let server = LlamaMockServer::new().await;
    let client = connected(&server).await;
    server.mock_garbage().await;

    let result = client.complete(PROMPT, &GenerationParams::default()).await;
    assert!(matches!(result, Err(GenerationError::Decode(_))));
}

#[tokio::test]
async fn test_connect_reports_server_settings_that_differ() {
    let server = LlamaMockServer::new().await;
    server.mock_healthy().await;
    server.mock_props("/models/model.gguf", 4096).await;
    let params = ModelParams {
        context_size: 1234,
        threads: 3,
        ..ModelParams::default()
    };

    let client = LlamaServerClient::connect(&server.uri(), &params).await.unwrap();

    let warnings = client.load_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("4096 tokens, requested 1234"));
    assert!(warnings[0].contains("-c 1234"));
}

#[tokio::test]
async fn test_connect_reports_other_model_file() {
    let server = LlamaMockServer::new().await;
    server.mock_healthy().await;
    server.mock_props("/models/mistral-7b.Q4_K_M.gguf", 4096).await;

    let model = ClientFactory::load(BackendType::Server, &ModelParams::default(), &server.uri())
        .await
        .unwrap();

    let warnings = model.load_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("mistral-7b.Q4_K_M.gguf"));
}

#[tokio::test]
async fn test_connect_with_matching_server_has_no_warnings() {
    let server = LlamaMockServer::new().await;
    server.mock_healthy().await;
    server.mock_props("/srv/MODEL_INPUT/model.gguf", 4096).await;

    let client = LlamaServerClient::connect(&server.uri(), &ModelParams::default()).await.unwrap();

    assert!(client.load_warnings().is_empty());
}

#[tokio::test]
async fn test_connect_without_props_endpoint_has_no_warnings() {
    let server = LlamaMockServer::new().await;
    let client = connected(&server).await;

    assert!(client.load_warnings().is_empty());
}
