use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock llama.cpp server for exercising the HTTP backend
pub struct LlamaMockServer {
    server: MockServer,
}

impl LlamaMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Server reports itself ready
    pub async fn mock_healthy(&self) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&self.server)
            .await;
    }

    /// Server is up but still loading its model
    pub async fn mock_loading(&self) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(
                ResponseTemplate::new(503)
                    .set_body_json(json!({ "error": { "message": "Loading model" } })),
            )
            .mount(&self.server)
            .await;
    }

    /// `/props` describing the model and context window the server was started with
    pub async fn mock_props(&self, model_path: &str, n_ctx: u32) {
        Mock::given(method("GET"))
            .and(path("/props"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model_path": model_path,
                "total_slots": 1,
                "default_generation_settings": {
                    "n_ctx": n_ctx,
                    "model": model_path
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Successful completion whose first choice carries `text`
    pub async fn mock_completion(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .and(body_partial_json(json!({
                "max_tokens": 512,
                "top_k": 40,
                "stop": ["<|user|>", "<|end|>", "You:", "\n\nYou:"],
                "echo": false,
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-test",
                "object": "text_completion",
                "model": "model.gguf",
                "choices": [{
                    "text": text,
                    "index": 0,
                    "finish_reason": "stop"
                }],
                "usage": {
                    "prompt_tokens": 12,
                    "completion_tokens": 3,
                    "total_tokens": 15
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Completion response with an empty choices list
    pub async fn mock_no_choices(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-test",
                "choices": []
            })))
            .mount(&self.server)
            .await;
    }

    /// Completion endpoint failing with `status`
    pub async fn mock_error(&self, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string(message))
            .mount(&self.server)
            .await;
    }

    /// Completion endpoint answering with something that is not JSON
    pub async fn mock_garbage(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&self.server)
            .await;
    }
}
