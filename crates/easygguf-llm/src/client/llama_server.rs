use crate::client::CompletionModel;
use crate::config::normalize_server_url;
use async_trait::async_trait;
use easygguf_types::{Completion, GenerationError, GenerationParams, LoadError, ModelParams};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Request body for the OpenAI-compatible `/v1/completions` endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(flatten)]
    params: &'a GenerationParams,
}

/// Subset of llama.cpp's `GET /props` answer
#[derive(Debug, Default, Deserialize)]
struct ServerProps {
    #[serde(default)]
    model_path: Option<String>,
    #[serde(default)]
    default_generation_settings: Option<ServerGenerationSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerGenerationSettings {
    #[serde(default)]
    n_ctx: Option<u32>,
}

/// llama.cpp server client using the raw-prompt completion API
pub struct LlamaServerClient {
    base_url: String,
    model: String,
    client: reqwest::Client,
    warnings: Vec<String>,
}

impl LlamaServerClient {
    pub fn new(base_url: &str, model: String) -> Self {
        Self {
            base_url: normalize_server_url(base_url),
            model,
            client: reqwest::Client::new(),
            warnings: Vec::new(),
        }
    }

    /// Build a client and make sure the server is up and has its model loaded.
    ///
    /// The server owns the model, context size and threads, so `params` cannot
    /// be applied here. When the server reports a different model file or
    /// context window the differences are kept as load warnings.
    pub async fn connect(base_url: &str, params: &ModelParams) -> Result<Self, LoadError> {
        let mut client = Self::new(base_url, params.model_path.display().to_string());
        client.check_health().await?;
        if let Some(props) = client.fetch_props().await {
            client.warnings = settings_mismatches(&props, params);
        }
        Ok(client)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    fn props_url(&self) -> String {
        format!("{}/props", self.base_url)
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/completions", self.base_url)
    }

    async fn check_health(&self) -> Result<(), LoadError> {
        let load_err = |reason: String| LoadError::Unreachable {
            url: self.base_url.clone(),
            reason,
        };

        let response = self
            .client
            .get(self.health_url())
            .send()
            .await
            .map_err(|e| load_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // llama.cpp answers 503 while the model is still loading
            let body = response.text().await.unwrap_or_default();
            return Err(load_err(format!("health check returned {} {}", status, body.trim())));
        }

        Ok(())
    }

    // Older servers have no /props; that only means nothing can be compared
    async fn fetch_props(&self) -> Option<ServerProps> {
        let response = self.client.get(self.props_url()).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.json::<ServerProps>().await.ok()
    }
}

/// Differences between what the user asked for and what the server runs
fn settings_mismatches(props: &ServerProps, params: &ModelParams) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(n_ctx) = props.default_generation_settings.as_ref().and_then(|s| s.n_ctx) {
        if n_ctx != params.context_size {
            warnings.push(format!(
                "server context window is {} tokens, requested {}; restart llama-server with -c {}",
                n_ctx, params.context_size, params.context_size
            ));
        }
    }

    if let Some(server_path) = props.model_path.as_deref() {
        let served = Path::new(server_path).file_name();
        if served.is_some() && served != params.model_path.file_name() {
            warnings.push(format!(
                "server is serving {}, not {}",
                server_path,
                params.model_path.display()
            ));
        }
    }

    warnings
}

#[async_trait]
impl CompletionModel for LlamaServerClient {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, GenerationError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt,
            params,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        serde_json::from_str(&response_text).map_err(|e| GenerationError::Decode(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("llama.cpp server at {}", self.base_url)
    }

    fn load_warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }
}
