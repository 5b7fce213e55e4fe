use easygguf_types::{LoadError, ModelParams};

use crate::client::{llama_server::LlamaServerClient, CompletionModel};
use crate::config::BackendType;

/// Builds the model handle for the selected backend
pub struct ClientFactory;

impl ClientFactory {
    /// Construct the model handle.
    ///
    /// # Arguments
    /// * `backend` - Which backend produces completions
    /// * `params` - Model path, context size, thread count and verbosity
    /// * `server_url` - Base URL of the llama.cpp server (ignored by the local backend)
    ///
    /// # Returns
    /// Boxed model handle, or the `LoadError` that makes the program stop
    pub async fn load(
        backend: BackendType,
        params: &ModelParams,
        server_url: &str,
    ) -> Result<Box<dyn CompletionModel>, LoadError> {
        match backend {
            BackendType::Server => {
                let client = LlamaServerClient::connect(server_url, params).await?;
                Ok(Box::new(client))
            }
            #[cfg(feature = "local")]
            BackendType::Local => {
                let model = crate::client::llama_local::LocalLlamaModel::load(params).await?;
                Ok(Box::new(model))
            }
            #[cfg(not(feature = "local"))]
            BackendType::Local => Err(LoadError::BackendUnavailable(backend.as_str().to_string())),
        }
    }
}
