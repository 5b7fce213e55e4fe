use async_trait::async_trait;
use easygguf_types::{Completion, GenerationError, GenerationParams};

#[cfg(feature = "local")]
pub mod llama_local;
pub mod llama_server;
pub mod token_text;

/// Completion interface implemented by every backend.
///
/// A value of this trait is the process-wide model handle: it is built once,
/// owned by the chat session and dropped when the program exits.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Generate a completion for a fully formatted prompt (non-streaming)
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<Completion, GenerationError>;

    /// Short human-readable description of where completions come from
    fn describe(&self) -> String;

    /// Settings that were requested but could not be applied while loading
    fn load_warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Byte offset of the earliest stop sequence found in `text`, if any.
pub fn find_stop_sequence(text: &str, stops: &[String]) -> Option<usize> {
    stops
        .iter()
        .filter(|stop| !stop.is_empty())
        .filter_map(|stop| text.find(stop.as_str()))
        .min()
}
