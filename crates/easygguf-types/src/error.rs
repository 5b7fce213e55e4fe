use std::path::PathBuf;
use thiserror::Error;

/// Failure to construct the model handle. Always fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not load model from {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("inference server at {url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("backend '{0}' is not available in this build")]
    BackendUnavailable(String),
}

/// Failure while producing a single completion. The chat loop recovers from these.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode completion: {0}")]
    Decode(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl ChatError {
    /// Load failures end the program; generation failures only end the turn.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChatError::Load(_))
    }
}
