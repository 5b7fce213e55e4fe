//! Core types and structures for easygguf
//!
//! This crate provides the foundational types shared by the model backends,
//! the chat session and the command-line application.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod error;

pub use error::{ChatError, GenerationError, LoadError};

// ============================================================================
// Constants
// ============================================================================

/// Default location of the model weights, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "MODEL_INPUT/model.gguf";

/// Default llama.cpp server address used by the `server` backend
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Context window size in tokens
pub const DEFAULT_CONTEXT_SIZE: u32 = 4096;

/// Worker threads used for inference
pub const DEFAULT_THREADS: u32 = 8;

/// History is truncated once it grows past this many characters
pub const MAX_HISTORY_CHARS: usize = 2000;

/// Number of trailing newline-delimited segments kept on truncation
pub const HISTORY_KEEP_LINES: usize = 20;

/// Instruction placed in the system section of every prompt
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer clearly and concisely.";

// ============================================================================
// Role Markers
// ============================================================================

pub const SYSTEM_MARKER: &str = "<|system|>";
pub const USER_MARKER: &str = "<|user|>";
pub const ASSISTANT_MARKER: &str = "<|assistant|>";
pub const END_MARKER: &str = "<|end|>";

/// Literal sequences that end generation early
pub const STOP_SEQUENCES: [&str; 4] = [USER_MARKER, END_MARKER, "You:", "\n\nYou:"];

// ============================================================================
// Model Parameters
// ============================================================================

/// Parameters used once, when the model handle is constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    pub model_path: PathBuf,
    pub context_size: u32,
    pub threads: u32,
    pub verbose: bool,
}

impl ModelParams {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Self::default()
        }
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            context_size: DEFAULT_CONTEXT_SIZE,
            threads: DEFAULT_THREADS,
            verbose: false,
        }
    }
}

/// Sampling configuration sent with every completion request.
///
/// Field names follow the OpenAI-compatible completion API so the struct can
/// be serialized straight into a llama.cpp server request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub repeat_penalty: f32,
    pub stop: Vec<String>,
    pub echo: bool,
    pub stream: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            repeat_penalty: 1.1,
            stop: STOP_SEQUENCES.iter().map(|s| s.to_string()).collect(),
            echo: false,
            stream: false,
        }
    }
}

// ============================================================================
// Completion Types
// ============================================================================

/// Result of a completion request: a list of choices, each carrying text.
///
/// A body without `choices` deserializes to an empty list rather than an
/// error, so callers can treat it as "nothing generated".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Completion {
    /// Completion holding a single choice with the given text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![CompletionChoice {
                text: text.into(),
                index: 0,
                finish_reason: Some("stop".to_string()),
            }],
        }
    }

    /// Text of the first choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.text.as_str())
    }
}
