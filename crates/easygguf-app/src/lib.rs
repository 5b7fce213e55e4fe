//! easygguf application library
//!
//! Command-line parsing, configuration and the interactive chat loop.

// Re-export workspace crates
pub use easygguf_chat::{self as chat, ChatSession, History, PromptTemplate, TurnOutcome};
pub use easygguf_llm::{self as llm, BackendType, ClientFactory, CompletionModel};
pub use easygguf_logging::{self as logging, ConversationLogger};
pub use easygguf_types::{self as types, ChatError, GenerationError, LoadError};

// Local modules
pub mod app;
pub mod cli;
pub mod config;

// Re-exports from local modules
pub use app::{run_chat_loop, run_repl_mode, InputAction, LineReader, ReadOutcome};
pub use cli::{write_completions, Cli};
pub use config::{setup_from_cli, AppConfig};
