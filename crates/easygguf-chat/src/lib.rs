//! Conversation management for easygguf
//!
//! This crate provides the prompt template, the bounded conversation history
//! and the chat session that turns one user message into one model reply.

pub mod chat;

// Re-export commonly used types
pub use chat::history::{keep_last_lines, History};
pub use chat::prompt::{clean_response, format_turn, PromptTemplate};
pub use chat::session::{ChatSession, TurnOutcome};
