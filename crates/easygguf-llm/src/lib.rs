//! # easygguf-llm
//!
//! A single completion interface over the ways easygguf can reach a GGUF model:
//! - llama.cpp server (OpenAI-compatible `/v1/completions`)
//! - llama.cpp in-process, behind the `local` feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use easygguf_llm::{BackendType, ClientFactory, CompletionModel};
//! use easygguf_types::{GenerationParams, ModelParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let model = ClientFactory::load(
//!         BackendType::Server,
//!         &ModelParams::default(),
//!         "http://127.0.0.1:8080",
//!     )
//!     .await?;
//!
//!     let completion = model
//!         .complete("<|user|>\nHello!\n<|end|>\n<|assistant|>\n", &GenerationParams::default())
//!         .await?;
//!     println!("{:?}", completion.first_text());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;


pub use client::{
    find_stop_sequence, llama_server::LlamaServerClient, token_text::TokenTextDecoder, CompletionModel,
};

#[cfg(feature = "local")]
pub use client::llama_local::LocalLlamaModel;

pub use config::{normalize_server_url, BackendType, ClientFactory};
