use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::io::Write;
use std::path::PathBuf;

use easygguf_types::{DEFAULT_MODEL_PATH, DEFAULT_SERVER_URL};

/// CLI arguments for easygguf. Every flag is optional; with none the chat
/// starts on the default model file with the built-in settings.
#[derive(Parser, Debug)]
#[command(name = "easygguf")]
#[command(about = "Terminal chat with a local GGUF model")]
#[command(version)]
pub struct Cli {
    /// Path to the GGUF model file
    #[arg(long, value_name = "PATH", env = "EASYGGUF_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Inference backend (local, server)
    /// Default: local when built with the `local` feature, otherwise server
    #[arg(long, value_name = "BACKEND", env = "EASYGGUF_BACKEND")]
    pub backend: Option<String>,

    /// llama.cpp server URL used by the server backend (e.g., http://localhost:8080)
    #[arg(long, value_name = "URL", env = "EASYGGUF_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Context window size in tokens [default: 4096]
    /// With the server backend this is compared against the server's own setting
    #[arg(long, value_name = "TOKENS", env = "EASYGGUF_CTX_SIZE")]
    pub ctx_size: Option<u32>,

    /// Number of inference threads, local backend only [default: 8]
    #[arg(long, value_name = "N", env = "EASYGGUF_THREADS")]
    pub threads: Option<u32>,

    /// Replace the built-in system prompt
    #[arg(long, value_name = "TEXT", env = "EASYGGUF_SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    /// Write a JSONL conversation log into this directory
    #[arg(long, value_name = "DIR", env = "EASYGGUF_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Print prompts, sampling parameters and raw completions
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub generate: Option<Shell>,
}

/// Write completions for `shell` to `out`
pub fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, out);
}
