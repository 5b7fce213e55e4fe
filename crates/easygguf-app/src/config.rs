use anyhow::{bail, Result};
use std::path::PathBuf;

use easygguf_llm::BackendType;
use easygguf_types::{ModelParams, DEFAULT_CONTEXT_SIZE, DEFAULT_SYSTEM_PROMPT, DEFAULT_THREADS};

use crate::cli::Cli;

/// Application configuration derived from CLI arguments and environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend: BackendType,
    pub model_params: ModelParams,
    pub server_url: String,
    pub system_prompt: String,
    pub log_dir: Option<PathBuf>,
    pub verbose: bool,
}

/// Set up application configuration from CLI arguments.
///
/// Precedence: CLI flags > EASYGGUF_* env (including `.env`) > defaults.
/// clap already applied the env fallbacks; this validates and fills the rest.
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let backend = match cli.backend.as_deref() {
        Some(name) => match BackendType::from_str(name) {
            Some(backend) => backend,
            None => bail!("Unknown backend '{}'. Use 'local' or 'server'.", name),
        },
        None => BackendType::default_for_build(),
    };

    let context_size = cli.ctx_size.unwrap_or(DEFAULT_CONTEXT_SIZE);
    if context_size == 0 {
        bail!("--ctx-size must be greater than zero");
    }

    // llama-server picks its thread count at startup and cannot report it
    if backend == BackendType::Server && cli.threads.is_some() {
        bail!("--threads only applies to the local backend; start llama-server with -t instead");
    }
    let threads = cli.threads.unwrap_or(DEFAULT_THREADS);
    if threads == 0 {
        bail!("--threads must be greater than zero");
    }

    let system_prompt = cli
        .system_prompt
        .as_deref()
        .map(str::trim)
        .filter(|prompt| !prompt.is_empty())
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
        .to_string();

    let model_params = ModelParams {
        model_path: cli.model_path.clone(),
        context_size,
        threads,
        verbose: cli.verbose,
    };

    Ok(AppConfig {
        backend,
        model_params,
        server_url: cli.server_url.clone(),
        system_prompt,
        log_dir: cli.log_dir.clone(),
        verbose: cli.verbose,
    })
}
