use anyhow::Result;
use clap::Parser;
use std::io;

use easygguf::{run_repl_mode, setup_from_cli, write_completions, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Some(shell) = cli.generate {
        write_completions(shell, &mut io::stdout());
        return Ok(());
    }

    let config = setup_from_cli(&cli)?;
    run_repl_mode(config).await
}
