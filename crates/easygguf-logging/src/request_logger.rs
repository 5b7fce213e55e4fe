use colored::Colorize;
use easygguf_types::{Completion, GenerationParams};
use std::io::{self, Write};

use crate::safe_truncate;

/// Prompts longer than this are shortened in the console dump
const MAX_LOGGED_CHARS: usize = 5000;

/// Plain-text dump of an outgoing completion request
pub fn format_request_log(backend: &str, prompt: &str, params: &GenerationParams) -> String {
    let mut log_content = String::new();
    log_content.push_str(&format!("Backend: {}\n\n", backend));

    log_content.push_str("Parameters:\n");
    match serde_json::to_string_pretty(params) {
        Ok(json) => log_content.push_str(&json),
        Err(e) => log_content.push_str(&format!("Error serializing parameters: {}", e)),
    }

    log_content.push_str("\n\nPrompt:\n");
    log_content.push_str(&safe_truncate(prompt, MAX_LOGGED_CHARS));
    if prompt.chars().count() > MAX_LOGGED_CHARS {
        log_content.push_str(&format!("\n... (truncated, total {} bytes)", prompt.len()));
    }
    log_content
}

/// Plain-text dump of a completion as returned by the backend
pub fn format_response_log(completion: &Completion) -> String {
    match serde_json::to_string_pretty(completion) {
        Ok(json) => safe_truncate(&json, MAX_LOGGED_CHARS),
        Err(e) => format!("Error serializing completion: {}", e),
    }
}

/// Write the request dump shown in verbose mode
pub fn write_request_log<W: Write + ?Sized>(
    out: &mut W,
    backend: &str,
    prompt: &str,
    params: &GenerationParams,
) -> io::Result<()> {
    writeln!(out, "\n{}", "═".repeat(80).bright_cyan())?;
    writeln!(out, "{}", "🔍 COMPLETION REQUEST".bright_cyan().bold())?;
    writeln!(out, "{}", "═".repeat(80).bright_cyan())?;
    writeln!(out, "{}", format_request_log(backend, prompt, params))?;
    writeln!(out, "{}", "═".repeat(80).bright_cyan())
}

/// Write the completion returned by the backend, verbose mode only
pub fn write_response_log<W: Write + ?Sized>(out: &mut W, completion: &Completion) -> io::Result<()> {
    writeln!(out, "{}", "📥 COMPLETION RESPONSE".bright_cyan().bold())?;
    writeln!(out, "{}", format_response_log(completion))?;
    writeln!(out, "{}", "═".repeat(80).bright_cyan())
}
