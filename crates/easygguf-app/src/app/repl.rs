use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};

use easygguf_chat::{ChatSession, PromptTemplate, TurnOutcome};
use easygguf_llm::{ClientFactory, CompletionModel};
use easygguf_logging::ConversationLogger;
use easygguf_types::ChatError;

use crate::config::AppConfig;

/// Result of asking the user for one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Ctrl-C at the prompt
    Interrupted,
    /// Ctrl-D or closed stdin
    Eof,
}

/// Source of user input lines
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;
}

impl LineReader for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.readline(prompt) {
            Ok(line) => {
                if worth_remembering(&line) {
                    self.add_history_entry(line.as_str())?;
                }
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(err.into()),
        }
    }
}

/// Lines kept in the editor's up-arrow history
fn worth_remembering(line: &str) -> bool {
    !line.trim().is_empty()
}

/// What a line of input asks the loop to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Exit,
    Skip,
    Message(String),
}

/// Classify one raw input line. The exit keywords are checked before emptiness.
pub fn classify_input(line: &str) -> InputAction {
    let line = line.trim();
    let lowered = line.to_lowercase();
    if lowered == "exit" || lowered == "quit" {
        InputAction::Exit
    } else if line.is_empty() {
        InputAction::Skip
    } else {
        InputAction::Message(line.to_string())
    }
}

/// Construct the model handle for the configured backend
pub async fn load_model(config: &AppConfig) -> Result<Box<dyn CompletionModel>, ChatError> {
    let model = ClientFactory::load(config.backend, &config.model_params, &config.server_url).await?;
    Ok(model)
}

/// Read, generate, print; until an exit keyword or end of input.
///
/// Generation failures are reported and the loop goes back to the prompt;
/// history only changes on a non-empty reply.
pub async fn run_chat_loop<R, W>(session: &mut ChatSession, input: &mut R, out: &mut W) -> Result<()>
where
    R: LineReader + ?Sized,
    W: Write + ?Sized,
{
    let prompt = format!("{} ", "You:".bright_green().bold());

    loop {
        writeln!(out)?;
        out.flush()?;

        let line = match input.read_line(&prompt) {
            Ok(ReadOutcome::Line(line)) => line,
            Ok(ReadOutcome::Interrupted) => {
                writeln!(out, "{}", "^C".bright_black())?;
                continue;
            }
            Ok(ReadOutcome::Eof) => {
                writeln!(out, "{}", "Goodbye!".bright_cyan())?;
                break;
            }
            Err(err) => {
                writeln!(out, "{} {}", "[ERROR]".bright_red().bold(), err)?;
                break;
            }
        };

        let message = match classify_input(&line) {
            InputAction::Exit => {
                writeln!(out, "{}", "Goodbye!".bright_cyan())?;
                break;
            }
            InputAction::Skip => continue,
            InputAction::Message(message) => message,
        };

        match session.respond_with_trace(&message, &mut *out).await {
            Ok(outcome) => {
                let text = if matches!(outcome, TurnOutcome::Reply(_)) {
                    outcome.display_text().normal()
                } else {
                    outcome.display_text().yellow()
                };
                writeln!(out, "{} {}", "Chatbot:".bright_cyan().bold(), text)?;
            }
            Err(err) => {
                writeln!(out, "{} Generation failed: {}", "[ERROR]".bright_red().bold(), err)?;
            }
        }
    }

    Ok(())
}

/// Success banner plus any settings the backend could not apply
pub fn report_loaded_model<W: Write + ?Sized>(model: &dyn CompletionModel, out: &mut W) -> Result<()> {
    writeln!(out, "{} Model successfully loaded.", "[OK]".green().bold())?;
    for warning in model.load_warnings() {
        writeln!(out, "{} {}", "[WARN]".yellow().bold(), warning)?;
    }
    writeln!(out, "{}", "Type 'exit' to quit.".bright_black())?;
    Ok(())
}

/// Run interactive REPL mode
pub async fn run_repl_mode(config: AppConfig) -> Result<()> {
    println!("{} Initializing model...", "[INFO]".bright_cyan());

    let model = match load_model(&config).await {
        Ok(model) => model,
        Err(err) => {
            // Loading is not retried; the program ends here
            println!("{} Failed to load model: {}", "[ERROR]".bright_red().bold(), err);
            return Ok(());
        }
    };

    let mut stdout = io::stdout();
    report_loaded_model(model.as_ref(), &mut stdout)?;

    if config.verbose {
        println!("{}", format!("🔧 Backend: {}", model.describe()).bright_black());
        println!("{}", format!("🔧 Model: {}", config.model_params.model_path.display()).bright_black());
        println!(
            "{}",
            format!(
                "🔧 Context: {} tokens, {} threads",
                config.model_params.context_size, config.model_params.threads
            )
            .bright_black()
        );
    }

    let logger = match &config.log_dir {
        Some(dir) => match ConversationLogger::new(dir).await {
            Ok(logger) => {
                if config.verbose {
                    println!(
                        "{}",
                        format!("📝 Logging conversation to {}", logger.file_path().display()).bright_black()
                    );
                }
                Some(logger)
            }
            Err(e) => {
                eprintln!("Logging disabled: {:#}", e);
                None
            }
        },
        None => None,
    };

    let mut session = ChatSession::new(model)
        .with_template(PromptTemplate::new(config.system_prompt.clone()))
        .with_logger(logger)
        .with_verbose(config.verbose);
    session.start().await;

    let mut rl = DefaultEditor::new()?;
    let result = run_chat_loop(&mut session, &mut rl, &mut stdout).await;

    session.shutdown().await;
    result
}
