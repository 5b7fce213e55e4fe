use easygguf_llm::CompletionModel;
use easygguf_logging::{write_request_log, write_response_log, ConversationLogger};
use easygguf_types::{GenerationError, GenerationParams};
use std::io::{self, Write};

use crate::chat::history::History;
use crate::chat::prompt::{clean_response, PromptTemplate};

/// Shown when the model produced only whitespace or role markers
pub const NO_RESPONSE_PLACEHOLDER: &str = "[No response generated]";

/// Shown when the completion came back without any choices
pub const NO_CHOICES_PLACEHOLDER: &str = "[Error in response generation]";

/// What a successful generation request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Cleaned, non-empty reply. History was updated.
    Reply(String),
    /// The first choice was empty after cleaning. History unchanged.
    EmptyReply,
    /// The completion had no choices. History unchanged.
    NoChoices,
}

impl TurnOutcome {
    /// Text to show after the `Chatbot:` label
    pub fn display_text(&self) -> &str {
        match self {
            TurnOutcome::Reply(text) => text,
            TurnOutcome::EmptyReply => NO_RESPONSE_PLACEHOLDER,
            TurnOutcome::NoChoices => NO_CHOICES_PLACEHOLDER,
        }
    }
}

/// Owns the model handle and the conversation history for one chat.
pub struct ChatSession {
    model: Box<dyn CompletionModel>,
    template: PromptTemplate,
    params: GenerationParams,
    history: History,
    logger: Option<ConversationLogger>,
    verbose: bool,
}

impl ChatSession {
    pub fn new(model: Box<dyn CompletionModel>) -> Self {
        Self {
            model,
            template: PromptTemplate::default(),
            params: GenerationParams::default(),
            history: History::new(),
            logger: None,
            verbose: false,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn with_logger(mut self, logger: Option<ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn model_description(&self) -> String {
        self.model.describe()
    }

    /// Record the system prompt as the first conversation log entry
    pub async fn start(&mut self) {
        let system_prompt = self.template.system_prompt().to_string();
        self.log("system", &system_prompt).await;
    }

    /// Run one exchange: build the prompt, ask the model, clean the reply and
    /// update history. History only changes when a non-empty reply comes back.
    /// Verbose dumps go to stdout.
    pub async fn respond(&mut self, user_message: &str) -> Result<TurnOutcome, GenerationError> {
        let mut stdout = io::stdout();
        self.respond_with_trace(user_message, &mut stdout).await
    }

    /// Same as [`ChatSession::respond`], with verbose dumps written to `trace`
    pub async fn respond_with_trace<W: Write + ?Sized>(
        &mut self,
        user_message: &str,
        trace: &mut W,
    ) -> Result<TurnOutcome, GenerationError> {
        let prompt = self.template.build(user_message, self.history.as_str());
        if self.verbose {
            report_trace_error(write_request_log(trace, &self.model.describe(), &prompt, &self.params));
        }
        self.log("user", user_message).await;

        let completion = match self.model.complete(&prompt, &self.params).await {
            Ok(completion) => completion,
            Err(e) => {
                self.log("error", &e.to_string()).await;
                return Err(e);
            }
        };
        if self.verbose {
            report_trace_error(write_response_log(trace, &completion));
        }

        let outcome = match completion.first_text() {
            None => TurnOutcome::NoChoices,
            Some(raw) => {
                let response = clean_response(raw);
                if response.is_empty() {
                    TurnOutcome::EmptyReply
                } else {
                    self.history.record_turn(user_message, &response);
                    TurnOutcome::Reply(response)
                }
            }
        };

        let role = match outcome {
            TurnOutcome::Reply(_) => "assistant",
            _ => "error",
        };
        self.log(role, outcome.display_text()).await;

        Ok(outcome)
    }

    /// Flush the conversation log, if any
    pub async fn shutdown(&mut self) {
        if let Some(logger) = &mut self.logger {
            logger.shutdown().await;
        }
    }

    async fn log(&mut self, role: &str, content: &str) {
        if let Some(logger) = &mut self.logger {
            let model = self.model.describe();
            logger.log(role, content, Some(&model)).await;
        }
    }
}

fn report_trace_error(result: io::Result<()>) {
    if let Err(e) = result {
        eprintln!("[Logging error] {}", e);
    }
}
