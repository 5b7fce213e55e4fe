use easygguf_types::{ASSISTANT_MARKER, DEFAULT_SYSTEM_PROMPT, END_MARKER, SYSTEM_MARKER, USER_MARKER};

/// Fixed role-delimited template every prompt is rendered from.
///
/// ```text
/// <|system|>
/// {system prompt}
/// <|end|>
/// {history}<|user|>
/// {message}
/// <|end|>
/// <|assistant|>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system_prompt: String,
}

impl PromptTemplate {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Render the prompt for `user_message`, reinjecting `history` verbatim.
    /// The result ends with an open assistant marker for the model to continue.
    pub fn build(&self, user_message: &str, history: &str) -> String {
        format!(
            "{SYSTEM_MARKER}\n{}\n{END_MARKER}\n{history}{USER_MARKER}\n{user_message}\n{END_MARKER}\n{ASSISTANT_MARKER}\n",
            self.system_prompt
        )
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

/// History entry for one completed exchange, using the same role markers as the prompt.
pub fn format_turn(user_message: &str, response: &str) -> String {
    format!(
        "{USER_MARKER}\n{user_message}\n{END_MARKER}\n{ASSISTANT_MARKER}\n{response}\n{END_MARKER}\n"
    )
}

/// Trim the raw completion and strip role markers the model echoed back.
pub fn clean_response(raw: &str) -> String {
    raw.trim()
        .replace(ASSISTANT_MARKER, "")
        .replace(END_MARKER, "")
        .trim()
        .to_string()
}
