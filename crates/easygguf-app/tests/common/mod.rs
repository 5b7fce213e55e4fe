use anyhow::Result;
use easygguf::{CompletionModel, GenerationError, LineReader, ReadOutcome};
use easygguf::types::{Completion, GenerationParams};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Model that replays scripted results and counts how often it was called
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<Completion, GenerationError>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<Completion, GenerationError>>) -> (Self, Arc<Mutex<Vec<String>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let model = Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::clone(&calls),
        };
        (model, calls)
    }
}

#[async_trait::async_trait]
impl CompletionModel for ScriptedModel {
    async fn complete(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<Completion, GenerationError> {
        self.calls.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Inference("script exhausted".to_string())))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Input source that hands out prepared lines, then reports end of input
pub struct ScriptedInput {
    lines: VecDeque<ReadOutcome>,
    pub prompts_shown: usize,
}

impl ScriptedInput {
    pub fn lines(lines: &[&str]) -> Self {
        Self::outcomes(lines.iter().map(|l| ReadOutcome::Line(l.to_string())).collect())
    }

    pub fn outcomes(outcomes: Vec<ReadOutcome>) -> Self {
        Self {
            lines: outcomes.into(),
            prompts_shown: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineReader for ScriptedInput {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        self.prompts_shown += 1;
        Ok(self.lines.pop_front().unwrap_or(ReadOutcome::Eof))
    }
}
