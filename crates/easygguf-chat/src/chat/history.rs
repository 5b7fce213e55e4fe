use easygguf_types::{HISTORY_KEEP_LINES, MAX_HISTORY_CHARS};

use crate::chat::prompt::format_turn;

/// Raw conversation history, reinjected verbatim into every prompt.
///
/// Append-only except for truncation: once the text grows past `max_chars`
/// characters only the last `keep_lines` newline-delimited segments are kept.
/// Truncation counts lines, not turns, so it may cut through the middle of a
/// turn's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    text: String,
    max_chars: usize,
    keep_lines: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_limits(MAX_HISTORY_CHARS, HISTORY_KEEP_LINES)
    }

    pub fn with_limits(max_chars: usize, keep_lines: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
            keep_lines,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in characters (not bytes)
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Append one exchange and truncate if the text is now over the limit.
    /// Returns whether truncation happened.
    pub fn record_turn(&mut self, user_message: &str, response: &str) -> bool {
        self.text.push_str(&format_turn(user_message, response));
        self.truncate_if_needed()
    }

    fn truncate_if_needed(&mut self) -> bool {
        if self.char_count() <= self.max_chars {
            return false;
        }
        self.text = keep_last_lines(&self.text, self.keep_lines);
        true
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep the last `n` segments of `text` split on `\n`, rejoined with `\n`.
///
/// A trailing newline produces an empty final segment, which counts toward `n`.
pub fn keep_last_lines(text: &str, n: usize) -> String {
    let segments: Vec<&str> = text.split('\n').collect();
    let start = segments.len().saturating_sub(n);
    segments[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_history_is_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.as_str(), "");
        assert_eq!(history.char_count(), 0);
    }

    #[test]
    fn test_record_single_turn() {
        let mut history = History::new();
        let truncated = history.record_turn("Hi", "Hello!");
        assert!(!truncated);
        assert_eq!(
            history.as_str(),
            "<|user|>\nHi\n<|end|>\n<|assistant|>\nHello!\n<|end|>\n"
        );
    }

    #[test]
    fn test_turns_accumulate_in_order() {
        let mut history = History::new();
        history.record_turn("one", "1");
        history.record_turn("two", "2");
        assert_eq!(
            history.as_str(),
            format!("{}{}", format_turn("one", "1"), format_turn("two", "2"))
        );
    }

    #[test]
    fn test_keep_last_lines() {
        assert_eq!(keep_last_lines("a\nb\nc\nd", 2), "c\nd");
        assert_eq!(keep_last_lines("a\nb", 5), "a\nb");
        assert_eq!(keep_last_lines("a\nb\n", 2), "b\n");
        assert_eq!(keep_last_lines("", 3), "");
    }

    #[test]
    fn test_truncation_kept_at_exact_limit() {
        // One turn with the limit set to its exact length: not truncated
        let turn = format_turn("Hi", "Hello!");
        let mut history = History::with_limits(turn.chars().count(), 2);
        assert!(!history.record_turn("Hi", "Hello!"));
        assert_eq!(history.as_str(), turn);
    }

    #[test]
    fn test_truncation_keeps_last_segments() {
        let mut history = History::with_limits(10, 3);
        assert!(history.record_turn("Hi", "Hello!"));
        // Segments: ..., "Hello!", "<|end|>", ""
        assert_eq!(history.as_str(), "Hello!\n<|end|>\n");
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        // 122 chars but 162 bytes after two turns
        let mut history = History::with_limits(130, 20);
        let message = "é".repeat(10);
        assert!(!history.record_turn(&message, &message));
        assert!(!history.record_turn(&message, &message));
        assert_eq!(history.char_count(), 122);
        assert!(history.as_str().len() > 130);
        assert!(history.as_str().starts_with("<|user|>"));
    }

    #[test]
    fn test_default_limits_truncate_long_conversation() {
        let mut history = History::new();
        let long = "word ".repeat(100);
        let mut truncated_any = false;
        for _ in 0..10 {
            truncated_any |= history.record_turn(&long, &long);
        }
        assert!(truncated_any);
        // 20 segments joined by 19 newlines
        assert!(history.as_str().matches('\n').count() <= HISTORY_KEEP_LINES - 1);
    }
}
