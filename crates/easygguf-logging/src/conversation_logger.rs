use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

#[derive(Serialize)]
struct LogEntry<'a> {
    timestamp: String, // ISO‑8601 UTC
    session_id: String,
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

/// Appends one JSON object per line for every message exchanged in a session.
pub struct ConversationLogger {
    file_path: PathBuf,
    session_id: Uuid,
    file: Option<tokio::fs::File>,
}

impl ConversationLogger {
    /// Create a new logger inside `log_dir`; the file name is based on the current UTC time.
    pub async fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .await
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

        let now: DateTime<Utc> = Utc::now();
        let session_id = Uuid::new_v4();
        let filename = format!(
            "easygguf-{}-{}.jsonl",
            now.format("%Y-%m-%d-%H%M%S"),
            &session_id.simple().to_string()[..8]
        );
        let file_path = log_dir.join(filename);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .await
            .with_context(|| format!("Failed to open log file {}", file_path.display()))?;

        Ok(Self {
            file_path,
            session_id,
            file: Some(file),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Append a single log entry. Write failures are reported and otherwise ignored.
    pub async fn log(&mut self, role: &str, content: &str, model: Option<&str>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            session_id: self.session_id.to_string(),
            role,
            content,
            model,
        };
        if let Some(file) = &mut self.file {
            if let Ok(mut json) = serde_json::to_string(&entry) {
                json.push('\n');
                if let Err(e) = file.write_all(json.as_bytes()).await {
                    eprintln!("[Logging error] {}", e);
                }
            }
        }
    }

    /// Close the logger (explicit drop). Called on graceful shutdown.
    pub async fn shutdown(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush().await;
            let _ = file.sync_all().await;
        }
    }
}
