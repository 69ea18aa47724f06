use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const RULE: &str = "================================================================================";

/// Optional append-only record of every prompt sent to the provider
///
/// Disabled when no path is configured. Write failures are logged and swallowed; a broken
/// log file must never fail a submission.
#[derive(Debug, Clone, Default)]
pub struct PromptLog {
    path: Option<PathBuf>,
}

impl PromptLog {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub async fn record(&self, prompt_name: &str, model: &str, prompt: &str) {
        let Some(path) = &self.path else {
            return;
        };

        let entry = format!(
            "\n{RULE}\nTimestamp: {}\nPrompt Name: {}\nModel: {}\n--- START PROMPT ---\n{}\n--- END PROMPT ---\n{RULE}\n",
            Utc::now().to_rfc3339(),
            prompt_name,
            model,
            prompt
        );

        if let Err(e) = Self::append(path, &entry).await {
            tracing::warn!(error = %e, path = %path.display(), "Failed to write prompt log");
        } else {
            tracing::debug!(prompt = %prompt_name, path = %path.display(), "Logged prompt");
        }
    }

    async fn append(path: &Path, entry: &str) -> std::io::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }
}
