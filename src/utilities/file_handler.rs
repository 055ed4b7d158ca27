//! File handler for diagnostic artifacts.
//!
//! When a generated response fails validation, the raw model text and its
//! repaired form are dumped to a directory so they can be inspected later.
//! Callers never see this text.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

/// Writes text files into a single directory.
#[derive(Debug, Clone)]
pub struct FileHandler {
    /// Directory for file storage.
    pub directory: PathBuf,
}

impl FileHandler {
    /// Create a new `FileHandler` for the given directory.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Unique artifact filename: `<UTC timestamp>-<label>-<uuid>.txt`.
    pub fn artifact_name(label: &str) -> String {
        format!(
            "{}-{}-{}.txt",
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ"),
            label,
            Uuid::new_v4()
        )
    }

    /// Save text to a file in the handler's directory.
    ///
    /// Creates the directory if it does not exist.
    pub fn save_text(&self, filename: &str, content: &str) -> std::io::Result<PathBuf> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }
        let path = self.directory.join(filename);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a validation failure artifact.
    ///
    /// Best effort: failures are logged and `None` is returned.
    pub fn save_artifact(&self, label: &str, error: &str, raw: &str, repaired: &str) -> Option<PathBuf> {
        let content = format!(
            "error: {}\n\n===== raw output =====\n{}\n\n===== repaired output =====\n{}\n",
            error, raw, repaired
        );
        match self.save_text(&Self::artifact_name(label), &content) {
            Ok(path) => {
                log::debug!("Wrote debug artifact {}", path.display());
                Some(path)
            }
            Err(e) => {
                log::warn!(
                    "Failed to write debug artifact to {}: {}",
                    self.directory.display(),
                    e
                );
                None
            }
        }
    }
}
