use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DocumentError;

/// A text document loaded for comparison.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    /// File name shown in headers.
    pub name: String,
    pub lines: Vec<String>,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let bytes = std::fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| DocumentError::NotUtf8 {
            path: path.to_path_buf(),
        })?;
        let doc = Self::from_text(path, &text);
        debug!(path = %path.display(), lines = doc.lines.len(), "loaded document");
        Ok(doc)
    }

    pub fn from_text(path: &Path, text: &str) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path: path.to_path_buf(),
            name,
            lines: split_lines(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Split text into lines on `\n`.
///
/// Empty text has no lines. Otherwise a trailing newline produces a final
/// empty line, so every line feed in the source is visible in the diff.
/// A leading BOM is dropped and `\r\n` is treated as `\n`.
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
