//! Plain-text extraction from resume files.

use std::path::Path;

use tracing::{info, warn};

/// The document collaborator: file path in, plain text out. Unreadable or
/// unsupported files yield an empty string.
pub trait DocumentReader {
    fn read(&self, path: &Path) -> String;
}

/// Dispatches on extension: `.pdf` via `pdf-extract`, `.txt` as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDocumentReader;

impl DocumentReader for FileDocumentReader {
    fn read(&self, path: &Path) -> String {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let result = match extension.as_str() {
            "pdf" => pdf_extract::extract_text(path).map_err(|e| e.to_string()),
            "txt" => std::fs::read_to_string(path).map_err(|e| e.to_string()),
            other => {
                warn!("Unsupported file format: .{other} ({})", path.display());
                return String::new();
            }
        };

        match result {
            Ok(text) => {
                info!("Read {} characters from {}", text.chars().count(), path.display());
                text
            }
            Err(e) => {
                warn!("Error reading {}: {e}", path.display());
                String::new()
            }
        }
    }
}
