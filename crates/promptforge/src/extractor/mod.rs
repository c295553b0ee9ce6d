pub mod delimited;
pub mod docx;

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::ExtractError;

/// Character cap for plain/markdown/office-extracted text.
pub const TEXT_CHAR_LIMIT: usize = 6000;

/// Character cap for delimited-text and spreadsheet-fallback text.
pub const TABLE_CHAR_LIMIT: usize = 4000;

/// File classification derived from the (lower-cased) extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    OfficeDoc,
    Delimited,
    Spreadsheet,
    Text,
}

impl FileKind {
    /// Unknown extensions fall through to the text path, never erroring
    /// solely due to type.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" => Self::Image,
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::OfficeDoc,
            "csv" | "tsv" => Self::Delimited,
            "xls" | "xlsx" => Self::Spreadsheet,
            _ => Self::Text,
        }
    }

    pub fn from_name(name: &str) -> Self {
        Self::from_extension(extension_of(name))
    }
}

/// Last dot-separated segment of the name, like the original's `split(".").pop()`.
pub(crate) fn extension_of(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or("")
}

/// Content extracted from one source file.
///
/// Binary payloads carry the whole-file base64 encoding and are never
/// truncated; text payloads are capped per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedContent {
    Image {
        base64: String,
        media_type: String,
        name: String,
    },
    Document {
        base64: String,
        name: String,
    },
    Text {
        text: String,
        name: String,
    },
}

impl ExtractedContent {
    pub fn name(&self) -> &str {
        match self {
            Self::Image { name, .. } | Self::Document { name, .. } | Self::Text { name, .. } => {
                name
            }
        }
    }
}

/// Classifies and extracts one source file.
///
/// Stateless beyond the file read, which is the only suspension point;
/// multiple extractions can run concurrently without ordering guarantees.
pub async fn extract(path: &Path) -> Result<ExtractedContent, ExtractError> {
    let name = display_name(path);

    match FileKind::from_name(&name) {
        FileKind::Image => {
            let bytes = read_bytes(path).await?;
            let media_type = mime_guess::from_path(path)
                .first()
                .map(|m| m.essence_str().to_string())
                .unwrap_or_else(|| "image/jpeg".to_string());

            Ok(ExtractedContent::Image {
                base64: BASE64.encode(&bytes),
                media_type,
                name,
            })
        }
        FileKind::Pdf => {
            let bytes = read_bytes(path).await?;
            Ok(ExtractedContent::Document {
                base64: BASE64.encode(&bytes),
                name,
            })
        }
        FileKind::OfficeDoc => {
            let bytes = read_bytes(path).await?;
            let text = docx::extract_text(&bytes)?;
            Ok(ExtractedContent::Text {
                text: truncate_chars(&text, TEXT_CHAR_LIMIT),
                name,
            })
        }
        FileKind::Delimited => {
            let raw = read_text_lossy(path).await?;
            let normalized = delimited::normalize(&raw);
            Ok(ExtractedContent::Text {
                text: truncate_chars(&normalized, TABLE_CHAR_LIMIT),
                name,
            })
        }
        FileKind::Spreadsheet => {
            // Known limitation: no structural decoding of binary spreadsheet
            // formats. Only text disguised as xls/xlsx survives this path.
            let raw = read_text_lossy(path).await?;
            Ok(ExtractedContent::Text {
                text: truncate_chars(&raw, TABLE_CHAR_LIMIT),
                name,
            })
        }
        FileKind::Text => {
            let raw = read_text_lossy(path).await?;
            Ok(ExtractedContent::Text {
                text: truncate_chars(&raw, TEXT_CHAR_LIMIT),
                name,
            })
        }
    }
}

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document")
        .to_string()
}

async fn read_bytes(path: &Path) -> Result<Vec<u8>, ExtractError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ExtractError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Lossy UTF-8 read, matching browser `readAsText` behavior for odd bytes.
pub(crate) async fn read_text_lossy(path: &Path) -> Result<String, ExtractError> {
    let bytes = read_bytes(path).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub(crate) fn truncate_chars(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        s.chars().take(limit).collect()
    }
}
