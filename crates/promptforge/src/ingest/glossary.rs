//! Glossary file ingestion.

use std::path::Path;

use crate::error::ExtractError;
use crate::extractor::{self, delimited, FileKind};

/// Character cap for glossary file content.
pub const GLOSSARY_CHAR_LIMIT: usize = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryEntry {
    pub name: String,
    pub content: String,
}

/// Reads one glossary file.
///
/// PDFs are recorded as a placeholder marker, not extracted (known
/// limitation); delimited files are normalized; everything else is read as
/// text. Content is capped at [`GLOSSARY_CHAR_LIMIT`] characters.
pub async fn read_glossary_file(path: &Path) -> Result<GlossaryEntry, ExtractError> {
    let name = extractor::display_name(path);

    let content = match FileKind::from_name(&name) {
        FileKind::Pdf => format!("[PDF: {}]", name),
        FileKind::Delimited => {
            let raw = extractor::read_text_lossy(path).await?;
            delimited::normalize(&raw)
        }
        _ => extractor::read_text_lossy(path).await?,
    };

    Ok(GlossaryEntry {
        name,
        content: extractor::truncate_chars(&content, GLOSSARY_CHAR_LIMIT),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_pdf_recorded_as_placeholder() {
        let mut temp_file = NamedTempFile::with_suffix(".pdf").unwrap();
        temp_file.write_all(b"%PDF-1.5 binary body").unwrap();

        let entry = read_glossary_file(temp_file.path()).await.unwrap();
        assert_eq!(entry.content, format!("[PDF: {}]", entry.name));
    }

    #[tokio::test]
    async fn test_csv_normalized() {
        let mut temp_file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(temp_file, "term,translation\nLetter of Credit,Аккредитив").unwrap();

        let entry = read_glossary_file(temp_file.path()).await.unwrap();
        assert_eq!(
            entry.content,
            "term | translation\nLetter of Credit | Аккредитив"
        );
    }

    #[tokio::test]
    async fn test_text_capped_at_limit() {
        let mut temp_file = NamedTempFile::with_suffix(".txt").unwrap();
        write!(temp_file, "{}", "g".repeat(GLOSSARY_CHAR_LIMIT + 100)).unwrap();

        let entry = read_glossary_file(temp_file.path()).await.unwrap();
        assert_eq!(entry.content.chars().count(), GLOSSARY_CHAR_LIMIT);
    }

    #[tokio::test]
    async fn test_missing_file_errors() {
        let result = read_glossary_file(Path::new("/nonexistent/gloss.txt")).await;
        assert!(matches!(result, Err(ExtractError::ReadFile { .. })));
    }
}
