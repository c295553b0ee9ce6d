//! Raw text extraction from DOCX containers.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ExtractError;

/// Extracts the plain text of `word/document.xml` from an in-memory DOCX.
///
/// Legacy binary `.doc` files are not a zip container and fail here; the
/// caller surfaces that as a per-file error without touching other files.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::DocxArchive(format!("Failed to open DOCX: {}", e)))?;

    let mut document_xml = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::DocxArchive(format!("Failed to find document.xml: {}", e)))?;

    let mut xml_content = String::new();
    document_xml
        .read_to_string(&mut xml_content)
        .map_err(|e| ExtractError::DocxArchive(format!("Failed to read document.xml: {}", e)))?;

    parse_document_xml(&xml_content)
}

fn parse_document_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_element = false;
    let mut in_paragraph = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = true,
                b"p" => in_paragraph = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = false,
                b"p" => {
                    if in_paragraph {
                        text.push('\n');
                        in_paragraph = false;
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_element {
                    let decoded = e.unescape().unwrap_or_default();
                    text.push_str(&decoded);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::DocxXml(format!("XML parsing error: {}", e)));
            }
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
    <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
        <w:body>
            <w:p><w:r><w:t>First paragraph</w:t></w:r></w:p>
            <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>
        </w:body>
    </w:document>"#;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_parse_simple_xml() {
        let text = parse_document_xml(DOCUMENT_XML).unwrap();
        assert!(text.contains("First paragraph"));
        assert!(text.contains("Second paragraph"));
    }

    #[test]
    fn test_paragraphs_become_newlines() {
        let text = parse_document_xml(DOCUMENT_XML).unwrap();
        let lines: Vec<&str> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines, vec!["First paragraph", "Second paragraph"]);
    }

    #[test]
    fn test_extract_from_archive() {
        let bytes = build_docx(DOCUMENT_XML);
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("First paragraph"));
    }

    #[test]
    fn test_non_zip_input_fails() {
        let result = extract_text(b"this is not a zip archive");
        assert!(matches!(result, Err(ExtractError::DocxArchive(_))));
    }

    #[test]
    fn test_archive_without_document_xml() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let result = extract_text(&bytes);
        assert!(matches!(result, Err(ExtractError::DocxArchive(_))));
    }
}
