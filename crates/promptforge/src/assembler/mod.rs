//! Deterministic assembly of the outbound analysis request.

use serde::Serialize;

use crate::config::ClientConfig;
use crate::extractor::ExtractedContent;
use crate::ingest::glossary::GlossaryEntry;

/// At most this many characters of the manual text field are embedded in the
/// instruction block.
pub const MANUAL_TEXT_EXCERPT_LIMIT: usize = 2000;

pub const SYSTEM_PROMPT: &str =
    "Ты — эксперт по переводу и лингвистическому анализу. Отвечай строго JSON без markdown.";

const GLOSSARY_SEPARATOR: &str = "\n\n---\n\n";

const OUTPUT_SCHEMA: &str = r#"Верни ТОЛЬКО валидный JSON без markdown:
{
  "analysis":{
    "docType":"тип документа",
    "domain":"отрасль",
    "style":"стиль",
    "audience":"аудитория",
    "tone":"тональность",
    "company":"компания если определяется иначе пустая строка",
    "keyTerms":["термин → перевод"],
    "numberFormats":{"dates":"правило","thousands":"разделитель","decimals":"десятичный","currency":"валюта","units":"система мер","time":"формат"},
    "risks":["риск1"]
  },
  "translationPrompt":"подробный промт для переводчика на русском: стиль, тональность, глоссарий, правила форматов для {target}, культурная адаптация, что не переводить, предупреждения",
  "reviewPrompt":"подробный промт-чеклист самопроверки на русском: точность, терминология, числа/даты в формате {target}, стиль, грамматика, форматирование"
}"#;

/// One content fragment of the user message, in provider wire shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Image { source: MediaSource },
    Document { source: MediaSource },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MediaSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub media_type: String,
    pub data: String,
}

impl MediaSource {
    fn base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source_type: "base64".to_string(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// Full request body for the provider's messages endpoint. The credential is
/// carried as a header, never here.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
}

/// Immutable snapshot of collected state at submission time.
#[derive(Debug, Clone, Default)]
pub struct SubmissionSnapshot {
    /// Contents of ready source files, in the order they were added.
    pub ready_files: Vec<ExtractedContent>,
    pub manual_text: String,
    pub user_comment: String,
    pub glossary_text: String,
    pub glossary_files: Vec<GlossaryEntry>,
    pub glossary_links: String,
    pub source_lang: String,
    pub target_lang: String,
    pub doc_type: String,
}

/// Composes the outbound request body.
///
/// Ordering contract: one fragment per ready file in list order (binary
/// payloads as-is, text payloads with a file-name delimiter line), then
/// exactly one final text fragment with the rendered instruction block.
/// Never fails for well-formed state; submission gating happens upstream.
pub fn build_request(snapshot: &SubmissionSnapshot, config: &ClientConfig) -> MessagesRequest {
    let mut content = Vec::with_capacity(snapshot.ready_files.len() + 1);

    for file in &snapshot.ready_files {
        content.push(match file {
            ExtractedContent::Image {
                base64, media_type, ..
            } => ContentBlock::Image {
                source: MediaSource::base64(media_type.clone(), base64.clone()),
            },
            ExtractedContent::Document { base64, .. } => ContentBlock::Document {
                source: MediaSource::base64("application/pdf", base64.clone()),
            },
            ExtractedContent::Text { text, name } => ContentBlock::Text {
                text: format!("--- ФАЙЛ: {} ---\n{}\n", name, text),
            },
        });
    }

    content.push(ContentBlock::Text {
        text: render_instruction(snapshot),
    });

    MessagesRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        system: SYSTEM_PROMPT.to_string(),
        messages: vec![Message {
            role: "user".to_string(),
            content,
        }],
    }
}

fn render_instruction(snapshot: &SubmissionSnapshot) -> String {
    let doc_type = if snapshot.doc_type == "auto" {
        "определить автоматически"
    } else {
        snapshot.doc_type.as_str()
    };

    let mut out = format!(
        "Проанализируй прикреплённые материалы и создай два профессиональных промта.\n\n\
         ПАРАМЕТРЫ:\n\
         - Исходный язык: {}\n\
         - Целевой язык: {}\n\
         - Тип документа: {}\n",
        snapshot.source_lang, snapshot.target_lang, doc_type
    );

    let manual = snapshot.manual_text.trim();
    if !manual.is_empty() {
        let excerpt: String = manual.chars().take(MANUAL_TEXT_EXCERPT_LIMIT).collect();
        out.push_str(&format!("\nДОПОЛНИТЕЛЬНЫЙ ТЕКСТ:\n\"\"\"\n{}\n\"\"\"\n", excerpt));
    }

    let comment = snapshot.user_comment.trim();
    if !comment.is_empty() {
        out.push_str(&format!("\nКОММЕНТАРИИ ПОЛЬЗОВАТЕЛЯ:\n{}\n", comment));
    }

    let glossary = render_glossary_block(snapshot);
    if !glossary.is_empty() {
        out.push_str(&format!("\nГЛОССАРИИ И ИСТОЧНИКИ:\n{}\n", glossary));
    }

    out.push('\n');
    out.push_str(&OUTPUT_SCHEMA.replace("{target}", &snapshot.target_lang));
    out
}

fn render_glossary_block(snapshot: &SubmissionSnapshot) -> String {
    let mut parts = Vec::new();

    if !snapshot.glossary_text.trim().is_empty() {
        parts.push(format!("РУЧНОЙ ГЛОССАРИЙ:\n{}", snapshot.glossary_text));
    }
    for entry in &snapshot.glossary_files {
        parts.push(format!("ГЛОССАРИЙ ({}):\n{}", entry.name, entry.content));
    }
    if !snapshot.glossary_links.trim().is_empty() {
        parts.push(format!("ССЫЛКИ НА ИСТОЧНИКИ:\n{}", snapshot.glossary_links));
    }

    parts.join(GLOSSARY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(files: Vec<ExtractedContent>) -> SubmissionSnapshot {
        SubmissionSnapshot {
            ready_files: files,
            source_lang: "Английский".to_string(),
            target_lang: "Русский".to_string(),
            doc_type: "auto".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fragment_order_text_image_instruction() {
        let snapshot = snapshot_with(vec![
            ExtractedContent::Text {
                text: "hello".to_string(),
                name: "a.txt".to_string(),
            },
            ExtractedContent::Image {
                base64: "aGk=".to_string(),
                media_type: "image/png".to_string(),
                name: "b.png".to_string(),
            },
        ]);

        let request = build_request(&snapshot, &ClientConfig::default());
        assert_eq!(request.messages.len(), 1);

        let content = &request.messages[0].content;
        assert_eq!(content.len(), 3);
        match &content[0] {
            ContentBlock::Text { text } => {
                assert!(text.starts_with("--- ФАЙЛ: a.txt ---\n"));
                assert!(text.contains("hello"));
            }
            other => panic!("Expected text block first, got {:?}", other),
        }
        assert!(matches!(&content[1], ContentBlock::Image { .. }));
        match &content[2] {
            ContentBlock::Text { text } => assert!(text.contains("ПАРАМЕТРЫ:")),
            other => panic!("Expected instruction block last, got {:?}", other),
        }
    }

    #[test]
    fn test_pdf_document_fragment_media_type() {
        let snapshot = snapshot_with(vec![ExtractedContent::Document {
            base64: "ZGF0YQ==".to_string(),
            name: "c.pdf".to_string(),
        }]);

        let request = build_request(&snapshot, &ClientConfig::default());
        let value = serde_json::to_value(&request).unwrap();
        let block = &value["messages"][0]["content"][0];
        assert_eq!(block["type"], "document");
        assert_eq!(block["source"]["type"], "base64");
        assert_eq!(block["source"]["media_type"], "application/pdf");
        assert_eq!(block["source"]["data"], "ZGF0YQ==");
    }

    #[test]
    fn test_auto_doc_type_resolved() {
        let snapshot = snapshot_with(vec![]);
        let instruction = render_instruction(&snapshot);
        assert!(instruction.contains("Тип документа: определить автоматически"));
        assert!(!instruction.contains("Тип документа: auto"));
    }

    #[test]
    fn test_explicit_doc_type_kept() {
        let mut snapshot = snapshot_with(vec![]);
        snapshot.doc_type = "contract".to_string();
        let instruction = render_instruction(&snapshot);
        assert!(instruction.contains("Тип документа: contract"));
    }

    #[test]
    fn test_empty_optionals_omitted() {
        let snapshot = snapshot_with(vec![]);
        let instruction = render_instruction(&snapshot);
        assert!(!instruction.contains("ДОПОЛНИТЕЛЬНЫЙ ТЕКСТ"));
        assert!(!instruction.contains("КОММЕНТАРИИ ПОЛЬЗОВАТЕЛЯ"));
        assert!(!instruction.contains("ГЛОССАРИИ И ИСТОЧНИКИ"));
        assert!(instruction.contains("Верни ТОЛЬКО валидный JSON"));
    }

    #[test]
    fn test_manual_text_excerpt_capped() {
        let mut snapshot = snapshot_with(vec![]);
        snapshot.manual_text = "y".repeat(MANUAL_TEXT_EXCERPT_LIMIT + 500);
        let instruction = render_instruction(&snapshot);
        assert!(instruction.contains("ДОПОЛНИТЕЛЬНЫЙ ТЕКСТ"));
        assert!(instruction.contains(&"y".repeat(MANUAL_TEXT_EXCERPT_LIMIT)));
        assert!(!instruction.contains(&"y".repeat(MANUAL_TEXT_EXCERPT_LIMIT + 1)));
    }

    #[test]
    fn test_glossary_block_joined_with_separator() {
        let mut snapshot = snapshot_with(vec![]);
        snapshot.glossary_text = "Term → Термин".to_string();
        snapshot.glossary_files = vec![GlossaryEntry {
            name: "gloss.csv".to_string(),
            content: "a | b".to_string(),
        }];
        snapshot.glossary_links = "https://termbase.example".to_string();

        let block = render_glossary_block(&snapshot);
        assert!(block.starts_with("РУЧНОЙ ГЛОССАРИЙ:\nTerm → Термин"));
        assert!(block.contains("\n\n---\n\nГЛОССАРИЙ (gloss.csv):\na | b"));
        assert!(block.ends_with("ССЫЛКИ НА ИСТОЧНИКИ:\nhttps://termbase.example"));
    }

    #[test]
    fn test_target_language_substituted_in_schema() {
        let snapshot = snapshot_with(vec![]);
        let instruction = render_instruction(&snapshot);
        assert!(instruction.contains("правила форматов для Русский"));
        assert!(!instruction.contains("{target}"));
    }

    #[test]
    fn test_request_body_shape() {
        let snapshot = snapshot_with(vec![]);
        let request = build_request(&snapshot, &ClientConfig::default());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "claude-sonnet-4-20250514");
        assert_eq!(value["max_tokens"], 4000);
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value["system"].as_str().unwrap().contains("эксперт по переводу"));
        assert!(value.get("api_key").is_none());
    }
}
