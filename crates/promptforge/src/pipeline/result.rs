//! The structured analysis result and its parsing.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Result of one successful pipeline run. Replaced wholesale on the next
/// run, never partially updated.
///
/// Every field defaults when absent so a sparse upstream response never
/// crashes presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisResult {
    pub analysis: Analysis,
    pub translation_prompt: String,
    pub review_prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Analysis {
    pub doc_type: String,
    pub domain: String,
    pub style: String,
    pub audience: String,
    pub tone: String,
    pub company: String,
    pub key_terms: Vec<String>,
    pub number_formats: NumberFormats,
    pub risks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberFormats {
    pub dates: String,
    pub thousands: String,
    pub decimals: String,
    pub currency: String,
    pub units: String,
    pub time: String,
}

impl NumberFormats {
    /// Non-empty rules in the fixed category order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("dates", self.dates.as_str()),
            ("thousands", self.thousands.as_str()),
            ("decimals", self.decimals.as_str()),
            ("currency", self.currency.as_str()),
            ("units", self.units.as_str()),
            ("time", self.time.as_str()),
        ]
        .into_iter()
        .filter(|(_, rule)| !rule.is_empty())
        .collect()
    }
}

impl AnalysisResult {
    /// Plain-text rendering of the whole result, clipboard style.
    pub fn summary(&self) -> String {
        let company = if self.analysis.company.is_empty() {
            "—"
        } else {
            self.analysis.company.as_str()
        };

        format!(
            "=== АНАЛИЗ ===\nТип: {}\nОтрасль: {}\nЗаказчик: {}\n\n\
             === ПРОМТ ДЛЯ ПЕРЕВОДЧИКА ===\n{}\n\n\
             === ПРОМТ ДЛЯ САМОПРОВЕРКИ ===\n{}",
            self.analysis.doc_type,
            self.analysis.domain,
            company,
            self.translation_prompt,
            self.review_prompt
        )
    }
}

/// Removes markdown code-fence markers so a fenced body parses identically
/// to an unfenced one.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses the concatenated response text into an [`AnalysisResult`].
pub fn parse_result(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let clean = strip_code_fences(raw);
    serde_json::from_str(&clean).map_err(|e| AnalysisError::Parse(e.to_string()))
}
