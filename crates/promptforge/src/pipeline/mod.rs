//! The 3-state workflow that gates submission and parses the response.

pub mod result;

use log::{info, warn};

use crate::api::AnalysisClient;
use crate::assembler::{self, SubmissionSnapshot};
use crate::error::{AnalysisError, PromptforgeError, Result, SubmitError};
use crate::ingest::FileTracker;
use result::AnalysisResult;

/// Minimum accepted credential length (local gate only; the provider still
/// validates the key itself).
pub const MIN_API_KEY_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Collecting,
    Analyzing,
    Presenting,
}

/// Session-wide state aggregate: one explicit struct instead of scattered
/// mutable cells, so every event applies as one atomic transformation.
pub struct Session {
    stage: Stage,
    tracker: FileTracker,
    pub manual_text: String,
    pub user_comment: String,
    pub glossary_text: String,
    pub glossary_links: String,
    pub source_lang: String,
    pub target_lang: String,
    pub doc_type: String,
    api_key: String,
    error: Option<String>,
    result: Option<AnalysisResult>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            stage: Stage::Collecting,
            tracker: FileTracker::new(),
            manual_text: String::new(),
            user_comment: String::new(),
            glossary_text: String::new(),
            glossary_links: String::new(),
            source_lang: "Английский".to_string(),
            target_lang: "Русский".to_string(),
            doc_type: "auto".to_string(),
            api_key: String::new(),
            error: None,
            result: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn tracker(&self) -> &FileTracker {
        &self.tracker
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = key.into();
    }

    /// Submits the collected state for analysis.
    ///
    /// Single-flight: a second submit while `Analyzing` is rejected. A
    /// failing validation check sets the error message and keeps the stage
    /// at `Collecting` without issuing a request. Every in-flight failure
    /// (upstream error envelope, transport, parse) recovers to `Collecting`
    /// with a user-visible message and no partial result.
    pub async fn submit(&mut self, client: &AnalysisClient) -> Result<()> {
        if self.stage == Stage::Analyzing {
            return Err(SubmitError::AlreadyAnalyzing.into());
        }

        let ready_files = self.tracker.ready_contents().await;
        if let Err(e) = self.validate(ready_files.len()) {
            self.error = Some(e.to_string());
            return Err(e.into());
        }

        self.error = None;
        self.stage = Stage::Analyzing;
        info!(
            "Submitting analysis request: {} file(s), manual text {} chars",
            ready_files.len(),
            self.manual_text.chars().count()
        );

        let snapshot = self.snapshot(ready_files).await;
        let request = assembler::build_request(&snapshot, client.config());

        let response = match client.send(&request, self.api_key.trim()).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_run(e)),
        };

        match result::parse_result(&response.joined_text()) {
            Ok(parsed) => {
                info!("Analysis complete");
                self.result = Some(parsed);
                self.stage = Stage::Presenting;
                Ok(())
            }
            Err(e) => Err(self.fail_run(e)),
        }
    }

    /// Returns to `Collecting` from any state, clearing the result, the
    /// submission set, manual text, user comment, and error. Glossary
    /// material, language selection, and the credential are kept.
    pub async fn reset(&mut self) {
        self.stage = Stage::Collecting;
        self.result = None;
        self.error = None;
        self.manual_text.clear();
        self.user_comment.clear();
        self.tracker.clear().await;
    }

    fn validate(&self, ready_count: usize) -> std::result::Result<(), SubmitError> {
        if ready_count == 0 && self.manual_text.trim().is_empty() {
            return Err(SubmitError::NoInput);
        }
        if self.source_lang == self.target_lang {
            return Err(SubmitError::SameLanguage);
        }
        if self.api_key.trim().chars().count() < MIN_API_KEY_LEN {
            return Err(SubmitError::InvalidApiKey);
        }
        Ok(())
    }

    async fn snapshot(
        &self,
        ready_files: Vec<crate::extractor::ExtractedContent>,
    ) -> SubmissionSnapshot {
        SubmissionSnapshot {
            ready_files,
            manual_text: self.manual_text.clone(),
            user_comment: self.user_comment.clone(),
            glossary_text: self.glossary_text.clone(),
            glossary_files: self.tracker.glossary_entries().await,
            glossary_links: self.glossary_links.clone(),
            source_lang: self.source_lang.clone(),
            target_lang: self.target_lang.clone(),
            doc_type: self.doc_type.clone(),
        }
    }

    fn fail_run(&mut self, err: AnalysisError) -> PromptforgeError {
        warn!("Analysis run failed: {}", err);
        self.error = Some(format!("Ошибка: {}", err));
        self.stage = Stage::Collecting;
        self.result = None;
        err.into()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
