use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptforgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Submission rejected: {0}")]
    Submit(#[from] SubmitError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to read file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open DOCX archive: {0}")]
    DocxArchive(String),

    #[error("Failed to parse DOCX document: {0}")]
    DocxXml(String),
}

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Максимум {max} файлов. Сейчас: {current}, добавляете: {adding}")]
    TooManyFiles {
        current: usize,
        adding: usize,
        max: usize,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Загрузите файл или введите текст.")]
    NoInput,

    #[error("Языки должны различаться.")]
    SameLanguage,

    #[error("Укажите корректный API-ключ.")]
    InvalidApiKey,

    #[error("Анализ уже выполняется.")]
    AlreadyAnalyzing,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Upstream(String),

    #[error("Failed to parse analysis response: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, PromptforgeError>;
