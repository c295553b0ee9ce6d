pub mod api;
pub mod assembler;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ingest;
pub mod pipeline;

pub use api::{AnalysisClient, MessagesResponse};
pub use assembler::{build_request, ContentBlock, MessagesRequest, SubmissionSnapshot};
pub use config::ClientConfig;
pub use error::{
    AnalysisError, ConfigError, ExtractError, IngestError, PromptforgeError, Result, SubmitError,
};
pub use extractor::{ExtractedContent, FileKind};
pub use ingest::glossary::GlossaryEntry;
pub use ingest::{FileStatus, FileTracker, SourceFile, MAX_SOURCE_FILES};
pub use pipeline::result::{Analysis, AnalysisResult, NumberFormats};
pub use pipeline::{Session, Stage};
