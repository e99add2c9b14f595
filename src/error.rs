use std::path::PathBuf;
use thiserror::Error;

use crate::speech::SpeechError;
use crate::utils::ocr::OcrError;

/// Errors surfaced by the extraction, cleanup and narration pipeline.
///
/// Page-level and orientation failures are normally recovered inside the
/// pipeline; they only appear here when a caller drives those stages directly.
#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("failed to recognize page {page}: {source}")]
    PageRecognition {
        page: usize,
        #[source]
        source: OcrError,
    },

    #[error("orientation detection failed: {0}")]
    OrientationDetection(#[source] OcrError),

    #[error("failed to open document {name}: {reason}")]
    DocumentOpen { name: String, reason: String },

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("speech synthesis failed: {0}")]
    Synthesis(#[from] SpeechError),

    #[error("insufficient content: {found} characters (at least {required} required)")]
    InsufficientContent { found: usize, required: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("export to {path:?} failed: {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NarratorError {
    pub fn document_open(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::DocumentOpen {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NarratorError>;
