// Library exports for the CLI and the batch script

pub mod cleanup;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod extraction;
pub mod pipeline;
pub mod speech;
pub mod utils;

// Re-export commonly used types
pub use config::{AppConfig, CleanupConfig, ExtractionConfig, PdfMode, SpeechConfig};
pub use document::{CleanedDocument, Document, RecognizedText, PAGE_MARKER};
pub use error::{NarratorError, Result};
pub use pipeline::{extract_and_clean, narrate, Narration, NarrationMetrics};
