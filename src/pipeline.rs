//! End-to-end flows: document -> cleaned text -> export or narration.

use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::cleanup::clean_document;
use crate::config::AppConfig;
use crate::document::{CleanedDocument, Document};
use crate::error::{NarratorError, Result};
use crate::extraction::{extract_document, extract_file};
use crate::speech::{self, AudioJoiner, SpeechSynthesizer};
use crate::utils::ocr::OcrEngine;
use crate::utils::text_processor::{estimated_minutes, normalize, word_count};

/// Figures reported after a narration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrationMetrics {
    pub characters: usize,
    pub words: usize,
    pub estimated_minutes: f64,
}

impl NarrationMetrics {
    pub fn from_text(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: word_count(text),
            estimated_minutes: estimated_minutes(text),
        }
    }
}

#[derive(Debug)]
pub struct Narration {
    pub audio: Vec<u8>,
    pub metrics: NarrationMetrics,
}

/// Reject documents with too little text to be worth exporting or narrating.
pub fn ensure_content(cleaned: &CleanedDocument, min_chars: usize) -> Result<()> {
    let found = cleaned.to_plain_text().trim().chars().count();
    if found < min_chars {
        return Err(NarratorError::InsufficientContent {
            found,
            required: min_chars,
        });
    }
    Ok(())
}

/// Extract and clean a file on disk.
pub fn extract_and_clean(
    path: &Path,
    config: &AppConfig,
    engine: &dyn OcrEngine,
) -> Result<CleanedDocument> {
    let document = extract_file(path, &config.extraction, engine)?;
    finish_cleanup(&document, config)
}

/// Extract and clean an in-memory document.
pub fn extract_and_clean_bytes(
    bytes: &[u8],
    name: &str,
    config: &AppConfig,
    engine: &dyn OcrEngine,
) -> Result<CleanedDocument> {
    let document = extract_document(bytes, name, &config.extraction, engine)?;
    finish_cleanup(&document, config)
}

fn finish_cleanup(document: &Document, config: &AppConfig) -> Result<CleanedDocument> {
    info!("Extracted {} pages", document.page_count());

    let cleaned = clean_document(document, &config.cleanup);
    ensure_content(&cleaned, config.min_content_chars)?;
    Ok(cleaned)
}

/// Text that is actually spoken: page markers removed, then normalized.
pub fn narration_text(cleaned: &CleanedDocument) -> String {
    normalize(&cleaned.to_plain_text())
}

/// Narrate a cleaned document with the configured voice and chunk budget.
pub fn narrate(
    cleaned: &CleanedDocument,
    config: &AppConfig,
    synthesizer: &dyn SpeechSynthesizer,
    joiner: Option<&dyn AudioJoiner>,
) -> Result<Narration> {
    let text = narration_text(cleaned);
    if text.chars().count() < config.min_content_chars {
        return Err(NarratorError::InsufficientContent {
            found: text.chars().count(),
            required: config.min_content_chars,
        });
    }

    info!("Narrating with voice {}", config.speech.voice);

    let audio = speech::synthesize(
        &text,
        config.speech.voice,
        config.speech.chunk_budget,
        synthesizer,
        joiner,
    )?;

    let metrics = NarrationMetrics::from_text(&text);
    info!(
        "Narration ready: {} characters, {} words, ~{:.1} min",
        metrics.characters, metrics.words, metrics.estimated_minutes
    );

    Ok(Narration { audio, metrics })
}
