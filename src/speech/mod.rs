mod chunker;
mod joiner;
mod synthesizer;
mod voices;

pub use chunker::{chunk_text, truncate_chars, SpeechChunk, DEFAULT_CHUNK_BUDGET};
pub use joiner::{AudioJoiner, FfmpegJoiner, JoinerKind, StreamJoiner};
pub use synthesizer::{EdgeTtsSynthesizer, SpeechSynthesizer};
pub use voices::Voice;

use std::fs;
use tempfile::TempDir;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from the speech service boundary
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech service not available: {0}")]
    NotAvailable(String),

    #[error("{0}")]
    Failed(String),

    #[error("chunk {index} of {total} failed: {source}")]
    Chunk {
        index: usize,
        total: usize,
        #[source]
        source: Box<SpeechError>,
    },

    #[error("joining audio parts failed: {0}")]
    Join(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Synthesize `text` into one audio stream.
///
/// Text longer than `chunk_budget` characters is split into windows that are
/// synthesized one after another and joined in order. Without a usable joiner
/// only the first `chunk_budget` characters are narrated. Any chunk failure
/// aborts the whole call; per-chunk files are removed on every path.
pub fn synthesize(
    text: &str,
    voice: Voice,
    chunk_budget: usize,
    synthesizer: &dyn SpeechSynthesizer,
    joiner: Option<&dyn AudioJoiner>,
) -> Result<Vec<u8>, SpeechError> {
    let char_count = text.chars().count();

    if char_count <= chunk_budget {
        return synthesizer.synthesize(text, voice);
    }

    let joiner = match joiner.filter(|j| j.is_available()) {
        Some(joiner) => joiner,
        None => {
            warn!(
                "No audio joiner available; narrating only the first {} of {} characters",
                chunk_budget, char_count
            );
            return synthesizer.synthesize(truncate_chars(text, chunk_budget), voice);
        }
    };

    let chunks = chunk_text(text, chunk_budget);
    let total = chunks.len();
    info!("Text is long ({} characters), splitting into {} parts", char_count, total);

    let work_dir = TempDir::new()?;
    let mut parts = Vec::with_capacity(total);

    for chunk in &chunks {
        info!("Synthesizing part {}/{}...", chunk.index + 1, total);

        let audio = synthesizer
            .synthesize(&chunk.text, voice)
            .map_err(|e| SpeechError::Chunk {
                index: chunk.index + 1,
                total,
                source: Box::new(e),
            })?;

        let part_path = work_dir.path().join(format!("part_{:04}.mp3", chunk.index));
        fs::write(&part_path, audio)?;
        parts.push(part_path);
    }

    let output = work_dir.path().join("joined.mp3");
    joiner.join(&parts, &output)?;

    Ok(fs::read(&output)?)
}
