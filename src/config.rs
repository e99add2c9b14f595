use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{NarratorError, Result};
use crate::speech::{JoinerKind, Voice, DEFAULT_CHUNK_BUDGET};

/// How PDFs are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PdfMode {
    /// Render every page and run OCR
    Ocr,
    /// Use the text embedded in the PDF
    Native,
    /// Embedded text when present, OCR otherwise
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub auto_rotate: bool,
    pub split_double_page: bool,
    pub pdf_mode: PdfMode,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            split_double_page: true,
            pdf_mode: PdfMode::Ocr,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Fraction of pages a first line must open to count as a running header.
    pub header_ratio: f64,
    /// Lower bound on that count, whatever the page total.
    pub header_min_pages: usize,
    pub skip_toc: bool,
    /// Checked in order; the first keyword present decides the cut.
    pub toc_keywords: Vec<String>,
    pub annotate_figures: bool,
    pub caption_keywords: Vec<String>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            header_ratio: 0.3,
            header_min_pages: 2,
            skip_toc: true,
            toc_keywords: ["índice", "indice", "tabla de contenidos", "contenido"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            annotate_figures: true,
            caption_keywords: ["figura", "fig.", "gráfic", "grafico", "imagen"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CleanupConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.header_ratio) {
            return Err(NarratorError::Config(
                "cleanup.header_ratio must be within [0,1]".to_string(),
            ));
        }
        if self.header_min_pages == 0 {
            return Err(NarratorError::Config(
                "cleanup.header_min_pages must be > 0".to_string(),
            ));
        }
        if self.toc_keywords.iter().any(|k| k.trim().is_empty())
            || self.caption_keywords.iter().any(|k| k.trim().is_empty())
        {
            return Err(NarratorError::Config(
                "cleanup keywords must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Occurrences needed for a first line to be treated as a running header.
    pub fn header_threshold(&self, page_count: usize) -> usize {
        let scaled = (self.header_ratio * page_count as f64).ceil() as usize;
        scaled.max(self.header_min_pages)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub voice: Voice,
    pub chunk_budget: usize,
    pub joiner: JoinerKind,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            voice: Voice::default(),
            chunk_budget: DEFAULT_CHUNK_BUDGET,
            joiner: JoinerKind::Ffmpeg,
        }
    }
}

impl SpeechConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_budget == 0 {
            return Err(NarratorError::Config(
                "speech.chunk_budget must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration, usually read from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extraction: ExtractionConfig,
    pub cleanup: CleanupConfig,
    pub speech: SpeechConfig,
    /// Cleaned text shorter than this is rejected before export or narration.
    pub min_content_chars: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            cleanup: CleanupConfig::default(),
            speech: SpeechConfig::default(),
            min_content_chars: 50,
        }
    }
}

impl AppConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)?;

        let config: AppConfig = serde_json::from_str(&config_str)
            .map_err(|e| NarratorError::Config(format!("{:?}: {}", path, e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.cleanup.validate()?;
        self.speech.validate()
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_header_threshold() {
        let cleanup = CleanupConfig::default();
        assert_eq!(cleanup.header_threshold(1), 2);
        assert_eq!(cleanup.header_threshold(5), 2);
        assert_eq!(cleanup.header_threshold(10), 3);
        assert_eq!(cleanup.header_threshold(11), 4);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"speech": {{"chunk_budget": 500, "voice": "dalia-mx"}}}}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.speech.chunk_budget, 500);
        assert_eq!(config.speech.voice, Voice::DaliaMx);
        assert_eq!(config.min_content_chars, 50);
        assert!(config.extraction.auto_rotate);
        assert_eq!(config.cleanup.toc_keywords[0], "índice");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"speech": {{"chunk_budget": 0}}}}"#).unwrap();

        let result = AppConfig::load(file.path());
        assert!(matches!(result, Err(NarratorError::Config(_))));
    }
}
