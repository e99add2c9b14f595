use image::{DynamicImage, ImageFormat};
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// Language hint used for every recognition call: Spanish plus English.
pub const DEFAULT_LANGUAGES: &str = "spa+eng";

/// Errors from the OCR service boundary
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    NotAvailable(String),

    #[error("OCR failed: {0}")]
    Failed(String),

    #[error("no orientation estimate in engine output")]
    NoOrientation,

    #[error("image error: {0}")]
    Image(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Capability to turn a page image into text.
pub trait OcrEngine {
    /// Recognize the text in `image` using the given language hint.
    fn recognize(&self, image: &DynamicImage, languages: &str) -> Result<String, OcrError>;

    /// Estimate how many degrees the image must be turned to read upright.
    fn detect_orientation(&self, image: &DynamicImage) -> Result<u32, OcrError>;
}

/// OCR through the `tesseract` command line tool.
///
/// Note: This requires Tesseract to be installed on the system, with the
/// `spa` and `osd` language data for the default configuration.
/// - Linux: sudo apt-get install tesseract-ocr tesseract-ocr-spa
/// - Mac: brew install tesseract tesseract-lang
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: String,
}

impl TesseractEngine {
    pub fn new() -> Self {
        Self {
            binary: "tesseract".to_string(),
        }
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Check if tesseract is available
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn run(&self, image: &DynamicImage, extra_args: &[&str]) -> Result<String, OcrError> {
        let file = tempfile::Builder::new()
            .prefix("ocr-narrator-")
            .suffix(".png")
            .tempfile()?;

        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| OcrError::Image(e.to_string()))?;

        self.run_on_file(file.path(), extra_args)
    }

    fn run_on_file(&self, path: &Path, extra_args: &[&str]) -> Result<String, OcrError> {
        debug!("Running {} on {:?} {:?}", self.binary, path, extra_args);

        let output = Command::new(&self.binary)
            .arg(path)
            .arg("stdout")
            .args(extra_args)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::Failed(format!("tesseract failed: {}", stderr.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::NotAvailable(
                "tesseract not found (install tesseract-ocr)".to_string(),
            )),
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage, languages: &str) -> Result<String, OcrError> {
        self.run(image, &["-l", languages])
    }

    fn detect_orientation(&self, image: &DynamicImage) -> Result<u32, OcrError> {
        let report = self.run(image, &["--psm", "0"])?;
        parse_osd_rotation(&report).ok_or(OcrError::NoOrientation)
    }
}

/// Extract the `Rotate:` value from a tesseract OSD report.
pub fn parse_osd_rotation(report: &str) -> Option<u32> {
    report
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Rotate:"))
        .find_map(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_osd_rotation() {
        let report = "Page number: 0\n\
                      Orientation in degrees: 270\n\
                      Rotate: 90\n\
                      Orientation confidence: 3.12\n\
                      Script: Latin\n";
        assert_eq!(parse_osd_rotation(report), Some(90));
    }

    #[test]
    fn test_parse_osd_rotation_missing() {
        assert_eq!(parse_osd_rotation("Script: Latin\n"), None);
        assert_eq!(parse_osd_rotation("Rotate: sideways\n"), None);
    }

    #[test]
    fn test_missing_binary_is_not_available() {
        let engine = TesseractEngine::with_binary("definitely-not-a-real-tesseract");
        assert!(!engine.is_available());

        let image = DynamicImage::new_rgb8(4, 4);
        let result = engine.recognize(&image, DEFAULT_LANGUAGES);
        assert!(matches!(result, Err(OcrError::NotAvailable(_))));
    }
}
