use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

use super::ocr_pipeline::{ocr_document, PdfPages};
use super::segmenter::SegmentOptions;
use crate::config::{ExtractionConfig, PdfMode};
use crate::document::Document;
use crate::error::{NarratorError, Result};
use crate::utils::ocr::OcrEngine;
use crate::utils::{docx, extract_text_from_epub, extract_text_from_pdf};

/// Input formats with a reader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
    Text,
    Epub,
}

impl SourceKind {
    /// Pick the reader from the file extension (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "pdf" => Ok(SourceKind::Pdf),
            "docx" => Ok(SourceKind::Docx),
            "txt" => Ok(SourceKind::Text),
            "epub" => Ok(SourceKind::Epub),
            "" => Err(NarratorError::UnsupportedFormat(format!(
                "{} has no file extension",
                name
            ))),
            other => Err(NarratorError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| Self::from_name(n).is_ok())
            .unwrap_or(false)
    }
}

/// Route a document to the right reader and return its page texts.
pub fn extract_document(
    bytes: &[u8],
    name: &str,
    config: &ExtractionConfig,
    engine: &dyn OcrEngine,
) -> Result<Document> {
    let kind = SourceKind::from_name(name)?;
    info!("Extracting {} as {:?}", name, kind);

    match kind {
        SourceKind::Pdf => extract_pdf(bytes, name, config, engine),
        SourceKind::Docx => {
            let paragraphs = docx::extract_paragraphs(bytes, name)?;
            Ok(Document::from_page_texts([paragraphs.join("\n")]))
        }
        SourceKind::Text => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| NarratorError::document_open(name, e))?;
            Ok(Document::from_page_texts([text]))
        }
        SourceKind::Epub => {
            let content = extract_text_from_epub(bytes, name)?;
            Ok(Document::from_page_texts(content.sections))
        }
    }
}

/// Read a file from disk and extract it.
pub fn extract_file(path: &Path, config: &ExtractionConfig, engine: &dyn OcrEngine) -> Result<Document> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    // Fail on the format before touching the file.
    SourceKind::from_name(&name)?;

    let bytes = fs::read(path).map_err(|e| NarratorError::document_open(&name, e))?;
    extract_document(&bytes, &name, config, engine)
}

fn extract_pdf(
    bytes: &[u8],
    name: &str,
    config: &ExtractionConfig,
    engine: &dyn OcrEngine,
) -> Result<Document> {
    match config.pdf_mode {
        PdfMode::Ocr => ocr_pdf(bytes, config, engine),
        PdfMode::Native => {
            let content = extract_text_from_pdf(bytes, name)?;
            Ok(Document::from_page_texts(content.pages))
        }
        PdfMode::Auto => match extract_text_from_pdf(bytes, name) {
            Ok(content) if content.has_text => {
                info!("PDF has extractable text, no OCR needed");
                Ok(Document::from_page_texts(content.pages))
            }
            Ok(_) => {
                info!("PDF appears to be scanned, running OCR...");
                ocr_pdf(bytes, config, engine)
            }
            Err(e) => {
                warn!("Embedded text extraction failed ({}), running OCR...", e);
                ocr_pdf(bytes, config, engine)
            }
        },
    }
}

fn ocr_pdf(bytes: &[u8], config: &ExtractionConfig, engine: &dyn OcrEngine) -> Result<Document> {
    // poppler works on files, so the stream is spooled to a scoped temp file
    let mut spool = tempfile::Builder::new()
        .prefix("ocr-narrator-")
        .suffix(".pdf")
        .tempfile()?;
    spool.write_all(bytes)?;
    spool.flush()?;

    let options = SegmentOptions {
        split_double_page: config.split_double_page,
        auto_rotate: config.auto_rotate,
    };

    ocr_document(&PdfPages::new(spool.path()), engine, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::clean_document;
    use crate::config::CleanupConfig;
    use crate::utils::ocr::OcrError;
    use crate::utils::pdf_parser::tests::sample_pdf;
    use image::DynamicImage;

    struct NoOcr;

    impl OcrEngine for NoOcr {
        fn recognize(&self, _image: &DynamicImage, _languages: &str) -> std::result::Result<String, OcrError> {
            Err(OcrError::NotAvailable("test".to_string()))
        }

        fn detect_orientation(&self, _image: &DynamicImage) -> std::result::Result<u32, OcrError> {
            Err(OcrError::NotAvailable("test".to_string()))
        }
    }

    #[test]
    fn test_source_kind_from_name() {
        assert_eq!(SourceKind::from_name("Libro.PDF").unwrap(), SourceKind::Pdf);
        assert_eq!(SourceKind::from_name("notas.txt").unwrap(), SourceKind::Text);
        assert_eq!(SourceKind::from_name("a.b.docx").unwrap(), SourceKind::Docx);
        assert!(matches!(
            SourceKind::from_name("hoja.xlsx"),
            Err(NarratorError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SourceKind::from_name("README"),
            Err(NarratorError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_plain_text_is_one_page() {
        let config = ExtractionConfig::default();
        let doc = extract_document("hola\nmundo".as_bytes(), "a.txt", &config, &NoOcr).unwrap();

        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.pages[0].text, "hola\nmundo");
    }

    #[test]
    fn test_invalid_utf8_is_document_open_error() {
        let config = ExtractionConfig::default();
        let result = extract_document(&[0xff, 0xfe, 0x41], "a.txt", &config, &NoOcr);
        assert!(matches!(result, Err(NarratorError::DocumentOpen { .. })));
    }

    #[test]
    fn test_docx_paragraphs_are_lines() {
        let bytes = docx::build_docx("Título", &["uno".to_string(), "dos".to_string()]).unwrap();
        let config = ExtractionConfig::default();

        let doc = extract_document(&bytes, "informe.docx", &config, &NoOcr).unwrap();
        assert_eq!(doc.pages[0].text, "Título\nuno\ndos");
    }

    fn digital_book() -> Vec<u8> {
        sample_pdf(&[
            "CABECERA\nPrimera pagina del libro",
            "CABECERA\nSegunda pagina del libro",
            "CABECERA\nTercera pagina del libro",
        ])
    }

    #[test]
    fn test_native_pdf_has_one_entry_per_page() {
        let config = ExtractionConfig {
            pdf_mode: PdfMode::Native,
            ..ExtractionConfig::default()
        };

        let doc = extract_document(&digital_book(), "libro.pdf", &config, &NoOcr).unwrap();

        assert_eq!(doc.page_count(), 3);
        assert!(doc.pages[1].text.contains("Segunda pagina"));
        assert!(!doc.pages[1].text.contains("Primera pagina"));

        let cleaned = clean_document(&doc, &CleanupConfig::default());
        assert_eq!(cleaned.pages.len(), 3);
        assert!(!cleaned.to_plain_text().contains("CABECERA"));
    }

    #[test]
    fn test_auto_mode_uses_embedded_text_without_ocr() {
        let config = ExtractionConfig {
            pdf_mode: PdfMode::Auto,
            ..ExtractionConfig::default()
        };

        // NoOcr fails every call, so success means the OCR path was never taken
        let doc = extract_document(&digital_book(), "libro.pdf", &config, &NoOcr).unwrap();

        assert_eq!(doc.page_count(), 3);
        assert!(doc.pages[2].text.contains("Tercera pagina"));
    }

    #[test]
    fn test_unsupported_file_is_rejected_before_reading() {
        let config = ExtractionConfig::default();
        let result = extract_file(Path::new("/nonexistent/archivo.odt"), &config, &NoOcr);
        assert!(matches!(result, Err(NarratorError::UnsupportedFormat(_))));
    }
}
