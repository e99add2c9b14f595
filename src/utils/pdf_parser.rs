use image::DynamicImage;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{NarratorError, Result};
use crate::utils::ocr::OcrError;

/// Pages are rendered at twice the nominal 72 DPI before recognition.
pub const RENDER_DPI: u32 = 144;

/// Text embedded in a digital PDF, one entry per page
#[derive(Debug, Clone)]
pub struct PdfContent {
    pub pages: Vec<String>,
    pub has_text: bool,
}

/// Extract embedded text from PDF bytes (no OCR).
pub fn extract_text_from_pdf(bytes: &[u8], name: &str) -> Result<PdfContent> {
    info!("Extracting embedded text from PDF: {}", name);

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| NarratorError::document_open(name, e))?;

    let has_text = pages.iter().any(|p| !p.trim().is_empty());

    if !has_text {
        warn!("PDF appears to be scanned or has no extractable text: {}", name);
    }

    info!("Extracted {} pages from PDF", pages.len());

    Ok(PdfContent { pages, has_text })
}

/// Count the pages of a PDF with `pdfinfo`.
pub fn page_count(pdf_path: &Path) -> Result<usize> {
    let name = pdf_path.display().to_string();

    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .map_err(|e| NarratorError::document_open(&name, format!("failed to invoke pdfinfo: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(NarratorError::document_open(&name, stderr.trim()));
    }

    parse_page_count(&String::from_utf8_lossy(&output.stdout))
        .ok_or_else(|| NarratorError::document_open(name, "pdfinfo output has no 'Pages:' line"))
}

fn parse_page_count(info: &str) -> Option<usize> {
    info.lines()
        .filter_map(|line| line.strip_prefix("Pages:"))
        .find_map(|rest| rest.trim().parse().ok())
}

/// Renders single PDF pages to images with `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    dpi: u32,
}

impl PageRenderer {
    pub fn new() -> Self {
        Self { dpi: RENDER_DPI }
    }

    /// Render the page at 0-based `page_idx`. The intermediate PNG lives in a
    /// temporary directory that is removed before this returns.
    pub fn render_page(&self, pdf_path: &Path, page_idx: usize) -> std::result::Result<DynamicImage, OcrError> {
        let temp_dir = TempDir::new()?;
        let prefix = temp_dir.path().join("page");

        // pdftoppm uses 1-based page numbers
        let page_number = (page_idx + 1).to_string();

        let status = Command::new("pdftoppm")
            .args(["-png", "-singlefile", "-r", &self.dpi.to_string()])
            .args(["-f", &page_number, "-l", &page_number])
            .arg(pdf_path)
            .arg(&prefix)
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(s) => return Err(OcrError::Failed(format!("pdftoppm failed with status: {}", s))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(OcrError::NotAvailable(
                    "pdftoppm not found (install poppler-utils)".to_string(),
                ))
            }
            Err(e) => return Err(OcrError::Io(e)),
        }

        let image_path = prefix.with_extension("png");
        debug!("Rendered page {} to {:?}", page_number, image_path);

        image::open(&image_path).map_err(|e| OcrError::Image(e.to_string()))
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new()
    }
}
