use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::info;

use super::segmenter::{PageSegmenter, SegmentOptions};
use crate::document::Document;
use crate::error::Result;
use crate::utils::ocr::{OcrEngine, OcrError};
use crate::utils::pdf_parser::{page_count, PageRenderer};

/// A document whose pages can be rendered to images one at a time.
pub trait PageSource {
    /// Fails when the container itself cannot be opened.
    fn page_count(&self) -> Result<usize>;

    fn render_page(&self, page_idx: usize) -> std::result::Result<DynamicImage, OcrError>;
}

/// Pages of a PDF file on disk, rendered through poppler.
#[derive(Debug, Clone)]
pub struct PdfPages {
    path: PathBuf,
    renderer: PageRenderer,
}

impl PdfPages {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            renderer: PageRenderer::new(),
        }
    }
}

impl PageSource for PdfPages {
    fn page_count(&self) -> Result<usize> {
        page_count(&self.path)
    }

    fn render_page(&self, page_idx: usize) -> std::result::Result<DynamicImage, OcrError> {
        self.renderer.render_page(&self.path, page_idx)
    }
}

/// Run OCR over every page, strictly in page order.
///
/// The returned document always has exactly one entry per source page; pages
/// that fail to render or recognize hold an inline error placeholder.
pub fn ocr_document(
    source: &dyn PageSource,
    engine: &dyn OcrEngine,
    options: SegmentOptions,
) -> Result<Document> {
    let total = source.page_count()?;
    let segmenter = PageSegmenter::new(engine, options);
    let mut document = Document::new();

    info!("Starting OCR of {} pages", total);

    for page_idx in 0..total {
        info!("OCR processing page {}/{}", page_idx + 1, total);

        let text = segmenter.recognize_page(page_idx, source.render_page(page_idx));
        document.push_page(text);
    }

    info!("OCR completed: {} pages processed", total);

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::is_error_placeholder;
    use crate::error::NarratorError;
    use image::GenericImageView;

    struct FakePages {
        count: std::result::Result<usize, ()>,
        broken_page: Option<usize>,
    }

    impl PageSource for FakePages {
        fn page_count(&self) -> Result<usize> {
            self.count
                .map_err(|_| NarratorError::document_open("fake.pdf", "corrupt xref table"))
        }

        fn render_page(&self, page_idx: usize) -> std::result::Result<DynamicImage, OcrError> {
            if self.broken_page == Some(page_idx) {
                return Err(OcrError::Failed("unreadable page".to_string()));
            }
            // encode the page number in the image width
            Ok(DynamicImage::new_rgb8(10 + page_idx as u32, 100))
        }
    }

    struct WidthEngine;

    impl OcrEngine for WidthEngine {
        fn recognize(&self, image: &DynamicImage, _languages: &str) -> std::result::Result<String, OcrError> {
            Ok(format!("page of width {}", image.width()))
        }

        fn detect_orientation(&self, _image: &DynamicImage) -> std::result::Result<u32, OcrError> {
            Ok(0)
        }
    }

    const OPTIONS: SegmentOptions = SegmentOptions {
        split_double_page: true,
        auto_rotate: true,
    };

    #[test]
    fn test_one_entry_per_page_in_order() {
        let pages = FakePages {
            count: Ok(4),
            broken_page: None,
        };

        let document = ocr_document(&pages, &WidthEngine, OPTIONS).unwrap();

        assert_eq!(document.page_count(), 4);
        for (idx, page) in document.pages.iter().enumerate() {
            assert_eq!(page.page_index, idx);
            assert_eq!(page.text, format!("page of width {}", 10 + idx));
        }
    }

    #[test]
    fn test_broken_page_is_local_failure() {
        let pages = FakePages {
            count: Ok(3),
            broken_page: Some(1),
        };

        let document = ocr_document(&pages, &WidthEngine, OPTIONS).unwrap();

        assert_eq!(document.page_count(), 3);
        assert_eq!(document.pages[0].text, "page of width 10");
        assert!(is_error_placeholder(&document.pages[1].text));
        assert_eq!(document.pages[2].text, "page of width 12");
    }

    #[test]
    fn test_unopenable_document_is_fatal() {
        let pages = FakePages {
            count: Err(()),
            broken_page: None,
        };

        let result = ocr_document(&pages, &WidthEngine, OPTIONS);
        assert!(matches!(result, Err(NarratorError::DocumentOpen { .. })));
    }
}
