pub mod docx;
pub mod epub_parser;
pub mod ocr;
pub mod pdf_parser;
pub mod text_processor;

pub use epub_parser::extract_text_from_epub;
pub use ocr::{OcrEngine, OcrError, TesseractEngine};
pub use pdf_parser::{extract_text_from_pdf, PageRenderer};
pub use text_processor::{collapse_whitespace, normalize};
