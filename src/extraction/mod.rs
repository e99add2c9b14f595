mod dispatcher;
mod ocr_pipeline;
mod segmenter;

pub use dispatcher::{extract_document, extract_file, SourceKind};
pub use ocr_pipeline::{ocr_document, PageSource, PdfPages};
pub use segmenter::{Fragment, PageSegmenter, SegmentOptions};
