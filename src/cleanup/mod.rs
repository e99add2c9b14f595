//! Structural cleanup of recognized documents.
//!
//! Stages run in a fixed order, each on the output of the previous one:
//! running headers, page-number lines, table of contents, figure captions.

mod artifacts;
mod captions;
mod headers;
mod toc;

pub use artifacts::{is_page_number_line, remove_artifact_lines};
pub use captions::{annotate_captions, caption_note, find_caption};
pub use headers::{first_content_line, header_candidates, strip_repeated_headers, HeaderCandidate};
pub use toc::skip_table_of_contents;

use tracing::info;

use crate::config::CleanupConfig;
use crate::document::{split_marked_text, CleanedDocument, Document};

/// Clean text whose pages are delimited by the page separator marker.
pub fn clean(marked_text: &str, config: &CleanupConfig) -> CleanedDocument {
    let pages = split_marked_text(marked_text);
    let page_count = pages.len();

    let pages = strip_repeated_headers(pages, config);
    let pages = remove_artifact_lines(pages);

    let pages = if config.skip_toc {
        skip_table_of_contents(pages, &config.toc_keywords)
    } else {
        pages
    };

    let pages = if config.annotate_figures {
        annotate_captions(pages, &config.caption_keywords)
    } else {
        pages
    };

    info!("Cleanup kept {} of {} pages", pages.len(), page_count);

    CleanedDocument::new(pages)
}

pub fn clean_document(document: &Document, config: &CleanupConfig) -> CleanedDocument {
    clean(&document.to_marked_text(), config)
}
