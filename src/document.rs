use serde::{Deserialize, Serialize};
use tracing::warn;

/// Reserved delimiter placed between page texts.
pub const PAGE_MARKER: &str = "[=== PAGINA SIGUIENTE ===]";

/// What a marker found inside recognized text is rewritten to.
const DEFUSED_MARKER: &str = "[== PAGINA SIGUIENTE ==]";

/// Opening of the inline note left where a page could not be recognized.
pub const OCR_ERROR_PREFIX: &str = "[Error OCR en página:";

/// Whether `line` is a failed-page placeholder. Cleanup never removes these.
pub fn is_error_placeholder(line: &str) -> bool {
    line.trim_start().starts_with(OCR_ERROR_PREFIX)
}

/// Full separator, marker surrounded by blank lines.
pub fn page_separator() -> String {
    format!("\n\n{}\n\n", PAGE_MARKER)
}

/// Text recognized for one source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub page_index: usize,
    pub text: String,
}

impl RecognizedText {
    pub fn new(page_index: usize, text: impl Into<String>) -> Self {
        Self {
            page_index,
            text: text.into(),
        }
    }
}

/// Ordered page texts of one document, one entry per input page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<RecognizedText>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from raw page strings in page order.
    pub fn from_page_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut document = Self::new();
        for text in texts {
            document.push_page(text);
        }
        document
    }

    /// Append the next page. Any page marker inside the text is defused first.
    pub fn push_page(&mut self, text: impl Into<String>) {
        let page_index = self.pages.len();
        let text = defuse_marker(text.into(), page_index);
        self.pages.push(RecognizedText::new(page_index, text));
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Join all pages with the page separator.
    pub fn to_marked_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(&page_separator())
    }

    /// Inverse of [`Document::to_marked_text`].
    pub fn from_marked_text(text: &str) -> Self {
        Self::from_page_texts(split_marked_text(text))
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Split marked text back into page strings, undoing exactly the separator padding.
pub fn split_marked_text(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split(PAGE_MARKER).collect();
    let last = parts.len() - 1;

    parts
        .iter()
        .enumerate()
        .map(|(idx, part)| {
            let mut page = *part;
            if idx > 0 {
                page = page.strip_prefix("\n\n").unwrap_or(page);
            }
            if idx < last {
                page = page.strip_suffix("\n\n").unwrap_or(page);
            }
            page.to_string()
        })
        .collect()
}

fn defuse_marker(text: String, page_index: usize) -> String {
    if text.contains(PAGE_MARKER) {
        warn!(
            "Page {} contains the page separator marker; rewriting it",
            page_index + 1
        );
        text.replace(PAGE_MARKER, DEFUSED_MARKER)
    } else {
        text
    }
}

/// Terminal artifact of structural cleanup: page texts in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedDocument {
    pub pages: Vec<String>,
}

impl CleanedDocument {
    pub fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Pages joined with the explicit page separator.
    pub fn to_marked_text(&self) -> String {
        self.pages.join(&page_separator())
    }

    /// Pages joined by blank lines, with no separator markers.
    pub fn to_plain_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn char_count(&self) -> usize {
        self.to_plain_text().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marked_text_round_trip_keeps_page_count() {
        let doc = Document::from_page_texts(vec!["first\n\n", "", "\n\nthird"]);
        let marked = doc.to_marked_text();
        let back = Document::from_marked_text(&marked);

        assert_eq!(back.page_count(), 3);
        assert_eq!(back, doc);
    }

    #[test]
    fn test_push_page_defuses_marker() {
        let mut doc = Document::new();
        doc.push_page(format!("before {} after", PAGE_MARKER));
        doc.push_page("second");

        assert!(!doc.pages[0].text.contains(PAGE_MARKER));
        assert_eq!(Document::from_marked_text(&doc.to_marked_text()).page_count(), 2);
    }

    #[test]
    fn test_plain_text_drops_markers_and_empty_pages() {
        let cleaned = CleanedDocument::new(vec![
            "uno\n".to_string(),
            "   ".to_string(),
            "dos".to_string(),
        ]);

        assert_eq!(cleaned.to_plain_text(), "uno\n\ndos");
        assert!(cleaned.to_marked_text().contains(PAGE_MARKER));
    }
}
