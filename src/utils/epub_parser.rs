use epub::doc::EpubDoc;
use std::io::Cursor;
use tracing::info;

use crate::error::{NarratorError, Result};

/// Text content of an EPUB, one entry per spine document
#[derive(Debug, Clone)]
pub struct EpubContent {
    pub title: String,
    pub author: String,
    pub sections: Vec<String>,
}

/// Extract the readable text of every spine document in reading order.
pub fn extract_text_from_epub(bytes: &[u8], name: &str) -> Result<EpubContent> {
    info!("Extracting text from EPUB: {}", name);

    let mut doc = EpubDoc::from_reader(Cursor::new(bytes.to_vec()))
        .map_err(|e| NarratorError::document_open(name, e))?;

    let title = doc.mdata("title").unwrap_or_else(|| "Unknown".to_string());
    let author = doc.mdata("creator").unwrap_or_else(|| "Unknown".to_string());

    info!("EPUB: {} by {}", title, author);

    let mut spine = Vec::with_capacity(doc.spine.len());

    for i in 0..doc.spine.len() {
        doc.set_current_page(i);
        spine.push(doc.get_current_str().map(|(html, _mime)| html));
    }

    let sections = spine_sections(spine);

    info!("Extracted {} sections from EPUB", sections.len());

    Ok(EpubContent {
        title,
        author,
        sections,
    })
}

/// One section per spine item, in order. Items without text (cover images,
/// unreadable resources) become empty sections so the count never changes.
fn spine_sections<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    items
        .into_iter()
        .map(|html| html.map(|h| html_to_text(&h)).unwrap_or_default())
        .collect()
}

/// Tags that end a line of text when they close.
const BLOCK_TAGS: &[&str] = &["p", "div", "br", "li", "h1", "h2", "h3", "h4", "h5", "h6", "tr"];

/// Strip markup, keeping one line per block element.
fn html_to_text(html: &str) -> String {
    let mut result = String::new();
    let mut tag = String::new();
    let mut in_tag = false;
    let mut skipping = false;

    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                let name = tag_name(&tag);

                if name == "script" || name == "style" {
                    skipping = !tag.starts_with('/');
                } else if BLOCK_TAGS.contains(&name.as_str()) {
                    result.push('\n');
                }
            }
            _ if in_tag => tag.push(ch),
            _ if !skipping => result.push(ch),
            _ => {}
        }
    }

    result
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or("")
        .to_lowercase()
}
