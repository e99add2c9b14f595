/// Standalone line announcing a figure to the listener.
pub fn caption_note(caption: &str) -> String {
    format!("[Nota: esta página incluye una figura: {}]", caption.trim())
}

/// First line of the page that mentions a figure, if any.
pub fn find_caption<'a>(page: &'a str, keywords: &[String]) -> Option<&'a str> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    page.lines().find(|line| {
        let lower = line.to_lowercase();
        keywords.iter().any(|k| lower.contains(k.as_str()))
    })
}

/// Prepend a figure note to each page that has a caption line. At most one
/// note per page; the first matching line wins.
pub fn annotate_captions(pages: Vec<String>, keywords: &[String]) -> Vec<String> {
    pages
        .into_iter()
        .map(|page| match find_caption(&page, keywords) {
            Some(caption) => format!("{}\n{}", caption_note(caption), page),
            None => page,
        })
        .collect()
}
