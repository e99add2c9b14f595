use std::collections::HashMap;
use tracing::debug;

use crate::config::CleanupConfig;
use crate::document::is_error_placeholder;

/// A page-opening line and how many pages open with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCandidate {
    pub line: String,
    pub occurrences: usize,
}

/// First non-blank line of a page, trimmed.
pub fn first_content_line(page: &str) -> Option<&str> {
    page.lines().map(str::trim).find(|line| !line.is_empty())
}

/// Count page-opening lines, in order of first appearance. Failed-page
/// placeholders are never candidates, however often they repeat.
pub fn header_candidates(pages: &[String]) -> Vec<HeaderCandidate> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for line in pages
        .iter()
        .filter_map(|p| first_content_line(p))
        .filter(|line| !is_error_placeholder(line))
    {
        let count = counts.entry(line).or_insert(0);
        if *count == 0 {
            order.push(line);
        }
        *count += 1;
    }

    order
        .into_iter()
        .map(|line| HeaderCandidate {
            line: line.to_string(),
            occurrences: counts[line],
        })
        .collect()
}

/// Drop the opening line of every page that starts with a running header.
///
/// Only the first non-blank line of each page is considered; the same text
/// elsewhere in a page is left alone.
pub fn strip_repeated_headers(pages: Vec<String>, config: &CleanupConfig) -> Vec<String> {
    let threshold = config.header_threshold(pages.len());

    let headers: Vec<String> = header_candidates(&pages)
        .into_iter()
        .filter(|c| c.occurrences >= threshold)
        .map(|c| c.line)
        .collect();

    if headers.is_empty() {
        return pages;
    }

    debug!("Repeated headers (threshold {}): {:?}", threshold, headers);

    pages
        .into_iter()
        .map(|page| {
            let opens_with_header = first_content_line(&page)
                .map_or(false, |first| headers.iter().any(|h| h == first));

            if opens_with_header {
                drop_first_content_line(&page)
            } else {
                page
            }
        })
        .collect()
}

fn drop_first_content_line(page: &str) -> String {
    let mut dropped = false;
    page.lines()
        .filter(|line| {
            if !dropped && !line.trim().is_empty() {
                dropped = true;
                return false;
            }
            true
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_candidates_count_first_lines() {
        let pages = pages(&["\n  Título \ncuerpo", "Título\notro", "Distinto\nTítulo"]);
        let candidates = header_candidates(&pages);

        assert_eq!(
            candidates,
            vec![
                HeaderCandidate { line: "Título".to_string(), occurrences: 2 },
                HeaderCandidate { line: "Distinto".to_string(), occurrences: 1 },
            ]
        );
    }

    #[test]
    fn test_repeated_header_is_stripped_only_where_first() {
        let config = CleanupConfig::default();
        let input = pages(&[
            "EL QUIJOTE\nEn un lugar de la Mancha",
            "EL QUIJOTE\nde cuyo nombre",
            "no quiero acordarme\nEL QUIJOTE",
            "\n\nEL QUIJOTE\nno ha mucho tiempo",
        ]);

        let output = strip_repeated_headers(input, &config);

        assert_eq!(output[0], "En un lugar de la Mancha");
        assert_eq!(output[1], "de cuyo nombre");
        assert_eq!(output[2], "no quiero acordarme\nEL QUIJOTE");
        assert_eq!(output[3], "\n\nno ha mucho tiempo");
    }

    #[test]
    fn test_single_occurrence_is_never_a_header() {
        let config = CleanupConfig::default();
        let input = pages(&["Única página\ncon texto"]);

        assert_eq!(strip_repeated_headers(input.clone(), &config), input);
    }

    #[test]
    fn test_identical_error_placeholders_are_not_headers() {
        let placeholder = "[Error OCR en página: OCR failed: pdftoppm failed]";
        let mut input = vec![format!("{}\n", placeholder); 3];
        input.extend((0..3).map(|i| format!("Texto {}", i)));

        assert!(header_candidates(&input).iter().all(|c| c.line != placeholder));
        assert_eq!(strip_repeated_headers(input.clone(), &CleanupConfig::default()), input);
    }

    #[test]
    fn test_threshold_scales_with_page_count() {
        let config = CleanupConfig::default();
        // 10 pages need 3 occurrences; 2 is not enough
        let mut input = vec!["Cabecera\nx".to_string(); 2];
        input.extend((0..8).map(|i| format!("Página propia {}\ny", i)));

        let output = strip_repeated_headers(input.clone(), &config);
        assert_eq!(output, input);
    }
}
