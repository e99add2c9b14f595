use regex::Regex;
use tracing::info;

/// Skip front matter up to and including the line that names the table of
/// contents.
///
/// Keywords are tried in priority order; the first one found anywhere in the
/// document decides the cut, at its first occurrence. Pages before the cut are
/// dropped entirely. Without any keyword the pages come back unchanged.
pub fn skip_table_of_contents(pages: Vec<String>, keywords: &[String]) -> Vec<String> {
    for keyword in keywords {
        let re = match Regex::new(&format!("(?i){}", regex::escape(keyword))) {
            Ok(re) => re,
            Err(_) => continue,
        };

        if let Some((page_idx, line_idx)) = find_line(&pages, &re) {
            info!(
                "Skipping table of contents: '{}' found on page {}",
                keyword,
                page_idx + 1
            );
            return cut_after(pages, page_idx, line_idx);
        }
    }

    pages
}

fn find_line(pages: &[String], re: &Regex) -> Option<(usize, usize)> {
    pages.iter().enumerate().find_map(|(page_idx, page)| {
        page.lines()
            .position(|line| re.is_match(line))
            .map(|line_idx| (page_idx, line_idx))
    })
}

fn cut_after(pages: Vec<String>, page_idx: usize, line_idx: usize) -> Vec<String> {
    pages
        .into_iter()
        .skip(page_idx)
        .enumerate()
        .map(|(i, page)| {
            if i == 0 {
                page.lines().skip(line_idx + 1).collect::<Vec<_>>().join("\n")
            } else {
                page
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleanupConfig;

    fn keywords() -> Vec<String> {
        CleanupConfig::default().toc_keywords
    }

    fn pages(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_everything_through_index_line_is_dropped() {
        let input = pages(&[
            "Portada\nAutor",
            "ÍNDICE\n1. Inicio .... 3\n2. Final .... 9",
            "Capítulo uno",
        ]);

        let output = skip_table_of_contents(input, &keywords());

        assert_eq!(output, pages(&["1. Inicio .... 3\n2. Final .... 9", "Capítulo uno"]));
    }

    #[test]
    fn test_keyword_priority_beats_position() {
        // "contenido" appears first but "índice" has priority
        let input = pages(&["El contenido del libro\nIntro", "Índice\nResto"]);

        let output = skip_table_of_contents(input, &keywords());

        assert_eq!(output, pages(&["Resto"]));
    }

    #[test]
    fn test_only_first_occurrence_is_used() {
        let input = pages(&["indice\nA\nindice\nB"]);
        assert_eq!(skip_table_of_contents(input, &keywords()), pages(&["A\nindice\nB"]));
    }

    #[test]
    fn test_no_keyword_leaves_document_unchanged() {
        let input = pages(&["Capítulo 1\nTexto", "Capítulo 2"]);
        assert_eq!(skip_table_of_contents(input.clone(), &keywords()), input);
    }
}
