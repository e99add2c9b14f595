use regex::Regex;
use std::sync::OnceLock;

fn page_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:p[aá]gina|page|p[aá]g\.?)\s*[0-9]+$").expect("page label regex")
    })
}

fn roman_numeral_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^M{0,3}(?:CM|CD|D?C{0,3})(?:XC|XL|L?X{0,3})(?:IX|IV|V?I{0,3})$")
            .expect("roman numeral regex")
    })
}

fn short_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]{1,3}$").expect("short number regex"))
}

/// Whole-line page-number artifacts: "Página 12", "xiv", "37".
pub fn is_page_number_line(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }

    page_label_re().is_match(line)
        || roman_numeral_re().is_match(line)
        || short_number_re().is_match(line)
}

/// Remove page-number artifact lines from every page.
pub fn remove_artifact_lines(pages: Vec<String>) -> Vec<String> {
    pages
        .into_iter()
        .map(|page| {
            page.lines()
                .filter(|line| !is_page_number_line(line))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_lines_are_detected() {
        for line in ["1", " 42 ", "999", "Página 12", "PÁGINA 3", "pág. 7", "pag 8", "Page 101", "xiv", "XLII", "  iv  "] {
            assert!(is_page_number_line(line), "{:?} should be removed", line);
        }
    }

    #[test]
    fn test_lines_with_other_text_are_kept() {
        for line in ["", "1234", "2024", "Capítulo 1", "Página 12 de 30", "12 monos", "mil", "VIVA", "Página demo"] {
            assert!(!is_page_number_line(line), "{:?} should be kept", line);
        }
    }

    #[test]
    fn test_remove_artifact_lines_keeps_blank_lines() {
        let pages = vec!["Texto\n\n12\nMás texto\nIX".to_string()];
        assert_eq!(remove_artifact_lines(pages), vec!["Texto\n\nMás texto".to_string()]);
    }
}
