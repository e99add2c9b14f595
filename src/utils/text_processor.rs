use regex::Regex;
use std::sync::OnceLock;

/// Seconds of narration per word, used for duration estimates.
const SECONDS_PER_WORD: f64 = 0.4;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Ordered OCR repair rules. Later rules see the output of earlier ones.
fn repair_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            // Short word split from its tail at a line break: "extraccion- ado"
            (r"(?i)(\w{2,3})-\s*(\w{3,})", "${1}${2}"),
            // Letter-spaced short words
            (r"(?i)q u e", "que"),
            (r"(?i)p a r a", "para"),
            (r"(?i)c o n", "con"),
            // Dangling hyphen left at the end of a line
            (r"(?i)(\w)\s+-\s+", "${1}"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (Regex::new(pattern).expect("repair rule regex"), replacement)
        })
        .collect()
    })
}

/// Collapse all whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    let text = text.replace(['\n', '\r', '\t'], " ");
    whitespace_re().replace_all(&text, " ").trim().to_string()
}

/// Normalize raw text for narration.
///
/// Whitespace handling is idempotent. The hyphen merge is a heuristic and is
/// not: running it twice can join tokens that the first pass left apart, and
/// legitimately hyphenated compounds ("ex-alumno") get merged as well.
pub fn normalize(text: &str) -> String {
    let mut text = collapse_whitespace(text);

    for (re, replacement) in repair_rules() {
        text = re.replace_all(&text, *replacement).into_owned();
    }

    text.trim().to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated narration length in minutes.
pub fn estimated_minutes(text: &str) -> f64 {
    word_count(text) as f64 * SECONDS_PER_WORD / 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        let text = "  Hola\t\tmundo\r\n\n\ncruel  ";
        assert_eq!(collapse_whitespace(text), "Hola mundo cruel");
    }

    #[test]
    fn test_normalize_merges_line_break_hyphenation() {
        assert_eq!(normalize("extraccion-\nado de texto"), "extraccionado de texto");
    }

    #[test]
    fn test_normalize_repairs_spaced_words() {
        assert_eq!(normalize("q u e p a r a c o n"), "que para con");
        assert_eq!(normalize("Q U E pasa"), "que pasa");
    }

    #[test]
    fn test_normalize_drops_dangling_hyphen() {
        assert_eq!(normalize("fin - de"), "finde");
    }

    #[test]
    fn test_normalize_whitespace_is_idempotent() {
        let once = normalize("uno   dos\n\ntres\t cuatro");
        let twice = normalize(&once);

        let shape = |s: &str| s.chars().filter(|c| c.is_whitespace()).count();
        assert_eq!(shape(&once), shape(&twice));
        assert!(!twice.contains("  "));
    }

    #[test]
    fn test_normalize_end_to_end_example() {
        let text = "q u e p a r a c o n\nextraccion-\nado de texto\nFigura 1. Resultado\n";
        assert_eq!(
            normalize(text),
            "que para con extraccionado de texto Figura 1. Resultado"
        );
    }

    #[test]
    fn test_word_metrics() {
        let text = "uno dos tres";
        assert_eq!(word_count(text), 3);
        assert!((estimated_minutes(text) - 0.02).abs() < 1e-9);
    }
}
