use std::sync::LazyLock;

use regex::Regex;

use crate::pdf::Span;

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.").unwrap());
static QUESTION_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s*").unwrap());
static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([a-e])\.").unwrap());
static OPTION_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-e]\.\s*").unwrap());

/// Smallest styled text run the parser works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub is_bold: bool,
}

impl Fragment {
    pub fn new(text: impl Into<String>, is_bold: bool) -> Self {
        Self {
            text: text.into(),
            is_bold,
        }
    }

    #[cfg(test)]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false)
    }

    #[cfg(test)]
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text, true)
    }
}

/// Trim span text, drop blank spans, and flag spans whose font name contains `bold_marker`.
pub fn from_spans(spans: &[Span], bold_marker: &str) -> Vec<Fragment> {
    spans
        .iter()
        .filter_map(|span| {
            let text = span.text.trim();
            if text.is_empty() {
                None
            } else {
                Some(Fragment::new(text, span.font.contains(bold_marker)))
            }
        })
        .collect()
}

/// Leading question number of a `14.` / `14. Which...` fragment.
pub fn question_number(text: &str) -> Option<&str> {
    QUESTION_RE.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Option letter (`a`..`e`) of an `a.` / `a. Coal` fragment.
pub fn option_letter(text: &str) -> Option<char> {
    OPTION_RE
        .captures(text)
        .and_then(|c| c[1].chars().next())
}

pub fn is_question_start(text: &str) -> bool {
    QUESTION_RE.is_match(text)
}

pub fn is_option_start(text: &str) -> bool {
    OPTION_RE.is_match(text)
}

pub fn strip_question_prefix(text: &str) -> &str {
    strip(&QUESTION_PREFIX_RE, text)
}

pub fn strip_option_prefix(text: &str) -> &str {
    strip(&OPTION_PREFIX_RE, text)
}

fn strip<'a>(re: &Regex, text: &'a str) -> &'a str {
    match re.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, font: &str) -> Span {
        Span {
            text: text.to_string(),
            font: font.to_string(),
        }
    }

    #[test]
    fn blank_spans_dropped_and_text_trimmed() {
        let spans = vec![
            span("  1. What is a watt? ", "Calibri"),
            span("   ", "Calibri"),
            span("b. Power", "Calibri-Bold"),
        ];
        let fragments = from_spans(&spans, "Bold");
        assert_eq!(
            fragments,
            vec![Fragment::plain("1. What is a watt?"), Fragment::bold("b. Power")]
        );
    }

    #[test]
    fn question_markers() {
        assert_eq!(question_number("14. Which of the following"), Some("14"));
        assert_eq!(question_number("3."), Some("3"));
        assert_eq!(question_number("3 apples"), None);
        assert_eq!(question_number("a. 12."), None);
        assert!(is_question_start("100."));
    }

    #[test]
    fn option_markers() {
        assert_eq!(option_letter("a. Coal"), Some('a'));
        assert_eq!(option_letter("e."), Some('e'));
        assert_eq!(option_letter("f. Other"), None);
        assert_eq!(option_letter("A. Coal"), None);
        assert!(!is_option_start("about 5 watts"));
    }

    #[test]
    fn prefixes_stripped() {
        assert_eq!(strip_question_prefix("12.   What is energy?"), "What is energy?");
        assert_eq!(strip_question_prefix("12."), "");
        assert_eq!(strip_option_prefix("c.Oil"), "Oil");
        assert_eq!(strip_option_prefix("d. "), "");
    }
}
