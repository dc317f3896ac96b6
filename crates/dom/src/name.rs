//! Name normalization and prefix handling for element and attribute names.

use std::fmt;

/// Elements eligible for self-closing minimization in web output.
const MINIMIZABLE_ELEMENT_NAMES: &[&str] = &[
    "area", "base", "basefont", "br", "col", "frame", "hr", "img", "input", "isindex", "link",
    "meta", "param",
];

/// Case-folds a name to its canonical lookup form. All attribute and
/// element lookups go through this before comparison.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Splits a (possibly prefixed) name into its prefix and unprefixed parts.
/// `th:each` -> (Some("th"), "each"); `href` -> (None, "href").
pub fn split_prefix(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, rest)) if !prefix.is_empty() && !rest.is_empty() => (Some(prefix), rest),
        _ => (None, name),
    }
}

/// Prepends a dialect prefix to an unprefixed name.
pub fn apply_dialect_prefix(name: &str, dialect_prefix: Option<&str>) -> String {
    match dialect_prefix {
        Some(p) if !p.is_empty() => format!("{}:{}", p, name),
        _ => name.to_string(),
    }
}

pub fn is_minimizable_element(normalized_name: &str) -> bool {
    MINIMIZABLE_ELEMENT_NAMES.contains(&normalized_name)
}

/// A source position carried on nodes for error annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl From<(usize, usize)> for Location {
    fn from((line, col): (usize, usize)) -> Self {
        Location { line, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_case_folds() {
        assert_eq!(normalize_name("DIV"), "div");
        assert_eq!(normalize_name("th:EACH"), "th:each");
    }

    #[test]
    fn prefix_splitting() {
        assert_eq!(split_prefix("th:each"), (Some("th"), "each"));
        assert_eq!(split_prefix("href"), (None, "href"));
        assert_eq!(split_prefix(":odd"), (None, ":odd"));
        assert_eq!(split_prefix("xmlns:th"), (Some("xmlns"), "th"));
    }

    #[test]
    fn dialect_prefix_application() {
        assert_eq!(apply_dialect_prefix("each", Some("th")), "th:each");
        assert_eq!(apply_dialect_prefix("each", None), "each");
        assert_eq!(apply_dialect_prefix("each", Some("")), "each");
    }

    #[test]
    fn minimizable_names() {
        assert!(is_minimizable_element("br"));
        assert!(!is_minimizable_element("div"));
    }
}
