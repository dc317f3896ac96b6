//! Routing predicates deciding whether a processor applies to a candidate
//! element or attribute name.

/// The markup family a template (and its processors) is typed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateMode {
    Html,
    Xml,
    Text,
}

impl TemplateMode {
    /// XML compares names exactly; HTML and text compare case-insensitively.
    fn names_equal(self, a: &str, b: &str) -> bool {
        match self {
            TemplateMode::Xml => a == b,
            TemplateMode::Html | TemplateMode::Text => a.eq_ignore_ascii_case(b),
        }
    }

    fn prefixes_equal(self, a: Option<&str>, b: Option<&str>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.names_equal(a, b),
            _ => false,
        }
    }
}

/// What a processor declares it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTarget {
    /// One concrete, optionally prefixed name.
    Exact { prefix: Option<String>, name: String },
    /// Every name under one prefix; `None` means every unprefixed name.
    AnyUnderPrefix(Option<String>),
    /// Every name, any prefix.
    AnyName,
}

/// A candidate name being routed, already split into prefix and local part
/// and typed for the mode of the template it came from.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub mode: TemplateMode,
    pub prefix: Option<&'a str>,
    pub name: &'a str,
}

/// Binds a [`MatchTarget`] to one template mode. A candidate typed for a
/// different mode is a hard mismatch, never a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorMatcher {
    pub mode: TemplateMode,
    pub target: MatchTarget,
}

impl ProcessorMatcher {
    pub fn new(mode: TemplateMode, target: MatchTarget) -> Self {
        ProcessorMatcher { mode, target }
    }

    pub fn exact(mode: TemplateMode, prefix: Option<&str>, name: &str) -> Self {
        ProcessorMatcher {
            mode,
            target: MatchTarget::Exact {
                prefix: prefix.map(str::to_string),
                name: name.to_string(),
            },
        }
    }

    pub fn matches(&self, candidate: Candidate<'_>) -> bool {
        if candidate.mode != self.mode {
            return false;
        }
        match &self.target {
            MatchTarget::Exact { prefix, name } => {
                self.mode.prefixes_equal(prefix.as_deref(), candidate.prefix)
                    && self.mode.names_equal(name, candidate.name)
            }
            MatchTarget::AnyUnderPrefix(prefix) => {
                self.mode.prefixes_equal(prefix.as_deref(), candidate.prefix)
            }
            MatchTarget::AnyName => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(mode: TemplateMode, prefix: Option<&'static str>, name: &'static str) -> Candidate<'static> {
        Candidate { mode, prefix, name }
    }

    #[test]
    fn html_matches_case_insensitively() {
        let matcher = ProcessorMatcher::exact(TemplateMode::Html, Some("th"), "each");
        assert!(matcher.matches(candidate(TemplateMode::Html, Some("th"), "each")));
        assert!(matcher.matches(candidate(TemplateMode::Html, Some("TH"), "EACH")));
    }

    #[test]
    fn xml_matches_case_sensitively() {
        let matcher = ProcessorMatcher::exact(TemplateMode::Xml, Some("th"), "each");
        assert!(matcher.matches(candidate(TemplateMode::Xml, Some("th"), "each")));
        assert!(!matcher.matches(candidate(TemplateMode::Xml, Some("th"), "Each")));
        assert!(!matcher.matches(candidate(TemplateMode::Xml, Some("TH"), "each")));
    }

    #[test]
    fn cross_mode_is_a_hard_mismatch() {
        let matcher = ProcessorMatcher::exact(TemplateMode::Html, Some("th"), "each");
        assert!(!matcher.matches(candidate(TemplateMode::Xml, Some("th"), "each")));
        assert!(!matcher.matches(candidate(TemplateMode::Text, Some("th"), "each")));
    }

    #[test]
    fn any_under_prefix() {
        let matcher = ProcessorMatcher::new(
            TemplateMode::Html,
            MatchTarget::AnyUnderPrefix(Some("th".to_string())),
        );
        assert!(matcher.matches(candidate(TemplateMode::Html, Some("th"), "anything")));
        assert!(!matcher.matches(candidate(TemplateMode::Html, Some("other"), "anything")));
        assert!(!matcher.matches(candidate(TemplateMode::Html, None, "anything")));
    }

    #[test]
    fn any_under_no_prefix_means_unprefixed() {
        let matcher =
            ProcessorMatcher::new(TemplateMode::Html, MatchTarget::AnyUnderPrefix(None));
        assert!(matcher.matches(candidate(TemplateMode::Html, None, "data-x")));
        assert!(!matcher.matches(candidate(TemplateMode::Html, Some("th"), "data-x")));
    }

    #[test]
    fn any_name_matches_everything_in_mode() {
        let matcher = ProcessorMatcher::new(TemplateMode::Text, MatchTarget::AnyName);
        assert!(matcher.matches(candidate(TemplateMode::Text, Some("x"), "y")));
        assert!(matcher.matches(candidate(TemplateMode::Text, None, "y")));
        assert!(!matcher.matches(candidate(TemplateMode::Html, None, "y")));
    }
}
