use trellis_dom::{DomError, Location};
use trellis_selector::SelectorError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("tree structure error: {0}")]
    Structure(#[from] DomError),

    #[error("expression evaluation failed for '{expression}': {message}")]
    Evaluation { expression: String, message: String },

    #[error("invalid assignation list '{0}': {1}")]
    Assignation(String, String),

    #[error("invalid iteration specification '{0}': {1}")]
    Iteration(String, String),

    #[error("fragment specification is missing or empty")]
    MissingFragmentSpec,

    #[error("could not resolve fragment \"{spec}\": {message}")]
    UnresolvedFragment { spec: String, message: String },

    #[error("template \"{0}\" cannot include a fragment of itself")]
    SelfInclusion(String),

    #[error("case directive found outside of any switch context")]
    CaseWithoutSwitch,

    #[error("{}: {source}", origin_context(.template, .location))]
    Located {
        template: String,
        location: Option<Location>,
        #[source]
        source: Box<EngineError>,
    },
}

fn origin_context(template: &str, location: &Option<Location>) -> String {
    match location {
        Some(location) => format!("in template \"{}\" ({})", template, location),
        None => format!("in template \"{}\"", template),
    }
}

impl EngineError {
    /// Annotates a processing error with its origin. An error that already
    /// carries an origin is returned unchanged, so the innermost frame wins.
    pub fn located(self, template: &str, location: Option<Location>) -> Self {
        match self {
            located @ EngineError::Located { .. } => located,
            source => EngineError::Located {
                template: template.to_string(),
                location,
                source: Box::new(source),
            },
        }
    }

    pub fn evaluation(expression: &str, message: impl Into<String>) -> Self {
        EngineError::Evaluation {
            expression: expression.to_string(),
            message: message.into(),
        }
    }

    pub fn unresolved_fragment(spec: &str, message: impl Into<String>) -> Self {
        EngineError::UnresolvedFragment {
            spec: spec.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn located_preserves_innermost_origin() {
        let inner = EngineError::evaluation("${x}", "boom")
            .located("inner.html", Some(Location { line: 3, col: 7 }));
        let outer = inner.located("outer.html", Some(Location { line: 99, col: 1 }));
        match outer {
            EngineError::Located { template, location, .. } => {
                assert_eq!(template, "inner.html");
                assert_eq!(location, Some(Location { line: 3, col: 7 }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn located_message_names_template_and_position() {
        let err = EngineError::MissingFragmentSpec
            .located("page.html", Some(Location { line: 12, col: 4 }));
        let message = err.to_string();
        assert!(message.contains("page.html"));
        assert!(message.contains("line 12, column 4"));
    }
}
