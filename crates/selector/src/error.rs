use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Malformed selector text. Fatal at parse time; carries the offending
    /// literal so diagnostics can show exactly what was rejected.
    #[error("invalid syntax in selector \"{0}\": {1}")]
    Syntax(String, String),

    #[error("cannot select against an empty node list")]
    EmptyInput,
}
