//! The parsed form of a path selector.

use std::fmt;

/// What a segment selects by: a normalized element name, or text nodes
/// via the `text()` token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentName {
    Element(String),
    Text,
}

/// A positional filter over the filtered sibling subset. Positions are
/// 1-based; `last()` addresses the final entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    Position(usize),
    Last,
}

/// One `@attr` or `@attr="value"` predicate. A `None` value means
/// "attribute present, any value".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCondition {
    pub name: String,
    pub value: Option<String>,
}

/// One `/name[...]` or `//name[...]` step of a chained selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// True for `//`: the segment may match at any depth below the
    /// current position.
    pub any_depth: bool,
    pub name: SegmentName,
    pub conditions: Vec<AttributeCondition>,
    pub index: Option<Index>,
}

/// A full chained selector, e.g. `/div[@id="content"]//p[2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub segments: Vec<Segment>,
    expression: String,
}

impl Selector {
    pub(crate) fn new(expression: &str, segments: Vec<Segment>) -> Self {
        Selector {
            segments,
            expression: expression.to_string(),
        }
    }

    /// The expression this selector was parsed from.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}
