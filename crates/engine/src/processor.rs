//! Data-driven processor descriptors.
//!
//! A processor is a matcher, a numeric precedence, and one of a small
//! closed set of rewrite behaviors; the pipeline dispatches them through
//! one execution loop instead of a class hierarchy per directive.

use crate::matcher::ProcessorMatcher;

/// How an attribute-modification result is merged into the target
/// attribute's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    Replace,
    Prepend,
    Append,
}

/// The rewrite archetype a processor applies once it is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    /// Evaluate a boolean expression on the host; drop the host subtree if
    /// it comes out false, optionally unwrapping the host if true.
    Conditional { negate: bool, unwrap_if_true: bool },

    /// Clone the host once per element of an iterable expression, binding
    /// item and status variables on each clone, then remove the original.
    Iterate {
        /// Unwrap each clone after binding its variables, leaving only
        /// the clone's children (which inherit the bindings).
        unwrap_clones: bool,
    },

    /// Evaluate a discriminant and open a switch context for descendant
    /// cases.
    Switch,

    /// Compare the host's expression (or the `*` wildcard) against the
    /// nearest enclosing switch discriminant.
    Case,

    /// Define node-scoped local variables from an assignation list.
    With,

    /// Resolve an external fragment; substitute the host with it, or
    /// include it as the host's new children.
    Fragment { substitute: bool },

    /// Rewrite one or more attributes from evaluated expressions.
    AttrModify {
        merge: MergeMode,
        /// Insert a single space between the existing and merged values
        /// when both are non-empty.
        space_join: bool,
        /// Remove the target attribute entirely when its final value is
        /// empty instead of leaving it empty.
        remove_if_empty: bool,
        /// A fixed target attribute taking the whole directive value as
        /// its expression; `None` means the value is an assignation list.
        fixed_target: Option<String>,
    },
}

/// One registered directive processor. Lower precedence executes earlier;
/// ties keep registration order.
#[derive(Debug, Clone)]
pub struct Processor {
    pub matcher: ProcessorMatcher,
    pub precedence: i32,
    pub behavior: Behavior,
}

impl Processor {
    pub fn new(matcher: ProcessorMatcher, precedence: i32, behavior: Behavior) -> Self {
        Processor {
            matcher,
            precedence,
            behavior,
        }
    }
}
