//! Conditional visibility: drop the host subtree when the expression is
//! falsy, optionally unwrapping the host when it is truthy.

use crate::error::EngineError;
use crate::pipeline::{Execution, Outcome};
use trellis_dom::{Dom, NodeId};

pub(crate) fn handle(
    exec: &mut Execution<'_>,
    dom: &mut Dom,
    node: NodeId,
    expression: &str,
    negate: bool,
    unwrap_if_true: bool,
) -> Result<Outcome, EngineError> {
    let visible = exec.evaluate(dom, node, expression)?.truthy() != negate;
    let parent = exec.parent_of(dom, node)?;

    if !visible {
        dom.remove_child(parent, node)?;
        return Ok(Outcome::Removed);
    }
    if unwrap_if_true {
        dom.extract_child(parent, node)?;
        return Ok(Outcome::Unwrapped);
    }
    Ok(Outcome::Continue)
}
