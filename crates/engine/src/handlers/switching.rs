//! Switch/case: a switch host opens a context holding its evaluated
//! discriminant and a matched flag; descendant cases compare against it,
//! and the first match hides every later case in the same context.

use crate::error::EngineError;
use crate::pipeline::{Execution, Outcome, SwitchState};
use trellis_dom::{Dom, NodeId};

/// Matches any discriminant, provided no earlier case matched.
const WILDCARD: &str = "*";

pub(crate) fn handle_switch(
    exec: &mut Execution<'_>,
    dom: &mut Dom,
    node: NodeId,
    expression: &str,
) -> Result<Outcome, EngineError> {
    let discriminant = exec.evaluate(dom, node, expression)?;
    exec.switches.insert(
        node,
        SwitchState {
            discriminant,
            matched: false,
        },
    );
    Ok(Outcome::Continue)
}

pub(crate) fn handle_case(
    exec: &mut Execution<'_>,
    dom: &mut Dom,
    node: NodeId,
    expression: &str,
) -> Result<Outcome, EngineError> {
    let switch_host = enclosing_switch(exec, dom, node)?;

    let already_matched = exec
        .switches
        .get(&switch_host)
        .is_some_and(|state| state.matched);
    let visible = if already_matched {
        false
    } else if expression.trim() == WILDCARD {
        true
    } else {
        let value = exec.evaluate(dom, node, expression)?;
        exec.switches
            .get(&switch_host)
            .is_some_and(|state| state.discriminant == value)
    };

    if visible {
        if let Some(state) = exec.switches.get_mut(&switch_host) {
            state.matched = true;
        }
        Ok(Outcome::Continue)
    } else {
        let parent = exec.parent_of(dom, node)?;
        dom.remove_child(parent, node)?;
        Ok(Outcome::Removed)
    }
}

fn enclosing_switch(
    exec: &Execution<'_>,
    dom: &Dom,
    node: NodeId,
) -> Result<NodeId, EngineError> {
    let mut current = dom.parent(node);
    while let Some(id) = current {
        if exec.switches.contains_key(&id) {
            return Ok(id);
        }
        current = dom.parent(id);
    }
    Err(EngineError::CaseWithoutSwitch)
}
