//! Fragment inclusion and substitution.
//!
//! The directive value is `template` or `template :: selector`. The
//! resolved fragment lives in its own arena and is imported into the host
//! tree, so cached fragments are never mutated by a render.

use crate::error::EngineError;
use crate::pipeline::{Execution, Outcome};
use trellis_dom::{Dom, NodeId};
use trellis_selector::parse_selector;

pub(crate) fn handle(
    exec: &mut Execution<'_>,
    dom: &mut Dom,
    node: NodeId,
    expression: &str,
    substitute: bool,
) -> Result<Outcome, EngineError> {
    let spec = expression.trim();
    if spec.is_empty() {
        return Err(EngineError::MissingFragmentSpec);
    }

    let (template, selector) = match spec.split_once("::") {
        Some((template, selector)) => (template.trim(), Some(parse_selector(selector.trim())?)),
        None => (spec, None),
    };
    if template.is_empty() {
        return Err(EngineError::MissingFragmentSpec);
    }
    // Rejected before any resolution happens.
    if template == exec.template {
        return Err(EngineError::SelfInclusion(template.to_string()));
    }

    let fragment = exec.resolver.resolve(template, selector.as_ref())?;
    if fragment.roots.is_empty() {
        return Err(EngineError::unresolved_fragment(
            spec,
            "no nodes matched the fragment specification",
        ));
    }

    let imported: Vec<NodeId> = fragment
        .roots
        .iter()
        .map(|&root| dom.import(&fragment.dom, root))
        .collect();

    if substitute {
        let parent = exec.parent_of(dom, node)?;
        for &id in &imported {
            dom.insert_before(parent, node, id)?;
        }
        dom.remove_child(parent, node)?;
        Ok(Outcome::Removed)
    } else {
        dom.clear_children(node)?;
        for id in imported {
            dom.add_child(node, id)?;
        }
        Ok(Outcome::Continue)
    }
}
