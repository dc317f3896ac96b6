//! Attribute modification: evaluate expressions and merge the rendered
//! results into target attributes.

use crate::assignation::{Assignation, parse_assignations};
use crate::error::EngineError;
use crate::pipeline::{Execution, Outcome};
use crate::processor::MergeMode;
use trellis_dom::{Dom, NodeId};

#[allow(clippy::too_many_arguments)]
pub(crate) fn handle(
    exec: &mut Execution<'_>,
    dom: &mut Dom,
    node: NodeId,
    expression: &str,
    merge: MergeMode,
    space_join: bool,
    remove_if_empty: bool,
    fixed_target: Option<&str>,
) -> Result<Outcome, EngineError> {
    let assignations = match fixed_target {
        Some(target) => vec![Assignation {
            name: target.to_string(),
            expression: expression.to_string(),
        }],
        None => parse_assignations(expression)?,
    };

    for assignation in assignations {
        // Target names recur across iteration clones; memoize their
        // normalization in the shared name cache.
        let target = exec.config.names().normalized(&assignation.name);
        let rendered = exec.evaluate(dom, node, &assignation.expression)?.render();
        let existing = dom
            .attribute_value(node, &target)
            .unwrap_or_default()
            .to_string();
        let merged = match merge {
            MergeMode::Replace => rendered,
            MergeMode::Prepend => join(&rendered, &existing, space_join),
            MergeMode::Append => join(&existing, &rendered, space_join),
        };
        if merged.is_empty() && remove_if_empty {
            dom.remove_attribute(node, &target)?;
        } else {
            dom.set_attribute(node, &target, Some(&merged))?;
        }
    }
    Ok(Outcome::Continue)
}

fn join(left: &str, right: &str, space: bool) -> String {
    if left.is_empty() {
        right.to_string()
    } else if right.is_empty() {
        left.to_string()
    } else if space {
        format!("{} {}", left, right)
    } else {
        format!("{}{}", left, right)
    }
}
