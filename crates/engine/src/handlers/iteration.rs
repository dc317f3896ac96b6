//! Iteration: one deep clone of the host per element of an iterable
//! expression, inserted before the original, which is removed afterward.
//! Clones can optionally be unwrapped so only their children remain.

use crate::assignation::parse_iteration;
use crate::error::EngineError;
use crate::pipeline::{Execution, Outcome};
use trellis_dom::{Dom, NodeId, Value};

pub(crate) fn handle(
    exec: &mut Execution<'_>,
    dom: &mut Dom,
    node: NodeId,
    expression: &str,
    unwrap_clones: bool,
) -> Result<Outcome, EngineError> {
    let spec = parse_iteration(expression)?;
    let items = exec.evaluate(dom, node, &spec.expression)?.into_iterable();
    let parent = exec.parent_of(dom, node)?;

    let size = items.len();
    for (index, item) in items.into_iter().enumerate() {
        // Clones carry no processor state: each one is re-analyzed lazily
        // when the walk reaches it.
        let clone = dom.clone_node(node, None, false)?;
        dom.insert_before(parent, node, clone)?;
        dom.set_local_variable(clone, &spec.item, item.clone());
        dom.set_local_variable(clone, &spec.status, status_record(index, size, item));
        if unwrap_clones {
            // Promoted children inherit the clone's bindings.
            dom.extract_child(parent, clone)?;
        }
    }

    // The original host is removed even when the iterable was empty.
    dom.remove_child(parent, node)?;
    Ok(Outcome::Removed)
}

fn status_record(index: usize, size: usize, current: Value) -> Value {
    Value::Map(vec![
        ("index".into(), Value::from(index as i64)),
        ("count".into(), Value::from((index + 1) as i64)),
        ("size".into(), Value::from(size as i64)),
        ("current".into(), current),
        ("even".into(), Value::from(index % 2 == 0)),
        ("odd".into(), Value::from(index % 2 != 0)),
        ("first".into(), Value::from(index == 0)),
        ("last".into(), Value::from(index + 1 == size)),
    ])
}
