//! Local-variable definition from an assignation list. Bindings are set
//! sequentially, so a later expression can reference an earlier binding.

use crate::assignation::parse_assignations;
use crate::error::EngineError;
use crate::pipeline::{Execution, Outcome};
use trellis_dom::{Dom, NodeId};

pub(crate) fn handle(
    exec: &mut Execution<'_>,
    dom: &mut Dom,
    node: NodeId,
    expression: &str,
) -> Result<Outcome, EngineError> {
    for assignation in parse_assignations(expression)? {
        let value = exec.evaluate(dom, node, &assignation.expression)?;
        dom.set_local_variable(node, &assignation.name, value);
    }
    Ok(Outcome::Continue)
}
