//! The evaluation context handed to the expression evaluator.

use std::collections::HashMap;
use trellis_dom::{Dom, NodeId, Value};

/// A read-only view of everything an expression may reference at the point
/// it is evaluated: the host node (for node-scoped local variables), the
/// tree it belongs to, the render's global model, and the name of the
/// template being rendered.
pub struct RenderContext<'a> {
    dom: &'a Dom,
    node: NodeId,
    template: &'a str,
    globals: &'a HashMap<String, Value>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        dom: &'a Dom,
        node: NodeId,
        template: &'a str,
        globals: &'a HashMap<String, Value>,
    ) -> Self {
        RenderContext {
            dom,
            node,
            template,
            globals,
        }
    }

    pub fn dom(&self) -> &Dom {
        self.dom
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn template_name(&self) -> &str {
        self.template
    }

    /// Resolves a variable: node-scoped locals first (innermost binding
    /// wins, walking ancestors), then the global model.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.dom
            .resolve_variable(self.node, name)
            .or_else(|| self.globals.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locals_shadow_globals() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        dom.set_local_variable(div, "x", Value::from("local"));

        let mut globals = HashMap::new();
        globals.insert("x".to_string(), Value::from("global"));
        globals.insert("y".to_string(), Value::from("only-global"));

        let ctx = RenderContext::new(&dom, div, "page.html", &globals);
        assert_eq!(ctx.lookup("x"), Some(&Value::from("local")));
        assert_eq!(ctx.lookup("y"), Some(&Value::from("only-global")));
        assert_eq!(ctx.lookup("z"), None);
    }
}
