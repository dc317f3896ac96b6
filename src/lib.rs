//! trellis: a markup-template transformation engine.
//!
//! A parsed document lives in a mutable [`Dom`] tree; fragments of it are
//! located with a compact path-selector grammar; and precedence-ordered
//! directive processors rewrite the tree until only final output remains.
//! Raw-markup parsing, the expression language, and output serialization
//! are external collaborators behind trait seams.
//!
//! The workspace crates are re-exported here; [`TemplateEngine`] is the
//! convenience entry point binding a configuration to an evaluator and a
//! resolver.

pub use trellis_dom as dom;
pub use trellis_engine as engine;
pub use trellis_selector as selector;

pub use trellis_dom::{Dom, DomError, NodeId, Value};
pub use trellis_engine::{
    Behavior, CachingResolver, Engine, EngineConfig, EngineError, ExpressionEvaluator, Fragment,
    MatchTarget, MergeMode, Processor, ProcessorMatcher, TemplateMode, TemplateResolver,
};
pub use trellis_selector::{Selector, SelectorError, parse_selector, select, select_from};

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// A configured engine bound to its collaborators. Cheap to clone and
/// safe to share: concurrent renders only share this read-mostly state,
/// each render mutating its own tree.
#[derive(Clone)]
pub struct TemplateEngine {
    engine: Arc<Engine>,
}

impl TemplateEngine {
    pub fn new(
        config: EngineConfig,
        evaluator: Arc<dyn ExpressionEvaluator>,
        resolver: Arc<dyn TemplateResolver>,
    ) -> Self {
        TemplateEngine {
            engine: Arc::new(Engine::new(Arc::new(config), evaluator, resolver)),
        }
    }

    /// Renders one template tree in place. On error the tree is left in
    /// an intermediate state and should be discarded.
    pub fn render(
        &self,
        dom: &mut Dom,
        template: &str,
        model: HashMap<String, Value>,
    ) -> Result<(), EngineError> {
        debug!("render requested for \"{}\"", template);
        self.engine.process(dom, template, model)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
