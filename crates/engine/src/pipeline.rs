//! The processor execution pipeline: precompute analysis, terminal-state
//! tracking, and precedence-ordered directive dispatch.
//!
//! Traversal never holds an iterator over a children sequence. Each step
//! re-scans the parent's current children for the first node not yet in a
//! terminal state, so processors are free to insert siblings or remove
//! the node being processed mid-walk.

use crate::config::EngineConfig;
use crate::context::RenderContext;
use crate::error::EngineError;
use crate::handlers;
use crate::matcher::Candidate;
use crate::processor::Behavior;
use crate::resolve::{ExpressionEvaluator, TemplateResolver};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use trellis_dom::{Dom, DomError, NodeId, Value, split_prefix};

/// The template engine. Holds shared, read-mostly state; each call to
/// [`Engine::process`] runs one single-threaded render against its own
/// tree.
pub struct Engine {
    config: Arc<EngineConfig>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    resolver: Arc<dyn TemplateResolver>,
}

impl Engine {
    pub fn new(
        config: Arc<EngineConfig>,
        evaluator: Arc<dyn ExpressionEvaluator>,
        resolver: Arc<dyn TemplateResolver>,
    ) -> Self {
        Engine {
            config,
            evaluator,
            resolver,
        }
    }

    pub fn config(&self) -> &Arc<EngineConfig> {
        &self.config
    }

    /// Processes `dom` in place until no unprocessed, non-skippable node
    /// remains. Any failure aborts the render; the tree is then in an
    /// unspecified intermediate state and should be discarded.
    pub fn process(
        &self,
        dom: &mut Dom,
        template: &str,
        globals: HashMap<String, Value>,
    ) -> Result<(), EngineError> {
        debug!("processing template \"{}\"", template);
        let mut execution = Execution {
            config: &self.config,
            evaluator: self.evaluator.as_ref(),
            resolver: self.resolver.as_ref(),
            template: template.to_string(),
            globals,
            terminal: HashSet::new(),
            fired: HashSet::new(),
            switches: HashMap::new(),
        };
        execution.precompute(dom, dom.root());
        execution.process_children(dom, dom.root())?;
        debug!(
            "finished template \"{}\" ({} nodes reached a terminal state)",
            template,
            execution.terminal.len()
        );
        Ok(())
    }
}

/// What a directive did to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Host untouched structurally; keep applying processors to it.
    Continue,
    /// Host detached from its parent.
    Removed,
    /// Host replaced by its promoted children.
    Unwrapped,
}

pub(crate) struct SwitchState {
    pub(crate) discriminant: Value,
    pub(crate) matched: bool,
}

/// How a processor was selected for a node. Attribute triggers are
/// consumed by removing the attribute; element-name triggers fire at
/// most once per host and take their expression from the host's direct
/// text children.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Trigger {
    Attribute(String),
    ElementName,
}

/// Per-render mutable state. Dropped when the render finishes or aborts.
pub(crate) struct Execution<'e> {
    pub(crate) config: &'e EngineConfig,
    pub(crate) evaluator: &'e dyn ExpressionEvaluator,
    pub(crate) resolver: &'e dyn TemplateResolver,
    pub(crate) template: String,
    pub(crate) globals: HashMap<String, Value>,
    /// Nodes in a terminal state (processed or skipped).
    terminal: HashSet<NodeId>,
    /// Element-name triggers already fired, keyed by host and processor.
    fired: HashSet<(NodeId, usize)>,
    /// Open switch contexts, keyed by the switch host.
    pub(crate) switches: HashMap<NodeId, SwitchState>,
}

impl Execution<'_> {
    pub(crate) fn evaluate(
        &self,
        dom: &Dom,
        node: NodeId,
        expression: &str,
    ) -> Result<Value, EngineError> {
        let context = RenderContext::new(dom, node, &self.template, &self.globals);
        self.evaluator.evaluate(expression, &context)
    }

    pub(crate) fn parent_of(&self, dom: &Dom, node: NodeId) -> Result<NodeId, EngineError> {
        dom.parent(node)
            .ok_or(EngineError::Structure(DomError::NotAChild))
    }

    /// One-time analysis of a subtree: marks every node precomputed and
    /// marks directive-free subtrees skippable. Returns whether the
    /// subtree contains any directive.
    fn precompute(&self, dom: &mut Dom, node: NodeId) -> bool {
        let mut has_directive = self.first_applicable(dom, node).is_some();
        for child in dom.children(node).to_vec() {
            if self.precompute(dom, child) {
                has_directive = true;
            }
        }
        dom.set_precomputed(node, true);
        if !has_directive && !dom.is_skippable(node) {
            dom.set_skippable(node, true);
        }
        has_directive
    }

    /// The highest-precedence processor currently applicable to `node`,
    /// with what triggered it. Both the element's own name and its
    /// attributes are candidates; an element-name trigger that already
    /// fired no longer applies.
    fn first_applicable(&self, dom: &Dom, node: NodeId) -> Option<(usize, Trigger)> {
        let mode = self.config.mode();
        let element = dom.normalized_name(node).map(split_prefix);
        for (idx, processor) in self.config.processors().iter().enumerate() {
            if let Some((prefix, name)) = element
                && !self.fired.contains(&(node, idx))
                && processor.matcher.matches(Candidate { mode, prefix, name })
            {
                return Some((idx, Trigger::ElementName));
            }
            for attribute in dom.attributes(node) {
                let candidate = Candidate {
                    mode,
                    prefix: attribute.prefix(),
                    name: attribute.unprefixed_name(),
                };
                if processor.matcher.matches(candidate) {
                    return Some((idx, Trigger::Attribute(attribute.normalized_name().to_string())));
                }
            }
        }
        None
    }

    fn process_children(&mut self, dom: &mut Dom, parent: NodeId) -> Result<(), EngineError> {
        loop {
            let next = dom
                .children(parent)
                .iter()
                .copied()
                .find(|child| !self.terminal.contains(child));
            match next {
                None => return Ok(()),
                Some(node) => self.process_node(dom, node)?,
            }
        }
    }

    fn process_node(&mut self, dom: &mut Dom, node: NodeId) -> Result<(), EngineError> {
        if dom.is_skippable(node) {
            trace!("skipping {:?}", node);
            self.terminal.insert(node);
            return Ok(());
        }
        if !dom.is_precomputed(node) {
            // Fresh clone or imported fragment; analyze it lazily.
            self.precompute(dom, node);
            if dom.is_skippable(node) {
                self.terminal.insert(node);
                return Ok(());
            }
        }

        loop {
            if dom.parent(node).is_none() {
                // A processor detached the host.
                self.terminal.insert(node);
                return Ok(());
            }
            let Some((idx, trigger)) = self.first_applicable(dom, node) else {
                break;
            };
            let behavior = self.config.processors()[idx].behavior.clone();
            trace!("applying {:?} to {:?} via {:?}", behavior, node, trigger);
            let outcome = self
                .apply(dom, node, idx, &behavior, &trigger)
                .map_err(|e| e.located(&self.template, dom.location(node)))?;
            match outcome {
                Outcome::Continue => {}
                Outcome::Removed | Outcome::Unwrapped => {
                    self.terminal.insert(node);
                    return Ok(());
                }
            }
        }

        self.terminal.insert(node);
        self.process_children(dom, node)
    }

    /// Consumes the trigger and dispatches on the behavior.
    fn apply(
        &mut self,
        dom: &mut Dom,
        node: NodeId,
        idx: usize,
        behavior: &Behavior,
        trigger: &Trigger,
    ) -> Result<Outcome, EngineError> {
        let expression = match trigger {
            Trigger::Attribute(attribute) => {
                let expression = dom
                    .attribute_value(node, attribute)
                    .unwrap_or_default()
                    .to_string();
                dom.remove_attribute(node, attribute)?;
                expression
            }
            Trigger::ElementName => {
                self.fired.insert((node, idx));
                let mut expression = String::new();
                for &child in dom.children(node) {
                    if let Some(text) = dom.text_content(child) {
                        expression.push_str(text);
                    }
                }
                expression
            }
        };

        match behavior {
            Behavior::Conditional {
                negate,
                unwrap_if_true,
            } => handlers::conditional::handle(self, dom, node, &expression, *negate, *unwrap_if_true),
            Behavior::Iterate { unwrap_clones } => {
                handlers::iteration::handle(self, dom, node, &expression, *unwrap_clones)
            }
            Behavior::Switch => handlers::switching::handle_switch(self, dom, node, &expression),
            Behavior::Case => handlers::switching::handle_case(self, dom, node, &expression),
            Behavior::With => handlers::variables::handle(self, dom, node, &expression),
            Behavior::Fragment { substitute } => {
                handlers::fragments::handle(self, dom, node, &expression, *substitute)
            }
            Behavior::AttrModify {
                merge,
                space_join,
                remove_if_empty,
                fixed_target,
            } => handlers::attributes::handle(
                self,
                dom,
                node,
                &expression,
                *merge,
                *space_join,
                *remove_if_empty,
                fixed_target.as_deref(),
            ),
        }
    }
}
