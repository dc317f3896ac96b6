//! External collaborator seams: the opaque expression evaluator and the
//! template/fragment resolver, plus an in-memory caching resolver.

use crate::context::RenderContext;
use crate::error::EngineError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use trellis_dom::{Dom, NodeId, Value};
use trellis_selector::Selector;

/// Evaluates an opaque expression string against a render context. The
/// engine never inspects expression text itself.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, context: &RenderContext<'_>) -> Result<Value, EngineError>;
}

/// A resolved fragment: an independently owned tree plus the selected
/// root nodes inside it. The engine imports the roots into the host
/// arena, so a shared fragment is never mutated.
#[derive(Debug)]
pub struct Fragment {
    pub dom: Dom,
    pub roots: Vec<NodeId>,
}

impl Fragment {
    /// A whole-document fragment: every child of the tree's root.
    pub fn whole_document(dom: Dom) -> Self {
        let roots = dom.children(dom.root()).to_vec();
        Fragment { dom, roots }
    }
}

/// Resolves a template name (and optional selector) to a fragment.
/// Called synchronously from the fragment-handling archetype.
pub trait TemplateResolver: Send + Sync {
    fn resolve(
        &self,
        template: &str,
        selector: Option<&Selector>,
    ) -> Result<Arc<Fragment>, EngineError>;
}

/// A read-through cache in front of another resolver, keyed by template
/// name plus selector expression.
pub struct CachingResolver<R> {
    inner: R,
    cache: RwLock<HashMap<(String, String), Arc<Fragment>>>,
}

impl<R: TemplateResolver> std::fmt::Debug for CachingResolver<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingResolver")
            .field("cache_size", &self.cache_size())
            .finish()
    }
}

impl<R: TemplateResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        CachingResolver {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}

impl<R: TemplateResolver> TemplateResolver for CachingResolver<R> {
    fn resolve(
        &self,
        template: &str,
        selector: Option<&Selector>,
    ) -> Result<Arc<Fragment>, EngineError> {
        let key = (
            template.to_string(),
            selector.map(|s| s.expression().to_string()).unwrap_or_default(),
        );

        if let Ok(cache) = self.cache.read()
            && let Some(hit) = cache.get(&key)
        {
            return Ok(Arc::clone(hit));
        }

        let fragment = self.inner.resolve(template, selector)?;
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, Arc::clone(&fragment));
        }
        Ok(fragment)
    }
}
