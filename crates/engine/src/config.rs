//! Engine configuration: template mode, registered processors, dialect
//! prefixes, and the process-wide name caches.

use crate::matcher::TemplateMode;
use crate::processor::Processor;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use trellis_dom::{apply_dialect_prefix, normalize_name};

/// Read-through memoization for name normalization and dialect-prefixed
/// name variants. Owned by an [`EngineConfig`] rather than a process-wide
/// static, so independently configured engines stay isolated. Concurrent
/// renders share it through the config's `Arc`; it is never reset
/// mid-render.
#[derive(Debug, Default)]
pub struct NameCache {
    normalized: RwLock<HashMap<String, Arc<str>>>,
    prefixed: RwLock<HashMap<(String, String), Arc<str>>>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalized(&self, name: &str) -> Arc<str> {
        if let Ok(cache) = self.normalized.read()
            && let Some(hit) = cache.get(name)
        {
            return Arc::clone(hit);
        }
        let computed: Arc<str> = Arc::from(normalize_name(name));
        if let Ok(mut cache) = self.normalized.write() {
            cache.insert(name.to_string(), Arc::clone(&computed));
        }
        computed
    }

    pub fn prefixed(&self, prefix: &str, name: &str) -> Arc<str> {
        let key = (prefix.to_string(), name.to_string());
        if let Ok(cache) = self.prefixed.read()
            && let Some(hit) = cache.get(&key)
        {
            return Arc::clone(hit);
        }
        let computed: Arc<str> = Arc::from(apply_dialect_prefix(name, Some(prefix)));
        if let Ok(mut cache) = self.prefixed.write() {
            cache.insert(key, Arc::clone(&computed));
        }
        computed
    }

    pub fn normalized_entries(&self) -> usize {
        self.normalized.read().map(|c| c.len()).unwrap_or(0)
    }
}

/// Shared, read-mostly engine configuration. Built once, then shared
/// across concurrent renders via `Arc`.
#[derive(Debug)]
pub struct EngineConfig {
    mode: TemplateMode,
    processors: Vec<Processor>,
    dialect_prefixes: Vec<String>,
    names: NameCache,
}

impl EngineConfig {
    pub fn new(mode: TemplateMode) -> Self {
        EngineConfig {
            mode,
            processors: Vec::new(),
            dialect_prefixes: Vec::new(),
            names: NameCache::new(),
        }
    }

    pub fn mode(&self) -> TemplateMode {
        self.mode
    }

    pub fn with_dialect_prefix(mut self, prefix: &str) -> Self {
        self.dialect_prefixes.push(prefix.to_string());
        self
    }

    pub fn dialect_prefixes(&self) -> &[String] {
        &self.dialect_prefixes
    }

    /// Registers a processor. The processor table stays ordered by
    /// precedence (lower first); registration order breaks ties.
    pub fn register(mut self, processor: Processor) -> Self {
        self.processors.push(processor);
        self.processors.sort_by_key(|p| p.precedence);
        self
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn names(&self) -> &NameCache {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{MatchTarget, ProcessorMatcher};
    use crate::processor::Behavior;

    fn processor(name: &str, precedence: i32) -> Processor {
        Processor::new(
            ProcessorMatcher::exact(TemplateMode::Html, Some("th"), name),
            precedence,
            Behavior::With,
        )
    }

    #[test]
    fn processors_sorted_by_precedence_stable_on_ties() {
        let config = EngineConfig::new(TemplateMode::Html)
            .register(processor("late", 1000))
            .register(processor("early", 100))
            .register(processor("tie-a", 500))
            .register(processor("tie-b", 500));

        let names: Vec<&str> = config
            .processors()
            .iter()
            .map(|p| match &p.matcher.target {
                MatchTarget::Exact { name, .. } => name.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(names, vec!["early", "tie-a", "tie-b", "late"]);
    }

    #[test]
    fn name_cache_reads_through() {
        let cache = NameCache::new();
        assert_eq!(cache.normalized_entries(), 0);
        assert_eq!(&*cache.normalized("TH:EACH"), "th:each");
        assert_eq!(cache.normalized_entries(), 1);
        assert_eq!(&*cache.normalized("TH:EACH"), "th:each");
        assert_eq!(cache.normalized_entries(), 1);
    }

    #[test]
    fn prefixed_cache_builds_variants() {
        let cache = NameCache::new();
        assert_eq!(&*cache.prefixed("th", "each"), "th:each");
        assert_eq!(&*cache.prefixed("data", "each"), "data:each");
    }
}
