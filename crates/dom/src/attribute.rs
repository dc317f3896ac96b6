//! Attribute storage for elements and groups.
//!
//! Attributes are kept as an ordered vector rather than a map: per-element
//! attribute counts are small, and the linear scan keeps written order for
//! serialization.

use crate::name::{normalize_name, split_prefix};

const XMLNS_PREFIX: &str = "xmlns";

/// A single attribute as written in the source, plus its derived lookup
/// forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    original_name: String,
    normalized_name: String,
    prefix: Option<String>,
    unprefixed_name: String,
    value: Option<String>,
    namespace_declaration: bool,
}

impl Attribute {
    pub fn new(name: &str, value: Option<&str>) -> Self {
        let normalized_name = normalize_name(name);
        let (prefix, unprefixed) = split_prefix(&normalized_name);
        let namespace_declaration = prefix == Some(XMLNS_PREFIX);
        Attribute {
            original_name: name.to_string(),
            prefix: prefix.map(str::to_string),
            unprefixed_name: unprefixed.to_string(),
            normalized_name,
            value: value.map(str::to_string),
            namespace_declaration,
        }
    }

    /// The name exactly as written in the source.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn unprefixed_name(&self) -> &str {
        &self.unprefixed_name
    }

    /// `None` for name-only attributes such as `disabled`.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<&str>) {
        self.value = value.map(str::to_string);
    }

    /// True for `xmlns`-prefixed declarations.
    pub fn is_namespace_declaration(&self) -> bool {
        self.namespace_declaration
    }
}

/// Ordered attribute list with normalized-name uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeStore {
    attributes: Vec<Attribute>,
}

impl AttributeStore {
    pub fn new() -> Self {
        AttributeStore::default()
    }

    pub fn as_slice(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Overwrites an existing attribute with the same normalized name,
    /// otherwise appends.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        let attribute = Attribute::new(name, value);
        match self
            .attributes
            .iter_mut()
            .find(|a| a.normalized_name == attribute.normalized_name)
        {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Removes by normalized name; returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let normalized = normalize_name(name);
        let before = self.attributes.len();
        self.attributes.retain(|a| a.normalized_name != normalized);
        before != self.attributes.len()
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        let normalized = normalize_name(name);
        self.attributes.iter().find(|a| a.normalized_name == normalized)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Attribute::value)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn has_namespace_declaration(&self) -> bool {
        self.attributes.iter().any(Attribute::is_namespace_declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut store = AttributeStore::new();
        store.set("HREF", Some("/home"));
        assert_eq!(store.value("href"), Some("/home"));
        assert!(store.has("Href"));
    }

    #[test]
    fn set_overwrites_same_normalized_name() {
        let mut store = AttributeStore::new();
        store.set("class", Some("a"));
        store.set("CLASS", Some("b"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.value("class"), Some("b"));
        // Overwriting keeps the latest written form.
        assert_eq!(store.get("class").unwrap().original_name(), "CLASS");
    }

    #[test]
    fn name_only_attribute_has_no_value() {
        let mut store = AttributeStore::new();
        store.set("disabled", None);
        assert!(store.has("disabled"));
        assert_eq!(store.value("disabled"), None);
    }

    #[test]
    fn xmlns_detection() {
        let attr = Attribute::new("xmlns:th", Some("http://example.org/th"));
        assert!(attr.is_namespace_declaration());
        assert_eq!(attr.prefix(), Some("xmlns"));
        assert_eq!(attr.unprefixed_name(), "th");

        let plain = Attribute::new("href", Some("/"));
        assert!(!plain.is_namespace_declaration());
    }

    #[test]
    fn removal_reports_presence() {
        let mut store = AttributeStore::new();
        store.set("id", Some("x"));
        assert!(store.remove("ID"));
        assert!(!store.remove("id"));
        assert!(store.is_empty());
    }
}
