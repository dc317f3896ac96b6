//! The arena-backed document tree and its structural-mutation contract.
//!
//! Nodes live in a `Vec` arena owned by [`Dom`] and are addressed through
//! copyable [`NodeId`] handles. The children sequence is the only owning
//! relationship; parent back-references are plain handles, so the tree
//! stays acyclic without reference counting. Detached subtrees remain in
//! the arena until the whole `Dom` is dropped, which is fine for the
//! render-scoped lifetime a `Dom` has.

use crate::attribute::Attribute;
use crate::doctype::DocType;
use crate::error::DomError;
use crate::name::Location;
use crate::node::{ElementData, NodeKind, TagRepr};
use crate::value::Value;

/// Stable handle to a node in a [`Dom`] arena. Identity comparisons on
/// nodes are comparisons of these handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    skippable: bool,
    precomputed: bool,
    local_variables: Option<Vec<(String, Value)>>,
    location: Option<Location>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        NodeData {
            kind,
            parent: None,
            skippable: false,
            precomputed: false,
            local_variables: None,
            location: None,
        }
    }
}

/// A document: an optional DOCTYPE clause plus exactly one root node, and
/// the arena holding every node ever created for this document.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<NodeData>,
    root: NodeId,
    doctype: Option<DocType>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Dom {
            nodes: Vec::new(),
            root: NodeId(0),
            doctype: None,
        };
        dom.root = dom.push(NodeData::new(NodeKind::Root { children: Vec::new() }));
        dom
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn doctype(&self) -> Option<&DocType> {
        self.doctype.as_ref()
    }

    pub fn set_doctype(&mut self, doctype: Option<DocType>) {
        self.doctype = doctype;
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }

    fn data_mut(&mut self, node: NodeId) -> &mut NodeData {
        &mut self.nodes[node.index()]
    }

    // --- Node creation ---

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeData::new(NodeKind::Element(ElementData::new(name))))
    }

    pub fn create_group(&mut self) -> NodeId {
        self.push(NodeData::new(NodeKind::Group {
            attributes: Default::default(),
            children: Vec::new(),
        }))
    }

    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::new(NodeKind::Text { content: content.to_string() }))
    }

    pub fn create_cdata(&mut self, content: &str) -> NodeId {
        self.push(NodeData::new(NodeKind::Cdata { content: content.to_string() }))
    }

    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeData::new(NodeKind::Comment { content: content.to_string() }))
    }

    pub fn create_macro(&mut self, content: &str) -> NodeId {
        self.push(NodeData::new(NodeKind::Macro { content: content.to_string() }))
    }

    pub fn create_processing_instruction(&mut self, target: &str, content: Option<&str>) -> NodeId {
        self.push(NodeData::new(NodeKind::ProcessingInstruction {
            target: target.to_string(),
            content: content.map(str::to_string),
        }))
    }

    // --- Inspection ---

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.data(node).kind
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).kind.children()
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    pub fn is_nestable(&self, node: NodeId) -> bool {
        self.data(node).kind.is_nestable()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.data(node).kind, NodeKind::Element(_))
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.data(node).kind, NodeKind::Text { .. })
    }

    /// Element name exactly as written; `None` for non-elements.
    pub fn element_name(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Element(element) => Some(&element.name),
            _ => None,
        }
    }

    pub fn normalized_name(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Element(element) => Some(&element.normalized_name),
            _ => None,
        }
    }

    pub fn tag_repr(&self, node: NodeId) -> Option<TagRepr> {
        match &self.data(node).kind {
            NodeKind::Element(element) => Some(element.repr),
            _ => None,
        }
    }

    pub fn set_tag_repr(&mut self, node: NodeId, repr: TagRepr) {
        if let NodeKind::Element(element) = &mut self.data_mut(node).kind {
            element.repr = repr;
        }
    }

    pub fn is_minimizable(&self, node: NodeId) -> bool {
        match &self.data(node).kind {
            NodeKind::Element(element) => element.minimizable,
            _ => false,
        }
    }

    /// Textual content of text-like nodes (`Text`, `Cdata`, `Comment`,
    /// `Macro`); `None` otherwise.
    pub fn text_content(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Text { content }
            | NodeKind::Cdata { content }
            | NodeKind::Comment { content }
            | NodeKind::Macro { content } => Some(content),
            _ => None,
        }
    }

    pub fn set_text_content(&mut self, node: NodeId, new_content: &str) {
        match &mut self.data_mut(node).kind {
            NodeKind::Text { content }
            | NodeKind::Cdata { content }
            | NodeKind::Comment { content }
            | NodeKind::Macro { content } => *content = new_content.to_string(),
            _ => {}
        }
    }

    pub fn location(&self, node: NodeId) -> Option<Location> {
        self.data(node).location
    }

    pub fn set_location(&mut self, node: NodeId, location: Location) {
        self.data_mut(node).location = Some(location);
    }

    // --- Structural mutation ---

    fn children_vec_mut(&mut self, node: NodeId) -> Result<&mut Vec<NodeId>, DomError> {
        self.data_mut(node)
            .kind
            .children_mut()
            .ok_or(DomError::NotNestable)
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut current = Some(of);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.data(id).parent;
        }
        false
    }

    /// Removes `node` from whatever parent currently owns it, if any.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.data(node).parent {
            self.remove_child(parent, node)?;
        }
        Ok(())
    }

    /// Appends `child` to `parent`. A no-op if `child` is already a child
    /// of `parent`; a child owned elsewhere is detached first so that a
    /// node never appears under two parents.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.data(parent).kind.is_nestable() {
            return Err(DomError::NotNestable);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::CycleDetected);
        }
        if self.data(child).parent == Some(parent) {
            return Ok(());
        }
        self.detach(child)?;
        self.children_vec_mut(parent)?.push(child);
        self.data_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Inserts `child` at `index` (must be in `[0, len]`). A child already
    /// owned by `parent` is moved: removed first, then inserted at the
    /// given index, which by then addresses the shrunk sequence.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), DomError> {
        if !self.data(parent).kind.is_nestable() {
            return Err(DomError::NotNestable);
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(DomError::CycleDetected);
        }

        let len = self.children(parent).len();
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }

        if self.data(child).parent == Some(parent) {
            let pos = self
                .children(parent)
                .iter()
                .position(|&c| c == child)
                .ok_or(DomError::NotAChild)?;
            if pos == index {
                return Ok(());
            }
            self.children_vec_mut(parent)?.remove(pos);
            let len = self.children(parent).len();
            if index > len {
                self.data_mut(child).parent = None;
                return Err(DomError::IndexOutOfBounds { index, len });
            }
        } else {
            self.detach(child)?;
        }

        self.children_vec_mut(parent)?.insert(index, child);
        self.data_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Inserts `child` immediately before `reference`, which must be a
    /// direct child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, reference: NodeId, child: NodeId) -> Result<(), DomError> {
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == reference)
            .ok_or(DomError::ReferenceNotFound)?;
        self.insert_child(parent, pos, child)
    }

    /// Inserts `child` immediately after `reference`, which must be a
    /// direct child of `parent`.
    pub fn insert_after(&mut self, parent: NodeId, reference: NodeId, child: NodeId) -> Result<(), DomError> {
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == reference)
            .ok_or(DomError::ReferenceNotFound)?;
        self.insert_child(parent, pos + 1, child)
    }

    /// Replaces the whole children sequence: current children are detached,
    /// then each entry of `new_children` is re-added in order.
    pub fn set_children(&mut self, parent: NodeId, new_children: Vec<NodeId>) -> Result<(), DomError> {
        let old = std::mem::take(self.children_vec_mut(parent)?);
        for child in old {
            self.data_mut(child).parent = None;
        }
        for child in new_children {
            self.add_child(parent, child)?;
        }
        Ok(())
    }

    pub fn clear_children(&mut self, parent: NodeId) -> Result<(), DomError> {
        self.set_children(parent, Vec::new())
    }

    /// Detaches and returns the child at `index`.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId, DomError> {
        let len = self.children(parent).len();
        if index >= len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        let child = self.children_vec_mut(parent)?.remove(index);
        self.data_mut(child).parent = None;
        Ok(child)
    }

    /// Detaches `child` from `parent`. The child being absent is a fatal
    /// condition, not a silent no-op.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild)?;
        self.remove_child_at(parent, pos)?;
        Ok(())
    }

    /// Re-parents every child of `from` onto `to`, preserving order.
    pub fn move_all_children(&mut self, from: NodeId, to: NodeId) -> Result<(), DomError> {
        let children = std::mem::take(self.children_vec_mut(from)?);
        for child in &children {
            self.data_mut(*child).parent = None;
        }
        for child in children {
            self.add_child(to, child)?;
        }
        Ok(())
    }

    /// Replaces `child`, in place, by its own children ("unwrap"). Any
    /// node-local variables on `child` are propagated onto each promoted
    /// grandchild. A non-nestable child degrades to a plain removal.
    pub fn extract_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.data(child).kind.is_nestable() {
            return self.remove_child(parent, child);
        }

        let pos = self
            .children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild)?;

        let grandchildren = std::mem::take(self.children_vec_mut(child)?);
        let variables = self.data(child).local_variables.clone();

        self.remove_child_at(parent, pos)?;
        for (offset, grandchild) in grandchildren.into_iter().enumerate() {
            self.data_mut(grandchild).parent = None;
            self.insert_child(parent, pos + offset, grandchild)?;
            if let Some(vars) = &variables {
                self.add_local_variables(grandchild, vars);
            }
        }
        Ok(())
    }

    // --- Attributes ---

    pub fn attributes(&self, node: NodeId) -> &[Attribute] {
        self.data(node)
            .kind
            .attributes()
            .map(|store| store.as_slice())
            .unwrap_or(&[])
    }

    /// Sets an attribute, overwriting any existing one with the same
    /// normalized name.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: Option<&str>) -> Result<(), DomError> {
        let store = self
            .data_mut(node)
            .kind
            .attributes_mut()
            .ok_or(DomError::NotAnAttributeHolder)?;
        store.set(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<bool, DomError> {
        let store = self
            .data_mut(node)
            .kind
            .attributes_mut()
            .ok_or(DomError::NotAnAttributeHolder)?;
        Ok(store.remove(name))
    }

    pub fn attribute_value(&self, node: NodeId, name: &str) -> Option<&str> {
        self.data(node).kind.attributes().and_then(|s| s.value(name))
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.data(node)
            .kind
            .attributes()
            .is_some_and(|s| s.has(name))
    }

    pub fn has_namespace_declaration(&self, node: NodeId) -> bool {
        self.data(node)
            .kind
            .attributes()
            .is_some_and(|s| s.has_namespace_declaration())
    }

    // --- Node-local variables ---

    pub fn set_local_variable(&mut self, node: NodeId, name: &str, value: Value) {
        let vars = self
            .data_mut(node)
            .local_variables
            .get_or_insert_with(Vec::new);
        match vars.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => vars.push((name.to_string(), value)),
        }
    }

    pub fn add_local_variables(&mut self, node: NodeId, variables: &[(String, Value)]) {
        for (name, value) in variables {
            self.set_local_variable(node, name, value.clone());
        }
    }

    pub fn local_variables(&self, node: NodeId) -> &[(String, Value)] {
        self.data(node).local_variables.as_deref().unwrap_or(&[])
    }

    pub fn local_variable(&self, node: NodeId, name: &str) -> Option<&Value> {
        self.local_variables(node)
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Looks a variable up on `node` and then on each ancestor in turn,
    /// innermost binding first.
    pub fn resolve_variable(&self, node: NodeId, name: &str) -> Option<&Value> {
        let mut current = Some(node);
        while let Some(id) = current {
            if let Some(value) = self.local_variable(id, name) {
                return Some(value);
            }
            current = self.data(id).parent;
        }
        None
    }

    // --- Processor-state flags ---

    pub fn is_skippable(&self, node: NodeId) -> bool {
        self.data(node).skippable
    }

    /// Marking skippable propagates down the whole subtree; marking
    /// non-skippable propagates up the whole ancestor chain, since a
    /// non-skippable descendant keeps every ancestor walkable.
    pub fn set_skippable(&mut self, node: NodeId, skippable: bool) {
        if skippable {
            let mut stack = vec![node];
            while let Some(id) = stack.pop() {
                let data = self.data_mut(id);
                data.skippable = true;
                stack.extend_from_slice(data.kind.children());
            }
        } else {
            let mut current = Some(node);
            while let Some(id) = current {
                let data = self.data_mut(id);
                data.skippable = false;
                current = data.parent;
            }
        }
    }

    pub fn is_precomputed(&self, node: NodeId) -> bool {
        self.data(node).precomputed
    }

    pub fn set_precomputed(&mut self, node: NodeId, precomputed: bool) {
        self.data_mut(node).precomputed = precomputed;
    }

    // --- Cloning & import ---

    /// Deep-copies `node` (children, attributes, local variables). The
    /// skippable/precomputed flags are copied only when
    /// `clone_processor_state` is true; a fresh clone is otherwise treated
    /// as not yet analyzed. When `new_parent` is given the clone is
    /// appended to it.
    pub fn clone_node(
        &mut self,
        node: NodeId,
        new_parent: Option<NodeId>,
        clone_processor_state: bool,
    ) -> Result<NodeId, DomError> {
        let clone = self.deep_copy(node, clone_processor_state);
        if let Some(parent) = new_parent {
            self.add_child(parent, clone)?;
        }
        Ok(clone)
    }

    fn deep_copy(&mut self, node: NodeId, clone_processor_state: bool) -> NodeId {
        let (shell, child_ids, variables, location, skippable, precomputed) = {
            let data = self.data(node);
            (
                data.kind.clone_shell(),
                data.kind.children().to_vec(),
                data.local_variables.clone(),
                data.location,
                data.skippable,
                data.precomputed,
            )
        };
        let copy = self.push(NodeData {
            kind: shell,
            parent: None,
            skippable: clone_processor_state && skippable,
            precomputed: clone_processor_state && precomputed,
            local_variables: variables,
            location,
        });
        for child in child_ids {
            let child_copy = self.deep_copy(child, clone_processor_state);
            self.data_mut(child_copy).parent = Some(copy);
            if let Some(children) = self.data_mut(copy).kind.children_mut() {
                children.push(child_copy);
            }
        }
        copy
    }

    /// Deep-copies a subtree from another arena into this one, returning
    /// the local handle of the copied root. Imported nodes arrive with
    /// cleared processor state, since this arena has not analyzed them.
    pub fn import(&mut self, source: &Dom, source_node: NodeId) -> NodeId {
        let data = source.data(source_node);
        let copy = self.push(NodeData {
            kind: data.kind.clone_shell(),
            parent: None,
            skippable: false,
            precomputed: false,
            local_variables: data.local_variables.clone(),
            location: data.location,
        });
        for &child in data.kind.children() {
            let child_copy = self.import(source, child);
            self.data_mut(child_copy).parent = Some(copy);
            if let Some(children) = self.data_mut(copy).kind.children_mut() {
                children.push(child_copy);
            }
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks the §8 tree invariant: every child's parent reference equals
    /// the node that actually owns it.
    fn assert_parent_invariant(dom: &Dom) {
        for i in 0..dom.nodes.len() {
            let id = NodeId(i as u32);
            for &child in dom.children(id) {
                assert_eq!(dom.parent(child), Some(id), "child {:?} of {:?}", child, id);
            }
        }
    }

    fn element_with_text(dom: &mut Dom, name: &str, text: &str) -> NodeId {
        let element = dom.create_element(name);
        let text_node = dom.create_text(text);
        dom.add_child(element, text_node).unwrap();
        element
    }

    #[test]
    fn add_child_sets_parent_and_is_idempotent() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        dom.add_child(dom.root(), div).unwrap();
        assert_eq!(dom.children(dom.root()), &[div]);
        assert_eq!(dom.parent(div), Some(dom.root()));
        assert_parent_invariant(&dom);
    }

    #[test]
    fn add_child_moves_from_previous_parent() {
        let mut dom = Dom::new();
        let a = dom.create_element("a");
        let b = dom.create_element("b");
        let child = dom.create_element("span");
        dom.add_child(dom.root(), a).unwrap();
        dom.add_child(dom.root(), b).unwrap();
        dom.add_child(a, child).unwrap();
        dom.add_child(b, child).unwrap();
        assert!(dom.children(a).is_empty());
        assert_eq!(dom.children(b), &[child]);
        assert_parent_invariant(&dom);
    }

    #[test]
    fn add_child_rejects_cycles() {
        let mut dom = Dom::new();
        let outer = dom.create_element("outer");
        let inner = dom.create_element("inner");
        dom.add_child(dom.root(), outer).unwrap();
        dom.add_child(outer, inner).unwrap();
        assert_eq!(dom.add_child(inner, outer), Err(DomError::CycleDetected));
    }

    #[test]
    fn insert_child_bounds() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        let p = dom.create_element("p");
        assert_eq!(
            dom.insert_child(div, 1, p),
            Err(DomError::IndexOutOfBounds { index: 1, len: 0 })
        );
        dom.insert_child(div, 0, p).unwrap();
        assert_eq!(dom.children(div), &[p]);
    }

    #[test]
    fn insert_child_moves_existing_child_instead_of_duplicating() {
        let mut dom = Dom::new();
        let list = dom.create_element("ul");
        dom.add_child(dom.root(), list).unwrap();
        let a = dom.create_element("li");
        let b = dom.create_element("li");
        let c = dom.create_element("li");
        for item in [a, b, c] {
            dom.add_child(list, item).unwrap();
        }
        // Move the last item to the front.
        dom.insert_child(list, 0, c).unwrap();
        assert_eq!(dom.children(list), &[c, a, b]);
        assert_eq!(dom.children(list).len(), 3);
        assert_parent_invariant(&dom);
    }

    #[test]
    fn insert_before_and_after() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        let anchor = dom.create_element("a");
        dom.add_child(div, anchor).unwrap();

        let before = dom.create_text("before");
        let after = dom.create_text("after");
        dom.insert_before(div, anchor, before).unwrap();
        dom.insert_after(div, anchor, after).unwrap();
        assert_eq!(dom.children(div), &[before, anchor, after]);

        let stranger = dom.create_element("b");
        let other = dom.create_text("x");
        assert_eq!(
            dom.insert_before(div, stranger, other),
            Err(DomError::ReferenceNotFound)
        );
        assert_eq!(
            dom.insert_after(div, stranger, other),
            Err(DomError::ReferenceNotFound)
        );
    }

    #[test]
    fn set_children_detaches_previous() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        let old = dom.create_text("old");
        dom.add_child(div, old).unwrap();

        let new_a = dom.create_text("a");
        let new_b = dom.create_text("b");
        dom.set_children(div, vec![new_a, new_b]).unwrap();
        assert_eq!(dom.children(div), &[new_a, new_b]);
        assert_eq!(dom.parent(old), None);
        assert_parent_invariant(&dom);
    }

    #[test]
    fn remove_child_absent_is_fatal() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        let stray = dom.create_element("p");
        assert_eq!(dom.remove_child(div, stray), Err(DomError::NotAChild));
        assert_eq!(
            dom.remove_child_at(div, 0),
            Err(DomError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn extract_child_promotes_grandchildren_in_place() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        let before = dom.create_text("before");
        let wrapper = dom.create_element("span");
        let after = dom.create_text("after");
        dom.add_child(div, before).unwrap();
        dom.add_child(div, wrapper).unwrap();
        dom.add_child(div, after).unwrap();

        let x = element_with_text(&mut dom, "x", "1");
        let y = element_with_text(&mut dom, "y", "2");
        dom.add_child(wrapper, x).unwrap();
        dom.add_child(wrapper, y).unwrap();

        dom.extract_child(div, wrapper).unwrap();
        assert_eq!(dom.children(div), &[before, x, y, after]);
        assert_eq!(dom.parent(wrapper), None);
        assert_parent_invariant(&dom);
    }

    #[test]
    fn extract_child_propagates_local_variables() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        let wrapper = dom.create_element("span");
        dom.add_child(div, wrapper).unwrap();
        dom.set_local_variable(wrapper, "user", Value::from("alice"));

        let child = dom.create_element("p");
        dom.add_child(wrapper, child).unwrap();
        dom.set_local_variable(child, "own", Value::from(1i64));

        dom.extract_child(div, wrapper).unwrap();
        assert_eq!(dom.local_variable(child, "user"), Some(&Value::from("alice")));
        assert_eq!(dom.local_variable(child, "own"), Some(&Value::from(1i64)));
    }

    #[test]
    fn extract_non_nestable_child_degrades_to_removal() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        let text = dom.create_text("x");
        dom.add_child(div, text).unwrap();
        dom.extract_child(div, text).unwrap();
        assert!(dom.children(div).is_empty());
    }

    #[test]
    fn attribute_operations_normalize_names() {
        let mut dom = Dom::new();
        let input = dom.create_element("INPUT");
        dom.set_attribute(input, "TYPE", Some("text")).unwrap();
        assert_eq!(dom.attribute_value(input, "type"), Some("text"));
        assert!(dom.has_attribute(input, "Type"));
        assert!(dom.remove_attribute(input, "type").unwrap());
        assert!(!dom.has_attribute(input, "type"));

        let text = dom.create_text("x");
        assert_eq!(
            dom.set_attribute(text, "a", None),
            Err(DomError::NotAnAttributeHolder)
        );
    }

    #[test]
    fn namespace_declaration_flag() {
        let mut dom = Dom::new();
        let html = dom.create_element("html");
        dom.set_attribute(html, "xmlns:th", Some("http://example.org/th"))
            .unwrap();
        assert!(dom.has_namespace_declaration(html));
    }

    #[test]
    fn variable_resolution_walks_ancestors() {
        let mut dom = Dom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("span");
        dom.add_child(dom.root(), outer).unwrap();
        dom.add_child(outer, inner).unwrap();
        dom.set_local_variable(outer, "x", Value::from("outer"));
        dom.set_local_variable(inner, "x", Value::from("inner"));
        dom.set_local_variable(outer, "y", Value::from("only-outer"));

        assert_eq!(dom.resolve_variable(inner, "x"), Some(&Value::from("inner")));
        assert_eq!(dom.resolve_variable(inner, "y"), Some(&Value::from("only-outer")));
        assert_eq!(dom.resolve_variable(inner, "z"), None);
    }

    #[test]
    fn skippable_marks_descendants() {
        let mut dom = Dom::new();
        let a = dom.create_element("a");
        let b = dom.create_element("b");
        let c = dom.create_text("c");
        dom.add_child(dom.root(), a).unwrap();
        dom.add_child(a, b).unwrap();
        dom.add_child(b, c).unwrap();

        dom.set_skippable(a, true);
        assert!(dom.is_skippable(a));
        assert!(dom.is_skippable(b));
        assert!(dom.is_skippable(c));
    }

    #[test]
    fn non_skippable_marks_ancestors() {
        let mut dom = Dom::new();
        let a = dom.create_element("a");
        let b = dom.create_element("b");
        let c = dom.create_text("c");
        dom.add_child(dom.root(), a).unwrap();
        dom.add_child(a, b).unwrap();
        dom.add_child(b, c).unwrap();

        dom.set_skippable(dom.root(), true);
        dom.set_skippable(c, false);
        assert!(!dom.is_skippable(c));
        assert!(!dom.is_skippable(b));
        assert!(!dom.is_skippable(a));
        assert!(!dom.is_skippable(dom.root()));
    }

    #[test]
    fn clone_node_is_deep() {
        let mut dom = Dom::new();
        let li = dom.create_element("li");
        dom.add_child(dom.root(), li).unwrap();
        dom.set_attribute(li, "class", Some("item")).unwrap();
        dom.set_local_variable(li, "n", Value::from(1i64));
        let text = dom.create_text("hello");
        dom.add_child(li, text).unwrap();

        let copy = dom.clone_node(li, Some(dom.root()), false).unwrap();
        assert_ne!(copy, li);
        assert_eq!(dom.attribute_value(copy, "class"), Some("item"));
        assert_eq!(dom.local_variable(copy, "n"), Some(&Value::from(1i64)));
        assert_eq!(dom.children(copy).len(), 1);
        let copy_text = dom.children(copy)[0];
        assert_ne!(copy_text, text);
        assert_eq!(dom.text_content(copy_text), Some("hello"));

        // Mutating the copy leaves the original untouched.
        dom.set_attribute(copy, "class", Some("changed")).unwrap();
        assert_eq!(dom.attribute_value(li, "class"), Some("item"));
        assert_parent_invariant(&dom);
    }

    #[test]
    fn clone_without_processor_state_resets_flags() {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        dom.add_child(dom.root(), div).unwrap();
        dom.set_skippable(div, true);
        dom.set_precomputed(div, true);

        let fresh = dom.clone_node(div, None, false).unwrap();
        assert!(!dom.is_skippable(fresh));
        assert!(!dom.is_precomputed(fresh));

        let kept = dom.clone_node(div, None, true).unwrap();
        assert!(dom.is_skippable(kept));
        assert!(dom.is_precomputed(kept));
    }

    #[test]
    fn import_copies_across_arenas() {
        let mut source = Dom::new();
        let div = source.create_element("div");
        source.add_child(source.root(), div).unwrap();
        source.set_attribute(div, "id", Some("frag")).unwrap();
        let text = source.create_text("imported");
        source.add_child(div, text).unwrap();
        source.set_skippable(div, true);

        let mut target = Dom::new();
        let imported = target.import(&source, div);
        target.add_child(target.root(), imported).unwrap();
        assert_eq!(target.attribute_value(imported, "id"), Some("frag"));
        assert_eq!(target.children(imported).len(), 1);
        assert!(!target.is_skippable(imported));
        assert_parent_invariant(&target);
    }

    #[test]
    fn move_all_children_preserves_order() {
        let mut dom = Dom::new();
        let from = dom.create_element("from");
        let to = dom.create_element("to");
        dom.add_child(dom.root(), from).unwrap();
        dom.add_child(dom.root(), to).unwrap();
        let a = dom.create_text("a");
        let b = dom.create_text("b");
        dom.add_child(from, a).unwrap();
        dom.add_child(from, b).unwrap();

        dom.move_all_children(from, to).unwrap();
        assert!(dom.children(from).is_empty());
        assert_eq!(dom.children(to), &[a, b]);
        assert_parent_invariant(&dom);
    }
}
