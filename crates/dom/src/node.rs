//! The closed set of node kinds making up a document tree.

use crate::attribute::AttributeStore;
use crate::name::{is_minimizable_element, normalize_name};
use crate::tree::NodeId;

/// How an element was written in the source. Purely cosmetic: only output
/// serialization looks at this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagRepr {
    /// `<br/>`
    Standalone,
    /// `<div></div>`
    OpenCloseEmpty,
    /// `<div>...</div>`
    #[default]
    OpenCloseNonEmpty,
    /// `<br>` with no matching close tag
    OpenOnly,
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub name: String,
    pub normalized_name: String,
    pub attributes: AttributeStore,
    pub repr: TagRepr,
    /// Self-closing eligibility in web output, derived from the name.
    pub minimizable: bool,
    pub children: Vec<NodeId>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        let normalized_name = normalize_name(name);
        let minimizable = is_minimizable_element(&normalized_name);
        ElementData {
            name: name.to_string(),
            normalized_name,
            attributes: AttributeStore::new(),
            repr: TagRepr::default(),
            minimizable,
            children: Vec::new(),
        }
    }
}

/// Every node kind the tree can hold. Exhaustive matches over this enum
/// give compiler-checked coverage for clone/precompute/write operations.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The single top container of a document.
    Root { children: Vec<NodeId> },
    Element(ElementData),
    /// Attribute holder with no tag of its own; transparent for selection
    /// and serialization.
    Group {
        attributes: AttributeStore,
        children: Vec<NodeId>,
    },
    Text { content: String },
    Cdata { content: String },
    Comment { content: String },
    /// Opaque markup emitted verbatim, never processed.
    Macro { content: String },
    ProcessingInstruction {
        target: String,
        content: Option<String>,
    },
}

impl NodeKind {
    /// Whether this kind owns a children sequence.
    pub fn is_nestable(&self) -> bool {
        matches!(
            self,
            NodeKind::Root { .. } | NodeKind::Element(_) | NodeKind::Group { .. }
        )
    }

    /// Whether this kind owns an attribute store.
    pub fn is_attribute_holder(&self) -> bool {
        matches!(self, NodeKind::Element(_) | NodeKind::Group { .. })
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            NodeKind::Root { children } => children,
            NodeKind::Element(element) => &element.children,
            NodeKind::Group { children, .. } => children,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Root { children } => Some(children),
            NodeKind::Element(element) => Some(&mut element.children),
            NodeKind::Group { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn attributes(&self) -> Option<&AttributeStore> {
        match self {
            NodeKind::Element(element) => Some(&element.attributes),
            NodeKind::Group { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub(crate) fn attributes_mut(&mut self) -> Option<&mut AttributeStore> {
        match self {
            NodeKind::Element(element) => Some(&mut element.attributes),
            NodeKind::Group { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    /// A copy of this kind with an empty children sequence, for deep-copy
    /// operations that rebuild children node by node.
    pub(crate) fn clone_shell(&self) -> NodeKind {
        let mut shell = self.clone();
        if let Some(children) = shell.children_mut() {
            children.clear();
        }
        shell
    }
}
