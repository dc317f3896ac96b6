//! Arena-backed mutable document tree for the trellis template engine.
//!
//! This crate is the foundation the selector and engine crates build on: a
//! [`Dom`] owns every node of one document in an arena, nodes are addressed
//! through [`NodeId`] handles, and the structural-mutation API keeps the
//! parent/child invariants intact across arbitrary rewrites.

pub mod attribute;
pub mod doctype;
pub mod error;
pub mod name;
pub mod node;
pub mod tree;
pub mod value;

pub use attribute::{Attribute, AttributeStore};
pub use doctype::{DocType, DocTypeTranslation};
pub use error::DomError;
pub use name::{Location, apply_dialect_prefix, normalize_name, split_prefix};
pub use node::{ElementData, NodeKind, TagRepr};
pub use tree::{Dom, NodeId};
pub use value::Value;
