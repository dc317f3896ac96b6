//! Path selectors for locating nodes in a [`trellis_dom::Dom`] tree.
//!
//! A selector is a chain of `/name` and `//name` segments, each optionally
//! carrying attribute predicates and a positional index:
//!
//! ```text
//! /div[@id="content"]//p[last()]
//! //li[@class="item" and @data-id]/text()
//! ```
//!
//! [`parse_selector`] turns the textual form into a [`Selector`];
//! [`select`] runs it against a tree.

pub mod ast;
pub mod error;
pub mod matcher;
pub mod parser;

pub use ast::{AttributeCondition, Index, Segment, SegmentName, Selector};
pub use error::SelectorError;
pub use matcher::{select, select_from};
pub use parser::parse_selector;
