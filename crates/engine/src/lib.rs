//! The directive execution engine for trellis templates.
//!
//! An [`Engine`] walks a [`trellis_dom::Dom`] produced by an external
//! markup parser and rewrites it in place: precedence-ordered processors
//! are routed to nodes through name/attribute matchers, and each applies
//! one of a small set of rewrite behaviors (conditional visibility,
//! iteration, switch/case, local variables, fragment inclusion,
//! attribute modification). Expression evaluation and template
//! resolution stay behind the [`ExpressionEvaluator`] and
//! [`TemplateResolver`] seams.

pub mod assignation;
pub mod config;
pub mod context;
pub mod error;
pub(crate) mod handlers;
pub mod matcher;
pub mod pipeline;
pub mod processor;
pub mod resolve;

pub use assignation::{Assignation, IterationSpec, parse_assignations, parse_iteration};
pub use config::{EngineConfig, NameCache};
pub use context::RenderContext;
pub use error::EngineError;
pub use matcher::{Candidate, MatchTarget, ProcessorMatcher, TemplateMode};
pub use pipeline::Engine;
pub use processor::{Behavior, MergeMode, Processor};
pub use resolve::{CachingResolver, ExpressionEvaluator, Fragment, TemplateResolver};
