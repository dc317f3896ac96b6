//! One module per directive archetype, dispatched from the pipeline.

pub(crate) mod attributes;
pub(crate) mod conditional;
pub(crate) mod fragments;
pub(crate) mod iteration;
pub(crate) mod switching;
pub(crate) mod variables;
