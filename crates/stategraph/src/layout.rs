//! Layout engine for positioning workflow states.
//!
//! This module turns a validated definition into a [`LayoutGraph`] of
//! positioned nodes and annotated edges, without a general-purpose graph
//! layout library.
//!
//! # Pipeline Position
//!
//! ```text
//! Definition text / JSON value
//!     ↓ stategraph-parser
//! WorkflowDefinition
//!     ↓ layout (this module)
//! LayoutGraph
//!     ↓ export
//! JSON
//! ```
//!
//! [`LayoutGraph`]: stategraph_core::graph::LayoutGraph

mod context;
mod engine;
mod occupancy;

pub use engine::Engine;
