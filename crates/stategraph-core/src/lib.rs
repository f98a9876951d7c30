//! Stategraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Stategraph
//! parser, layout engine and CLI. It includes:
//!
//! - **Geometry**: Points and bounds in layout space ([`geometry`] module)
//! - **Identifiers**: Scoped node identifiers ([`identifier::NodeId`])
//! - **Definition**: The validated workflow definition model ([`definition`] module)
//! - **Graph**: The positioned node/edge output ([`graph::LayoutGraph`])

pub mod definition;
pub mod geometry;
pub mod graph;
pub mod identifier;
