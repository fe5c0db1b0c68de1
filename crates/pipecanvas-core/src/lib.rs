//! Pipecanvas Core Types
//!
//! This crate provides the value types shared by the pipecanvas editor
//! library and its command-line front end. It includes:
//!
//! - **Identifiers**: String-interned node and kind identifiers ([`identifier::Id`])
//! - **Colors**: CSS colors and the background palette ([`color`] module)
//! - **Geometry**: Points, sizes and bounding boxes ([`geometry`] module)
//! - **Model**: Nodes, edges, flow directions and palette entries ([`model`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod model;
