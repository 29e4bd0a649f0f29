//! Procession Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Procession layout
//! engine and its front ends. It includes:
//!
//! - **Identifiers**: Typed ids for catalog entities and layout elements ([`identifier`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Model**: The business-process tree consumed by the layout ([`model`] module)

pub mod color;
pub mod geometry;
pub mod identifier;
pub mod model;
