//! Core types, track lengths, and errors for the Lattice grid engine.
//!
//! This crate provides the foundational types used across all other lattice crates:
//! - Geometry value types (sizes, points, rectangles, axes, cells)
//! - The `TrackLength` sizing rule for rows and columns
//! - Error types

pub mod errors;
pub mod length;
pub mod types;

pub use errors::*;
pub use length::*;
pub use types::*;
