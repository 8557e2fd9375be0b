//! Shared source-position types for the cjsnav engine.
//!
//! Editors speak in line/column positions, while the scanner works in
//! byte offsets. This crate provides the position types and the
//! conversion machinery between the two.

pub mod position;

pub use position::{LineMap, Location, Position, Range};
