//! Heat Diffusion Core Library
//!
//! Explicit finite-difference heat diffusion over a rectangular 2D grid with
//! per-cell thermal conductivity and obstacle classification, plus
//! temperature-to-color rendering and a brush-style condition editor.
//!
//! Hosts supply classification/conductivity/base-image pixel maps (or a
//! procedural generator), drive [`DiffusionField::step`] on their own loop,
//! and consume rendered pixel buffers. Event polling, window management and
//! frame persistence all stay on the host side.

// Core types and utilities
pub mod core_types;

// Field storage and the diffusion solver
pub mod field;

// Interactive editing and rendering
pub mod editor;
pub mod render;

// Re-export core types
pub use core_types::{Rgb, SimulationParams, Tile};

// Re-export field types
pub use field::{DiffusionField, FieldStats, PixelMap, SourceMaps};

// Re-export editing and rendering types
pub use editor::{EditorSession, InputSnapshot, TickOutcome};
pub use render::{Compression, RenderConfig};
