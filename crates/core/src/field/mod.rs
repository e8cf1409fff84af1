//! Field storage and the diffusion solver.

pub mod diffusion_field;
pub mod pixel_map;

pub use diffusion_field::{DiffusionField, FieldStats};
pub use pixel_map::{PixelMap, SourceMaps};
