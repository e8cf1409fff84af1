//! Core types and utilities

pub mod color;
pub mod params;
pub mod tile;

pub use color::Rgb;
pub use params::SimulationParams;
pub use tile::Tile;
