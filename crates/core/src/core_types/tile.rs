//! Per-cell obstacle classification.

use crate::core_types::color::Rgb;
use serde::{Deserialize, Serialize};

/// How a cell participates in diffusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    /// Ordinary cell; evolved by the diffusion step.
    Open,
    /// Temperature is pinned whenever boundary conditions are applied; its
    /// stored value still feeds neighboring open cells.
    FixedBorder,
    /// Excluded from diffusion; contributes zero flux to its neighbors.
    Wall,
}

impl Tile {
    /// Classify a source-map pixel: pure black is a wall, pure red a
    /// fixed-temperature border, anything else open space.
    pub fn classify(pixel: Rgb) -> Tile {
        if pixel == Rgb::BLACK {
            Tile::Wall
        } else if pixel == Rgb::RED {
            Tile::FixedBorder
        } else {
            Tile::Open
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Tile::Open)
    }

    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(Tile::classify(Rgb::BLACK), Tile::Wall);
        assert_eq!(Tile::classify(Rgb::RED), Tile::FixedBorder);
        assert_eq!(Tile::classify(Rgb::new(255, 255, 255)), Tile::Open);
        // Near-black and near-red are still open space; thresholds are exact.
        assert_eq!(Tile::classify(Rgb::new(1, 0, 0)), Tile::Open);
        assert_eq!(Tile::classify(Rgb::new(255, 1, 0)), Tile::Open);
    }
}
