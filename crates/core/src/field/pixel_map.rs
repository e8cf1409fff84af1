//! Flat width×height pixel buffers exchanged with hosts.
//!
//! Hosts hand classification, conductivity and base-image sources to the
//! field as [`PixelMap`]s and receive rendered frames in the same shape.
//! The core never touches a file format; encoding and decoding pixels is
//! host glue.

use crate::core_types::Rgb;
use serde::{Deserialize, Serialize};

/// A width×height grid of colors in row-major order (`y * width + x`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelMap {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelMap {
    /// Create a map filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        let cells = width as usize * height as usize;
        PixelMap {
            width,
            height,
            pixels: vec![color; cells],
        }
    }

    /// Wrap an existing pixel buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty or its length is not `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Self {
        assert!(!pixels.is_empty(), "pixel buffer must not be empty");
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel buffer length must match {width}x{height}"
        );

        PixelMap {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at grid indices (bounds-checked).
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Overwrite the pixel at grid indices.
    ///
    /// # Panics
    ///
    /// Panics if the indices lie outside the map.
    pub fn put(&mut self, x: u32, y: u32, color: Rgb) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} map",
            self.width,
            self.height
        );
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Raw pixels in row-major order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

/// Source buffers for map-driven field construction.
///
/// Classification and conductivity are required; the base image is optional
/// and, when present, supplies the per-cell cold anchor for rendering.
#[derive(Debug, Clone)]
pub struct SourceMaps {
    /// Obstacle classification source (black ⇒ wall, pure red ⇒ fixed
    /// border, else open).
    pub classification: PixelMap,
    /// Conductivity source; the red channel is rescaled to `[0, 1]`.
    pub conductivity: PixelMap,
    /// Optional background image used as the cold-end render anchor.
    pub base: Option<PixelMap>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_indexing() {
        let mut map = PixelMap::filled(4, 3, Rgb::BLACK);
        map.put(1, 2, Rgb::RED);

        assert_eq!(map.get(1, 2), Some(Rgb::RED));
        assert_eq!(map.pixels()[2 * 4 + 1], Rgb::RED);
    }

    #[test]
    fn test_get_out_of_range() {
        let map = PixelMap::filled(4, 3, Rgb::BLACK);

        assert_eq!(map.get(4, 0), None);
        assert_eq!(map.get(0, 3), None);
    }

    #[test]
    #[should_panic(expected = "pixel buffer length")]
    fn test_from_pixels_size_mismatch() {
        let _ = PixelMap::from_pixels(4, 3, vec![Rgb::BLACK; 5]);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_from_pixels_empty() {
        let _ = PixelMap::from_pixels(0, 0, Vec::new());
    }
}
