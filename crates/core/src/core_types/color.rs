//! RGB color sample used by source maps and the renderer.

use serde::{Deserialize, Serialize};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Classification color for wall cells.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Classification color for heat-fixing border cells.
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Channel-wise linear interpolation from `self` to `other`.
    ///
    /// `k` must lie in `[0, 1]`.
    pub fn lerp(self, other: Rgb, k: f64) -> Rgb {
        debug_assert!((0.0..=1.0).contains(&k), "lerp coefficient {k} out of range");

        let channel = |a: u8, b: u8| -> u8 {
            let mixed = f64::from(a) + k * (f64::from(b) - f64::from(a));
            mixed.round().clamp(0.0, 255.0) as u8
        };

        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Red channel rescaled from its native `0..=255` range to `[0, 1]`.
    pub fn red_intensity(self) -> f64 {
        f64::from(self.r) / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 100, 255);
        let b = Rgb::new(255, 0, 55);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 110, 80);

        let mid = a.lerp(b, 0.5);
        assert_eq!(mid, Rgb::new(128, 55, 40));
    }

    #[test]
    fn test_red_intensity_range() {
        assert_eq!(Rgb::BLACK.red_intensity(), 0.0);
        assert_eq!(Rgb::RED.red_intensity(), 1.0);
        assert!(Rgb::new(128, 0, 0).red_intensity() < 1.0);
    }
}
