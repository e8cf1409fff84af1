//! Temperature-to-color rendering.
//!
//! Each cell's color comes from a two-segment interpolation: cold anchor to
//! mid below half of the maximum temperature, mid to warm at or above it.
//! The cold anchor is the cell's base-image color when the field has one,
//! otherwise the configured cold constant. An optional double-log
//! compression remaps temperatures before the split so that differences stay
//! visible across a wide dynamic range (a perceptual remap, not a physical
//! quantity).

use crate::core_types::Rgb;
use crate::field::{DiffusionField, PixelMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Compression curve applied to temperature before color mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    /// Map stored temperatures directly.
    Linear,
    /// `ln(ln(T + 1) + 1)`, spreading a wide dynamic range into the
    /// visible band.
    #[default]
    LogLog,
}

impl Compression {
    fn apply(self, temperature: f64) -> f64 {
        match self {
            Compression::Linear => temperature,
            Compression::LogLog => ((temperature + 1.0).ln() + 1.0).ln(),
        }
    }
}

/// Color-mapping configuration.
///
/// Passed explicitly into [`DiffusionField::render`]; the renderer keeps no
/// module-level color state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Cold-end anchor used where the field has no base image.
    pub cold: Rgb,
    /// Mid anchor at half the maximum temperature.
    pub mid: Rgb,
    /// Warm anchor at the maximum temperature.
    pub warm: Rgb,
    /// Compressed temperatures at or above this value map to the warm
    /// anchor.
    pub max_temperature: f64,
    /// Curve applied before the half-max split.
    pub compression: Compression,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            cold: Rgb::new(0, 0, 255),
            mid: Rgb::new(255, 110, 80),
            warm: Rgb::new(255, 245, 120),
            max_temperature: 2.0,
            compression: Compression::LogLog,
        }
    }
}

impl RenderConfig {
    /// Map a temperature to a color against the given cold anchor.
    ///
    /// The compressed temperature is clamped to `[0, max_temperature]`, so
    /// anything at or above the maximum saturates to the warm anchor.
    pub fn color_for(&self, temperature: f64, cold: Rgb) -> Rgb {
        let half = self.max_temperature / 2.0;
        let value = self
            .compression
            .apply(temperature)
            .clamp(0.0, self.max_temperature);

        if value < half {
            cold.lerp(self.mid, value / half)
        } else {
            self.mid.lerp(self.warm, (value - half) / half)
        }
    }
}

impl DiffusionField {
    /// Render the temperature field as a pixel buffer.
    ///
    /// With `zoom == 1` each cell becomes one pixel; with larger zoom each
    /// cell becomes a zoom×zoom block, shrunk by one pixel on the right and
    /// bottom when `grid_overlay` is set so the cell boundaries show. A pure
    /// read; field state is never mutated.
    ///
    /// # Panics
    ///
    /// Panics if `zoom` is zero.
    pub fn render(&self, cfg: &RenderConfig, zoom: u32, grid_overlay: bool) -> PixelMap {
        assert!(zoom >= 1, "zoom must be at least 1");

        let mut out = PixelMap::filled(self.width * zoom, self.height * zoom, Rgb::BLACK);
        let gap = u32::from(grid_overlay && zoom >= 2);
        let block = zoom - gap;

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let cold = self
                    .base_colors
                    .as_ref()
                    .map_or(cfg.cold, |colors| colors[idx]);
                let color = cfg.color_for(self.temperature[idx], cold);

                for dy in 0..block {
                    for dx in 0..block {
                        out.put(x * zoom + dx, y * zoom + dy, color);
                    }
                }
            }
        }

        debug!(
            "rendered {}x{} frame (zoom {zoom})",
            out.width(),
            out.height()
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::SimulationParams;

    fn ramp_config() -> RenderConfig {
        RenderConfig {
            cold: Rgb::new(0, 0, 0),
            mid: Rgb::new(128, 128, 128),
            warm: Rgb::new(255, 255, 255),
            max_temperature: 2.0,
            compression: Compression::Linear,
        }
    }

    #[test]
    fn test_color_map_hits_anchors() {
        let cfg = ramp_config();

        assert_eq!(cfg.color_for(0.0, cfg.cold), cfg.cold);
        assert_eq!(cfg.color_for(1.0, cfg.cold), cfg.mid);
        assert_eq!(cfg.color_for(2.0, cfg.cold), cfg.warm);
    }

    #[test]
    fn test_color_map_monotonic_and_saturating() {
        let cfg = ramp_config();

        let mut previous = cfg.color_for(0.0, cfg.cold);
        for i in 1..=200 {
            let t = f64::from(i) * 0.02;
            let color = cfg.color_for(t, cfg.cold);
            assert!(color.r >= previous.r && color.g >= previous.g && color.b >= previous.b);
            previous = color;
        }

        // Anything at or above the maximum maps identically to the maximum.
        let at_max = cfg.color_for(cfg.max_temperature, cfg.cold);
        assert_eq!(cfg.color_for(10.0, cfg.cold), at_max);
        assert_eq!(cfg.color_for(1.0e9, cfg.cold), at_max);
    }

    #[test]
    fn test_loglog_compression_monotonic() {
        let mut previous = f64::NEG_INFINITY;
        for i in 0..100 {
            let compressed = Compression::LogLog.apply(f64::from(i) * 100.0);
            assert!(compressed > previous);
            previous = compressed;
        }
    }

    #[test]
    fn test_render_zoom_one_dimensions() {
        let field =
            DiffusionField::procedural(5, 4, SimulationParams::default(), |_, _| 0.0);
        let frame = field.render(&ramp_config(), 1, false);

        assert_eq!(frame.width(), 5);
        assert_eq!(frame.height(), 4);
    }

    #[test]
    fn test_render_zoom_blocks_with_grid_gap() {
        let cfg = ramp_config();
        let field =
            DiffusionField::procedural(3, 3, SimulationParams::default(), |_, _| 2.0);
        let frame = field.render(&cfg, 4, true);

        assert_eq!(frame.width(), 12);
        assert_eq!(frame.height(), 12);
        // Block interior carries the cell color, the gap row/column stays
        // at the background.
        let center_color = cfg.color_for(2.0, cfg.cold);
        assert_eq!(frame.get(4, 4), Some(center_color));
        assert_eq!(frame.get(7, 4), Some(Rgb::BLACK));
        assert_eq!(frame.get(4, 7), Some(Rgb::BLACK));
    }

    #[test]
    fn test_render_uses_base_image_cold_anchor() {
        use crate::field::SourceMaps;

        let base_color = Rgb::new(10, 20, 30);
        let maps = SourceMaps {
            classification: PixelMap::filled(4, 4, Rgb::new(255, 255, 255)),
            conductivity: PixelMap::filled(4, 4, Rgb::RED),
            base: Some(PixelMap::filled(4, 4, base_color)),
        };
        let params = SimulationParams {
            border_temperature: 0.0,
            ambient_temperature: 0.0,
            ..SimulationParams::default()
        };
        let field = DiffusionField::from_maps(&maps, params, None);

        let cfg = ramp_config();
        let frame = field.render(&cfg, 1, false);

        // At zero temperature every cell shows its base-image color.
        assert_eq!(frame.get(2, 2), Some(base_color));
    }
}
