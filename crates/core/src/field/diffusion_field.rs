//! Heat diffusion field: storage, boundary conditions, and the explicit
//! Euler integration step.
//!
//! The field owns co-indexed flat buffers (classification, conductivity,
//! temperature) sized width×height plus a persistent back buffer that the
//! step swaps into place, so the hot loop performs no allocation.

use crate::core_types::{Rgb, SimulationParams, Tile};
use crate::field::pixel_map::SourceMaps;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Temperature summary over all cells, for host-side reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// 2D heat diffusion field over a rectangular grid.
///
/// All mutating operations expect and preserve the [`ok`](Self::ok)
/// invariant; a violation is a programming error, not a recoverable
/// condition.
pub struct DiffusionField {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) conductivity: Vec<f64>,
    pub(crate) temperature: Vec<f64>,
    /// Back buffer for `step`; same length as `temperature`.
    scratch: Vec<f64>,
    /// Per-cell cold-end render anchors from the base image, if one was
    /// supplied.
    pub(crate) base_colors: Option<Vec<Rgb>>,
    params: SimulationParams,
}

impl DiffusionField {
    /// Build a field with open cells and uniform conductivity, seeding
    /// interior temperatures from `fill(x, y)` and then applying boundary
    /// conditions.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is 2 or less; such a grid has no
    /// interior to diffuse over.
    pub fn procedural<F>(width: u32, height: u32, params: SimulationParams, fill: F) -> Self
    where
        F: Fn(u32, u32) -> f64,
    {
        assert!(
            width > 2 && height > 2,
            "field needs an interior, got {width}x{height}"
        );

        let cells = width as usize * height as usize;
        let mut field = DiffusionField {
            width,
            height,
            tiles: vec![Tile::Open; cells],
            conductivity: vec![params.base_conductivity; cells],
            temperature: vec![params.ambient_temperature; cells],
            scratch: vec![0.0; cells],
            base_colors: None,
            params,
        };

        let border = field.params.border_temperature;
        field.set_field_conditions(fill);
        field.set_wall_conditions(border);

        info!("procedural field initialized: {width}x{height}");
        debug_assert!(field.ok());
        field
    }

    /// Build a field from host-supplied source maps.
    ///
    /// Classification comes from color thresholds, conductivity from the red
    /// channel scaled by the base conductivity, and every cell starts at the
    /// ambient temperature. Boundary conditions are applied, then `fill`
    /// (when given) seeds interior open cells only; map-driven construction
    /// never overwrites wall or fixed-border cells.
    ///
    /// # Panics
    ///
    /// Panics if the classification map is 2 cells or fewer on either axis,
    /// or if any other supplied map disagrees with its dimensions.
    pub fn from_maps(
        maps: &SourceMaps,
        params: SimulationParams,
        fill: Option<&dyn Fn(u32, u32) -> f64>,
    ) -> Self {
        let width = maps.classification.width();
        let height = maps.classification.height();
        assert!(
            width > 2 && height > 2,
            "field needs an interior, got {width}x{height}"
        );
        assert_eq!(
            (maps.conductivity.width(), maps.conductivity.height()),
            (width, height),
            "conductivity map must match classification dimensions"
        );
        if let Some(base) = &maps.base {
            assert_eq!(
                (base.width(), base.height()),
                (width, height),
                "base image must match classification dimensions"
            );
        }

        let cells = width as usize * height as usize;
        let tiles: Vec<Tile> = maps
            .classification
            .pixels()
            .iter()
            .map(|&pixel| Tile::classify(pixel))
            .collect();
        let conductivity: Vec<f64> = maps
            .conductivity
            .pixels()
            .iter()
            .map(|&pixel| params.base_conductivity * pixel.red_intensity())
            .collect();

        let mut field = DiffusionField {
            width,
            height,
            tiles,
            conductivity,
            temperature: vec![params.ambient_temperature; cells],
            scratch: vec![0.0; cells],
            base_colors: maps.base.as_ref().map(|map| map.pixels().to_vec()),
            params,
        };

        let border = field.params.border_temperature;
        field.set_wall_conditions(border);
        if let Some(generator) = fill {
            field.set_field_conditions(generator);
        }

        let walls = field.tiles.iter().filter(|tile| tile.is_wall()).count();
        info!("map-driven field initialized: {width}x{height}, {walls} wall cells");
        debug_assert!(field.ok());
        field
    }

    /// Validity predicate: a usable interior and consistently sized buffers.
    ///
    /// Classification tags are valid by construction (`Tile` is an enum), so
    /// unlike the buffers they need no per-cell check.
    pub fn ok(&self) -> bool {
        let cells = self.width as usize * self.height as usize;
        let base_ok = match &self.base_colors {
            Some(colors) => colors.len() == cells,
            None => true,
        };
        self.width > 2
            && self.height > 2
            && self.tiles.len() == cells
            && self.conductivity.len() == cells
            && self.temperature.len() == cells
            && self.scratch.len() == cells
            && base_ok
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pin the outer ring and every interior fixed-border cell to
    /// `border_temperature`.
    ///
    /// Idempotent. The step never re-pins, so hosts call this again each
    /// iteration when pinning must persist.
    pub fn set_wall_conditions(&mut self, border_temperature: f64) {
        debug_assert!(self.ok());

        for x in 0..self.width {
            let top = self.index(x, 0);
            let bottom = self.index(x, self.height - 1);
            self.temperature[top] = border_temperature;
            self.temperature[bottom] = border_temperature;
        }

        for y in 0..self.height {
            let left = self.index(0, y);
            let right = self.index(self.width - 1, y);
            self.temperature[left] = border_temperature;
            self.temperature[right] = border_temperature;
        }

        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let idx = self.index(x, y);
                if self.tiles[idx] == Tile::FixedBorder {
                    self.temperature[idx] = border_temperature;
                }
            }
        }

        debug_assert!(self.ok());
    }

    /// Overwrite every interior open cell with `generator(x, y)`.
    ///
    /// Wall and fixed-border cells are never touched by this call.
    pub fn set_field_conditions<F>(&mut self, generator: F)
    where
        F: Fn(u32, u32) -> f64,
    {
        debug_assert!(self.ok());

        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let idx = self.index(x, y);
                if self.tiles[idx] == Tile::Open {
                    self.temperature[idx] = generator(x, y);
                }
            }
        }

        debug_assert!(self.ok());
    }

    /// Add `delta` to every open cell strictly inside the circle around
    /// (`center_x`, `center_y`), flooring each result at zero.
    ///
    /// The bounding box is clamped to the grid extents, so centers outside
    /// the grid are safe and simply touch fewer (or no) cells.
    pub fn adjust_temperature(&mut self, center_x: u32, center_y: u32, radius: u32, delta: f64) {
        debug_assert!(self.ok());

        let start_x = center_x.saturating_sub(radius);
        let start_y = center_y.saturating_sub(radius);
        let finish_x = center_x.saturating_add(radius).min(self.width - 1);
        let finish_y = center_y.saturating_add(radius).min(self.height - 1);
        let radius_sq = i64::from(radius) * i64::from(radius);

        for y in start_y..=finish_y {
            for x in start_x..=finish_x {
                let idx = self.index(x, y);
                if self.tiles[idx] != Tile::Open {
                    continue;
                }
                let dx = i64::from(x) - i64::from(center_x);
                let dy = i64::from(y) - i64::from(center_y);
                if dx * dx + dy * dy < radius_sq {
                    self.temperature[idx] = (self.temperature[idx] + delta).max(0.0);
                }
            }
        }

        debug_assert!(self.ok());
    }

    /// Advance the field by one explicit Euler step.
    ///
    /// Each interior open cell takes `T + sum · k · dt / dx²` where `sum` is
    /// the 5-point Laplacian over the previous buffer. A wall neighbor
    /// contributes zero to the sum (a zero-flux simplification of this
    /// model, not physical insulation). Wall and fixed-border cells carry
    /// their stored values forward unchanged; the step never re-pins the
    /// boundary.
    ///
    /// Stability is the caller's responsibility: the scheme silently
    /// diverges when `max conductivity · dt / dx²` exceeds
    /// [`SimulationParams::STABILITY_LIMIT`]. See
    /// [`SimulationParams::stability_factor`]; the step performs no check.
    pub fn step(&mut self) {
        debug_assert!(self.ok());

        let factor = self.params.time_step / (self.params.space_step * self.params.space_step);

        // Non-open cells and the outer ring keep their stored values.
        self.scratch.copy_from_slice(&self.temperature);

        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let idx = self.index(x, y);
                if self.tiles[idx] != Tile::Open {
                    continue;
                }

                let mut sum = -4.0 * self.temperature[idx];
                sum += self.flux_from(x - 1, y);
                sum += self.flux_from(x + 1, y);
                sum += self.flux_from(x, y - 1);
                sum += self.flux_from(x, y + 1);

                self.scratch[idx] =
                    self.temperature[idx] + sum * self.conductivity[idx] * factor;
            }
        }

        std::mem::swap(&mut self.temperature, &mut self.scratch);
        debug_assert!(self.ok());
    }

    /// Neighbor contribution to the Laplacian sum: the stored temperature,
    /// except walls which contribute nothing.
    #[inline]
    fn flux_from(&self, x: u32, y: u32) -> f64 {
        let idx = self.index(x, y);
        if self.tiles[idx] == Tile::Wall {
            0.0
        } else {
            self.temperature[idx]
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Get the temperature at grid indices (bounds-checked).
    pub fn temperature_at(&self, x: u32, y: u32) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.temperature[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get the classification at grid indices (bounds-checked).
    pub fn tile_at(&self, x: u32, y: u32) -> Option<Tile> {
        if x < self.width && y < self.height {
            Some(self.tiles[self.index(x, y)])
        } else {
            None
        }
    }

    /// Get the conductivity at grid indices (bounds-checked).
    pub fn conductivity_at(&self, x: u32, y: u32) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.conductivity[self.index(x, y)])
        } else {
            None
        }
    }

    /// Largest per-cell conductivity; feed this to
    /// [`SimulationParams::stability_factor`] to check the CFL-type bound.
    pub fn max_conductivity(&self) -> f64 {
        self.conductivity.iter().copied().fold(0.0, f64::max)
    }

    /// Temperature summary over all cells.
    pub fn stats(&self) -> FieldStats {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &t in &self.temperature {
            min = min.min(t);
            max = max.max(t);
            sum += t;
        }

        let stats = FieldStats {
            min,
            max,
            mean: sum / self.temperature.len() as f64,
        };
        debug!(
            "field stats: min={:.3} max={:.3} mean={:.3}",
            stats.min, stats.max, stats.mean
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::pixel_map::PixelMap;
    use approx::assert_relative_eq;

    fn open_field(width: u32, height: u32, fill: f64) -> DiffusionField {
        DiffusionField::procedural(width, height, SimulationParams::default(), |_, _| fill)
    }

    #[test]
    fn test_procedural_construction() {
        let field = open_field(5, 4, 3.0);

        assert!(field.ok());
        assert_eq!(field.width(), 5);
        assert_eq!(field.height(), 4);
        // Interior from the generator, ring from the border temperature.
        assert_eq!(field.temperature_at(2, 1), Some(3.0));
        assert_eq!(field.temperature_at(0, 0), Some(1.0));
        assert_eq!(field.temperature_at(4, 3), Some(1.0));
        assert_eq!(field.tile_at(2, 1), Some(Tile::Open));
    }

    #[test]
    #[should_panic(expected = "needs an interior")]
    fn test_degenerate_dimensions_rejected() {
        let _ = open_field(2, 10, 0.0);
    }

    #[test]
    fn test_accessors_out_of_range() {
        let field = open_field(5, 5, 0.0);

        assert_eq!(field.temperature_at(5, 0), None);
        assert_eq!(field.tile_at(0, 5), None);
        assert_eq!(field.conductivity_at(9, 9), None);
    }

    #[test]
    fn test_from_maps_classification_and_conductivity() {
        let mut classification = PixelMap::filled(4, 4, Rgb::new(200, 200, 200));
        classification.put(1, 1, Rgb::BLACK);
        classification.put(2, 1, Rgb::RED);
        // Red channel 51/255 = 0.2 of the base conductivity.
        let conductivity = PixelMap::filled(4, 4, Rgb::new(51, 0, 0));

        let maps = SourceMaps {
            classification,
            conductivity,
            base: None,
        };
        let field = DiffusionField::from_maps(&maps, SimulationParams::default(), None);

        assert_eq!(field.tile_at(1, 1), Some(Tile::Wall));
        assert_eq!(field.tile_at(2, 1), Some(Tile::FixedBorder));
        assert_eq!(field.tile_at(2, 2), Some(Tile::Open));
        assert_relative_eq!(field.conductivity_at(2, 2).unwrap(), 0.2);
    }

    #[test]
    fn test_from_maps_fill_skips_non_open_cells() {
        let mut classification = PixelMap::filled(5, 5, Rgb::new(255, 255, 255));
        classification.put(2, 2, Rgb::BLACK);
        let maps = SourceMaps {
            classification,
            conductivity: PixelMap::filled(5, 5, Rgb::RED),
            base: None,
        };

        let field =
            DiffusionField::from_maps(&maps, SimulationParams::default(), Some(&|_, _| 42.0));

        assert_eq!(field.temperature_at(1, 1), Some(42.0));
        // The wall keeps the ambient seed; the fill never reaches it.
        assert_eq!(field.temperature_at(2, 2), Some(1.0));
    }

    #[test]
    #[should_panic(expected = "conductivity map must match")]
    fn test_from_maps_dimension_mismatch() {
        let maps = SourceMaps {
            classification: PixelMap::filled(5, 5, Rgb::new(255, 255, 255)),
            conductivity: PixelMap::filled(4, 5, Rgb::RED),
            base: None,
        };
        let _ = DiffusionField::from_maps(&maps, SimulationParams::default(), None);
    }

    #[test]
    fn test_brush_floors_at_zero_and_honors_circle() {
        let mut field = open_field(9, 9, 5.0);
        field.adjust_temperature(4, 4, 3, -100.0);

        // Strictly inside the circle: floored at zero, never negative.
        assert_eq!(field.temperature_at(4, 4), Some(0.0));
        assert_eq!(field.temperature_at(4, 6), Some(0.0));
        // Distance exactly equal to the radius is outside (strict test).
        assert_eq!(field.temperature_at(4, 7), Some(5.0));
        // Far outside the bounding box.
        assert_eq!(field.temperature_at(1, 1), Some(5.0));
    }

    #[test]
    fn test_brush_out_of_grid_center() {
        let mut field = open_field(6, 6, 2.0);
        let before: Vec<f64> = field.temperature.clone();

        field.adjust_temperature(1000, 1000, 5, 50.0);

        assert_eq!(field.temperature, before);
    }

    #[test]
    fn test_brush_clamped_at_edge() {
        let mut field = open_field(6, 6, 2.0);

        // Center on the ring; the box clamp keeps every access in range.
        field.adjust_temperature(0, 3, 2, 10.0);

        assert_eq!(field.temperature_at(1, 3), Some(12.0));
    }

    #[test]
    fn test_step_swaps_without_reallocating() {
        let mut field = open_field(8, 8, 1.0);
        let temp_ptr = field.temperature.as_ptr();
        let scratch_ptr = field.scratch.as_ptr();

        field.step();

        // Buffers trade places; no new allocation in the hot loop.
        assert_eq!(field.temperature.as_ptr(), scratch_ptr);
        assert_eq!(field.scratch.as_ptr(), temp_ptr);
    }

    #[test]
    fn test_step_keeps_non_open_cells_bit_identical() {
        let mut classification = PixelMap::filled(6, 6, Rgb::new(255, 255, 255));
        classification.put(2, 2, Rgb::BLACK);
        classification.put(3, 3, Rgb::RED);
        let maps = SourceMaps {
            classification,
            conductivity: PixelMap::filled(6, 6, Rgb::RED),
            base: None,
        };
        let mut field =
            DiffusionField::from_maps(&maps, SimulationParams::default(), Some(&|x, y| {
                f64::from(x + 10 * y)
            }));

        let wall_before = field.temperature_at(2, 2).unwrap();
        let border_before = field.temperature_at(3, 3).unwrap();
        field.step();

        assert_eq!(field.temperature_at(2, 2), Some(wall_before));
        assert_eq!(field.temperature_at(3, 3), Some(border_before));
    }

    #[test]
    fn test_max_conductivity_and_stats() {
        let mut classification = PixelMap::filled(4, 4, Rgb::new(255, 255, 255));
        classification.put(1, 2, Rgb::BLACK);
        let mut conductivity = PixelMap::filled(4, 4, Rgb::new(0, 0, 0));
        conductivity.put(1, 1, Rgb::new(128, 0, 0));
        let maps = SourceMaps {
            classification,
            conductivity,
            base: None,
        };

        let field = DiffusionField::from_maps(&maps, SimulationParams::default(), None);

        assert_relative_eq!(field.max_conductivity(), 128.0 / 255.0);
        let stats = field.stats();
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 1.0);
        assert_relative_eq!(stats.mean, 1.0);
    }
}
