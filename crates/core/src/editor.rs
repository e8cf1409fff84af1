//! Reusable interactive-edit primitive.
//!
//! The host owns the event loop and the input devices; each iteration it
//! packs the current signal states into an [`InputSnapshot`] and hands it to
//! [`EditorSession::tick`]. The core's contribution is purely the per-tick
//! brush application and delta bookkeeping; it holds no thread and polls
//! nothing.

use crate::field::DiffusionField;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Brush delta change applied per raise/lower signal.
const DELTA_STEP: f64 = 1.0;

/// Host-polled input state for one editor tick.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Pointer position in render-sink coordinates; divided by the session
    /// zoom to locate the cell.
    pub pointer_x: u32,
    pub pointer_y: u32,
    /// Apply the brush at the pointer this tick.
    pub paint: bool,
    /// Raise the brush delta by one step.
    pub raise_delta: bool,
    /// Lower the brush delta by one step.
    pub lower_delta: bool,
    /// Ask the host for a fresh render.
    pub refresh: bool,
    /// End the editing session.
    pub exit: bool,
}

/// Result of one editor tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// The host should render and present a frame.
    pub render_requested: bool,
    /// The session is over; stop ticking.
    pub exited: bool,
}

/// Brush-style temperature editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSession {
    brush_radius: u32,
    brush_delta: f64,
    zoom: u32,
}

impl EditorSession {
    /// # Panics
    ///
    /// Panics if `zoom` is zero.
    pub fn new(brush_radius: u32, brush_delta: f64, zoom: u32) -> Self {
        assert!(zoom >= 1, "zoom must be at least 1");

        EditorSession {
            brush_radius,
            brush_delta,
            zoom,
        }
    }

    pub fn brush_radius(&self) -> u32 {
        self.brush_radius
    }

    pub fn brush_delta(&self) -> f64 {
        self.brush_delta
    }

    /// Apply one tick of host-polled input to the field.
    ///
    /// An asserted exit signal ends the session before anything else is
    /// processed. Painting uses the delta as it was when the tick began;
    /// raise/lower signals take effect from the next tick on.
    pub fn tick(&mut self, field: &mut DiffusionField, input: &InputSnapshot) -> TickOutcome {
        if input.exit {
            return TickOutcome {
                render_requested: false,
                exited: true,
            };
        }

        if input.paint {
            let x = input.pointer_x / self.zoom;
            let y = input.pointer_y / self.zoom;
            debug!(
                "brush at ({x}, {y}) radius={} delta={}",
                self.brush_radius, self.brush_delta
            );
            field.adjust_temperature(x, y, self.brush_radius, self.brush_delta);
        }

        if input.lower_delta {
            self.brush_delta -= DELTA_STEP;
        }
        if input.raise_delta {
            self.brush_delta += DELTA_STEP;
        }

        TickOutcome {
            render_requested: input.refresh,
            exited: false,
        }
    }
}
