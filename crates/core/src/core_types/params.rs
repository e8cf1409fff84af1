//! Physical integration parameters.

use serde::{Deserialize, Serialize};

/// Parameters of the explicit diffusion scheme.
///
/// The defaults reproduce the reference configuration: time step 10,
/// space step 8, unit base conductivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParams {
    /// Integration time step.
    pub time_step: f64,
    /// Grid spacing.
    pub space_step: f64,
    /// Base thermal conductivity. Per-cell conductivity is this value scaled
    /// by the conductivity-map intensity in `[0, 1]`.
    pub base_conductivity: f64,
    /// Temperature pinned onto the outer ring and fixed-border cells.
    pub border_temperature: f64,
    /// Initial temperature of unconstrained cells.
    pub ambient_temperature: f64,
}

impl SimulationParams {
    /// Largest stability factor for which the explicit 2D scheme stays
    /// stable.
    pub const STABILITY_LIMIT: f64 = 0.25;

    /// CFL-type stability factor `k · dt / dx²` for the given maximum
    /// conductivity.
    ///
    /// The solver does **not** enforce this bound; it will silently diverge
    /// or oscillate when the factor exceeds [`Self::STABILITY_LIMIT`].
    /// Hosts choose parameters that satisfy it by construction.
    pub fn stability_factor(&self, max_conductivity: f64) -> f64 {
        max_conductivity * self.time_step / (self.space_step * self.space_step)
    }
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            time_step: 10.0,
            space_step: 8.0,
            base_conductivity: 1.0,
            border_temperature: 1.0,
            ambient_temperature: 1.0,
        }
    }
}
