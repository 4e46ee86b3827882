use crate::math::Vector2;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Configuration parameters for the simulation
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// The fixed time step for the simulation
    pub time_step: f32,

    /// The number of impulse-solver sub-steps to run per tick
    pub solver_iterations: u32,

    /// Constant acceleration applied to dynamic bodies each tick
    pub gravity: Vector2,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            solver_iterations: 8,
            gravity: Vector2::zero(),
        }
    }
}
