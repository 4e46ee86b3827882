use crate::bodies::RigidBody;
use crate::constraints::Constraint;
use crate::core::{BodyStorage, ConstraintStorage, StepContext};
use crate::error::PhysicsError;
use crate::Result;

/// Drives the per-tick constraint solving sequence
///
/// Each tick runs, for every constraint in handle order:
/// 1. `pre_step` followed by the constraint's pre-solve hook,
/// 2. `apply_cached_impulse` (warm-starting with last tick's impulse),
/// 3. `iterations` rounds of `apply_impulse`,
/// 4. the post-solve hook.
///
/// A hook or lookup error aborts the tick and propagates to the caller.
pub struct ConstraintSolver {
    /// Timestep of the previous tick, used to scale cached impulses
    prev_dt: f32,
}

impl ConstraintSolver {
    /// Creates a new solver with no cached tick
    pub fn new() -> Self {
        Self { prev_dt: 0.0 }
    }

    /// Runs one full solver tick over the given bodies and constraints
    pub fn step(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        constraints: &mut ConstraintStorage<Box<dyn Constraint>>,
        dt: f32,
        iterations: u32,
        ctx: &StepContext,
    ) -> Result<()> {
        if dt <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "Timestep must be positive, got {}",
                dt
            )));
        }

        let handles = constraints.handles();

        // Warm-start coefficient; zero on the first tick so no stale impulse
        // is applied.
        let dt_coef = if self.prev_dt == 0.0 {
            0.0
        } else {
            dt / self.prev_dt
        };

        for &handle in &handles {
            let constraint = constraints.get_constraint_mut(handle)?;
            constraint.pre_step(bodies, dt)?;
            constraint.base_mut().run_pre_solve(ctx)?;
        }

        for &handle in &handles {
            constraints
                .get_constraint_mut(handle)?
                .apply_cached_impulse(bodies, dt_coef)?;
        }

        for _ in 0..iterations {
            for &handle in &handles {
                constraints
                    .get_constraint_mut(handle)?
                    .apply_impulse(bodies)?;
            }
        }

        for &handle in &handles {
            constraints
                .get_constraint_mut(handle)?
                .base_mut()
                .run_post_solve(ctx)?;
        }

        self.prev_dt = dt;
        Ok(())
    }
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}
