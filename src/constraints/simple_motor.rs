use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{apply_angular_impulses, body_pair, inv_or_zero};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::clamp;
use crate::Result;

/// Drives the relative angular velocity of two bodies to a constant rate
///
/// Drives `w_b - w_a` to `rate`. A purely velocity-level constraint; there is
/// no position bias.
pub struct SimpleMotor {
    base: ConstraintBase,

    /// The relative angular velocity to maintain
    rate: f32,

    // Solver state, recomputed each pre-step.
    i_sum: f32,
    j_max: f32,

    /// Accumulated angular impulse, kept across ticks for warm-starting
    j_acc: f32,
}

impl SimpleMotor {
    /// Creates a new simple motor
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, rate: f32) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            rate,
            i_sum: 0.0,
            j_max: 0.0,
            j_acc: 0.0,
        }
    }

    /// Returns the target relative angular velocity
    pub fn get_rate(&self) -> f32 {
        self.rate
    }

    /// Sets the target relative angular velocity
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
    }
}

impl Constraint for SimpleMotor {
    fn constraint_type(&self) -> &'static str {
        "SimpleMotor"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;

        self.i_sum = inv_or_zero(a.get_inverse_inertia() + b.get_inverse_inertia());
        self.j_max = self.base.impulse_limit(dt);

        Ok(())
    }

    fn apply_cached_impulse(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        dt_coef: f32,
    ) -> Result<()> {
        apply_angular_impulses(
            bodies,
            self.base.body_a(),
            self.base.body_b(),
            self.j_acc * dt_coef,
        )
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStorage<RigidBody>) -> Result<()> {
        let wr = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;
            b.get_angular_velocity() - a.get_angular_velocity() - self.rate
        };

        let j = -wr * self.i_sum;
        let j_old = self.j_acc;
        self.j_acc = clamp(j_old + j, -self.j_max, self.j_max);

        apply_angular_impulses(
            bodies,
            self.base.body_a(),
            self.base.body_b(),
            self.j_acc - j_old,
        )
    }

    fn impulse(&self) -> f32 {
        self.j_acc.abs()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
