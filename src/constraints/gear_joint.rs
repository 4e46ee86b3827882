use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{body_pair, inv_or_zero};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::clamp;
use crate::Result;

/// Locks the angular velocity of body B to a ratio of body A's
///
/// Drives `w_b - ratio * w_a` to zero, with a position bias keeping
/// `angle_b - ratio * angle_a` at `phase`.
pub struct GearJoint {
    base: ConstraintBase,

    /// Angular offset maintained between the geared angles
    phase: f32,

    /// Gear ratio between the two bodies
    ratio: f32,

    // Solver state, recomputed each pre-step.
    i_sum: f32,
    bias: f32,
    j_max: f32,

    /// Accumulated angular impulse, kept across ticks for warm-starting
    j_acc: f32,
}

impl GearJoint {
    /// Creates a new gear joint
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, phase: f32, ratio: f32) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            phase,
            ratio,
            i_sum: 0.0,
            bias: 0.0,
            j_max: 0.0,
            j_acc: 0.0,
        }
    }

    /// Returns the phase offset
    pub fn get_phase(&self) -> f32 {
        self.phase
    }

    /// Sets the phase offset
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase;
    }

    /// Returns the gear ratio
    pub fn get_ratio(&self) -> f32 {
        self.ratio
    }

    /// Sets the gear ratio
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
        self.j_acc = 0.0;
    }

    fn apply(&self, bodies: &mut BodyStorage<RigidBody>, j: f32) -> Result<()> {
        // Jacobian is [-ratio, 1] in the two angular velocities.
        bodies
            .get_body_mut(self.base.body_a())?
            .apply_angular_impulse(-j * self.ratio);
        bodies
            .get_body_mut(self.base.body_b())?
            .apply_angular_impulse(j);
        Ok(())
    }
}

impl Constraint for GearJoint {
    fn constraint_type(&self) -> &'static str {
        "GearJoint"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;

        self.i_sum = inv_or_zero(
            a.get_inverse_inertia() * self.ratio * self.ratio + b.get_inverse_inertia(),
        );

        let error = b.get_angle() - self.ratio * a.get_angle() - self.phase;
        self.bias = self.base.bias_velocity(error, dt);
        self.j_max = self.base.impulse_limit(dt);

        Ok(())
    }

    fn apply_cached_impulse(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        dt_coef: f32,
    ) -> Result<()> {
        self.apply(bodies, self.j_acc * dt_coef)
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStorage<RigidBody>) -> Result<()> {
        let wr = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;
            b.get_angular_velocity() - self.ratio * a.get_angular_velocity()
        };

        let j = (self.bias - wr) * self.i_sum;
        let j_old = self.j_acc;
        self.j_acc = clamp(j_old + j, -self.j_max, self.j_max);

        self.apply(bodies, self.j_acc - j_old)
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
