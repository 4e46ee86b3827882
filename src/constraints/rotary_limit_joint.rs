use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{apply_angular_impulses, body_pair, inv_or_zero};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::clamp;
use crate::Result;

/// Keeps the relative angle of two bodies within [min, max]
///
/// Inside the band the joint applies no impulse; outside, it pushes the angle
/// back to the nearest bound.
pub struct RotaryLimitJoint {
    base: ConstraintBase,

    /// The minimum allowed relative angle
    min: f32,

    /// The maximum allowed relative angle
    max: f32,

    // Solver state, recomputed each pre-step.
    i_sum: f32,
    bias: f32,
    j_max: f32,

    /// Accumulated angular impulse, kept across ticks for warm-starting
    j_acc: f32,
}

impl RotaryLimitJoint {
    /// Creates a new rotary limit joint
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, min: f32, max: f32) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            min,
            max,
            i_sum: 0.0,
            bias: 0.0,
            j_max: 0.0,
            j_acc: 0.0,
        }
    }

    /// Returns the minimum allowed relative angle
    pub fn get_min(&self) -> f32 {
        self.min
    }

    /// Sets the minimum allowed relative angle
    pub fn set_min(&mut self, min: f32) {
        self.min = min;
    }

    /// Returns the maximum allowed relative angle
    pub fn get_max(&self) -> f32 {
        self.max
    }

    /// Sets the maximum allowed relative angle
    pub fn set_max(&mut self, max: f32) {
        self.max = max;
    }
}

impl Constraint for RotaryLimitJoint {
    fn constraint_type(&self) -> &'static str {
        "RotaryLimitJoint"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;

        let dist = b.get_angle() - a.get_angle();
        let mut pdist = 0.0;
        if dist > self.max {
            pdist = self.max - dist;
        } else if dist < self.min {
            pdist = self.min - dist;
        }

        self.i_sum = inv_or_zero(a.get_inverse_inertia() + b.get_inverse_inertia());
        self.bias = self.base.bias_velocity(pdist, dt);
        self.j_max = self.base.impulse_limit(dt);

        // Not at a limit: the cached impulse is stale.
        if self.bias == 0.0 {
            self.j_acc = 0.0;
        }

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
        if self.bias == 0.0 {
            return Ok(());
        }

        let wr = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;
            b.get_angular_velocity() - a.get_angular_velocity()
        };

        let j = -(self.bias + wr) * self.i_sum;
        let j_old = self.j_acc;

        // One-sided accumulation: the sign of the active bound restricts the
        // direction the joint may push.
        if self.bias < 0.0 {
            self.j_acc = clamp(j_old + j, 0.0, self.j_max);
        } else {
            self.j_acc = clamp(j_old + j, -self.j_max, 0.0);
        }

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
