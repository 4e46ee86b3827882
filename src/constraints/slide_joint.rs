use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{
    apply_impulses, body_pair, inv_or_zero, k_scalar, normal_relative_velocity,
};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{clamp, Vector2};
use crate::Result;

/// Keeps the distance between two anchor points within [min, max]
///
/// This is a one-sided constraint: while the distance lies inside the band no
/// impulse is applied at all.
pub struct SlideJoint {
    base: ConstraintBase,

    /// The anchor point on the first body (in local space)
    anchor1: Vector2,

    /// The anchor point on the second body (in local space)
    anchor2: Vector2,

    /// The minimum allowed anchor distance
    min: f32,

    /// The maximum allowed anchor distance
    max: f32,

    // Solver state, recomputed each pre-step.
    r1: Vector2,
    r2: Vector2,
    n: Vector2,
    n_mass: f32,
    bias: f32,
    jn_max: f32,

    /// Accumulated normal impulse, kept across ticks for warm-starting
    jn_acc: f32,
}

impl SlideJoint {
    /// Creates a new slide joint
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor1: Vector2,
        anchor2: Vector2,
        min: f32,
        max: f32,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            anchor1,
            anchor2,
            min,
            max,
            r1: Vector2::zero(),
            r2: Vector2::zero(),
            n: Vector2::zero(),
            n_mass: 0.0,
            bias: 0.0,
            jn_max: 0.0,
            jn_acc: 0.0,
        }
    }

    /// Returns the anchor point on the first body
    pub fn get_anchor1(&self) -> Vector2 {
        self.anchor1
    }

    /// Sets the anchor point on the first body
    pub fn set_anchor1(&mut self, anchor: Vector2) {
        self.anchor1 = anchor;
    }

    /// Returns the anchor point on the second body
    pub fn get_anchor2(&self) -> Vector2 {
        self.anchor2
    }

    /// Sets the anchor point on the second body
    pub fn set_anchor2(&mut self, anchor: Vector2) {
        self.anchor2 = anchor;
    }

    /// Returns the minimum allowed distance
    pub fn get_min(&self) -> f32 {
        self.min
    }

    /// Sets the minimum allowed distance
    pub fn set_min(&mut self, min: f32) {
        self.min = min;
    }

    /// Returns the maximum allowed distance
    pub fn get_max(&self) -> f32 {
        self.max
    }

    /// Sets the maximum allowed distance
    pub fn set_max(&mut self, max: f32) {
        self.max = max;
    }
}

impl Constraint for SlideJoint {
    fn constraint_type(&self) -> &'static str {
        "SlideJoint"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;

        self.r1 = self.anchor1.rotate(a.get_rotation());
        self.r2 = self.anchor2.rotate(b.get_rotation());

        let delta = (b.get_position() + self.r2) - (a.get_position() + self.r1);
        let dist = delta.length();

        let mut pdist = 0.0;
        if dist > self.max {
            pdist = dist - self.max;
            self.n = delta.normalize();
        } else if dist < self.min {
            pdist = self.min - dist;
            self.n = -delta.normalize();
        } else {
            // Inside the band: no axis, and the cached impulse is stale.
            self.n = Vector2::zero();
            self.jn_acc = 0.0;
        }

        self.n_mass = inv_or_zero(k_scalar(a, b, self.r1, self.r2, self.n));
        self.bias = self.base.bias_velocity(pdist, dt);
        self.jn_max = self.base.impulse_limit(dt);

        Ok(())
    }

    fn apply_cached_impulse(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        dt_coef: f32,
    ) -> Result<()> {
        let j = self.n * (self.jn_acc * dt_coef);
        apply_impulses(
            bodies,
            self.base.body_a(),
            self.base.body_b(),
            self.r1,
            self.r2,
            j,
        )
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStorage<RigidBody>) -> Result<()> {
        if self.n.is_zero() {
            return Ok(());
        }

        let vrn = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;
            normal_relative_velocity(a, b, self.r1, self.r2, self.n)
        };

        let jn = (self.bias - vrn) * self.n_mass;
        let jn_old = self.jn_acc;

        // One-sided: the joint may only pull back inside the band.
        self.jn_acc = clamp(jn_old + jn, -self.jn_max, 0.0);

        apply_impulses(
            bodies,
            self.base.body_a(),
            self.base.body_b(),
            self.r1,
            self.r2,
            self.n * (self.jn_acc - jn_old),
        )
    }

    fn impulse(&self) -> f32 {
        self.jn_acc.abs()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
