use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{
    apply_impulses, body_pair, inv_or_zero, k_scalar, normal_relative_velocity,
};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{clamp, Vector2, EPSILON};
use crate::Result;

/// Keeps two anchor points at a fixed distance from each other
pub struct PinJoint {
    base: ConstraintBase,

    /// The anchor point on the first body (in local space)
    anchor1: Vector2,

    /// The anchor point on the second body (in local space)
    anchor2: Vector2,

    /// The distance to maintain between the anchor points
    dist: f32,

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

impl PinJoint {
    /// Creates a new pin joint holding the anchors `dist` apart
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor1: Vector2,
        anchor2: Vector2,
        dist: f32,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            anchor1,
            anchor2,
            dist,
            r1: Vector2::zero(),
            r2: Vector2::zero(),
            n: Vector2::zero(),
            n_mass: 0.0,
            bias: 0.0,
            jn_max: 0.0,
            jn_acc: 0.0,
        }
    }

    /// Creates a pin joint whose rest distance is the current anchor distance
    pub fn from_bodies(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor1: Vector2,
        anchor2: Vector2,
    ) -> Result<Self> {
        let (a, b) = body_pair(bodies, body_a, body_b)?;
        let dist = b.local_to_world(anchor2).distance(&a.local_to_world(anchor1));
        Ok(Self::new(body_a, body_b, anchor1, anchor2, dist))
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

    /// Returns the rest distance
    pub fn get_dist(&self) -> f32 {
        self.dist
    }

    /// Sets the rest distance
    pub fn set_dist(&mut self, dist: f32) {
        self.dist = dist;
    }
}

impl Constraint for PinJoint {
    fn constraint_type(&self) -> &'static str {
        "PinJoint"
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

        // Coincident anchors leave no usable axis; the constraint sits out
        // this tick instead of dividing by zero.
        self.n = if dist > EPSILON {
            delta / dist
        } else {
            Vector2::zero()
        };

        self.n_mass = inv_or_zero(k_scalar(a, b, self.r1, self.r2, self.n));
        self.bias = self.base.bias_velocity(dist - self.dist, dt);
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
        let vrn = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;
            normal_relative_velocity(a, b, self.r1, self.r2, self.n)
        };

        let jn = (self.bias - vrn) * self.n_mass;
        let jn_old = self.jn_acc;
        self.jn_acc = clamp(jn_old + jn, -self.jn_max, self.jn_max);

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
