use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{
    apply_impulses, body_pair, effective_mass, relative_velocity,
};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{Matrix2, Vector2};
use crate::Result;

/// Forces two anchor points to coincide
pub struct PivotJoint {
    base: ConstraintBase,

    /// The anchor point on the first body (in local space)
    anchor1: Vector2,

    /// The anchor point on the second body (in local space)
    anchor2: Vector2,

    // Solver state, recomputed each pre-step.
    r1: Vector2,
    r2: Vector2,
    k_inv: Matrix2,
    bias: Vector2,
    j_max: f32,

    /// Accumulated impulse, kept across ticks for warm-starting
    j_acc: Vector2,
}

impl PivotJoint {
    /// Creates a new pivot joint from local-space anchors
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor1: Vector2,
        anchor2: Vector2,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            anchor1,
            anchor2,
            r1: Vector2::zero(),
            r2: Vector2::zero(),
            k_inv: Matrix2::zero(),
            bias: Vector2::zero(),
            j_max: 0.0,
            j_acc: Vector2::zero(),
        }
    }

    /// Creates a pivot joint anchored at a shared world-space point
    pub fn from_pivot_point(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        pivot: Vector2,
    ) -> Result<Self> {
        let (a, b) = body_pair(bodies, body_a, body_b)?;
        let anchor1 = a.world_to_local(pivot);
        let anchor2 = b.world_to_local(pivot);
        Ok(Self::new(body_a, body_b, anchor1, anchor2))
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
}

impl Constraint for PivotJoint {
    fn constraint_type(&self) -> &'static str {
        "PivotJoint"
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

        self.k_inv = effective_mass(a, b, self.r1, self.r2);
        self.j_max = self.base.impulse_limit(dt);

        let delta = (b.get_position() + self.r2) - (a.get_position() + self.r1);
        self.bias = self.base.bias_velocity_vec(delta, dt);

        Ok(())
    }

    fn apply_cached_impulse(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        dt_coef: f32,
    ) -> Result<()> {
        apply_impulses(
            bodies,
            self.base.body_a(),
            self.base.body_b(),
            self.r1,
            self.r2,
            self.j_acc * dt_coef,
        )
    }

    fn apply_impulse(&mut self, bodies: &mut BodyStorage<RigidBody>) -> Result<()> {
        let vr = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;
            relative_velocity(a, b, self.r1, self.r2)
        };

        let j = self.k_inv.transform_vector(self.bias - vr);
        let j_old = self.j_acc;
        self.j_acc = (j_old + j).clamp_length(self.j_max);

        apply_impulses(
            bodies,
            self.base.body_a(),
            self.base.body_b(),
            self.r1,
            self.r2,
            self.j_acc - j_old,
        )
    }

    fn impulse(&self) -> f32 {
        self.j_acc.length()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
