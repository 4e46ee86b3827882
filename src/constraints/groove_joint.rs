use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{
    apply_impulses, body_pair, effective_mass, relative_velocity,
};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{Matrix2, Vector2};
use crate::Result;

/// Constrains an anchor on body B to slide along a segment fixed to body A
///
/// The groove runs from `groove_a` to `groove_b` in body A's local space. The
/// anchor is clamped at the segment's endpoints; it never extrapolates past
/// them.
pub struct GrooveJoint {
    base: ConstraintBase,

    /// The start of the groove segment (in body A's local space)
    groove_a: Vector2,

    /// The end of the groove segment (in body A's local space)
    groove_b: Vector2,

    /// The anchor point on the second body (in local space)
    anchor2: Vector2,

    // Solver state, recomputed each pre-step.
    /// World-space normal of the groove axis
    groove_tn: Vector2,
    /// Which endpoint (if any) the anchor is clamped against: ±1, or 0 when
    /// the anchor projects inside the segment
    clamp_sign: f32,
    r1: Vector2,
    r2: Vector2,
    k_inv: Matrix2,
    bias: Vector2,
    j_max: f32,

    /// Accumulated impulse, kept across ticks for warm-starting
    j_acc: Vector2,
}

impl GrooveJoint {
    /// Creates a new groove joint
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        groove_a: Vector2,
        groove_b: Vector2,
        anchor2: Vector2,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            groove_a,
            groove_b,
            anchor2,
            groove_tn: Vector2::zero(),
            clamp_sign: 0.0,
            r1: Vector2::zero(),
            r2: Vector2::zero(),
            k_inv: Matrix2::zero(),
            bias: Vector2::zero(),
            j_max: 0.0,
            j_acc: Vector2::zero(),
        }
    }

    /// Returns the start of the groove segment
    pub fn get_groove_a(&self) -> Vector2 {
        self.groove_a
    }

    /// Sets the start of the groove segment
    pub fn set_groove_a(&mut self, point: Vector2) {
        self.groove_a = point;
        self.j_acc = Vector2::zero();
    }

    /// Returns the end of the groove segment
    pub fn get_groove_b(&self) -> Vector2 {
        self.groove_b
    }

    /// Sets the end of the groove segment
    pub fn set_groove_b(&mut self, point: Vector2) {
        self.groove_b = point;
        self.j_acc = Vector2::zero();
    }

    /// Returns the anchor point on the second body
    pub fn get_anchor2(&self) -> Vector2 {
        self.anchor2
    }

    /// Sets the anchor point on the second body
    pub fn set_anchor2(&mut self, anchor: Vector2) {
        self.anchor2 = anchor;
        self.j_acc = Vector2::zero();
    }

    /// Restricts the impulse to directions the groove can actually resist
    fn constrain_impulse(&self, j: Vector2) -> Vector2 {
        let n = self.groove_tn;

        // When clamped at an endpoint the joint behaves like a pivot and may
        // push in any direction away from that endpoint; otherwise only the
        // component across the groove axis is valid.
        let j_clamped = if self.clamp_sign * j.cross(&n) > 0.0 {
            j
        } else {
            j.project(n)
        };

        j_clamped.clamp_length(self.j_max)
    }
}

impl Constraint for GrooveJoint {
    fn constraint_type(&self) -> &'static str {
        "GrooveJoint"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;

        let ta = a.local_to_world(self.groove_a);
        let tb = a.local_to_world(self.groove_b);

        let n = (tb - ta).normalize().perpendicular();
        let d = ta.dot(&n);

        self.groove_tn = n;
        self.r2 = self.anchor2.rotate(b.get_rotation());

        // Project the anchor onto the groove axis and clamp to the segment.
        let td = (b.get_position() + self.r2).cross(&n);

        if td <= ta.cross(&n) {
            self.clamp_sign = 1.0;
            self.r1 = ta - a.get_position();
        } else if td >= tb.cross(&n) {
            self.clamp_sign = -1.0;
            self.r1 = tb - a.get_position();
        } else {
            self.clamp_sign = 0.0;
            self.r1 = (n.perpendicular() * -td + n * d) - a.get_position();
        }

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
        self.j_acc = self.constrain_impulse(j_old + j);

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
