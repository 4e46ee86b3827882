use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{apply_impulses, body_pair, normal_relative_velocity};
use crate::constraints::{Constraint, ConstraintBase, SpringFn};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{clamp, Vector2, EPSILON};
use crate::Result;

/// A damped linear spring between two anchor points
///
/// Springs are force based rather than impulse based: the whole spring force
/// is computed and applied during `pre_step`, and the warm-starting /
/// sub-step machinery is skipped entirely. A positive force pulls the anchors
/// together.
pub struct DampedSpring {
    base: ConstraintBase,

    /// The anchor point on the first body (in local space)
    anchor1: Vector2,

    /// The anchor point on the second body (in local space)
    anchor2: Vector2,

    /// The length the spring wants to return to
    rest_length: f32,

    /// The spring constant
    stiffness: f32,

    /// The damping coefficient
    damping: f32,

    /// Optional override replacing the default force formula
    force_fn: Option<SpringFn>,

    /// Impulse applied during the last pre-step, for diagnostics
    j_applied: f32,
}

impl DampedSpring {
    /// Creates a new damped spring
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        anchor1: Vector2,
        anchor2: Vector2,
        rest_length: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            anchor1,
            anchor2,
            rest_length,
            stiffness,
            damping,
            force_fn: None,
            j_applied: 0.0,
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

    /// Returns the rest length
    pub fn get_rest_length(&self) -> f32 {
        self.rest_length
    }

    /// Sets the rest length
    pub fn set_rest_length(&mut self, rest_length: f32) {
        self.rest_length = rest_length;
    }

    /// Returns the spring constant
    pub fn get_stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Sets the spring constant
    pub fn set_stiffness(&mut self, stiffness: f32) {
        self.stiffness = stiffness;
    }

    /// Returns the damping coefficient
    pub fn get_damping(&self) -> f32 {
        self.damping
    }

    /// Sets the damping coefficient
    pub fn set_damping(&mut self, damping: f32) {
        self.damping = damping;
    }

    /// Registers a custom force function, replacing the default formula
    pub fn set_force_fn(&mut self, force_fn: SpringFn) {
        self.force_fn = Some(force_fn);
    }

    /// Unregisters the custom force function, restoring the default formula
    pub fn clear_force_fn(&mut self) {
        self.force_fn = None;
    }
}

impl Constraint for DampedSpring {
    fn constraint_type(&self) -> &'static str {
        "DampedSpring"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (r1, r2, n, dist, vrn) = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;

            let r1 = self.anchor1.rotate(a.get_rotation());
            let r2 = self.anchor2.rotate(b.get_rotation());

            let delta = (b.get_position() + r2) - (a.get_position() + r1);
            let dist = delta.length();
            let n = if dist > EPSILON {
                delta / dist
            } else {
                Vector2::zero()
            };

            let vrn = normal_relative_velocity(a, b, r1, r2, n);
            (r1, r2, n, dist, vrn)
        };

        let force = match &mut self.force_fn {
            Some(f) => f.call(dist),
            None => (dist - self.rest_length) * self.stiffness + vrn * self.damping,
        };

        let max_force = self.base.get_max_force();
        let j = clamp(force, -max_force, max_force) * dt;
        self.j_applied = j;

        // Positive force pulls B toward A along the anchor axis.
        apply_impulses(
            bodies,
            self.base.body_a(),
            self.base.body_b(),
            r1,
            r2,
            n * -j,
        )
    }

    fn apply_cached_impulse(
        &mut self,
        _bodies: &mut BodyStorage<RigidBody>,
        _dt_coef: f32,
    ) -> Result<()> {
        // Springs are not warm-started.
        Ok(())
    }

    fn apply_impulse(&mut self, _bodies: &mut BodyStorage<RigidBody>) -> Result<()> {
        // The full spring impulse was applied in pre_step.
        Ok(())
    }

    fn impulse(&self) -> f32 {
        self.j_applied.abs()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
