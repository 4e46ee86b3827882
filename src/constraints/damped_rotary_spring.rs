use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{apply_angular_impulses, body_pair};
use crate::constraints::{Constraint, ConstraintBase, SpringFn};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::clamp;
use crate::Result;

/// A damped rotational spring acting on the relative angle of two bodies
///
/// Like [`DampedSpring`](crate::constraints::DampedSpring), the torque is
/// computed and applied during `pre_step`; the impulse-accumulation machinery
/// is skipped. A positive torque drives the relative angle down toward the
/// rest angle.
pub struct DampedRotarySpring {
    base: ConstraintBase,

    /// The relative angle the spring wants to return to
    rest_angle: f32,

    /// The spring constant
    stiffness: f32,

    /// The damping coefficient
    damping: f32,

    /// Optional override replacing the default torque formula
    torque_fn: Option<SpringFn>,

    /// Angular impulse applied during the last pre-step, for diagnostics
    j_applied: f32,
}

impl DampedRotarySpring {
    /// Creates a new damped rotary spring
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        rest_angle: f32,
        stiffness: f32,
        damping: f32,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            rest_angle,
            stiffness,
            damping,
            torque_fn: None,
            j_applied: 0.0,
        }
    }

    /// Returns the rest angle
    pub fn get_rest_angle(&self) -> f32 {
        self.rest_angle
    }

    /// Sets the rest angle
    pub fn set_rest_angle(&mut self, rest_angle: f32) {
        self.rest_angle = rest_angle;
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

    /// Registers a custom torque function, replacing the default formula
    pub fn set_torque_fn(&mut self, torque_fn: SpringFn) {
        self.torque_fn = Some(torque_fn);
    }

    /// Unregisters the custom torque function, restoring the default formula
    pub fn clear_torque_fn(&mut self) {
        self.torque_fn = None;
    }
}

impl Constraint for DampedRotarySpring {
    fn constraint_type(&self) -> &'static str {
        "DampedRotarySpring"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (rel_angle, rel_angvel) = {
            let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;
            (
                b.get_angle() - a.get_angle(),
                b.get_angular_velocity() - a.get_angular_velocity(),
            )
        };

        let torque = match &mut self.torque_fn {
            Some(f) => f.call(rel_angle),
            None => (rel_angle - self.rest_angle) * self.stiffness + rel_angvel * self.damping,
        };

        let max_force = self.base.get_max_force();
        let j = clamp(torque, -max_force, max_force) * dt;
        self.j_applied = j;

        // Positive torque reduces the relative angle, so it is applied with
        // the opposite sign of the [-1, +1] angular Jacobian.
        apply_angular_impulses(bodies, self.base.body_a(), self.base.body_b(), -j)
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
