use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::solver_util::{apply_angular_impulses, body_pair, inv_or_zero};
use crate::constraints::{Constraint, ConstraintBase};
use crate::core::{BodyHandle, BodyStorage};
use crate::math::clamp;
use crate::Result;

/// A one-way angular latch advancing in discrete notches
///
/// The internal `angle` state is the last engaged notch. When the free
/// relative angle advances past the next notch (in the direction given by the
/// sign of `ratchet`), `angle` snaps forward by whole notches; when the free
/// angle retreats, the joint holds at the engaged notch like a hard stop.
/// This is the one variant whose behavior depends on history across ticks.
pub struct RatchetJoint {
    base: ConstraintBase,

    /// The last engaged notch position
    angle: f32,

    /// Angular offset of the notch grid
    phase: f32,

    /// Notch size; its sign selects the free direction
    ratchet: f32,

    // Solver state, recomputed each pre-step.
    i_sum: f32,
    bias: f32,
    j_max: f32,

    /// Accumulated angular impulse, kept across ticks for warm-starting
    j_acc: f32,
}

impl RatchetJoint {
    /// Creates a new ratchet joint with the latch engaged at angle zero
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, phase: f32, ratchet: f32) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            angle: 0.0,
            phase,
            ratchet,
            i_sum: 0.0,
            bias: 0.0,
            j_max: 0.0,
            j_acc: 0.0,
        }
    }

    /// Creates a ratchet joint engaged at the bodies' current relative angle
    pub fn from_bodies(
        bodies: &BodyStorage<RigidBody>,
        body_a: BodyHandle,
        body_b: BodyHandle,
        phase: f32,
        ratchet: f32,
    ) -> Result<Self> {
        let (a, b) = body_pair(bodies, body_a, body_b)?;
        let mut joint = Self::new(body_a, body_b, phase, ratchet);
        joint.angle = b.get_angle() - a.get_angle();
        Ok(joint)
    }

    /// Returns the engaged notch position
    pub fn get_angle(&self) -> f32 {
        self.angle
    }

    /// Sets the engaged notch position
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// Returns the phase offset
    pub fn get_phase(&self) -> f32 {
        self.phase
    }

    /// Sets the phase offset
    pub fn set_phase(&mut self, phase: f32) {
        self.phase = phase;
    }

    /// Returns the notch size
    pub fn get_ratchet(&self) -> f32 {
        self.ratchet
    }

    /// Sets the notch size
    pub fn set_ratchet(&mut self, ratchet: f32) {
        self.ratchet = ratchet;
    }
}

impl Constraint for RatchetJoint {
    fn constraint_type(&self) -> &'static str {
        "RatchetJoint"
    }

    fn base(&self) -> &ConstraintBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ConstraintBase {
        &mut self.base
    }

    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()> {
        let (a, b) = body_pair(bodies, self.base.body_a(), self.base.body_b())?;

        let delta = b.get_angle() - a.get_angle();
        let diff = self.angle - delta;
        let mut pdist = 0.0;

        if diff * self.ratchet > 0.0 {
            // Retreating against the latch: hold at the engaged notch.
            pdist = diff;
        } else if self.ratchet != 0.0 {
            // Advancing freely: snap the latch forward in whole notches.
            self.angle =
                ((delta - self.phase) / self.ratchet).floor() * self.ratchet + self.phase;
        }

        self.i_sum = inv_or_zero(a.get_inverse_inertia() + b.get_inverse_inertia());
        self.bias = self.base.bias_velocity(pdist, dt);
        self.j_max = self.base.impulse_limit(dt);

        // Not engaged: the cached impulse is stale.
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

        // One-sided accumulation in the latch direction.
        self.j_acc =
            clamp((j_old + j) * self.ratchet, 0.0, self.j_max * self.ratchet.abs()) / self.ratchet;

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
