use std::any::Any;

use crate::bodies::RigidBody;
use crate::constraints::SolveHook;
use crate::core::{BodyHandle, BodyStorage, StepContext};
use crate::math::{clamp, Vector2};
use crate::Result;

/// Fields and behavior shared by every constraint variant
pub struct ConstraintBase {
    /// The first body in the constraint
    body_a: BodyHandle,

    /// The second body in the constraint
    body_b: BodyHandle,

    /// Maximum magnitude of the corrective force the constraint may apply
    max_force: f32,

    /// Fraction of positional error corrected per step, in (0, 1]
    error_bias: f32,

    /// Maximum speed at which positional error is corrected
    max_bias: f32,

    /// Hook invoked after the constraint's pre-step phase
    pre_solve: Option<SolveHook>,

    /// Hook invoked after all sub-steps of the tick
    post_solve: Option<SolveHook>,
}

impl ConstraintBase {
    /// Creates the shared state for a constraint between two bodies
    pub fn new(body_a: BodyHandle, body_b: BodyHandle) -> Self {
        Self {
            body_a,
            body_b,
            max_force: f32::INFINITY,
            error_bias: 0.9,
            max_bias: f32::INFINITY,
            pre_solve: None,
            post_solve: None,
        }
    }

    /// Returns the first body of the constraint
    pub fn body_a(&self) -> BodyHandle {
        self.body_a
    }

    /// Returns the second body of the constraint
    pub fn body_b(&self) -> BodyHandle {
        self.body_b
    }

    /// Returns the maximum corrective force
    pub fn get_max_force(&self) -> f32 {
        self.max_force
    }

    /// Sets the maximum corrective force
    pub fn set_max_force(&mut self, max_force: f32) {
        self.max_force = max_force;
    }

    /// Returns the error bias
    pub fn get_error_bias(&self) -> f32 {
        self.error_bias
    }

    /// Sets the error bias
    ///
    /// Values outside (0, 1] are accepted as-is and produce physically
    /// implausible but well-defined behavior.
    pub fn set_error_bias(&mut self, error_bias: f32) {
        self.error_bias = error_bias;
    }

    /// Returns the maximum bias velocity
    pub fn get_max_bias(&self) -> f32 {
        self.max_bias
    }

    /// Sets the maximum bias velocity
    pub fn set_max_bias(&mut self, max_bias: f32) {
        self.max_bias = max_bias;
    }

    /// Registers the pre-solve hook
    pub fn set_pre_solve(&mut self, hook: SolveHook) {
        self.pre_solve = Some(hook);
    }

    /// Unregisters the pre-solve hook
    pub fn clear_pre_solve(&mut self) {
        self.pre_solve = None;
    }

    /// Registers the post-solve hook
    pub fn set_post_solve(&mut self, hook: SolveHook) {
        self.post_solve = Some(hook);
    }

    /// Unregisters the post-solve hook
    pub fn clear_post_solve(&mut self) {
        self.post_solve = None;
    }

    pub(crate) fn run_pre_solve(&mut self, ctx: &StepContext) -> Result<()> {
        match &mut self.pre_solve {
            Some(hook) => hook.call(ctx),
            None => Ok(()),
        }
    }

    pub(crate) fn run_post_solve(&mut self, ctx: &StepContext) -> Result<()> {
        match &mut self.post_solve {
            Some(hook) => hook.call(ctx),
            None => Ok(()),
        }
    }

    /// Bias velocity for a scalar positional error, clamped to ±max_bias
    pub(crate) fn bias_velocity(&self, error: f32, dt: f32) -> f32 {
        clamp(-self.error_bias * error / dt, -self.max_bias, self.max_bias)
    }

    /// Bias velocity for a vector positional error, length-clamped to max_bias
    pub(crate) fn bias_velocity_vec(&self, delta: Vector2, dt: f32) -> Vector2 {
        (delta * (-self.error_bias / dt)).clamp_length(self.max_bias)
    }

    /// Upper bound on the accumulated impulse magnitude for a tick
    pub(crate) fn impulse_limit(&self, dt: f32) -> f32 {
        self.max_force * dt
    }
}

/// Base trait for physics constraints
///
/// The owning simulation loop calls the three solver operations once per tick
/// in a fixed order: `pre_step` exactly once, `apply_cached_impulse` exactly
/// once, then `apply_impulse` once per solver sub-step.
pub trait Constraint: Send + 'static {
    /// Returns the type name of the constraint
    fn constraint_type(&self) -> &'static str;

    /// Returns the shared constraint state
    fn base(&self) -> &ConstraintBase;

    /// Returns the shared constraint state mutably
    fn base_mut(&mut self) -> &mut ConstraintBase;

    /// Returns the bodies involved in the constraint
    fn get_bodies(&self) -> [BodyHandle; 2] {
        [self.base().body_a(), self.base().body_b()]
    }

    /// Checks if the constraint involves a specific body
    fn involves_body(&self, body: BodyHandle) -> bool {
        self.get_bodies().contains(&body)
    }

    /// Recomputes anchors, axes, effective masses and bias terms from current
    /// body state
    fn pre_step(&mut self, bodies: &mut BodyStorage<RigidBody>, dt: f32) -> Result<()>;

    /// Re-applies last tick's accumulated impulse scaled by `dt_coef`
    fn apply_cached_impulse(
        &mut self,
        bodies: &mut BodyStorage<RigidBody>,
        dt_coef: f32,
    ) -> Result<()>;

    /// Runs one impulse sub-step against current relative velocities
    fn apply_impulse(&mut self, bodies: &mut BodyStorage<RigidBody>) -> Result<()>;

    /// Returns the magnitude of the accumulated impulse
    fn impulse(&self) -> f32;

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
