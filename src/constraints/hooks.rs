use crate::core::StepContext;
use crate::Result;

/// A user callback invoked around constraint solving
///
/// The arity is chosen at registration time: nullary hooks take no arguments,
/// unary hooks receive the [`StepContext`] of the current tick. Hooks run
/// synchronously; an error return aborts the tick and propagates to the
/// caller of `step`.
pub enum SolveHook {
    Nullary(Box<dyn FnMut() -> Result<()> + Send>),
    Unary(Box<dyn FnMut(&StepContext) -> Result<()> + Send>),
}

impl SolveHook {
    /// Creates a hook that takes no arguments
    pub fn nullary<F>(f: F) -> Self
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        SolveHook::Nullary(Box::new(f))
    }

    /// Creates a hook that receives the step context
    pub fn unary<F>(f: F) -> Self
    where
        F: FnMut(&StepContext) -> Result<()> + Send + 'static,
    {
        SolveHook::Unary(Box::new(f))
    }

    pub(crate) fn call(&mut self, ctx: &StepContext) -> Result<()> {
        match self {
            SolveHook::Nullary(f) => f(),
            SolveHook::Unary(f) => f(ctx),
        }
    }
}

/// A user override for a spring's force or torque formula
///
/// Registered on [`DampedSpring`](crate::constraints::DampedSpring) (where the
/// unary argument is the current anchor distance) or
/// [`DampedRotarySpring`](crate::constraints::DampedRotarySpring) (where it is
/// the current relative angle). The returned scalar replaces the default
/// formula's result for that tick only.
pub enum SpringFn {
    Nullary(Box<dyn FnMut() -> f32 + Send>),
    Unary(Box<dyn FnMut(f32) -> f32 + Send>),
}

impl SpringFn {
    /// Creates an override that takes no arguments
    pub fn nullary<F>(f: F) -> Self
    where
        F: FnMut() -> f32 + Send + 'static,
    {
        SpringFn::Nullary(Box::new(f))
    }

    /// Creates an override that receives the current distance or angle
    pub fn unary<F>(f: F) -> Self
    where
        F: FnMut(f32) -> f32 + Send + 'static,
    {
        SpringFn::Unary(Box::new(f))
    }

    pub(crate) fn call(&mut self, value: f32) -> f32 {
        match self {
            SpringFn::Nullary(f) => f(),
            SpringFn::Unary(f) => f(value),
        }
    }
}
