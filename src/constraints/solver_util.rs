//! Shared solver math used by the constraint variants.

use crate::bodies::RigidBody;
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{Matrix2, Vector2, EPSILON};
use crate::Result;

/// Relative velocity of the anchor points at offsets `r1`/`r2` from the bodies
pub(crate) fn relative_velocity(
    a: &RigidBody,
    b: &RigidBody,
    r1: Vector2,
    r2: Vector2,
) -> Vector2 {
    b.velocity_at_offset(r2) - a.velocity_at_offset(r1)
}

/// Relative velocity of the anchor points projected onto the axis `n`
pub(crate) fn normal_relative_velocity(
    a: &RigidBody,
    b: &RigidBody,
    r1: Vector2,
    r2: Vector2,
    n: Vector2,
) -> f32 {
    relative_velocity(a, b, r1, r2).dot(&n)
}

/// Reciprocal guarded against near-zero denominators
///
/// A zero result short-circuits impulse application for infinite-mass pairs
/// instead of dividing by zero.
pub(crate) fn inv_or_zero(k: f32) -> f32 {
    if k.abs() > EPSILON {
        1.0 / k
    } else {
        0.0
    }
}

/// Scalar effective mass denominator of the two bodies along the axis `n`
pub(crate) fn k_scalar(a: &RigidBody, b: &RigidBody, r1: Vector2, r2: Vector2, n: Vector2) -> f32 {
    let mass_sum = a.get_inverse_mass() + b.get_inverse_mass();
    let r1_cross_n = r1.cross(&n);
    let r2_cross_n = r2.cross(&n);

    mass_sum
        + a.get_inverse_inertia() * r1_cross_n * r1_cross_n
        + b.get_inverse_inertia() * r2_cross_n * r2_cross_n
}

/// 2x2 effective mass denominator matrix of the two bodies
pub(crate) fn k_tensor(a: &RigidBody, b: &RigidBody, r1: Vector2, r2: Vector2) -> Matrix2 {
    let mass_sum = a.get_inverse_mass() + b.get_inverse_mass();
    let inv_i_a = a.get_inverse_inertia();
    let inv_i_b = b.get_inverse_inertia();

    let k11 = mass_sum + inv_i_a * r1.y * r1.y + inv_i_b * r2.y * r2.y;
    let k12 = -inv_i_a * r1.x * r1.y - inv_i_b * r2.x * r2.y;
    let k22 = mass_sum + inv_i_a * r1.x * r1.x + inv_i_b * r2.x * r2.x;

    Matrix2::new([[k11, k12], [k12, k22]])
}

/// Inverted effective mass matrix, or the zero matrix for singular pairs
pub(crate) fn effective_mass(a: &RigidBody, b: &RigidBody, r1: Vector2, r2: Vector2) -> Matrix2 {
    k_tensor(a, b, r1, r2).inverse().unwrap_or_else(Matrix2::zero)
}

/// Fetches both constrained bodies immutably
pub(crate) fn body_pair<'a>(
    bodies: &'a BodyStorage<RigidBody>,
    handle_a: BodyHandle,
    handle_b: BodyHandle,
) -> Result<(&'a RigidBody, &'a RigidBody)> {
    let a = bodies.get_body(handle_a)?;
    let b = bodies.get_body(handle_b)?;
    Ok((a, b))
}

/// Applies the impulse `j` to body B at `r2` and its negation to body A at `r1`
pub(crate) fn apply_impulses(
    bodies: &mut BodyStorage<RigidBody>,
    handle_a: BodyHandle,
    handle_b: BodyHandle,
    r1: Vector2,
    r2: Vector2,
    j: Vector2,
) -> Result<()> {
    bodies.get_body_mut(handle_a)?.apply_impulse(-j, r1);
    bodies.get_body_mut(handle_b)?.apply_impulse(j, r2);
    Ok(())
}

/// Applies the angular impulse `j` to body B and its negation to body A
pub(crate) fn apply_angular_impulses(
    bodies: &mut BodyStorage<RigidBody>,
    handle_a: BodyHandle,
    handle_b: BodyHandle,
    j: f32,
) -> Result<()> {
    bodies.get_body_mut(handle_a)?.apply_angular_impulse(-j);
    bodies.get_body_mut(handle_b)?.apply_angular_impulse(j);
    Ok(())
}
