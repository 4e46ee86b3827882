use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use constraint2d::constraints::{
    DampedRotarySpring, DampedSpring, GearJoint, GrooveJoint, PinJoint, PivotJoint, RatchetJoint,
    RotaryLimitJoint, SimpleMotor, SlideJoint, SolveHook, SpringFn,
};
use constraint2d::error::PhysicsError;
use constraint2d::{Constraint, RigidBody, Space, Vector2};

const DT: f32 = 1.0 / 60.0;

fn unit_body(position: Vector2) -> RigidBody {
    RigidBody::new(1.0, 1.0, position)
}

fn anchor_distance(space: &Space, a: constraint2d::BodyHandle, b: constraint2d::BodyHandle) -> f32 {
    let pa = space.get_body(a).unwrap().get_position();
    let pb = space.get_body(b).unwrap().get_position();
    pa.distance(&pb)
}

#[test]
fn test_pin_joint_pulls_second_body_toward_first() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));

    space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));

    let error_before = (anchor_distance(&space, a, b) - 1.0).abs();
    space.step(DT).unwrap();

    // The bias impulse must pull B toward A.
    assert!(space.get_body(b).unwrap().get_linear_velocity().x < 0.0);

    let error_after = (anchor_distance(&space, a, b) - 1.0).abs();
    assert!(error_after < error_before);
}

#[test]
fn test_pin_joint_error_decreases_every_tick() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));

    space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));

    let mut error = (anchor_distance(&space, a, b) - 1.0).abs();
    for _ in 0..5 {
        space.step(DT).unwrap();
        let next = (anchor_distance(&space, a, b) - 1.0).abs();
        assert!(next < error, "error should shrink: {} -> {}", error, next);
        error = next;
    }
    assert!(error < 0.05);
}

#[test]
fn test_pin_joint_converges_from_random_configurations() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..5 {
        let mut space = Space::new();
        let pa = Vector2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));
        let offset = Vector2::for_angle(rng.gen_range(0.0..std::f32::consts::TAU))
            * rng.gen_range(1.0..4.0);
        let rest = rng.gen_range(0.5..2.0);

        let a = space.add_body(RigidBody::new(rng.gen_range(0.5..2.0), 1.0, pa));
        let b = space.add_body(RigidBody::new(rng.gen_range(0.5..2.0), 1.0, pa + offset));

        space.add_constraint(Box::new(PinJoint::new(
            a,
            b,
            Vector2::zero(),
            Vector2::zero(),
            rest,
        )));

        for _ in 0..60 {
            space.step(DT).unwrap();
        }

        let error = (anchor_distance(&space, a, b) - rest).abs();
        assert!(error < 1e-2, "did not converge, residual error {}", error);
    }
}

#[test]
fn test_slide_joint_applies_impulse_outside_band() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(5.0, 0.0)));

    let handle = space.add_constraint(Box::new(SlideJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
        3.0,
    )));

    space.step(DT).unwrap();

    // Distance 5 > max 3: an impulse must have been applied toward A.
    assert!(space.get_constraint(handle).unwrap().impulse() > 0.0);
    assert!(space.get_body(b).unwrap().get_position().x < 5.0);
}

#[test]
fn test_slide_joint_inactive_inside_band() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(2.0, 0.0)));

    let handle = space.add_constraint(Box::new(SlideJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
        3.0,
    )));

    space.step(DT).unwrap();

    // Distance 2 lies within [1, 3]: exactly zero impulse.
    assert_eq!(space.get_constraint(handle).unwrap().impulse(), 0.0);
    assert!(space.get_body(b).unwrap().get_linear_velocity().is_zero());
    assert_relative_eq!(space.get_body(b).unwrap().get_position().x, 2.0);
}

#[test]
fn test_pivot_joint_closes_anchor_gap() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(1.0, 0.0)));

    space.add_constraint(Box::new(PivotJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
    )));

    space.step(DT).unwrap();

    // Default error bias corrects 90% of the gap per tick.
    let pos = space.get_body(b).unwrap().get_position();
    assert_relative_eq!(pos.x, 0.1, epsilon = 1e-3);
    assert_relative_eq!(pos.y, 0.0, epsilon = 1e-4);
}

#[test]
fn test_groove_joint_pulls_anchor_onto_segment() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(0.5, 1.0)));

    space.add_constraint(Box::new(GrooveJoint::new(
        a,
        b,
        Vector2::new(-1.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::zero(),
    )));

    space.step(DT).unwrap();

    // The anchor projects inside the segment: only the cross-axis error is
    // corrected, the tangential position is free.
    let pos = space.get_body(b).unwrap().get_position();
    assert_relative_eq!(pos.x, 0.5, epsilon = 1e-4);
    assert_relative_eq!(pos.y, 0.1, epsilon = 1e-3);
}

#[test]
fn test_groove_joint_clamps_to_segment_end() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(5.0, 1.0)));

    space.add_constraint(Box::new(GrooveJoint::new(
        a,
        b,
        Vector2::new(-1.0, 0.0),
        Vector2::new(1.0, 0.0),
        Vector2::zero(),
    )));

    for _ in 0..10 {
        space.step(DT).unwrap();
    }

    // Past the groove end the anchor is dragged toward the endpoint (1, 0),
    // never to an extrapolated point beyond it.
    let pos = space.get_body(b).unwrap().get_position();
    assert_relative_eq!(pos.x, 1.0, epsilon = 1e-2);
    assert_relative_eq!(pos.y, 0.0, epsilon = 1e-2);
}

#[test]
fn test_damped_spring_default_force() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(2.0, 0.0)));

    space.add_constraint(Box::new(DampedSpring::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
        30.0,
        0.0,
    )));

    space.step(DT).unwrap();

    // force = (2 - 1) * 30 = 30, applied as an impulse of 30 * dt pulling B in.
    let vel = space.get_body(b).unwrap().get_linear_velocity();
    assert_relative_eq!(vel.x, -30.0 * DT, epsilon = 1e-4);
}

#[test]
fn test_damped_spring_unary_override_replaces_default() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(2.0, 0.0)));

    let mut spring = DampedSpring::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
        30.0,
        0.0,
    );

    let seen_dist = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&seen_dist);
    spring.set_force_fn(SpringFn::unary(move |dist| {
        *seen.lock().unwrap() = Some(dist);
        12.0
    }));
    space.add_constraint(Box::new(spring));

    space.step(DT).unwrap();

    // The override's return value is used verbatim; the default formula would
    // have produced a force of 30.
    let vel = space.get_body(b).unwrap().get_linear_velocity();
    assert_relative_eq!(vel.x, -12.0 * DT, epsilon = 1e-4);
    assert_relative_eq!(seen_dist.lock().unwrap().unwrap(), 2.0, epsilon = 1e-5);
}

#[test]
fn test_damped_spring_nullary_override() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(2.0, 0.0)));

    let mut spring = DampedSpring::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
        30.0,
        0.0,
    );
    spring.set_force_fn(SpringFn::nullary(|| -6.0));
    space.add_constraint(Box::new(spring));

    space.step(DT).unwrap();

    // A negative force pushes the anchors apart.
    let vel = space.get_body(b).unwrap().get_linear_velocity();
    assert_relative_eq!(vel.x, 6.0 * DT, epsilon = 1e-4);
}

#[test]
fn test_damped_spring_clearing_override_restores_default() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(2.0, 0.0)));

    let mut spring = DampedSpring::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
        30.0,
        0.0,
    );
    spring.set_force_fn(SpringFn::nullary(|| 0.0));
    let handle = space.add_constraint(Box::new(spring));

    space.step(DT).unwrap();
    assert!(space.get_body(b).unwrap().get_linear_velocity().is_zero());

    space
        .get_constraint_mut(handle)
        .unwrap()
        .as_any_mut()
        .downcast_mut::<DampedSpring>()
        .unwrap()
        .clear_force_fn();

    // Reset B so the default formula acts on the original geometry.
    let body = space.get_body_mut(b).unwrap();
    body.set_position(Vector2::new(2.0, 0.0));
    body.set_linear_velocity(Vector2::zero());

    space.step(DT).unwrap();
    let vel = space.get_body(b).unwrap().get_linear_velocity();
    assert_relative_eq!(vel.x, -30.0 * DT, epsilon = 1e-4);
}

#[test]
fn test_damped_rotary_spring_default_torque() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(RigidBody::new(1.0, 2.0, Vector2::new(1.0, 0.0)));
    space.get_body_mut(b).unwrap().set_angle(0.5);

    space.add_constraint(Box::new(DampedRotarySpring::new(a, b, 0.0, 10.0, 0.0)));

    space.step(DT).unwrap();

    // torque = (0.5 - 0) * 10 = 5; B (inertia 2) spins back toward rest.
    let w = space.get_body(b).unwrap().get_angular_velocity();
    assert_relative_eq!(w, -5.0 * DT / 2.0, epsilon = 1e-5);
}

#[test]
fn test_damped_rotary_spring_torque_override() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(1.0, 0.0)));
    space.get_body_mut(b).unwrap().set_angle(0.5);

    let mut spring = DampedRotarySpring::new(a, b, 0.0, 10.0, 0.0);
    let seen_angle = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&seen_angle);
    spring.set_torque_fn(SpringFn::unary(move |angle| {
        *seen.lock().unwrap() = Some(angle);
        2.0
    }));
    space.add_constraint(Box::new(spring));

    space.step(DT).unwrap();

    let w = space.get_body(b).unwrap().get_angular_velocity();
    assert_relative_eq!(w, -2.0 * DT, epsilon = 1e-5);
    assert_relative_eq!(seen_angle.lock().unwrap().unwrap(), 0.5, epsilon = 1e-5);
}

#[test]
fn test_gear_joint_locks_velocity_ratio() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(2.0, 0.0)));
    space.get_body_mut(a).unwrap().set_angular_velocity(1.0);

    space.add_constraint(Box::new(GearJoint::new(a, b, 0.0, 2.0)));

    space.step(DT).unwrap();

    let wa = space.get_body(a).unwrap().get_angular_velocity();
    let wb = space.get_body(b).unwrap().get_angular_velocity();
    assert_relative_eq!(wb, 2.0 * wa, epsilon = 1e-4);
}

#[test]
fn test_simple_motor_drives_relative_rate() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(2.0, 0.0)));

    space.add_constraint(Box::new(SimpleMotor::new(a, b, 3.0)));

    space.step(DT).unwrap();

    let wa = space.get_body(a).unwrap().get_angular_velocity();
    let wb = space.get_body(b).unwrap().get_angular_velocity();
    assert_relative_eq!(wb - wa, 3.0, epsilon = 1e-4);
}

#[test]
fn test_rotary_limit_joint_pushes_back_to_bound() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(1.0, 0.0)));
    space.get_body_mut(b).unwrap().set_angle(1.0);

    space.add_constraint(Box::new(RotaryLimitJoint::new(a, b, -0.5, 0.5)));

    space.step(DT).unwrap();

    // 90% of the overshoot past the max bound is corrected in one tick.
    let angle = space.get_body(b).unwrap().get_angle();
    assert_relative_eq!(angle, 0.55, epsilon = 1e-3);
}

#[test]
fn test_rotary_limit_joint_inactive_inside_limits() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(1.0, 0.0)));
    space.get_body_mut(b).unwrap().set_angle(0.2);

    let handle = space.add_constraint(Box::new(RotaryLimitJoint::new(a, b, -0.5, 0.5)));

    space.step(DT).unwrap();

    assert_eq!(space.get_constraint(handle).unwrap().impulse(), 0.0);
    assert_eq!(space.get_body(b).unwrap().get_angular_velocity(), 0.0);
}

#[test]
fn test_ratchet_joint_advances_in_whole_notches() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(RigidBody::new_kinematic(Vector2::new(1.0, 0.0)));

    let handle = space.add_constraint(Box::new(RatchetJoint::new(a, b, 0.0, 0.5)));

    let latch_angle = |space: &Space| {
        space
            .get_constraint(handle)
            .unwrap()
            .as_any()
            .downcast_ref::<RatchetJoint>()
            .unwrap()
            .get_angle()
    };

    // Driving the free angle forward engages whole notches, never fractions.
    for (driven, expected) in [(0.3, 0.0), (0.6, 0.5), (0.8, 0.5), (1.3, 1.0)] {
        space.get_body_mut(b).unwrap().set_angle(driven);
        space.step(DT).unwrap();
        assert_relative_eq!(latch_angle(&space), expected);
    }

    // Backing off by less than one notch must not move the latch.
    space.get_body_mut(b).unwrap().set_angle(1.1);
    space.step(DT).unwrap();
    assert_relative_eq!(latch_angle(&space), 1.0);
}

#[test]
fn test_ratchet_joint_holds_against_reversal() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(1.0, 0.0)));
    space.get_body_mut(b).unwrap().set_angle(-0.2);

    space.add_constraint(Box::new(RatchetJoint::new(a, b, 0.0, 0.5)));

    space.step(DT).unwrap();

    // The latch is engaged at 0; a retreat to -0.2 is corrected back.
    let angle = space.get_body(b).unwrap().get_angle();
    assert!(angle > -0.05, "latch failed to hold, angle {}", angle);
}

#[test]
fn test_max_force_zero_clamps_every_variant() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));
    space.get_body_mut(a).unwrap().set_angular_velocity(1.0);
    space.get_body_mut(b).unwrap().set_angle(1.0);

    let zero = Vector2::zero();
    let mut constraints: Vec<Box<dyn Constraint>> = vec![
        Box::new(PinJoint::new(a, b, zero, zero, 1.0)),
        Box::new(SlideJoint::new(a, b, zero, zero, 0.5, 1.0)),
        Box::new(PivotJoint::new(a, b, zero, zero)),
        Box::new(GrooveJoint::new(
            a,
            b,
            Vector2::new(-1.0, 0.0),
            Vector2::new(1.0, 0.0),
            zero,
        )),
        Box::new(DampedSpring::new(a, b, zero, zero, 1.0, 50.0, 0.0)),
        Box::new(DampedRotarySpring::new(a, b, 0.0, 50.0, 0.0)),
        Box::new(GearJoint::new(a, b, 0.0, 2.0)),
        Box::new(SimpleMotor::new(a, b, 2.0)),
        Box::new(RotaryLimitJoint::new(a, b, -0.1, 0.1)),
        Box::new(RatchetJoint::new(a, b, 0.0, -0.5)),
    ];

    let handles: Vec<_> = constraints
        .drain(..)
        .map(|mut c| {
            c.base_mut().set_max_force(0.0);
            space.add_constraint(c)
        })
        .collect();

    space.step(DT).unwrap();

    for handle in handles {
        let constraint = space.get_constraint(handle).unwrap();
        assert_eq!(
            constraint.impulse(),
            0.0,
            "{} leaked impulse through max_force = 0",
            constraint.constraint_type()
        );
    }

    // Fully clamped constraints must not have moved anything.
    assert!(space.get_body(b).unwrap().get_linear_velocity().is_zero());
}

#[test]
fn test_infinite_mass_pair_short_circuits() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(RigidBody::new_static(Vector2::new(3.0, 0.0)));

    let handle = space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));

    space.step(DT).unwrap();

    // Both bodies are unmovable: zero impulse, finite state, no panic.
    assert_eq!(space.get_constraint(handle).unwrap().impulse(), 0.0);
    let pos = space.get_body(b).unwrap().get_position();
    assert!(pos.x.is_finite() && pos.y.is_finite());
    assert_relative_eq!(pos.x, 3.0);
}

#[test]
fn test_degenerate_spring_geometry_is_survivable() {
    let mut space = Space::new();
    let a = space.add_body(RigidBody::new_static(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(0.0, 0.0)));

    // Coincident anchors with a nonzero rest length: no axis exists, so the
    // spring must sit the tick out rather than emit NaN.
    space.add_constraint(Box::new(DampedSpring::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
        30.0,
        0.0,
    )));

    space.step(DT).unwrap();

    let vel = space.get_body(b).unwrap().get_linear_velocity();
    assert!(vel.x.is_finite() && vel.y.is_finite());
    assert!(vel.is_zero());
}

#[test]
fn test_post_solve_hook_runs_once_per_tick() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));

    let handle = space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));

    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    space
        .get_constraint_mut(handle)
        .unwrap()
        .base_mut()
        .set_post_solve(SolveHook::nullary(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

    for _ in 0..3 {
        space.step(DT).unwrap();
    }

    // One call per tick, regardless of the sub-step iteration count.
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn test_unary_pre_solve_hook_receives_step_context() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));

    let handle = space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    space
        .get_constraint_mut(handle)
        .unwrap()
        .base_mut()
        .set_pre_solve(SolveHook::unary(move |ctx| {
            sink.lock().unwrap().push((ctx.dt, ctx.tick));
            Ok(())
        }));

    space.step(DT).unwrap();
    space.step(DT).unwrap();

    let calls = seen.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_relative_eq!(calls[0].0, DT);
    assert_eq!(calls[0].1, 0);
    assert_eq!(calls[1].1, 1);
}

#[test]
fn test_failing_pre_solve_hook_aborts_tick() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));

    let handle = space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));

    let post_count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&post_count);
    {
        let base = space.get_constraint_mut(handle).unwrap().base_mut();
        base.set_pre_solve(SolveHook::nullary(|| {
            Err(PhysicsError::SimulationError("hook bailed".into()))
        }));
        base.set_post_solve(SolveHook::nullary(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
    }

    let result = space.step(DT);
    assert!(matches!(result, Err(PhysicsError::SimulationError(_))));

    // The tick aborted before the post-solve stage and time did not advance.
    assert_eq!(post_count.load(Ordering::SeqCst), 0);
    assert_eq!(space.get_tick(), 0);

    // Clearing the hook lets the simulation resume.
    space
        .get_constraint_mut(handle)
        .unwrap()
        .base_mut()
        .clear_pre_solve();
    space.step(DT).unwrap();
    assert_eq!(space.get_tick(), 1);
}

#[test]
fn test_space_rejects_non_positive_timestep() {
    let mut space = Space::new();
    assert!(matches!(
        space.step(0.0),
        Err(PhysicsError::InvalidParameter(_))
    ));
    assert!(matches!(
        space.step(-DT),
        Err(PhysicsError::InvalidParameter(_))
    ));
}

#[test]
fn test_removing_body_drops_dependent_constraints() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));
    let c = space.add_body(unit_body(Vector2::new(6.0, 0.0)));

    space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));
    let unrelated = space.add_constraint(Box::new(SimpleMotor::new(a, c, 1.0)));
    assert_eq!(space.constraint_count(), 2);

    space.remove_body(b).unwrap();

    // Only the constraint involving the removed body goes with it.
    assert_eq!(space.constraint_count(), 1);
    assert!(space.get_constraint(unrelated).is_ok());

    space.step(DT).unwrap();
}

#[test]
fn test_constraint_accessors_via_downcast() {
    let mut space = Space::new();
    let a = space.add_body(unit_body(Vector2::new(0.0, 0.0)));
    let b = space.add_body(unit_body(Vector2::new(3.0, 0.0)));

    let handle = space.add_constraint(Box::new(PinJoint::new(
        a,
        b,
        Vector2::zero(),
        Vector2::zero(),
        1.0,
    )));

    let constraint = space.get_constraint_mut(handle).unwrap();
    assert_eq!(constraint.constraint_type(), "PinJoint");
    assert_eq!(constraint.get_bodies(), [a, b]);
    assert!(constraint.involves_body(a));

    let pin = constraint.as_any_mut().downcast_mut::<PinJoint>().unwrap();
    assert_relative_eq!(pin.get_dist(), 1.0);
    pin.set_dist(2.0);
    assert_relative_eq!(pin.get_dist(), 2.0);
}
