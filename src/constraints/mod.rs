mod constraint;
mod hooks;
mod solver_util;

mod pin_joint;
mod slide_joint;
mod pivot_joint;
mod groove_joint;
mod damped_spring;
mod damped_rotary_spring;
mod gear_joint;
mod simple_motor;
mod rotary_limit_joint;
mod ratchet_joint;

pub use self::constraint::{Constraint, ConstraintBase};
pub use self::hooks::{SolveHook, SpringFn};

pub use self::damped_rotary_spring::DampedRotarySpring;
pub use self::damped_spring::DampedSpring;
pub use self::gear_joint::GearJoint;
pub use self::groove_joint::GrooveJoint;
pub use self::pin_joint::PinJoint;
pub use self::pivot_joint::PivotJoint;
pub use self::ratchet_joint::RatchetJoint;
pub use self::rotary_limit_joint::RotaryLimitJoint;
pub use self::simple_motor::SimpleMotor;
pub use self::slide_joint::SlideJoint;
