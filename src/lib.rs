pub mod math;
pub mod core;
pub mod bodies;
pub mod constraints;

/// Re-export common types for easier usage
pub use crate::core::{Space, SimulationConfig, StepContext, BodyHandle, ConstraintHandle};
pub use crate::bodies::{RigidBody, RigidBodyType};
pub use crate::constraints::Constraint;
pub use crate::math::Vector2;

/// Error types for the constraint engine
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Simulation stability error: {0}")]
        SimulationError(String),

        #[error("Internal error: {0}")]
        InternalError(String),
    }
}

/// Result type for constraint engine operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
