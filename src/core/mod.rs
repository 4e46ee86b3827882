pub mod storage;
pub mod config;
pub mod solver;
pub mod space;

pub use self::config::SimulationConfig;
pub use self::solver::ConstraintSolver;
pub use self::space::Space;
pub use self::storage::{BodyStorage, ConstraintStorage};

/// A unique identifier for a body in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

/// A unique identifier for a constraint in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintHandle(pub(crate) u32);

/// Per-tick context handed to unary solve hooks
///
/// Hooks registered on a constraint cannot borrow the [`Space`] that is
/// currently stepping, so they receive this snapshot instead.
#[derive(Debug, Clone, Copy)]
pub struct StepContext {
    /// The timestep of the current tick
    pub dt: f32,

    /// Total simulated time before this tick
    pub time: f32,

    /// Number of completed ticks before this one
    pub tick: u64,
}
