#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Type of rigid body, determining how it behaves in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum RigidBodyType {
    /// Dynamic bodies are fully simulated (respond to impulses and gravity)
    Dynamic,

    /// Kinematic bodies are moved programmatically but are not affected by impulses
    Kinematic,

    /// Static bodies don't move and have infinite mass
    Static,
}
