use crate::bodies::{RigidBody, RigidBodyType};
use crate::constraints::Constraint;
use crate::core::{
    BodyHandle, BodyStorage, ConstraintHandle, ConstraintSolver, ConstraintStorage,
    SimulationConfig, StepContext,
};
use crate::Result;

/// Container that owns all bodies and constraints and drives the solver
///
/// `Space` is the host-side simulation loop: per tick it applies gravity,
/// runs the [`ConstraintSolver`] sequence, then integrates body positions.
pub struct Space {
    /// All rigid bodies in the space
    bodies: BodyStorage<RigidBody>,

    /// All constraints in the space
    constraints: ConstraintStorage<Box<dyn Constraint>>,

    /// Configuration for the simulation
    config: SimulationConfig,

    /// The constraint solver
    solver: ConstraintSolver,

    /// The total elapsed simulation time
    time: f32,

    /// The number of completed ticks
    tick: u64,
}

impl Space {
    /// Creates a new space with default settings
    pub fn new() -> Self {
        Self::with_config(SimulationConfig::default())
    }

    /// Creates a new space with the given configuration
    pub fn with_config(config: SimulationConfig) -> Self {
        Self {
            bodies: BodyStorage::new(),
            constraints: ConstraintStorage::new(),
            config,
            solver: ConstraintSolver::new(),
            time: 0.0,
            tick: 0,
        }
    }

    /// Returns the configuration of the space
    pub fn get_config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns a mutable reference to the configuration of the space
    pub fn get_config_mut(&mut self) -> &mut SimulationConfig {
        &mut self.config
    }

    /// Returns the total elapsed simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Returns the number of completed ticks
    pub fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Adds a body to the space and returns its handle
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        self.bodies.add(body)
    }

    /// Removes a body from the space
    ///
    /// Constraints involving the body are removed with it; a constraint must
    /// never outlive either of its bodies.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        let body = self.bodies.remove(handle).ok_or_else(|| {
            crate::error::PhysicsError::ResourceNotFound(format!(
                "Body with handle {:?} not found",
                handle
            ))
        })?;

        let dependent: Vec<ConstraintHandle> = self
            .constraints
            .iter()
            .filter_map(|(c_handle, constraint)| {
                if constraint.involves_body(handle) {
                    Some(c_handle)
                } else {
                    None
                }
            })
            .collect();

        for c_handle in dependent {
            self.constraints.remove(c_handle);
        }

        Ok(body)
    }

    /// Gets a reference to a body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.get_body(handle)
    }

    /// Gets a mutable reference to a body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.get_body_mut(handle)
    }

    /// Returns the number of bodies in the space
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Adds a constraint to the space and returns its handle
    pub fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> ConstraintHandle {
        self.constraints.add(constraint)
    }

    /// Removes a constraint from the space
    pub fn remove_constraint(&mut self, handle: ConstraintHandle) -> Result<Box<dyn Constraint>> {
        self.constraints.remove(handle).ok_or_else(|| {
            crate::error::PhysicsError::ResourceNotFound(format!(
                "Constraint with handle {:?} not found",
                handle
            ))
        })
    }

    /// Gets a reference to a constraint by its handle
    pub fn get_constraint(&self, handle: ConstraintHandle) -> Result<&Box<dyn Constraint>> {
        self.constraints.get_constraint(handle)
    }

    /// Gets a mutable reference to a constraint by its handle
    pub fn get_constraint_mut(
        &mut self,
        handle: ConstraintHandle,
    ) -> Result<&mut Box<dyn Constraint>> {
        self.constraints.get_constraint_mut(handle)
    }

    /// Returns the number of constraints in the space
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Advances the simulation by one tick of length `dt`
    ///
    /// A hook error aborts the tick: velocities may have been partially
    /// updated, but no positions are integrated and time does not advance.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        let ctx = StepContext {
            dt,
            time: self.time,
            tick: self.tick,
        };

        // Gravity first, so constraints see the velocities they must correct.
        let gravity = self.config.gravity;
        if !gravity.is_zero() {
            for (_, body) in self.bodies.iter_mut() {
                if body.get_body_type() == RigidBodyType::Dynamic {
                    let velocity = body.get_linear_velocity() + gravity * dt;
                    body.set_linear_velocity(velocity);
                }
            }
        }

        self.solver.step(
            &mut self.bodies,
            &mut self.constraints,
            dt,
            self.config.solver_iterations,
            &ctx,
        )?;

        for (_, body) in self.bodies.iter_mut() {
            if body.get_body_type() != RigidBodyType::Static {
                body.integrate_position(dt);
            }
        }

        self.time += dt;
        self.tick += 1;
        Ok(())
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}
