use crate::bodies::RigidBodyType;
use crate::math::Vector2;

/// A rigid body for 2D physics simulation
///
/// Bodies are plain state holders: constraints read their kinematic state and
/// mutate their velocities, while the owning [`Space`](crate::core::Space)
/// integrates positions. A body never owns or references constraints.
pub struct RigidBody {
    /// The body's position in world space
    position: Vector2,

    /// The body's rotation angle in radians
    angle: f32,

    /// Cached unit rotation vector (cos(angle), sin(angle))
    rotation: Vector2,

    /// The body's linear velocity
    linear_velocity: Vector2,

    /// The body's angular velocity in radians per second
    angular_velocity: f32,

    /// The body's mass
    mass: f32,

    /// Inverse of the body's mass (0 encodes infinite mass)
    inv_mass: f32,

    /// The body's moment of inertia
    inertia: f32,

    /// Inverse of the body's moment of inertia (0 encodes infinite inertia)
    inv_inertia: f32,

    /// The body's type (dynamic, kinematic, or static)
    body_type: RigidBodyType,
}

impl RigidBody {
    /// Creates a new dynamic rigid body with the given mass, moment of inertia
    /// and position
    pub fn new(mass: f32, inertia: f32, position: Vector2) -> Self {
        let mut body = Self {
            position,
            angle: 0.0,
            rotation: Vector2::unit_x(),
            linear_velocity: Vector2::zero(),
            angular_velocity: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            body_type: RigidBodyType::Dynamic,
        };

        body.set_mass(mass);
        body.set_inertia(inertia);
        body
    }

    /// Creates a new static rigid body at the given position
    pub fn new_static(position: Vector2) -> Self {
        Self {
            position,
            angle: 0.0,
            rotation: Vector2::unit_x(),
            linear_velocity: Vector2::zero(),
            angular_velocity: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            body_type: RigidBodyType::Static,
        }
    }

    /// Creates a new kinematic rigid body at the given position
    ///
    /// Kinematic bodies have infinite mass but may carry velocities set by the
    /// host; constraints treat them as unmovable.
    pub fn new_kinematic(position: Vector2) -> Self {
        let mut body = Self::new_static(position);
        body.body_type = RigidBodyType::Kinematic;
        body
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Returns the body's rotation angle in radians
    pub fn get_angle(&self) -> f32 {
        self.angle
    }

    /// Sets the body's rotation angle in radians
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.rotation = Vector2::for_angle(angle);
    }

    /// Returns the body's cached unit rotation vector
    pub fn get_rotation(&self) -> Vector2 {
        self.rotation
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vector2 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vector2) {
        self.linear_velocity = velocity;
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: f32) {
        self.angular_velocity = velocity;
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Sets the body's mass
    ///
    /// Non-dynamic bodies keep an inverse mass of zero regardless of the value.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.inv_mass = if self.body_type == RigidBodyType::Dynamic && mass > 0.0 {
            1.0 / mass
        } else {
            0.0
        };
    }

    /// Returns the body's moment of inertia
    pub fn get_inertia(&self) -> f32 {
        self.inertia
    }

    /// Sets the body's moment of inertia
    ///
    /// Non-dynamic bodies keep an inverse inertia of zero regardless of the value.
    pub fn set_inertia(&mut self, inertia: f32) {
        self.inertia = inertia;
        self.inv_inertia = if self.body_type == RigidBodyType::Dynamic && inertia > 0.0 {
            1.0 / inertia
        } else {
            0.0
        };
    }

    /// Returns the inverse of the body's mass (0 for infinite mass)
    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the inverse of the body's moment of inertia (0 for infinite inertia)
    pub fn get_inverse_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Returns the body's type
    pub fn get_body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Returns true if the body cannot be moved by impulses
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0 && self.inv_inertia == 0.0
    }

    /// Transforms a point from the body's local space to world space
    pub fn local_to_world(&self, point: Vector2) -> Vector2 {
        self.position + point.rotate(self.rotation)
    }

    /// Transforms a point from world space to the body's local space
    pub fn world_to_local(&self, point: Vector2) -> Vector2 {
        (point - self.position).unrotate(self.rotation)
    }

    /// Returns the velocity of the point at offset `r` from the center of mass
    pub fn velocity_at_offset(&self, r: Vector2) -> Vector2 {
        self.linear_velocity + r.perpendicular() * self.angular_velocity
    }

    /// Applies an impulse at offset `r` from the center of mass
    pub fn apply_impulse(&mut self, impulse: Vector2, r: Vector2) {
        self.linear_velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_inertia * r.cross(&impulse);
    }

    /// Applies an angular impulse
    pub fn apply_angular_impulse(&mut self, impulse: f32) {
        self.angular_velocity += impulse * self.inv_inertia;
    }

    /// Advances the body's position and angle by its velocities over `dt`
    pub fn integrate_position(&mut self, dt: f32) {
        self.position += self.linear_velocity * dt;
        self.set_angle(self.angle + self.angular_velocity * dt);
    }
}
