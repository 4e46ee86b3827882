use std::collections::HashMap;

use crate::core::{BodyHandle, ConstraintHandle};
use crate::error::PhysicsError;
use crate::Result;

/// Storage for physics bodies
pub struct BodyStorage<T> {
    items: HashMap<BodyHandle, T>,
    next_id: u32,
}

impl<T> BodyStorage<T> {
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            next_id: 1, // Start at 1, so 0 can represent invalid handle
        }
    }

    /// Adds a body to the storage and returns its handle
    pub fn add(&mut self, item: T) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.items.insert(handle, item);
        handle
    }

    /// Removes a body from the storage
    pub fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        self.items.remove(&handle)
    }

    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.items.get(&handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.items.get_mut(&handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })
    }

    /// Returns the number of bodies in the storage
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clears all bodies from the storage
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns all handles in the storage
    pub fn handles(&self) -> Vec<BodyHandle> {
        self.items.keys().copied().collect()
    }

    /// Returns an iterator over all bodies
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &T)> {
        self.items.iter().map(|(h, item)| (*h, item))
    }

    /// Returns a mutable iterator over all bodies
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut T)> {
        self.items.iter_mut().map(|(h, item)| (*h, item))
    }
}

impl<T> Default for BodyStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage for physics constraints
pub struct ConstraintStorage<T> {
    items: HashMap<ConstraintHandle, T>,
    next_id: u32,
}

impl<T> ConstraintStorage<T> {
    /// Creates a new empty storage
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            next_id: 1, // Start at 1, so 0 can represent invalid handle
        }
    }

    /// Adds a constraint to the storage and returns its handle
    pub fn add(&mut self, item: T) -> ConstraintHandle {
        let handle = ConstraintHandle(self.next_id);
        self.next_id += 1;
        self.items.insert(handle, item);
        handle
    }

    /// Removes a constraint from the storage
    pub fn remove(&mut self, handle: ConstraintHandle) -> Option<T> {
        self.items.remove(&handle)
    }

    /// Gets a constraint by its handle, returning an error if not found
    pub fn get_constraint(&self, handle: ConstraintHandle) -> Result<&T> {
        self.items.get(&handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle))
        })
    }

    /// Gets a mutable reference to a constraint by its handle, returning an error if not found
    pub fn get_constraint_mut(&mut self, handle: ConstraintHandle) -> Result<&mut T> {
        self.items.get_mut(&handle).ok_or_else(|| {
            PhysicsError::ResourceNotFound(format!("Constraint with handle {:?} not found", handle))
        })
    }

    /// Returns the number of constraints in the storage
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the storage is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clears all constraints from the storage
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns all handles in the storage, sorted by insertion order
    pub fn handles(&self) -> Vec<ConstraintHandle> {
        let mut handles: Vec<ConstraintHandle> = self.items.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Returns an iterator over all constraints
    pub fn iter(&self) -> impl Iterator<Item = (ConstraintHandle, &T)> {
        self.items.iter().map(|(h, item)| (*h, item))
    }

    /// Returns a mutable iterator over all constraints
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ConstraintHandle, &mut T)> {
        self.items.iter_mut().map(|(h, item)| (*h, item))
    }
}

impl<T> Default for ConstraintStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}
