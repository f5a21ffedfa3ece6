//! Dense, entity-indexed component storage.
//!
//! One table per component kind, parallel to the entity-handle range.
//! `copy_all` is the rollback manager's workhorse: it bulk-copies the whole
//! backing array so the speculative and confirmed stacks can revert and
//! commit in one shot instead of diffing entity by entity.

use crate::entity::Entity;

#[derive(Debug, Clone)]
pub struct ComponentTable<T> {
    data: Vec<T>,
}

impl<T> Default for ComponentTable<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T: Default + Clone> ComponentTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes `entity`'s slot to the component's default, resizing the
    /// backing array if needed. Callers still must set the presence bit on
    /// the entity's mask themselves (the table doesn't know about masks).
    pub fn add(&mut self, entity: Entity) {
        self.ensure_capacity(entity);
    }

    pub fn get(&self, entity: Entity) -> &T {
        &self.data[entity.index()]
    }

    pub fn get_mut(&mut self, entity: Entity) -> &mut T {
        self.ensure_capacity(entity);
        &mut self.data[entity.index()]
    }

    pub fn set(&mut self, entity: Entity, value: T) {
        self.ensure_capacity(entity);
        self.data[entity.index()] = value;
    }

    /// Bulk-copies `other`'s entire backing array over this one.
    pub fn copy_all(&mut self, other: &ComponentTable<T>) {
        self.data.clone_from(&other.data);
    }

    fn ensure_capacity(&mut self, entity: Entity) {
        if entity.index() >= self.data.len() {
            self.data.resize(entity.index() + 1, T::default());
        }
    }
}
