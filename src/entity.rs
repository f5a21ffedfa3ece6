//! Entity handles and the capability-mask store.
//!
//! A dense, reused-on-free handle space plus a bitmask of which component
//! kinds and lifecycle flags are present on each entity. There is exactly
//! one `EntityStore` per match; the rollback manager's two simulation
//! states share it and duplicate only the physics/player-character
//! component data (see [`crate::rollback`]).

use bitflags::bitflags;

pub type Frame = u32;
pub type PlayerNumber = u8;

/// Opaque entity handle. Dense: reused after a destruction is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity(u32);

impl Entity {
    pub const INVALID: Entity = Entity(u32::MAX);

    pub(crate) fn from_index(index: usize) -> Self {
        Entity(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

bitflags! {
    /// Component-presence and lifecycle flags. Bit layout is part of no
    /// wire contract (only component *data*, not masks, crosses the
    /// network) but is kept stable within a process run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ComponentMask: u32 {
        const TRANSFORM        = 1 << 0;
        const BOX_BODY         = 1 << 1;
        const PLAYER_CHARACTER = 1 << 2;
        const WALL             = 1 << 3;
        const BOX              = 1 << 4;
        const FLAG             = 1 << 5;
        const TRACK            = 1 << 6;
        const GREAT_BOX         = 1 << 7;
        const PLAYER_INPUT      = 1 << 8;
        const DESTROYED         = 1 << 9;
        // Bit 10 is reserved for an asteroid role tag, folded into BOX for
        // now since it has no behavior beyond being a static geometry tag.
    }
}

/// Allocates entity handles and tracks each one's capability mask.
///
/// Allocation scans for the lowest free slot (mask == 0), matching spec
/// §4.1. Queries are O(entities), also matching spec.
#[derive(Debug, Default)]
pub struct EntityStore {
    masks: Vec<ComponentMask>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self) -> Entity {
        if let Some(index) = self.masks.iter().position(|m| m.is_empty()) {
            return Entity::from_index(index);
        }
        self.masks.push(ComponentMask::empty());
        Entity::from_index(self.masks.len() - 1)
    }

    /// Zeroes the mask immediately. Only ever called by the rollback
    /// manager when finalizing a destruction, never mid-frame.
    pub fn destroy_entity(&mut self, entity: Entity) {
        self.masks[entity.index()] = ComponentMask::empty();
    }

    pub fn has_component(&self, entity: Entity, mask: ComponentMask) -> bool {
        self.masks[entity.index()].contains(mask)
    }

    pub fn add_component(&mut self, entity: Entity, mask: ComponentMask) {
        self.masks[entity.index()].insert(mask);
    }

    pub fn remove_component(&mut self, entity: Entity, mask: ComponentMask) {
        self.masks[entity.index()].remove(mask);
    }

    pub fn mask(&self, entity: Entity) -> ComponentMask {
        self.masks[entity.index()]
    }

    pub fn live_count(&self) -> usize {
        self.masks.iter().filter(|m| !m.is_empty()).count()
    }

    /// Upper bound on live handles; callers iterate `0..entities_len()`.
    pub fn entities_len(&self) -> usize {
        self.masks.len()
    }

    pub(crate) fn entity_at(&self, index: usize) -> Entity {
        Entity::from_index(index)
    }
}
