//! Game manager: owns the single entity store and transform table, spawns
//! level geometry and players, and tracks the win condition. Thin by
//! design: almost everything interesting lives in [`crate::rollback`].

use crate::component_table::ComponentTable;
use crate::components::{PlayerInput, Transform};
use crate::constants::{self, MAX_PLAYERS};
use crate::entity::{ComponentMask, Entity, EntityStore, Frame, PlayerNumber};
use crate::math::Vec2;
use crate::rollback::RollbackManager;

pub struct GameManager {
    store: EntityStore,
    transforms: ComponentTable<Transform>,
    rollback: RollbackManager,
    winner: Option<PlayerNumber>,
}

impl Default for GameManager {
    fn default() -> Self {
        Self {
            store: EntityStore::new(),
            transforms: ComponentTable::new(),
            rollback: RollbackManager::new(),
            winner: None,
        }
    }
}

impl GameManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns the level geometry (one wall, the fixed box layout) for a
    /// fresh match. Players are added separately via [`Self::add_player`].
    pub fn new_match() -> Self {
        let mut game = Self::new();
        game.rollback.spawn_wall(&mut game.store, &mut game.transforms, constants::WALL_POSITION);
        for position in constants::SPAWN_BOX_POSITIONS {
            game.rollback.spawn_box(&mut game.store, &mut game.transforms, position);
        }
        game
    }

    /// Spawns a player at its slot's table position from
    /// [`constants::SPAWN_POSITIONS`] / [`constants::SPAWN_ROTATIONS`].
    /// Unknown player numbers are silently ignored.
    pub fn add_player(&mut self, player: PlayerNumber) -> Entity {
        let index = player as usize;
        if index >= constants::SPAWN_POSITIONS.len() {
            return Entity::INVALID;
        }
        self.rollback.spawn_player(
            &mut self.store,
            &mut self.transforms,
            player,
            constants::SPAWN_POSITIONS[index],
            constants::SPAWN_ROTATIONS[index],
        )
    }

    pub fn set_player_input(&mut self, player: PlayerNumber, input: PlayerInput, frame: Frame) {
        self.rollback.set_player_input(player, input, frame);
    }

    pub fn simulate_to_current_frame(&mut self) {
        self.rollback.simulate_to_current_frame(&mut self.store, &mut self.transforms);
    }

    pub fn validate_frame(&mut self, frame: Frame) {
        self.rollback.validate_frame(&mut self.store, frame);
    }

    pub fn confirm_frame(&mut self, frame: Frame, server_checksums: [u32; MAX_PLAYERS]) {
        self.rollback.confirm_frame(&mut self.store, frame, server_checksums);
    }

    pub fn current_frame(&self) -> Frame {
        self.rollback.current_frame()
    }

    pub fn last_validated_frame(&self) -> Frame {
        self.rollback.last_validated_frame()
    }

    pub fn last_received_frame(&self, player: PlayerNumber) -> Option<Frame> {
        self.rollback.last_received_frame(player)
    }

    pub fn get_entity_from_player_number(&self, player: PlayerNumber) -> Entity {
        self.rollback.entity_for_player(player)
    }

    /// The confirmed-state checksum used for cross-peer divergence
    /// detection.
    pub fn physics_checksum(&self, player: PlayerNumber) -> u32 {
        let entity = self.rollback.entity_for_player(player);
        self.rollback.get_validate_physics_state(entity)
    }

    pub fn transforms(&self) -> &ComponentTable<Transform> {
        &self.transforms
    }

    pub fn spawn_box(&mut self, position: Vec2) -> Entity {
        self.rollback.spawn_box(&mut self.store, &mut self.transforms, position)
    }

    pub fn spawn_great_box(&mut self, position: Vec2) -> Entity {
        self.rollback.spawn_great_box(&mut self.store, &mut self.transforms, position)
    }

    pub fn spawn_wall(&mut self, position: Vec2) -> Entity {
        self.rollback.spawn_wall(&mut self.store, &mut self.transforms, position)
    }

    pub fn spawn_flag(&mut self, position: Vec2) -> Entity {
        self.rollback.spawn_flag(&mut self.store, &mut self.transforms, position)
    }

    pub fn spawn_track(&mut self, position: Vec2) -> Entity {
        self.rollback.spawn_track(&mut self.store, &mut self.transforms, position)
    }

    pub fn destroy_entity(&mut self, entity: Entity) {
        self.rollback.destroy_entity(&mut self.store, entity);
    }

    pub fn has_component(&self, entity: Entity, mask: ComponentMask) -> bool {
        self.store.has_component(entity, mask)
    }

    /// Health reaching zero is not treated as an implicit win trigger here.
    /// `win_game` is the sole entry into the finished state; `check_winner`
    /// only reports what has already been declared.
    pub fn check_winner(&self) -> Option<PlayerNumber> {
        self.winner
    }

    /// Sole entry to the FINISHED state. The host decides when a player has
    /// won (health, flag capture, whatever its own rules are) and calls
    /// this; the core never infers it.
    pub fn win_game(&mut self, player: PlayerNumber) {
        self.winner = Some(player);
    }
}
