use rollback_arena_core::prelude::*;

/// Deliver the same input to both players for every frame in `1..=frame`.
pub fn feed_identical_inputs(game: &mut GameManager, input: PlayerInput, up_to_frame: u32) {
    for frame in 1..=up_to_frame {
        game.set_player_input(0, input, frame);
        game.set_player_input(1, input, frame);
    }
}
