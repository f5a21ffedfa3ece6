mod test_utils;

use rollback_arena_core::components::player_input;
use rollback_arena_core::prelude::*;

/// A server confirmation older than what's already been validated is
/// silently ignored, no assertion fires, and confirmed state is untouched.
#[test]
fn confirm_frame_older_than_last_validated_is_ignored() {
    let mut game = GameManager::new_match();
    game.add_player(0);
    game.add_player(1);

    test_utils::feed_identical_inputs(&mut game, player_input::NONE, 10);
    game.validate_frame(10);

    game.confirm_frame(5, [0, 0]);

    assert_eq!(game.last_validated_frame(), 10);
}
