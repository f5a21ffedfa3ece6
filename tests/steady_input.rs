use assert_approx_eq::assert_approx_eq;
use rollback_arena_core::components::player_input;
use rollback_arena_core::constants;
use rollback_arena_core::prelude::*;

/// Ten frames of steady `UP` input move the player along +Y by exactly
/// `frames * dt * playerSpeed`.
#[test]
fn steady_up_input_advances_position_by_the_expected_distance() {
    let mut game = GameManager::new_match();
    let p0 = game.add_player(0);
    game.add_player(1);

    for frame in 1..=10 {
        game.set_player_input(0, player_input::UP, frame);
        game.set_player_input(1, player_input::NONE, frame);
    }
    game.simulate_to_current_frame();
    game.validate_frame(10);

    let body = game.transforms().get(p0);
    assert_approx_eq!(
        body.position.y,
        10.0 * constants::FIXED_PERIOD * constants::PLAYER_SPEED,
        1e-4
    );
    assert_eq!(game.last_validated_frame(), 10);
}
