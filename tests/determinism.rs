use rollback_arena_core::components::player_input;
use rollback_arena_core::prelude::*;

fn run_steady_input_scenario() -> GameManager {
    let mut game = GameManager::new_match();
    game.add_player(0);
    game.add_player(1);
    for frame in 1..=10 {
        game.set_player_input(0, player_input::UP, frame);
        game.set_player_input(1, player_input::NONE, frame);
    }
    game.simulate_to_current_frame();
    game.validate_frame(10);
    game
}

/// Running the steady-input scenario twice, in two fresh instances, must
/// produce an identical confirmed-state checksum for player 0.
#[test]
fn identical_input_sequences_produce_identical_checksums() {
    let first = run_steady_input_scenario();
    let second = run_steady_input_scenario();
    assert_eq!(first.physics_checksum(0), second.physics_checksum(0));
}
