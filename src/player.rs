//! Player-character simulator. Translates quantized input bits into thrust
//! and turning, and advances per-frame cooldown timers.

use crate::components::{player_input, BoxBody, PlayerCharacter};
use crate::constants;
use crate::math;

#[derive(Default)]
pub struct PlayerSim;

impl PlayerSim {
    pub fn new() -> Self {
        Self
    }

    /// Sets one player's velocity and angular velocity for the upcoming
    /// fixed step. Position and rotation are integrated once, uniformly for
    /// every body, by [`crate::physics::PhysicsSim::step`]; this method
    /// never touches `body.position` or `body.rotation` itself, or bodies
    /// would be double-integrated.
    ///
    /// Opposing bits (UP+DOWN, LEFT+RIGHT) held together cancel rather than
    /// summing, since `PlayerInput` is decoded one axis at a time.
    pub fn step(&self, character: &mut PlayerCharacter, body: &mut BoxBody, dt: f32) {
        character.invincibility_timer = (character.invincibility_timer - dt).max(0.0);
        character.shoot_cooldown = (character.shoot_cooldown - dt).max(0.0);

        let input = character.input;
        let forward = bit_set(input, player_input::UP) as i8 - bit_set(input, player_input::DOWN) as i8;
        let turn = bit_set(input, player_input::RIGHT) as i8 - bit_set(input, player_input::LEFT) as i8;

        body.angular_velocity = turn as f32 * constants::PLAYER_ANGULAR_SPEED_DEG;

        if forward != 0 {
            let thrust = math::heading(body.rotation) * (forward as f32 * constants::PLAYER_SPEED);
            body.velocity = math::clamp_length(thrust, PlayerCharacter::MAX_SPEED);
        }
    }
}

fn bit_set(input: u8, bit: u8) -> u8 {
    if input & bit != 0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use assert_approx_eq::assert_approx_eq;

    fn fresh() -> (PlayerCharacter, BoxBody) {
        (PlayerCharacter::new(0), BoxBody::default())
    }

    #[test]
    fn up_thrust_at_zero_rotation_sets_velocity_along_positive_y() {
        let (mut character, mut body) = fresh();
        character.input = player_input::UP;
        let sim = PlayerSim::new();
        sim.step(&mut character, &mut body, constants::FIXED_PERIOD);
        assert!(body.velocity.y > 0.0);
        assert_approx_eq!(body.velocity.x, 0.0, 1e-6);
    }

    #[test]
    fn opposing_bits_cancel() {
        let (mut character, mut body) = fresh();
        character.input = player_input::UP | player_input::DOWN;
        let sim = PlayerSim::new();
        sim.step(&mut character, &mut body, constants::FIXED_PERIOD);
        assert_eq!(body.velocity, Vec2::ZERO);
    }

    #[test]
    fn velocity_is_clamped_to_max_speed() {
        let (mut character, mut body) = fresh();
        character.input = player_input::UP;
        let sim = PlayerSim::new();
        for _ in 0..10_000 {
            sim.step(&mut character, &mut body, constants::FIXED_PERIOD);
        }
        assert!(body.velocity.length() <= PlayerCharacter::MAX_SPEED + 1e-4);
    }

    #[test]
    fn cooldowns_saturate_at_zero() {
        let (mut character, mut body) = fresh();
        character.shoot_cooldown = 0.01;
        character.invincibility_timer = 0.01;
        let sim = PlayerSim::new();
        sim.step(&mut character, &mut body, 1.0);
        assert_eq!(character.shoot_cooldown, 0.0);
        assert_eq!(character.invincibility_timer, 0.0);
    }
}
