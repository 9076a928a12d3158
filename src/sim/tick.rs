//! Fixed timestep simulation tick
//!
//! One call to [`tick`] advances the world by exactly `dt` seconds. The order
//! of the steps is part of the contract: input, gravity, integration, rope,
//! collisions, projectiles, enemies, camera.

use glam::Vec2;

use super::state::{GameEvent, GameState};
use super::{collision, combat, rope};

/// Actions that stay active while held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldActions {
    pub left: bool,
    pub right: bool,
}

impl HeldActions {
    /// -1 for left, 1 for right, 0 for neither or both
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Actions that fire once per press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressedActions {
    pub attach: bool,
    pub detach: bool,
    pub shoot: bool,
    pub jump: bool,
    /// Handled by the frame loop, never by [`tick`]
    pub reset: bool,
}

impl PressedActions {
    pub fn any(&self) -> bool {
        self.attach || self.detach || self.shoot || self.jump || self.reset
    }

    /// Fold in presses from a later frame
    pub fn merge(&mut self, other: &PressedActions) {
        self.attach |= other.attach;
        self.detach |= other.detach;
        self.shoot |= other.shoot;
        self.jump |= other.jump;
        self.reset |= other.reset;
    }
}

/// Input snapshot for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub held: HeldActions,
    /// Pointer position in viewport coordinates
    pub pointer: Vec2,
    pub pressed: PressedActions,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let now_ms = state.clock_ms;
    state.time_ticks += 1;

    apply_input(state, input, now_ms, dt);

    let player = &mut state.player;
    player.vel.y += state.tuning.gravity * dt;
    player.pos += player.vel * dt;

    rope::apply_constraint(player, &state.tuning, input.held.axis(), dt);
    collision::resolve_player_collisions(player, &state.buildings, &state.tuning);

    let kills = combat::update_projectiles(
        &mut state.projectiles,
        &state.buildings,
        &mut state.enemies,
        dt,
    );
    for index in kills {
        log::debug!("Enemy {} eliminated", index);
        state.events.push(GameEvent::EnemyKilled { index });
    }
    combat::update_enemies(&mut state.enemies, &state.tuning, dt);

    state.camera.follow(state.player.pos.x, &state.tuning);
    combat::check_win(state);

    state.clock_ms += f64::from(dt) * 1000.0;
}

/// Apply edge actions, jumping and air control
fn apply_input(state: &mut GameState, input: &TickInput, now_ms: f64, dt: f32) {
    let aim = state.screen_to_world(input.pointer);

    if input.pressed.shoot {
        combat::try_shoot(state, aim, now_ms);
    }
    if input.pressed.attach {
        rope::try_attach(state, aim);
    }
    if input.pressed.detach {
        rope::detach(state);
    }

    let tuning = &state.tuning;
    let player = &mut state.player;

    if input.pressed.jump && player.grounded {
        player.vel.y = -tuning.jump_speed;
        player.grounded = false;
    }

    // Air control only off the rope; on the rope the same keys pump the swing
    if !player.is_attached() {
        player.vel.x += input.held.axis() * tuning.player_air_accel * dt;
        player.vel.x = player
            .vel
            .x
            .clamp(-tuning.player_max_speed, tuning.player_max_speed);
    }
}
