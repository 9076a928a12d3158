//! Demo mode - a simple controller that plays the game
//!
//! Runs right along the rooftops: jumps off whatever it stands on, throws the
//! rope at the skyline ahead while falling, lets go past the anchor, and fires
//! at the nearest enemy in range. It only produces [`TickInput`], the same
//! thing a human player produces, so it never touches the simulation directly.

use glam::Vec2;

use crate::sim::{GameState, HeldActions, PressedActions, TickInput};

/// Where to throw the rope, relative to the player
const ROPE_AIM_OFFSET: Vec2 = Vec2::new(320.0, -260.0);
/// Let go once this far past the anchor
const RELEASE_PAST_ANCHOR: f32 = 60.0;
/// Fraction of the bolt's full travel distance considered in range
const BOLT_RANGE_FACTOR: f32 = 0.8;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    /// Frames spent on the current rope
    frames_on_rope: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide the input for the next frame
    pub fn drive(&mut self, state: &GameState) -> TickInput {
        let player = &state.player;
        let tuning = &state.tuning;
        let mut pressed = PressedActions::default();
        let mut aim_world = player.pos + ROPE_AIM_OFFSET;
        // Air control: keep heading right
        let mut held = HeldActions {
            left: false,
            right: true,
        };

        match player.rope {
            Some(rope) => {
                self.frames_on_rope += 1;
                // Pump with the swing, never against it
                let tangent = (player.pos - rope.anchor).normalize_or_zero().perp();
                let along = player.vel.dot(tangent);
                held = HeldActions {
                    left: along < 0.0,
                    right: along > 0.0,
                };
                let past_anchor = player.pos.x > rope.anchor.x + RELEASE_PAST_ANCHOR;
                if past_anchor && player.vel.y < 0.0 && self.frames_on_rope > 10 {
                    pressed.detach = true;
                }
            }
            None => {
                self.frames_on_rope = 0;
                if player.grounded {
                    pressed.jump = true;
                } else if player.vel.y > 0.0 {
                    pressed.attach = true;
                }
            }
        }

        // Shooting replaces the rope aim for this frame
        let range = tuning.bolt_speed * tuning.bolt_lifetime * BOLT_RANGE_FACTOR;
        let target = state
            .enemies
            .iter_alive()
            .map(|(_, e)| e.pos - Vec2::new(0.0, e.size.y / 2.0))
            .filter(|center| center.distance(player.pos) <= range)
            .min_by(|a, b| {
                a.distance_squared(player.pos)
                    .total_cmp(&b.distance_squared(player.pos))
            });
        let can_shoot = state.clock_ms >= player.next_shot_at_ms && !pressed.attach;
        if let Some(center) = target.filter(|_| can_shoot) {
            pressed.shoot = true;
            aim_world = center;
        }

        TickInput {
            held,
            pointer: Vec2::new(aim_world.x - state.camera.x, aim_world.y),
            pressed,
        }
    }
}
