//! Grappling rope: attachment raycast and constraint solver
//!
//! The rope is a hard constraint. Every tick the player is put back at exactly
//! the rope length from the anchor and the radial part of its velocity is
//! removed, which leaves only the tangential swing.

use glam::Vec2;

use super::geom::segment_rect_nearest_hit;
use super::state::{Building, GameEvent, GameState, Player, Rope};
use crate::tuning::Tuning;

/// Direction used when the player sits exactly on the anchor
const FALLBACK_DIR: Vec2 = Vec2::Y;

/// Find the nearest building surface along `start -> aim` within rope reach
///
/// Returns the hit point and its distance from `start`.
pub fn find_anchor(
    start: Vec2,
    aim: Vec2,
    buildings: &[Building],
    max_length: f32,
) -> Option<(Vec2, f32)> {
    buildings
        .iter()
        .filter_map(|b| segment_rect_nearest_hit(start, aim, &b.rect))
        .map(|hit| (hit.point, hit.point.distance(start)))
        .filter(|&(_, dist)| dist <= max_length)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Shoot the rope toward `aim` (world space). Returns `true` if it caught.
///
/// A miss leaves any existing rope untouched; a hit replaces it.
pub fn try_attach(state: &mut GameState, aim: Vec2) -> bool {
    let tuning = &state.tuning;
    let Some((anchor, dist)) =
        find_anchor(state.player.pos, aim, &state.buildings, tuning.max_rope_length)
    else {
        log::debug!("Rope missed toward ({:.1}, {:.1})", aim.x, aim.y);
        return false;
    };

    let length = tuning.clamp_rope_length(dist);
    state.player.rope = Some(Rope { anchor, length });
    state.events.push(GameEvent::RopeAttached { anchor, length });
    log::debug!(
        "Rope attached at ({:.1}, {:.1}), length {:.1}",
        anchor.x,
        anchor.y,
        length
    );
    true
}

/// Release the rope, keeping the current velocity
pub fn detach(state: &mut GameState) {
    if state.player.rope.take().is_some() {
        state.events.push(GameEvent::RopeDetached);
        log::debug!("Rope detached");
    }
}

/// Enforce the rope length and apply pump input
///
/// `pump` is -1, 0 or 1 (left, none, right). Does nothing while unattached.
pub fn apply_constraint(player: &mut Player, tuning: &Tuning, pump: f32, dt: f32) {
    let Some(rope) = player.rope else {
        return;
    };

    let offset = player.pos - rope.anchor;
    let dir = offset.try_normalize().unwrap_or(FALLBACK_DIR);

    // Positional correction: exactly on the circle
    player.pos = rope.anchor + dir * rope.length;

    // Drop the radial velocity so the length holds next tick too
    let radial_speed = player.vel.dot(dir);
    player.vel -= dir * radial_speed;

    if pump != 0.0 {
        // A positive pump pushes left at the bottom of the arc
        let tangent = dir.perp();
        player.vel += tangent * tuning.rope_pump_accel * pump * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::geom::Rect;
    use proptest::prelude::*;

    fn state_with(buildings: Vec<Building>) -> GameState {
        GameState::new(Tuning::default(), buildings, Vec::new())
    }

    fn building(x: f32, y: f32, w: f32, h: f32) -> Building {
        Building { rect: Rect::new(x, y, w, h) }
    }

    #[test]
    fn test_attach_at_distance_300() {
        // Player spawns at (120, 340); a wall whose left face is 300 to the right
        let mut state = state_with(vec![building(420.0, 100.0, 150.0, 580.0)]);
        assert_eq!(state.player.pos, Vec2::new(120.0, 340.0));

        assert!(try_attach(&mut state, Vec2::new(900.0, 340.0)));
        let rope = state.player.rope.unwrap();
        assert!((rope.anchor - Vec2::new(420.0, 340.0)).length() < 1e-3);
        assert!((rope.length - 300.0).abs() < 1e-3);
        assert!(matches!(state.events.last(), Some(GameEvent::RopeAttached { .. })));

        // Drift the player, then enforce: back to exactly 300 along the same direction
        state.player.pos = Vec2::new(100.0, 400.0);
        let dir = (state.player.pos - rope.anchor).normalize();
        apply_constraint(&mut state.player, &Tuning::default(), 0.0, SIM_DT);
        assert!((state.player.pos.distance(rope.anchor) - 300.0).abs() < 1e-3);
        let new_dir = (state.player.pos - rope.anchor).normalize();
        assert!((new_dir - dir).length() < 1e-5);
    }

    #[test]
    fn test_attach_picks_nearest_building() {
        let mut state = state_with(vec![
            building(500.0, 0.0, 50.0, 680.0),
            building(300.0, 0.0, 50.0, 680.0),
        ]);
        assert!(try_attach(&mut state, Vec2::new(1000.0, 340.0)));
        let rope = state.player.rope.unwrap();
        assert!((rope.anchor.x - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_attach_out_of_reach_misses() {
        let mut state = state_with(vec![building(1000.0, 0.0, 50.0, 680.0)]);
        assert!(!try_attach(&mut state, Vec2::new(2000.0, 340.0)));
        assert!(state.player.rope.is_none());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_attach_short_distance_clamps_to_minimum() {
        let mut state = state_with(vec![building(150.0, 0.0, 50.0, 680.0)]);
        assert!(try_attach(&mut state, Vec2::new(400.0, 340.0)));
        assert_eq!(state.player.rope.unwrap().length, state.tuning.min_rope_length);
    }

    #[test]
    fn test_detach_keeps_velocity() {
        let mut state = state_with(vec![building(420.0, 100.0, 150.0, 580.0)]);
        try_attach(&mut state, Vec2::new(900.0, 340.0));
        state.player.vel = Vec2::new(250.0, -80.0);
        detach(&mut state);
        assert!(state.player.rope.is_none());
        assert_eq!(state.player.vel, Vec2::new(250.0, -80.0));

        // Second detach is a no-op
        let events = state.events.len();
        detach(&mut state);
        assert_eq!(state.events.len(), events);
    }

    #[test]
    fn test_constraint_noop_when_unattached() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(&tuning);
        player.vel = Vec2::new(10.0, 20.0);
        let before = player.clone();
        apply_constraint(&mut player, &tuning, 1.0, SIM_DT);
        assert_eq!(player, before);
    }

    #[test]
    fn test_constraint_removes_radial_velocity() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(&tuning);
        player.rope = Some(Rope { anchor: Vec2::new(0.0, 0.0), length: 100.0 });
        player.pos = Vec2::new(0.0, 100.0);
        player.vel = Vec2::new(50.0, 300.0);

        apply_constraint(&mut player, &tuning, 0.0, SIM_DT);
        // Rope hangs straight down: only horizontal (tangential) motion survives
        assert!(player.vel.y.abs() < 1e-4);
        assert!((player.vel.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_pump_adds_tangential_speed() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(&tuning);
        player.rope = Some(Rope { anchor: Vec2::new(0.0, 0.0), length: 100.0 });
        player.pos = Vec2::new(0.0, 100.0);
        player.vel = Vec2::ZERO;

        apply_constraint(&mut player, &tuning, 1.0, SIM_DT);
        let expected = tuning.rope_pump_accel * SIM_DT;
        // Hanging straight down, a positive pump pushes toward -x
        assert!((player.vel.x + expected).abs() < 1e-3);
        assert!(player.vel.dot(Vec2::Y).abs() < 1e-4);

        // Rope out to the right of the anchor: a positive pump pushes down
        let mut side = player.clone();
        side.pos = Vec2::new(100.0, 0.0);
        side.vel = Vec2::ZERO;
        apply_constraint(&mut side, &tuning, 1.0, SIM_DT);
        assert!((side.vel.y - expected).abs() < 1e-3);

        let mut mirrored = player.clone();
        mirrored.vel = Vec2::ZERO;
        apply_constraint(&mut mirrored, &tuning, -1.0, SIM_DT);
        assert!((mirrored.vel + player.vel).length() < 1e-3);
    }

    #[test]
    fn test_constraint_coincident_with_anchor() {
        let tuning = Tuning::default();
        let mut player = Player::spawn(&tuning);
        player.rope = Some(Rope { anchor: Vec2::new(10.0, 10.0), length: 90.0 });
        player.pos = Vec2::new(10.0, 10.0);
        apply_constraint(&mut player, &tuning, 0.0, SIM_DT);
        assert!((player.pos.distance(Vec2::new(10.0, 10.0)) - 90.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn constraint_holds_rope_length(
            px in -600.0f32..600.0, py in -600.0f32..600.0,
            vx in -2000.0f32..2000.0, vy in -2000.0f32..2000.0,
            length in 80.0f32..520.0,
            pump in prop_oneof![Just(-1.0f32), Just(0.0f32), Just(1.0f32)],
        ) {
            let tuning = Tuning::default();
            let anchor = Vec2::new(300.0, 200.0);
            let mut player = Player::spawn(&tuning);
            player.rope = Some(Rope { anchor, length });
            player.pos = anchor + Vec2::new(px, py);
            player.vel = Vec2::new(vx, vy);

            apply_constraint(&mut player, &tuning, pump, SIM_DT);
            let dist = player.pos.distance(anchor);
            prop_assert!((dist - length).abs() < 1e-2 * (1.0 + length / 100.0));
        }

        #[test]
        fn attached_length_within_bounds(
            bx in 150.0f32..900.0, by in 0.0f32..600.0,
            aim_x in -200.0f32..1500.0, aim_y in -200.0f32..900.0,
        ) {
            let mut state = state_with(vec![building(bx, by, 120.0, 680.0 - by)]);
            if try_attach(&mut state, Vec2::new(aim_x, aim_y)) {
                let rope = state.player.rope.unwrap();
                prop_assert!(rope.length >= state.tuning.min_rope_length);
                prop_assert!(rope.length <= state.tuning.max_rope_length);
            }
        }
    }
}
