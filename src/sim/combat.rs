//! Web bolts, enemy patrols and the win condition

use glam::Vec2;

use super::state::{Building, EnemyRoster, GameEvent, GameState, Projectile};
use crate::tuning::Tuning;

/// Direction used when the aim point coincides with the player
const FALLBACK_AIM: Vec2 = Vec2::X;

/// Fire a web bolt toward `aim` (world space) at simulation time `now_ms`
///
/// Returns `false` while the cooldown is still running.
pub fn try_shoot(state: &mut GameState, aim: Vec2, now_ms: f64) -> bool {
    let tuning = &state.tuning;
    let player = &mut state.player;
    if now_ms < player.next_shot_at_ms {
        return false;
    }
    player.next_shot_at_ms = now_ms + tuning.bolt_cooldown_ms;

    let dir = (aim - player.pos).try_normalize().unwrap_or(FALLBACK_AIM);
    state.projectiles.push(Projectile {
        pos: player.pos,
        vel: dir * tuning.bolt_speed,
        life: tuning.bolt_lifetime,
        radius: tuning.bolt_radius,
    });
    state.events.push(GameEvent::Shot);
    log::debug!("Bolt fired at t={:.0}ms toward ({:.1}, {:.1})", now_ms, aim.x, aim.y);
    true
}

/// Move projectiles, expire them and resolve wall/enemy hits
///
/// Returns the indices of enemies killed this step.
pub fn update_projectiles(
    projectiles: &mut Vec<Projectile>,
    buildings: &[Building],
    enemies: &mut EnemyRoster,
    dt: f32,
) -> Vec<usize> {
    for p in projectiles.iter_mut() {
        p.pos += p.vel * dt;
        p.life -= dt;
    }
    projectiles.retain(|p| p.life > 0.0);

    let mut kills = Vec::new();
    projectiles.retain(|p| {
        if buildings.iter().any(|b| b.rect.contains_point(p.pos)) {
            return false;
        }
        let hit = enemies
            .iter_alive()
            .find(|(_, e)| e.contains_point(p.pos))
            .map(|(index, _)| index);
        match hit {
            Some(index) => {
                if enemies.kill(index) {
                    kills.push(index);
                }
                false
            }
            None => true,
        }
    });
    kills
}

/// Walk alive enemies back and forth inside their patrol interval
pub fn update_enemies(enemies: &mut EnemyRoster, tuning: &Tuning, dt: f32) {
    for e in enemies.iter_alive_mut() {
        e.pos.x += e.dir * tuning.enemy_speed * dt;
        if e.pos.x < e.patrol_min_x {
            e.pos.x = e.patrol_min_x;
            e.dir = 1.0;
        } else if e.pos.x > e.patrol_max_x {
            e.pos.x = e.patrol_max_x;
            e.dir = -1.0;
        }
    }
}

/// Latch the win once every enemy is down. Returns `true` on the latching tick only.
pub fn check_win(state: &mut GameState) -> bool {
    if state.won || state.enemies.alive_count() > 0 {
        return false;
    }
    state.won = true;
    let kills = state.enemies.killed_count();
    state.events.push(GameEvent::Won { kills });
    log::info!("All enemies eliminated ({} / {})", kills, state.enemies.total());
    true
}
