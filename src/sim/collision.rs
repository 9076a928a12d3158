//! Player collision against the ground and buildings
//!
//! Discrete, per-tick checks only. A player moving fast enough can tunnel
//! through a thin wall or skip a roof band; that is accepted behaviour.

use super::state::{Building, Player};
use crate::tuning::Tuning;

/// Resolve ground, roof and side contacts and recompute `grounded`
pub fn resolve_player_collisions(player: &mut Player, buildings: &[Building], tuning: &Tuning) {
    let r = tuning.player_radius;
    player.grounded = false;

    // Ground baseline
    if player.pos.y + r > tuning.ground_y {
        player.pos.y = tuning.ground_y - r;
        if player.vel.y > 0.0 {
            player.vel.y = 0.0;
        }
        player.grounded = true;
    }

    for b in buildings {
        let rect = &b.rect;
        let top = rect.top();
        let left = rect.left();
        let right = rect.right();

        // Land on the roof, only while falling
        let feet = player.pos.y + r;
        let within_x = player.pos.x > left && player.pos.x < right;
        let in_roof_band = feet > top && feet < top + tuning.roof_landing_band;
        if within_x && in_roof_band && player.vel.y >= 0.0 {
            player.pos.y = top - r;
            player.vel.y = 0.0;
            player.grounded = true;
        }

        // Push out of the walls
        let within_y = player.pos.y > top && player.pos.y < rect.bottom();
        if within_y {
            if player.vel.x > 0.0 && player.pos.x + r > left && player.pos.x < left {
                player.pos.x = left - r;
                player.vel.x = 0.0;
            } else if player.vel.x < 0.0 && player.pos.x - r < right && player.pos.x > right {
                player.pos.x = right + r;
                player.vel.x = 0.0;
            }
        }
    }
}
