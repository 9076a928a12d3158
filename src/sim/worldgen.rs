//! Procedural world layout
//!
//! Buildings are placed left to right on the ground baseline, then each roof
//! may receive a couple of patrolling enemies. All randomness comes from the
//! caller's RNG so a seeded generator reproduces a layout exactly.

use glam::Vec2;
use rand::Rng;

use super::geom::Rect;
use super::state::{Building, Enemy};
use crate::tuning::Tuning;

/// Building width range: base + random extra
const BUILDING_MIN_WIDTH: f32 = 120.0;
const BUILDING_EXTRA_WIDTH: f32 = 120.0;
const GAP_MIN: f32 = 140.0;
const GAP_EXTRA: f32 = 220.0;
const BUILDING_MIN_HEIGHT: f32 = 180.0;
const BUILDING_EXTRA_HEIGHT: f32 = 260.0;

/// Keep enemies this far from the roof edges
const ROOF_EDGE_MARGIN: f32 = 12.0;
/// Each patrol bound may shrink inward by up to this fraction of the roof width
const PATROL_SHRINK: f32 = 0.25;
/// Enemies stand slightly above the roof line
const ENEMY_ROOF_OFFSET: f32 = 10.0;

/// Generate the building row
pub fn generate_buildings(tuning: &Tuning, rng: &mut impl Rng) -> Vec<Building> {
    let mut buildings = Vec::with_capacity(tuning.building_count);
    let mut x = tuning.first_building_x;

    for _ in 0..tuning.building_count {
        let w = BUILDING_MIN_WIDTH + rng.random::<f32>() * BUILDING_EXTRA_WIDTH;
        let gap = GAP_MIN + rng.random::<f32>() * GAP_EXTRA;
        let h = BUILDING_MIN_HEIGHT + rng.random::<f32>() * BUILDING_EXTRA_HEIGHT;
        buildings.push(Building {
            rect: Rect::new(x, tuning.ground_y - h, w, h),
        });
        x += w + gap;
    }

    buildings
}

/// Scatter patrolling enemies over the roofs
pub fn place_enemies(buildings: &[Building], tuning: &Tuning, rng: &mut impl Rng) -> Vec<Enemy> {
    let mut enemies = Vec::new();

    for b in buildings {
        if !rng.random_bool(tuning.enemy_spawn_chance) {
            continue;
        }
        let count = if rng.random_bool(0.5) { 1 } else { 2 };
        let rect = &b.rect;

        for _ in 0..count {
            let min_x = rect.left() + ROOF_EDGE_MARGIN;
            let max_x = rect.right() - ROOF_EDGE_MARGIN;
            let start_x = min_x + rng.random::<f32>() * (max_x - min_x);
            let patrol_a = min_x + rng.random::<f32>() * (rect.w * PATROL_SHRINK);
            let patrol_b = max_x - rng.random::<f32>() * (rect.w * PATROL_SHRINK);
            let dir = if rng.random_bool(0.5) { -1.0 } else { 1.0 };

            enemies.push(Enemy {
                pos: Vec2::new(start_x, rect.top() - ENEMY_ROOF_OFFSET),
                size: Vec2::new(tuning.enemy_width, tuning.enemy_height),
                dir,
                patrol_min_x: patrol_a.min(patrol_b),
                patrol_max_x: patrol_a.max(patrol_b),
                alive: true,
            });
        }
    }

    enemies
}

/// Generate a complete world: buildings plus their enemies
pub fn generate_world(tuning: &Tuning, rng: &mut impl Rng) -> (Vec<Building>, Vec<Enemy>) {
    let buildings = generate_buildings(tuning, rng);
    let enemies = place_enemies(&buildings, tuning, rng);
    log::info!(
        "Generated world: {} buildings, {} enemies",
        buildings.len(),
        enemies.len()
    );
    (buildings, enemies)
}
