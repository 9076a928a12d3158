//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected RNG only (seeded in tests)
//! - Stable enemy indices (soft deletion)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod geom;
pub mod rope;
pub mod runner;
pub mod state;
pub mod tick;
pub mod worldgen;

pub use collision::resolve_player_collisions;
pub use combat::{check_win, try_shoot, update_enemies, update_projectiles};
pub use geom::{Rect, SegmentHit, segment_intersect, segment_rect_nearest_hit};
pub use rope::{apply_constraint, detach, find_anchor, try_attach};
pub use runner::{LoopState, RenderSnapshot, Simulation};
pub use state::{
    Building, Camera, Enemy, EnemyRoster, GameEvent, GameState, Player, Projectile, Rope,
};
pub use tick::{HeldActions, PressedActions, TickInput, tick};
pub use worldgen::{generate_buildings, generate_world, place_enemies};
