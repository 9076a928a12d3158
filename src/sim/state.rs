//! Game state and core simulation types
//!
//! Plain data records for every entity plus the [`GameState`] that owns them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use crate::tuning::Tuning;

/// A grappling rope attached to a building
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rope {
    /// World-space point the rope is fixed to
    pub anchor: Vec2,
    /// Target length, always within the tuned rope range
    pub length: f32,
}

/// The player (a circle of `Tuning::player_radius`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Resting on the ground or a roof as of the last collision pass
    pub grounded: bool,
    /// Present only while attached
    pub rope: Option<Rope>,
    /// Simulation time (ms) before which shots are rejected
    pub next_shot_at_ms: f64,
}

impl Player {
    /// Fresh player at the spawn point
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.player_spawn_x,
                tuning.ground_y - tuning.player_spawn_height,
            ),
            vel: Vec2::ZERO,
            grounded: false,
            rope: None,
            next_shot_at_ms: 0.0,
        }
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.rope.is_some()
    }
}

/// A building (immutable once generated)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub rect: Rect,
}

/// A patrolling rooftop enemy
///
/// `pos.x` is the horizontal center and `pos.y` the feet; the body extends
/// `size.y` upward from the feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    /// Full width and height
    pub size: Vec2,
    /// Patrol direction, -1.0 or 1.0
    pub dir: f32,
    pub patrol_min_x: f32,
    pub patrol_max_x: f32,
    pub alive: bool,
}

impl Enemy {
    /// Whether a point lies strictly inside the body box
    pub fn contains_point(&self, p: Vec2) -> bool {
        let half_w = self.size.x / 2.0;
        let within_x = p.x > self.pos.x - half_w && p.x < self.pos.x + half_w;
        let within_y = p.y > self.pos.y - self.size.y && p.y < self.pos.y;
        within_x && within_y
    }
}

/// Enemy storage with stable indices
///
/// Enemies are never removed; a kill only clears the liveness flag, so an
/// index handed out in an event stays valid for the whole session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyRoster {
    slots: Vec<Enemy>,
}

impl EnemyRoster {
    pub fn new(enemies: Vec<Enemy>) -> Self {
        Self { slots: enemies }
    }

    /// Total number of slots, dead or alive
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn alive_count(&self) -> usize {
        self.slots.iter().filter(|e| e.alive).count()
    }

    pub fn killed_count(&self) -> usize {
        self.total() - self.alive_count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Enemy> {
        self.slots.get(index)
    }

    /// Every slot, including dead enemies
    pub fn all(&self) -> &[Enemy] {
        &self.slots
    }

    /// Alive enemies with their stable index
    pub fn iter_alive(&self) -> impl Iterator<Item = (usize, &Enemy)> {
        self.slots.iter().enumerate().filter(|(_, e)| e.alive)
    }

    /// Alive enemies, mutably
    pub fn iter_alive_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.slots.iter_mut().filter(|e| e.alive)
    }

    /// Mark an enemy dead. Returns `true` only if it was alive before.
    pub fn kill(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(enemy) if enemy.alive => {
                enemy.alive = false;
                true
            }
            _ => false,
        }
    }
}

/// A web bolt in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in seconds
    pub life: f32,
    pub radius: f32,
}

/// Horizontal camera offset, smoothed toward the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Ease toward keeping `target_x` a fixed fraction into the viewport
    pub fn follow(&mut self, target_x: f32, tuning: &Tuning) {
        let target = target_x - tuning.view_width * tuning.camera_lead;
        self.x += (target - self.x) * tuning.camera_stiffness;
        self.x = self.x.max(0.0);
    }
}

/// Events produced during a tick, drained by the host for HUD/audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RopeAttached { anchor: Vec2, length: f32 },
    RopeDetached,
    Shot,
    EnemyKilled { index: usize },
    /// Every enemy is down (emitted once per session)
    Won { kills: usize },
    Reset,
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub buildings: Vec<Building>,
    pub enemies: EnemyRoster,
    pub projectiles: Vec<Projectile>,
    pub player: Player,
    pub camera: Camera,
    /// Latched once every enemy is down
    pub won: bool,
    /// Simulated time in milliseconds (advances by the fixed tick)
    pub clock_ms: f64,
    pub time_ticks: u64,
    /// Pending events, oldest first
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Assemble a fresh session around a generated world
    pub fn new(tuning: Tuning, buildings: Vec<Building>, enemies: Vec<Enemy>) -> Self {
        let player = Player::spawn(&tuning);
        Self {
            tuning,
            buildings,
            enemies: EnemyRoster::new(enemies),
            projectiles: Vec::new(),
            player,
            camera: Camera::default(),
            won: false,
            clock_ms: 0.0,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Kill count and total for the HUD
    pub fn kills(&self) -> (usize, usize) {
        (self.enemies.killed_count(), self.enemies.total())
    }

    /// Translate a viewport-space pointer into world space
    #[inline]
    pub fn screen_to_world(&self, pointer: Vec2) -> Vec2 {
        Vec2::new(pointer.x + self.camera.x, pointer.y)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
