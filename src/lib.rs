//! Rooftop Swing - a grappling-rope rooftop action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rope physics, collisions, combat, fixed-step loop)
//! - `tuning`: Data-driven game balance
//! - `input`: Raw host events to per-frame tick input
//! - `autopilot`: Demo controller that plays the game on its own

pub mod autopilot;
pub mod input;
pub mod sim;
pub mod tuning;

pub use autopilot::Autopilot;
pub use input::{InputState, Key, MouseButton};
pub use sim::{GameEvent, GameState, Simulation, TickInput};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest real frame the loop will account for; longer stalls are dropped
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
    /// Maximum substeps per frame; a clamped `MAX_FRAME_DT` frame runs this many
    pub const MAX_SUBSTEPS: u32 = 2;

    /// Upper bound on generated buildings
    pub const MAX_BUILDINGS: usize = 256;
}
