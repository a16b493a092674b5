//! Bugz! - A Frogger-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, game phases)
//! - `render`: Read-only frame snapshots for an external renderer
//! - `input`: Discrete commands fed to the simulation one per tick
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: Local leaderboard

pub mod highscores;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Width of one map tile (and one horizontal player step)
    pub const GRID_WIDTH: f32 = 101.0;
    /// Height of one map tile (and one vertical player step)
    pub const GRID_HEIGHT: f32 = 83.0;
    /// Tile columns on every level
    pub const NUM_COLS: usize = 7;
    /// Tile rows on every level
    pub const NUM_ROWS: usize = 8;

    /// Fixed simulation timestep used by the runner (seconds)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Player lives at the start of a run
    pub const MAX_LIVES: u8 = 3;
    /// Enemies alive when a level starts
    pub const INITIAL_ENEMY_COUNT: usize = 3;

    /// Enemies are wrapped once they pass this multiple of the world width
    pub const ENEMY_WRAP_FACTOR: f32 = 1.5;
    /// Enemy speeds may overshoot their species max by this factor
    pub const ENEMY_OVERSPEED_FACTOR: f32 = 1.5;

    /// HUD score display cap
    pub const HUD_SCORE_CAP: u64 = 99_999;
}

/// Seconds formatted as `m:ss` for the HUD clock
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
