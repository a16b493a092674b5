//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Timed effects are stored expiry timestamps, never callbacks
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geom;
pub mod level;
pub mod state;
pub mod tick;

pub use collision::{resolve_collisions, resolve_enemy_bump};
pub use entity::{
    Boss, Buddy, Direction, Enemy, Loot, LootKind, Player, Reaction, Species, Speech,
};
pub use geom::{Body, Hitboxed, Offset, Rect, clamp_within, overlap};
pub use level::{ConfigError, LevelConfig, LevelTable, Tile};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{Command, TickInput, tick};
