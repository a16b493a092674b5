//! Level configuration table
//!
//! Static per-level data consumed read-only by the simulation. Tables are
//! validated once at load; a malformed table is rejected instead of being
//! patched with defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::LootKind;
use super::geom::Rect;
use crate::consts::{GRID_HEIGHT, NUM_ROWS};

/// Errors raised while loading or validating a level table
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level table has no levels")]
    NoLevels,
    #[error("world width must be positive, got {0}")]
    BadWorldWidth(f32),
    #[error("level {level}: enemy lane list is empty")]
    EmptyLanes { level: u32 },
    #[error("level {level}: enemy lane {lane} is outside the {rows} map rows")]
    LaneOutOfRange { level: u32, lane: u32, rows: usize },
    #[error("level {level}: item pool is empty")]
    EmptyItemPool { level: u32 },
    #[error("level {level}: item count must be at least 1")]
    ZeroItemCount { level: u32 },
    #[error("level {level}: bounds {bounds:?} enclose no area")]
    DegenerateBounds { level: u32, bounds: Rect },
    #[error("level {level}: expected {expected} tile rows, found {found}")]
    TileRows {
        level: u32,
        expected: usize,
        found: usize,
    },
    #[error("could not parse level table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Map tile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    Grass,
    Stone,
    Water,
}

impl Tile {
    pub fn sprite_key(&self) -> &'static str {
        match self {
            Tile::Grass => "grass-block",
            Tile::Stone => "stone-block",
            Tile::Water => "water-block",
        }
    }
}

fn default_key_unlock_score() -> u64 {
    1000
}

/// Everything the simulation needs to know about one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Loot kinds that may spawn (the key is added once unlocked)
    pub item_names: Vec<LootKind>,
    /// Loot items on the map at once
    pub item_count: usize,
    /// Cap for the enemy spawn ratchet
    pub max_enemies: usize,
    /// Map rows enemies travel along
    pub enemy_lanes: Vec<u32>,
    /// Tile kind per map row, top to bottom
    pub rows: Vec<Tile>,
    pub player_pos: Vec2,
    pub boss_pos: Vec2,
    pub buddy_sprite: String,
    pub buddy_pos: Vec2,
    /// Area the player's hitbox must stay inside
    pub bounds: Rect,
    /// Score needed before the key can drop (buddy must also be paired)
    #[serde(default = "default_key_unlock_score")]
    pub key_unlock_score: u64,
}

/// The full set of levels plus world dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTable {
    /// Width of the playfield; enemies wrap relative to it
    pub world_width: f32,
    /// Y of lane 0; lane `n` sits `n` grid rows below it
    pub lane_origin_y: f32,
    pub levels: Vec<LevelConfig>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl LevelTable {
    /// The three stock levels
    pub fn classic() -> Self {
        use LootKind::*;
        use Tile::*;

        Self {
            world_width: 707.0,
            lane_origin_y: 50.0,
            levels: vec![
                LevelConfig {
                    item_names: vec![Heart, Star, BlueGem, GreenGem],
                    item_count: 5,
                    max_enemies: 10,
                    enemy_lanes: vec![1, 2, 3, 4, 5],
                    rows: vec![Grass, Stone, Stone, Stone, Stone, Stone, Grass, Water],
                    player_pos: Vec2::new(600.0, 575.0),
                    boss_pos: Vec2::new(125.0, 90.0),
                    buddy_sprite: "char-cat-girl".to_string(),
                    buddy_pos: Vec2::new(10.0, 51.0),
                    bounds: Rect::new(0.0, 55.0, 707.0, 625.0),
                    key_unlock_score: 1000,
                },
                LevelConfig {
                    item_names: vec![Heart, Star, BlueGem, GreenGem, GreenGem],
                    item_count: 5,
                    max_enemies: 15,
                    enemy_lanes: vec![2, 3, 4, 5, 6],
                    rows: vec![Water, Grass, Stone, Stone, Stone, Stone, Grass, Water],
                    player_pos: Vec2::new(303.0, 55.0),
                    boss_pos: Vec2::new(125.0, 540.0),
                    buddy_sprite: "char-horn-girl".to_string(),
                    buddy_pos: Vec2::new(10.0, 550.0),
                    bounds: Rect::new(0.0, 133.0, 707.0, 625.0),
                    key_unlock_score: 1000,
                },
                LevelConfig {
                    item_names: vec![Heart, Star, BlueGem, GreenGem, OrangeGem],
                    item_count: 5,
                    max_enemies: 20,
                    enemy_lanes: vec![1, 2, 3, 4, 5],
                    rows: vec![Grass, Stone, Stone, Stone, Stone, Stone, Grass, Grass],
                    player_pos: Vec2::new(303.0, 555.0),
                    boss_pos: Vec2::new(45.0, 200.0),
                    buddy_sprite: "char-princess-girl".to_string(),
                    buddy_pos: Vec2::new(20.0, 70.0),
                    bounds: Rect::new(0.0, 50.0, 707.0, 708.0),
                    key_unlock_score: 1000,
                },
            ],
        }
    }

    /// Parse and validate a table from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: LevelTable = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Number of levels (the last one completes the game)
    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Config for a 1-based level number, clamped into range
    ///
    /// Only call on a validated (non-empty) table.
    pub fn level(&self, level: u32) -> &LevelConfig {
        let idx = (level.max(1) as usize - 1).min(self.levels.len() - 1);
        &self.levels[idx]
    }

    /// World-space y of an enemy lane
    pub fn lane_y(&self, lane: u32) -> f32 {
        self.lane_origin_y + lane as f32 * GRID_HEIGHT
    }

    /// Check every level for missing or unusable data
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        if self.world_width.is_nan() || self.world_width <= 0.0 {
            return Err(ConfigError::BadWorldWidth(self.world_width));
        }

        for (idx, cfg) in self.levels.iter().enumerate() {
            let level = idx as u32 + 1;
            if cfg.enemy_lanes.is_empty() {
                return Err(ConfigError::EmptyLanes { level });
            }
            if let Some(&lane) = cfg.enemy_lanes.iter().find(|&&l| l as usize >= NUM_ROWS) {
                return Err(ConfigError::LaneOutOfRange {
                    level,
                    lane,
                    rows: NUM_ROWS,
                });
            }
            if cfg.item_names.is_empty() {
                return Err(ConfigError::EmptyItemPool { level });
            }
            if cfg.item_count == 0 {
                return Err(ConfigError::ZeroItemCount { level });
            }
            if cfg.bounds.is_empty() {
                return Err(ConfigError::DegenerateBounds {
                    level,
                    bounds: cfg.bounds,
                });
            }
            if cfg.rows.len() != NUM_ROWS {
                return Err(ConfigError::TileRows {
                    level,
                    expected: NUM_ROWS,
                    found: cfg.rows.len(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_table_is_valid() {
        let table = LevelTable::classic();
        assert!(table.validate().is_ok());
        assert_eq!(table.max_level(), 3);
        assert_eq!(table.level(2).max_enemies, 15);
    }

    #[test]
    fn test_level_lookup_clamps() {
        let table = LevelTable::classic();
        assert_eq!(table.level(0).max_enemies, 10);
        assert_eq!(table.level(99).max_enemies, 20);
    }

    #[test]
    fn test_lane_y() {
        let table = LevelTable::classic();
        assert_eq!(table.lane_y(0), 50.0);
        assert_eq!(table.lane_y(2), 216.0);
    }

    #[test]
    fn test_empty_lanes_rejected() {
        let mut table = LevelTable::classic();
        table.levels[1].enemy_lanes.clear();
        assert!(matches!(
            table.validate(),
            Err(ConfigError::EmptyLanes { level: 2 })
        ));
    }

    #[test]
    fn test_empty_item_pool_rejected() {
        let mut table = LevelTable::classic();
        table.levels[0].item_names.clear();
        assert!(matches!(
            table.validate(),
            Err(ConfigError::EmptyItemPool { level: 1 })
        ));
    }

    #[test]
    fn test_lane_out_of_range_rejected() {
        let mut table = LevelTable::classic();
        table.levels[2].enemy_lanes.push(12);
        assert!(matches!(
            table.validate(),
            Err(ConfigError::LaneOutOfRange { level: 3, lane: 12, .. })
        ));
    }

    #[test]
    fn test_no_levels_rejected() {
        let table = LevelTable {
            levels: Vec::new(),
            ..LevelTable::classic()
        };
        assert!(matches!(table.validate(), Err(ConfigError::NoLevels)));
    }

    #[test]
    fn test_json_roundtrip_and_default_unlock_score() {
        let json = serde_json::to_string(&LevelTable::classic()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["levels"][0]
            .as_object_mut()
            .unwrap()
            .remove("key_unlock_score");
        let table = LevelTable::from_json(&value.to_string()).unwrap();
        assert_eq!(table.levels[0].key_unlock_score, 1000);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(
            LevelTable::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_item_name_is_accepted() {
        let mut value = serde_json::to_value(LevelTable::classic()).unwrap();
        value["levels"][0]["item_names"] = serde_json::json!(["heart", "rubyGem"]);
        let table = LevelTable::from_json(&value.to_string()).unwrap();
        assert_eq!(table.levels[0].item_names[1], LootKind::Unknown);
    }
}
