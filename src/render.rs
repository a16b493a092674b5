//! Read-only frame snapshots for an external renderer
//!
//! `Frame::capture` turns a `GameState` into a flat draw list: tile grid,
//! sprites back to front, speech bubbles, HUD values and a phase overlay.
//! Nothing here mutates the simulation.

use glam::Vec2;

use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Hitboxed, LevelTable, LootKind, Rect, Species};

/// Where a paired buddy is shown in the HUD
pub const BUDDY_BADGE_POS: Vec2 = Vec2::new(550.0, 10.0);

const PLAYER_SPRITE: &str = "char-boy";
const BOSS_SPRITE: &str = "enemy-bug";
const FURY_SPRITES: [&str; 2] = ["enemy-bug-blue", "enemy-bug-purple"];
const REVERSED_SUFFIX: &str = "-reversed";

/// One sprite to blit at `pos` (top-left of the entity body)
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    pub key: String,
    pub pos: Vec2,
    /// Present only when hitbox debugging is on
    pub hitbox: Option<Rect>,
}

/// A speech bubble anchored above an entity
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechBubble {
    pub text: &'static str,
    pub anchor: Vec2,
}

/// Heads-up display values, already formatted
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    /// Score, capped at `HUD_SCORE_CAP`
    pub score: u64,
    /// "level/max"
    pub level: String,
    pub lives: u8,
    /// `m:ss`, or `None` when the clock is hidden
    pub clock: Option<String>,
}

/// Full-screen banner for non-Playing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Title,
    Paused,
    Oops,
    LevelUp { level: u32 },
    GameOver { score: u64 },
    Complete { score: u64 },
}

impl Overlay {
    pub fn for_state(state: &GameState) -> Option<Self> {
        match state.phase {
            GamePhase::Playing => None,
            GamePhase::Start => Some(Overlay::Title),
            GamePhase::Paused => Some(Overlay::Paused),
            GamePhase::Fail => Some(Overlay::Oops),
            GamePhase::LevelUp => Some(Overlay::LevelUp { level: state.level }),
            GamePhase::GameOver => Some(Overlay::GameOver { score: state.score }),
            GamePhase::Complete => Some(Overlay::Complete { score: state.score }),
        }
    }

    pub fn headline(&self) -> String {
        match self {
            Overlay::Title => "Bugz!".to_string(),
            Overlay::Paused => "Pause".to_string(),
            Overlay::Oops => "Oops!...Try Again!".to_string(),
            Overlay::LevelUp { level } => format!("Level {level}"),
            Overlay::GameOver { score } => format!("Game Over ({score})"),
            Overlay::Complete { .. } => "Congratulations!".to_string(),
        }
    }

    /// Prompt line, if the overlay waits for a key
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            Overlay::Title => Some("Use the arrow keys to move. Press SPACE to Play"),
            Overlay::Paused => Some("Press P to resume"),
            Overlay::GameOver { .. } | Overlay::Complete { .. } => {
                Some("Press SPACE to Play Again")
            }
            Overlay::Oops | Overlay::LevelUp { .. } => None,
        }
    }
}

/// Snapshot of everything drawn in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Background tiles, row-major
    pub tiles: Vec<SpriteDraw>,
    /// Entities back to front: loot, enemies, boss, buddy, player
    pub sprites: Vec<SpriteDraw>,
    /// Sleep bubble stage (0..3) over the boss, while it sleeps
    pub sleep_frame: Option<u32>,
    pub bubbles: Vec<SpeechBubble>,
    pub hud: Hud,
    pub overlay: Option<Overlay>,
}

impl Frame {
    pub fn capture(state: &GameState, settings: &Settings) -> Self {
        let cfg = state.level_config();
        let debug = settings.show_hitboxes;
        let now = state.game_time;

        let tiles = cfg
            .rows
            .iter()
            .enumerate()
            .flat_map(|(row, tile)| {
                (0..NUM_COLS).map(move |col| SpriteDraw {
                    key: tile.sprite_key().to_string(),
                    pos: Vec2::new(col as f32 * GRID_WIDTH, row as f32 * GRID_HEIGHT),
                    hitbox: None,
                })
            })
            .collect();

        let mut sprites = Vec::new();

        for loot in &state.loot {
            if !loot.is_visible(now) {
                continue;
            }
            sprites.push(sprite(loot.kind.sprite_key(), loot, debug));
        }

        for enemy in &state.enemies {
            sprites.push(sprite(enemy.species.sprite_key(), enemy, debug));
        }

        let boss = &state.boss;
        let animate = settings.effective_animation();
        let boss_key = if boss.is_sleeping {
            BOSS_SPRITE
        } else if animate {
            FURY_SPRITES[(boss.alive_time * 10.0).max(0.0) as usize % FURY_SPRITES.len()]
        } else {
            FURY_SPRITES[0]
        };
        let boss_key = if boss.facing_left {
            format!("{boss_key}{REVERSED_SUFFIX}")
        } else {
            boss_key.to_string()
        };
        sprites.push(sprite(&boss_key, boss, debug));
        let sleep_frame = boss
            .is_sleeping
            .then(|| if animate { boss.sleep_frame() } else { 0 });

        let buddy = &state.buddy;
        if buddy.is_paired {
            sprites.push(SpriteDraw {
                key: buddy.sprite.clone(),
                pos: BUDDY_BADGE_POS,
                hitbox: None,
            });
        } else {
            sprites.push(sprite(&buddy.sprite, buddy, debug));
        }

        sprites.push(sprite(PLAYER_SPRITE, &state.player, debug));

        let mut bubbles = Vec::new();
        if settings.speech_bubbles {
            if let Some(speech) = state.player.speech {
                bubbles.push(SpeechBubble {
                    text: speech.reaction.text(),
                    anchor: state.player.body.pos,
                });
            }
            if !buddy.is_paired {
                bubbles.push(SpeechBubble {
                    text: crate::sim::Reaction::Help.text(),
                    anchor: buddy.body.pos,
                });
            }
        }

        let hud = Hud {
            score: state.score.min(HUD_SCORE_CAP),
            level: format!("{}/{}", state.level, state.max_level()),
            lives: state.player.lives,
            clock: settings.show_clock.then(|| crate::format_clock(now)),
        };

        Self {
            tiles,
            sprites,
            sleep_frame,
            bubbles,
            hud,
            overlay: Overlay::for_state(state),
        }
    }
}

fn sprite(key: &str, entity: &dyn Hitboxed, debug: bool) -> SpriteDraw {
    SpriteDraw {
        key: key.to_string(),
        pos: entity.body().pos,
        hitbox: debug.then(|| entity.hitbox()),
    }
}

/// Anything that can show a frame
pub trait Renderer {
    fn present(&mut self, frame: &Frame);
}

/// Every sprite key a level table can reference, sorted and deduplicated
pub fn sprite_manifest(table: &LevelTable) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut add = |key: &str| keys.push(key.to_string());

    add(PLAYER_SPRITE);
    for key in [BOSS_SPRITE, FURY_SPRITES[0], FURY_SPRITES[1]] {
        add(key);
        add(&format!("{key}{REVERSED_SUFFIX}"));
    }
    for species in Species::ALL {
        add(species.sprite_key());
    }
    add(LootKind::Key.sprite_key());

    for level in &table.levels {
        add(&level.buddy_sprite);
        for kind in &level.item_names {
            if *kind != LootKind::Unknown {
                add(kind.sprite_key());
            }
        }
        for tile in &level.rows {
            add(tile.sprite_key());
        }
    }

    keys.sort();
    keys.dedup();
    keys
}
