//! Game state and core simulation types
//!
//! `GameState` is the single world aggregate: every entity, the phase
//! machine, timers and the seeded RNG live here and are passed by `&mut`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Boss, Buddy, Enemy, Loot, LootKind, Player};
use super::level::{ConfigError, LevelConfig, LevelTable};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for Confirm
    Start,
    /// Active gameplay
    Playing,
    /// Frozen until TogglePause
    Paused,
    /// Player was hit; resumes automatically
    Fail,
    /// Level banner; resumes automatically on the next level
    LevelUp,
    /// Out of lives
    GameOver,
    /// Last key collected
    Complete,
}

impl GamePhase {
    /// Phases that only Confirm can leave
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Complete)
    }

    /// Phases that clear themselves after a delay
    pub fn is_transient(&self) -> bool {
        matches!(self, GamePhase::Fail | GamePhase::LevelUp)
    }
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    EnemySpawned { count: usize },
    PlayerStruck { lives_left: u8 },
    LootCollected { kind: LootKind, points: u32 },
    BuddyPaired,
    BossAwake,
    LevelUp { level: u32 },
    GameOver { score: u64, level: u32 },
    Complete { score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub table: LevelTable,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Seconds of Playing time; freezes in every other phase
    pub game_time: f32,
    /// Seconds ticked in any phase; drives phase timers
    pub clock: f32,
    /// Clock time a transient phase hands back to Playing
    pub phase_until: Option<f32>,
    /// Game time of the next enemy spawn attempt
    pub next_spawn_at: f32,
    pub player: Player,
    pub boss: Boss,
    pub buddy: Buddy,
    pub enemies: Vec<Enemy>,
    pub loot: Vec<Loot>,
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the title screen, validating the level table
    pub fn new(table: LevelTable, tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        table.validate()?;
        Ok(Self::build(table, tuning, seed))
    }

    /// New game with the stock levels and default tuning
    pub fn classic(seed: u64) -> Self {
        Self::build(LevelTable::classic(), Tuning::default(), seed)
    }

    fn build(table: LevelTable, tuning: Tuning, seed: u64) -> Self {
        let first = table.level(1);
        let player = Player::new(first.player_pos);
        let boss = Boss::new(first.boss_pos);
        let buddy = Buddy::new(&first.buddy_sprite, first.buddy_pos);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            table,
            tuning,
            phase: GamePhase::Start,
            level: 1,
            score: 0,
            game_time: 0.0,
            clock: 0.0,
            phase_until: None,
            next_spawn_at: 0.0,
            player,
            boss,
            buddy,
            enemies: Vec::new(),
            loot: Vec::new(),
            events: Vec::new(),
        };
        state.load_level();
        state
    }

    pub fn max_level(&self) -> u32 {
        self.table.max_level()
    }

    pub fn level_config(&self) -> &LevelConfig {
        self.table.level(self.level)
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch phase, logging the transition
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    /// Hand a finished Fail/LevelUp phase back to Playing
    pub fn advance_phase_timer(&mut self) {
        let Some(until) = self.phase_until else {
            return;
        };
        if self.phase.is_transient() && self.clock >= until {
            self.phase_until = None;
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Full reinitialisation: level 1, zero score, full lives, Playing
    pub fn restart(&mut self) {
        log::info!("Restarting run (seed {})", self.seed);
        self.level = 1;
        self.score = 0;
        self.game_time = 0.0;
        self.phase_until = None;
        let cfg = self.table.level(1);
        self.player = Player::new(cfg.player_pos);
        self.load_level();
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::Started);
    }

    /// Rebuild boss, buddy, enemies and loot for the current level
    ///
    /// The player keeps lives and score and is moved to the level spawn.
    pub fn load_level(&mut self) {
        let cfg = self.table.level(self.level);
        log::info!(
            "Loading level {}/{} (max enemies {})",
            self.level,
            self.table.max_level(),
            cfg.max_enemies
        );

        self.player.reset(cfg.player_pos);
        self.player.invincible_until = None;
        self.player.speech = None;
        self.player.direction = None;
        self.boss = Boss::new(cfg.boss_pos);
        self.buddy = Buddy::new(&cfg.buddy_sprite, cfg.buddy_pos);

        self.enemies.clear();
        for _ in 0..INITIAL_ENEMY_COUNT.min(cfg.max_enemies) {
            self.enemies
                .push(Enemy::spawn(&mut self.rng, &self.table, &cfg.enemy_lanes));
        }

        let pool = self.loot_pool();
        let now = self.game_time;
        let divisor = self.tuning.loot_delay_divisor;
        self.loot = (0..cfg.item_count)
            .map(|_| roll_loot(&mut self.rng, cfg, &pool, now, divisor))
            .collect();

        self.next_spawn_at = self.game_time + self.tuning.enemy_spawn_interval;
    }

    /// Kinds that may spawn right now; the key joins once the buddy is
    /// paired and the score is strictly past the unlock threshold
    pub fn loot_pool(&self) -> Vec<LootKind> {
        let cfg = self.level_config();
        let mut pool = cfg.item_names.clone();
        if self.buddy.is_paired && self.score > cfg.key_unlock_score {
            pool.push(LootKind::Key);
        }
        pool
    }

    /// Replace the loot at `idx` with a fresh roll
    pub fn respawn_loot(&mut self, idx: usize) {
        let pool = self.loot_pool();
        let cfg = self.table.level(self.level);
        let loot = roll_loot(
            &mut self.rng,
            cfg,
            &pool,
            self.game_time,
            self.tuning.loot_delay_divisor,
        );
        if let Some(slot) = self.loot.get_mut(idx) {
            *slot = loot;
        }
    }

    /// Add one enemy if under the level cap
    pub fn spawn_enemy(&mut self) -> bool {
        let cfg = self.table.level(self.level);
        if self.enemies.len() >= cfg.max_enemies {
            return false;
        }
        self.enemies
            .push(Enemy::spawn(&mut self.rng, &self.table, &cfg.enemy_lanes));
        self.events.push(GameEvent::EnemySpawned {
            count: self.enemies.len(),
        });
        true
    }

    /// Put enemy `idx` back on the start line
    pub fn reset_enemy(&mut self, idx: usize) {
        let cfg = self.table.level(self.level);
        if let Some(enemy) = self.enemies.get_mut(idx) {
            enemy.reset(&mut self.rng, &self.table, &cfg.enemy_lanes);
        }
    }

    /// The player was hit: lose a life, then Fail or GameOver
    ///
    /// Ignored outside Playing, so one tick can never cost two lives.
    pub fn strike(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let lives_left = self.player.lose_life();
        log::debug!("Player struck, {} lives left", lives_left);
        self.events.push(GameEvent::PlayerStruck { lives_left });

        if lives_left == 0 {
            self.phase_until = None;
            self.set_phase(GamePhase::GameOver);
            self.events.push(GameEvent::GameOver {
                score: self.score,
                level: self.level,
            });
        } else {
            let spawn = self.level_config().player_pos;
            self.player.reset(spawn);
            self.phase_until = Some(self.clock + self.tuning.fail_delay);
            self.set_phase(GamePhase::Fail);
        }
    }

    /// Key collected with the buddy in tow: next level or the end
    pub fn finish_level(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.level < self.max_level() {
            self.level += 1;
            self.load_level();
            self.phase_until = Some(self.clock + self.tuning.level_up_delay);
            self.set_phase(GamePhase::LevelUp);
            self.events.push(GameEvent::LevelUp { level: self.level });
        } else {
            self.phase_until = None;
            self.set_phase(GamePhase::Complete);
            self.events.push(GameEvent::Complete { score: self.score });
        }
    }
}

/// Roll a loot item somewhere on the level's enemy rows
fn roll_loot(
    rng: &mut impl Rng,
    cfg: &LevelConfig,
    pool: &[LootKind],
    now: f32,
    delay_divisor: f32,
) -> Loot {
    let kind = pool[rng.random_range(0..pool.len())];
    let row = cfg.enemy_lanes[rng.random_range(0..cfg.enemy_lanes.len())];
    let col = rng.random_range(0..NUM_COLS);
    let pos = glam::Vec2::new(
        col as f32 * GRID_WIDTH,
        row as f32 * GRID_HEIGHT + GRID_HEIGHT / 2.0,
    );
    let delay = kind.points() as f32 * rng.random::<f32>() / delay_divisor;
    Loot::new(kind, pos, now, delay)
}
