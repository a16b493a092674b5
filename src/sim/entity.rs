//! Entity types: player, enemies, boss, buddy and loot
//!
//! Entities are plain structs sharing a composed `Body` + `Offset`; they do
//! not reference each other. Cross-entity rules live in `collision`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geom::{Body, Hitboxed, Offset, Rect, clamp_within};
use super::level::LevelTable;
use crate::consts::*;

macro_rules! impl_hitboxed {
    ($($ty:ty),*) => {
        $(impl Hitboxed for $ty {
            fn body(&self) -> &Body {
                &self.body
            }
            fn offset(&self) -> &Offset {
                &self.offset
            }
        })*
    };
}

impl_hitboxed!(Player, Enemy, Boss, Buddy, Loot);

/// Grid movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// One grid step in this direction
    pub fn step(&self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-GRID_WIDTH, 0.0),
            Direction::Right => Vec2::new(GRID_WIDTH, 0.0),
            Direction::Up => Vec2::new(0.0, -GRID_HEIGHT),
            Direction::Down => Vec2::new(0.0, GRID_HEIGHT),
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Things a character can say in a speech bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    /// Player bumped the sleeping boss
    Sleep,
    /// Player just paired with the buddy
    Paired,
    /// Buddy waiting to be rescued
    Help,
}

impl Reaction {
    pub fn text(&self) -> &'static str {
        match self {
            Reaction::Sleep => "... leave it",
            Reaction::Paired => "Now I need to find the key ...?",
            Reaction::Help => "help!",
        }
    }
}

/// An active speech bubble
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speech {
    pub reaction: Reaction,
    /// Game time the bubble disappears
    pub until: f32,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

const PLAYER_SIZE: Vec2 = Vec2::new(90.0, 83.0);
const PLAYER_OFFSET: Offset = Offset::new(10.0, 15.0, -35.0, -25.0);

/// The hero
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub offset: Offset,
    pub lives: u8,
    /// Game time the star power wears off
    pub invincible_until: Option<f32>,
    pub speech: Option<Speech>,
    /// Last direction moved (used to step around the sleeping boss)
    pub direction: Option<Direction>,
    /// Move queued by input, applied on the next update
    pub pending_move: Option<Direction>,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            body: Body::new(spawn, PLAYER_SIZE),
            offset: PLAYER_OFFSET,
            lives: MAX_LIVES,
            invincible_until: None,
            speech: None,
            direction: None,
            pending_move: None,
        }
    }

    /// Back to the level spawn point, dropping any queued move
    pub fn reset(&mut self, spawn: Vec2) {
        self.body.pos = spawn;
        self.pending_move = None;
    }

    pub fn queue_move(&mut self, dir: Direction) {
        self.pending_move = Some(dir);
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    pub fn is_talking(&self) -> bool {
        self.speech.is_some()
    }

    pub fn grant_invincibility(&mut self, now: f32, duration: f32) {
        self.invincible_until = Some(now + duration);
    }

    /// Add one life, capped at `MAX_LIVES`
    pub fn heal(&mut self) {
        self.lives = (self.lives + 1).min(MAX_LIVES);
    }

    /// Remove one life and return what is left
    pub fn lose_life(&mut self) -> u8 {
        debug_assert!(self.lives > 0, "lost a life with none left");
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn say(&mut self, reaction: Reaction, now: f32, duration: f32) {
        self.speech = Some(Speech {
            reaction,
            until: now + duration,
        });
    }

    /// Apply the queued move, keep the hitbox in bounds, expire timers
    pub fn update(&mut self, bounds: &Rect, now: f32) {
        if let Some(dir) = self.pending_move.take() {
            self.body.pos += dir.step();
            self.direction = Some(dir);
        }
        clamp_within(&mut self.body, &self.offset, bounds);

        if self.invincible_until.is_some_and(|t| now >= t) {
            self.invincible_until = None;
        }
        if self.speech.is_some_and(|s| now >= s.until) {
            self.speech = None;
        }
    }

    /// Step back out of a sleeping boss along the axis of the last move
    pub fn sidestep(&mut self, boss: &Body) {
        let x_side = if self.body.pos.x < boss.pos.x { -1.0 } else { 1.0 };
        let y_side = if self.body.pos.y < boss.pos.y { -1.0 } else { 1.0 };
        match self.direction {
            Some(dir) if dir.is_horizontal() => {
                self.body.pos.x = boss.pos.x + x_side * boss.size.x;
            }
            Some(_) => {
                self.body.pos.y = boss.pos.y + y_side * boss.size.y;
            }
            None => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

const ENEMY_SIZE: Vec2 = Vec2::new(90.0, 83.0);
const ENEMY_OFFSET: Offset = Offset::new(10.0, 10.0, -10.0, -30.0);

/// Bug species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    Red,
    Green,
    Yellow,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Red, Species::Green, Species::Yellow];

    pub fn sprite_key(&self) -> &'static str {
        match self {
            Species::Red => "enemy-bug",
            Species::Green => "enemy-bug-green",
            Species::Yellow => "enemy-bug-yellow",
        }
    }

    pub fn min_speed(&self) -> f32 {
        match self {
            Species::Red => 25.0,
            Species::Green => 45.0,
            Species::Yellow => 50.0,
        }
    }

    pub fn max_speed(&self) -> f32 {
        match self {
            Species::Red => 50.0,
            Species::Green => 75.0,
            Species::Yellow => 100.0,
        }
    }

    /// Upper clamp, allowing some overspeed from bumps
    pub fn speed_cap(&self) -> f32 {
        self.max_speed() * ENEMY_OVERSPEED_FACTOR
    }
}

/// A roaming bug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub offset: Offset,
    pub species: Species,
    pub speed: f32,
    pub lane: u32,
}

impl Enemy {
    /// Fresh enemy with rolled species, speed and lane
    pub fn spawn(rng: &mut impl Rng, table: &LevelTable, lanes: &[u32]) -> Self {
        let species = Species::ALL[rng.random_range(0..Species::ALL.len())];
        let speed = species.min_speed() + species.max_speed() * rng.random::<f32>();
        let mut enemy = Self {
            body: Body::new(Vec2::ZERO, ENEMY_SIZE),
            offset: ENEMY_OFFSET,
            species,
            speed,
            lane: 0,
        };
        enemy.clamp_speed();
        enemy.reset(rng, table, lanes);
        enemy
    }

    /// Back to the start line on a random lane
    pub fn reset(&mut self, rng: &mut impl Rng, table: &LevelTable, lanes: &[u32]) {
        self.lane = lanes[rng.random_range(0..lanes.len())];
        self.body.pos = Vec2::new(-table.world_width, table.lane_y(self.lane));
    }

    pub fn clamp_speed(&mut self) {
        self.speed = self
            .speed
            .clamp(self.species.min_speed(), self.species.speed_cap());
    }

    /// Clamp speed, move right, wrap once past the far edge
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng, table: &LevelTable, lanes: &[u32]) {
        self.clamp_speed();
        self.body.pos.x += self.speed * dt;
        if self.body.pos.x > table.world_width * ENEMY_WRAP_FACTOR {
            self.reset(rng, table, lanes);
        }
    }
}

// ---------------------------------------------------------------------------
// Boss
// ---------------------------------------------------------------------------

const BOSS_SIZE: Vec2 = Vec2::new(120.0, 100.0);
const BOSS_OFFSET: Offset = Offset::new(10.0, 10.0, -15.0, -30.0);

/// The big bug. Sleeps until the buddy is rescued, then chases forever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub body: Body,
    pub offset: Offset,
    pub spawn: Vec2,
    pub is_sleeping: bool,
    pub is_chasing: bool,
    /// Seconds simulated; drives the sleep bubble animation
    pub alive_time: f32,
    pub last_x: f32,
    pub facing_left: bool,
}

impl Boss {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            body: Body::new(spawn, BOSS_SIZE),
            offset: BOSS_OFFSET,
            spawn,
            is_sleeping: true,
            is_chasing: false,
            alive_time: 0.0,
            last_x: spawn.x,
            facing_left: false,
        }
    }

    /// Start chasing. Returns true only on the first call.
    pub fn awake(&mut self) -> bool {
        let woke = self.is_sleeping;
        self.is_sleeping = false;
        self.is_chasing = true;
        woke
    }

    /// Back to the level start position (still chasing if awake)
    pub fn reset(&mut self) {
        self.body.pos = self.spawn;
        self.last_x = self.spawn.x;
    }

    /// Close `chase_factor` of the gap to `target` each tick
    pub fn update(&mut self, dt: f32, target: Vec2, chase_factor: f32) {
        self.alive_time += dt;
        self.last_x = self.body.pos.x;
        if self.is_chasing {
            self.body.pos += (target - self.body.pos) * chase_factor;
        }
        if self.body.pos.x != self.last_x {
            self.facing_left = self.body.pos.x < self.last_x;
        }
    }

    /// Sleep bubble frame (0..3), advancing once per second
    pub fn sleep_frame(&self) -> u32 {
        (self.alive_time.max(0.0) as u32) % 3
    }
}

// ---------------------------------------------------------------------------
// Buddy
// ---------------------------------------------------------------------------

const BUDDY_SIZE: Vec2 = Vec2::new(70.0, 80.0);

/// The friend to rescue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buddy {
    pub body: Body,
    pub offset: Offset,
    pub sprite: String,
    pub is_paired: bool,
}

impl Buddy {
    pub fn new(sprite: &str, pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, BUDDY_SIZE),
            offset: Offset::default(),
            sprite: sprite.to_string(),
            is_paired: false,
        }
    }

    /// Mark as paired. Returns true only on the first call.
    pub fn pair(&mut self) -> bool {
        let fresh = !self.is_paired;
        self.is_paired = true;
        fresh
    }
}

// ---------------------------------------------------------------------------
// Loot
// ---------------------------------------------------------------------------

const LOOT_SIZE: Vec2 = Vec2::new(75.0, 85.0);
const LOOT_OFFSET: Offset = Offset::new(5.0, 10.0, -10.0, -10.0);

/// Collectible item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LootKind {
    Heart,
    Star,
    BlueGem,
    GreenGem,
    OrangeGem,
    Key,
    /// Any name this build does not know; worth nothing
    #[serde(other)]
    Unknown,
}

impl LootKind {
    pub fn points(&self) -> u32 {
        match self {
            LootKind::Key => 500,
            LootKind::BlueGem => 200,
            LootKind::GreenGem => 250,
            LootKind::OrangeGem => 300,
            LootKind::Star => 500,
            LootKind::Heart => 500,
            LootKind::Unknown => 0,
        }
    }

    pub fn sprite_key(&self) -> &'static str {
        match self {
            LootKind::Heart => "heart",
            LootKind::Star => "star",
            LootKind::BlueGem => "gem-blue",
            LootKind::GreenGem => "gem-green",
            LootKind::OrangeGem => "gem-orange",
            LootKind::Key => "key",
            LootKind::Unknown => "unknown",
        }
    }
}

/// A collectible on the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loot {
    pub body: Body,
    pub offset: Offset,
    pub kind: LootKind,
    pub points: u32,
    pub collected: bool,
    pub spawn_time: f32,
    /// Seconds after spawning before the item is drawn
    pub visibility_delay: f32,
}

impl Loot {
    pub fn new(kind: LootKind, pos: Vec2, now: f32, visibility_delay: f32) -> Self {
        Self {
            body: Body::new(pos, LOOT_SIZE),
            offset: LOOT_OFFSET,
            kind,
            points: kind.points(),
            collected: false,
            spawn_time: now,
            visibility_delay,
        }
    }

    /// Mark collected; yields the points only on the first call
    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.points)
    }

    /// Whether the renderer should draw this item at `now`
    pub fn is_visible(&self, now: f32) -> bool {
        !self.collected
            && self.kind != LootKind::Unknown
            && now >= self.spawn_time + self.visibility_delay
    }
}
