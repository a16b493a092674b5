//! Bugz! headless runner
//!
//! Loads settings and an optional level table, then plays one scripted run
//! through the simulation with a logging renderer and records the result on
//! the local leaderboard.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;

use bugz::consts::{GRID_HEIGHT, GRID_WIDTH, SIM_DT};
use bugz::highscores::format_age;
use bugz::input::CommandQueue;
use bugz::render::{Frame, Overlay, Renderer};
use bugz::sim::{Command, Direction, GameEvent, GameState, LevelTable, Loot, LootKind, tick};
use bugz::{HighScores, Settings, Tuning};

/// Ticks between autoplay decisions
const THINK_EVERY: u64 = 15;
/// Ticks between HUD log lines
const HUD_EVERY: u64 = 300;

#[derive(Parser, Debug)]
#[command(name = "bugz")]
#[command(about = "Headless Bugz! run: scripted autoplay with a logging renderer")]
struct Cli {
    /// Level table JSON (defaults to the built-in classic levels)
    levels: Option<PathBuf>,

    /// Settings JSON; missing or broken files fall back to defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Balance tuning JSON; unset fields keep their defaults
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// High score file to read and update
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Simulated seconds before the run is cut off
    #[arg(long, default_value_t = 180.0)]
    seconds: f32,
}

/// Logs HUD lines and overlay changes
#[derive(Default)]
struct LogRenderer {
    frames: u64,
    last_overlay: Option<Overlay>,
}

impl Renderer for LogRenderer {
    fn present(&mut self, frame: &Frame) {
        if frame.overlay != self.last_overlay {
            if let Some(overlay) = frame.overlay {
                match overlay.prompt() {
                    Some(prompt) => log::info!("== {} == {}", overlay.headline(), prompt),
                    None => log::info!("== {} ==", overlay.headline()),
                }
            }
            self.last_overlay = frame.overlay;
        }

        if self.frames % HUD_EVERY == 0 {
            let hud = &frame.hud;
            log::info!(
                "score {:>5}  level {}  lives {}  time {}",
                hud.score,
                hud.level,
                hud.lives,
                hud.clock.as_deref().unwrap_or("-")
            );
        }
        for bubble in &frame.bubbles {
            log::trace!("\"{}\" at {:?}", bubble.text, bubble.anchor);
        }
        self.frames += 1;
    }
}

/// Greedy walker: fetch the buddy, then the key, dodging nothing
fn autoplay(state: &GameState) -> Option<Direction> {
    let target = if !state.buddy.is_paired {
        state.buddy.body.pos
    } else {
        let now = state.game_time;
        let pos = state.player.body.pos;
        state
            .loot
            .iter()
            .filter(|l| l.is_visible(now))
            .min_by(|a, b| {
                let rank = |l: &Loot| (l.kind != LootKind::Key, l.body.pos.distance(pos));
                let (ka, da) = rank(*a);
                let (kb, db) = rank(*b);
                ka.cmp(&kb).then(da.total_cmp(&db))
            })
            .map(|l| l.body.pos)?
    };

    let delta = target - state.player.body.pos;
    if delta.x.abs() > GRID_WIDTH / 2.0 {
        Some(if delta.x < 0.0 { Direction::Left } else { Direction::Right })
    } else if delta.y.abs() > GRID_HEIGHT / 2.0 {
        Some(if delta.y < 0.0 { Direction::Up } else { Direction::Down })
    } else {
        None
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn load_tuning(path: &Path) -> anyhow::Result<Tuning> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing tuning {}", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.settings.as_deref());
    let table = match &cli.levels {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading levels {}", path.display()))?;
            LevelTable::from_json(&json)
                .with_context(|| format!("loading levels {}", path.display()))?
        }
        None => LevelTable::classic(),
    };
    let tuning = match &cli.tuning {
        Some(path) => load_tuning(path)?,
        None => Tuning::default(),
    };
    log::info!(
        "{} levels, {} sprites to preload",
        table.max_level(),
        bugz::render::sprite_manifest(&table).len()
    );

    let mut state = GameState::new(table, tuning, settings.seed)?;
    let mut scores = cli
        .scores
        .as_deref()
        .map(HighScores::load)
        .unwrap_or_default();
    if let Some(best) = scores.top_score() {
        log::info!("Score to beat: {}", best);
    }

    let mut queue = CommandQueue::new();
    let mut renderer = LogRenderer::default();
    let limit = (cli.seconds.max(0.0) / SIM_DT) as u64;

    queue.push(Command::Confirm);
    for n in 0..limit {
        if n % THINK_EVERY == 0 && queue.is_empty() {
            if let Some(dir) = autoplay(&state) {
                queue.push(Command::Move(dir));
            }
        }

        tick(&mut state, &queue.next_input(), SIM_DT);
        renderer.present(&Frame::capture(&state, &settings));

        let mut finished = None;
        for event in state.drain_events() {
            log::debug!("{:?}", event);
            match event {
                GameEvent::GameOver { score, level } => finished = Some((score, level)),
                GameEvent::Complete { score } => finished = Some((score, state.level)),
                _ => {}
            }
        }
        if let Some((score, level)) = finished {
            if let Some(rank) = scores.add_score(score, level, unix_now()) {
                log::info!("Rank #{} on the leaderboard", rank);
            }
            break;
        }
    }

    log::info!(
        "Run over: {:?}, score {}, level {}/{}",
        state.phase,
        state.score,
        state.level,
        state.max_level()
    );

    let now = unix_now();
    for (i, entry) in scores.entries.iter().enumerate() {
        log::info!(
            "#{:<2} {:>6}  level {}  {}",
            i + 1,
            entry.score,
            entry.level,
            format_age(entry.timestamp, now)
        );
    }

    if let Some(path) = &cli.scores {
        scores
            .save(path)
            .with_context(|| format!("saving high scores {}", path.display()))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Bugz! starting...");
    run(cli)
}
