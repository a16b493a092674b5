//! Data-driven game balance
//!
//! Timers and rule constants that shape difficulty. Kept separate from the
//! level table so a balance pass never has to touch level layouts.

use serde::{Deserialize, Serialize};

/// Balance knobs read by the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Largest frame delta accepted by `tick` (seconds)
    pub max_dt: f32,
    /// How long the "Oops" fail phase lasts before play resumes
    pub fail_delay: f32,
    /// How long the level banner shows before play resumes
    pub level_up_delay: f32,
    /// Star power duration
    pub invincibility_duration: f32,
    /// Speech bubble lifetime
    pub speech_duration: f32,
    /// Game time between enemy spawn attempts
    pub enemy_spawn_interval: f32,
    /// Horizontal padding for enemy/enemy bump checks
    pub enemy_bump_proximity: f32,
    /// Boss closes `(1 / chase_speed)^2` of the gap per tick
    pub boss_chase_speed: f32,
    /// Loot stays hidden for up to `points / loot_delay_divisor` seconds
    pub loot_delay_divisor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            fail_delay: 1.0,
            level_up_delay: 2.0,
            invincibility_duration: 3.5,
            speech_duration: 2.0,
            enemy_spawn_interval: 5.0,
            enemy_bump_proximity: 80.0,
            boss_chase_speed: 20.0,
            loot_delay_divisor: 250.0,
        }
    }
}

impl Tuning {
    /// Per-tick fraction of the gap the chasing boss closes
    pub fn boss_chase_factor(&self) -> f32 {
        (1.0 / self.boss_chase_speed).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{ "fail_delay": 0.5 }"#).unwrap();
        assert_eq!(tuning.fail_delay, 0.5);
        assert_eq!(tuning.level_up_delay, 2.0);
        assert_eq!(tuning.max_dt, 0.1);
    }

    #[test]
    fn test_chase_factor() {
        let tuning = Tuning::default();
        assert!((tuning.boss_chase_factor() - 0.0025).abs() < 1e-6);
    }
}
