//! Configuration for the game world and the evolution run

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// WINDOW & TIMING
// ============================================================================

/// Window width in pixels
pub const WIN_WIDTH: f32 = 500.0;

/// Window height in pixels
pub const WIN_HEIGHT: f32 = 800.0;

/// Y coordinate of the ground (top edge of the base)
pub const FLOOR: f32 = 730.0;

/// Simulation ticks per second
pub const TICK_RATE_HZ: f64 = 30.0;

// ============================================================================
// BIRD
// ============================================================================

/// Spawn position of every bird at round start
pub const BIRD_START_X: i32 = 230;
pub const BIRD_START_Y: f32 = 350.0;

/// Bird sprite size
pub const BIRD_WIDTH: u32 = 68;
pub const BIRD_HEIGHT: u32 = 48;

/// Velocity set by a jump (negative is up)
pub const JUMP_VELOCITY: f32 = -10.5;

/// Quadratic coefficient of the displacement formula
pub const GRAVITY: f32 = 1.5;

/// Maximum downward displacement per tick
pub const MAX_FALL_SPEED: f32 = 16.0;

/// Extra upward displacement applied while rising
pub const RISE_BOOST: f32 = 2.0;

/// Nose-up tilt limit in degrees
pub const MAX_ROTATION: f32 = 25.0;

/// Nose-down tilt limit in degrees
pub const MIN_ROTATION: f32 = -90.0;

/// Tilt decay per tick while falling
pub const ROT_VEL: f32 = 20.0;

/// Birds keep their nose up until they drop this far below their jump height
pub const TILT_HOLD_MARGIN: f32 = 50.0;

/// Ticks each wing frame is shown
pub const ANIMATION_TIME: u32 = 5;

/// At or below this tilt the wings stop flapping
pub const DIVE_TILT: f32 = -80.0;

// ============================================================================
// PIPES & BASE
// ============================================================================

/// Pipe sprite size
pub const PIPE_WIDTH: u32 = 104;
pub const PIPE_HEIGHT: u32 = 640;

/// Vertical gap between top and bottom pipe
pub const PIPE_GAP: f32 = 200.0;

/// Horizontal pixels scrolled per tick (pipes and base share it)
pub const SCROLL_VELOCITY: f32 = 5.0;

/// Range the gap top is drawn from (upper bound exclusive)
pub const PIPE_MIN_HEIGHT: i32 = 50;
pub const PIPE_MAX_HEIGHT: i32 = 450;

/// X of the first pipe in a round
pub const FIRST_PIPE_X: f32 = 700.0;

/// X of every pipe spawned after a pass
pub const SPAWN_PIPE_X: f32 = 600.0;

/// Base sprite size
pub const BASE_WIDTH: u32 = 672;
pub const BASE_HEIGHT: u32 = 224;

// ============================================================================
// FITNESS
// ============================================================================

/// Fitness added to each living genome every tick
pub const SURVIVAL_REWARD: f32 = 0.1;

/// Fitness removed from a genome whose bird hits a pipe
pub const COLLISION_PENALTY: f32 = 1.0;

/// Fitness added to every living genome when a pipe is passed
pub const PIPE_REWARD: f32 = 5.0;

/// Network output above which the bird jumps
pub const JUMP_THRESHOLD: f32 = 0.5;

/// Network inputs: bird y, distance to gap top, distance to gap bottom
pub const NETWORK_INPUTS: usize = 3;

// ============================================================================
// EVOLUTION
// ============================================================================

/// Hyperparameters of the evolution run, loaded from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: u32,
    pub hidden_nodes: usize,
    pub elitism: usize,
    pub survival_threshold: f32,
    pub weight_mutate_rate: f32,
    pub weight_mutate_power: f32,
    pub weight_replace_rate: f32,
    /// A round ends early once this many pipes are passed
    pub score_limit: Option<u32>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 50,
            hidden_nodes: 0,
            elitism: 2,
            survival_threshold: 0.2,
            weight_mutate_rate: 0.8,
            weight_mutate_power: 0.5,
            weight_replace_rate: 0.1,
            score_limit: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Validation(String),
}

impl EvolutionConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EvolutionConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::Validation(
                "population_size must be at least 1".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(ConfigError::Validation(
                "generations must be at least 1".to_string(),
            ));
        }
        if self.elitism > self.population_size {
            return Err(ConfigError::Validation(format!(
                "elitism ({}) exceeds population_size ({})",
                self.elitism, self.population_size
            )));
        }
        if !(self.survival_threshold > 0.0 && self.survival_threshold <= 1.0) {
            return Err(ConfigError::Validation(
                "survival_threshold must be in (0, 1]".to_string(),
            ));
        }
        for (name, rate) in [
            ("weight_mutate_rate", self.weight_mutate_rate),
            ("weight_replace_rate", self.weight_replace_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ConfigError::Validation(format!("{name} must be in [0, 1]")));
            }
        }
        Ok(())
    }
}
