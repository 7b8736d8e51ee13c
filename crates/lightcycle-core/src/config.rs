use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::{ConfigError, CoreResult};
use crate::match_state::{MatchState, Rider};
use crate::player::{Player, PlayerColor, Point, Spawn};
use crate::trail::Trail;

/// Environment variable naming a config file to load.
pub const CONFIG_ENV_VAR: &str = "LIGHTCYCLE_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lightcycle.toml";
/// Smallest speed that still moves a rider to a new 0.1 lattice cell each tick.
pub const MIN_SPEED: f64 = 0.1;

/// Per-rider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub name: String,
    pub start_position: (f64, f64),
    pub color: PlayerColor,
    pub width: u32,
    pub direction: Direction,
    pub speed: f64,
}

/// Data-driven configuration for a duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena_width: f64,
    pub arena_height: f64,
    pub trail_width: u32,
    pub trail_max_length: usize,
    /// Target ticks per second.
    pub frame_rate: u32,
    /// How long the host keeps the final frame on screen.
    pub game_over_linger_ms: u64,
    pub background_color: PlayerColor,
    pub player_one: PlayerConfig,
    pub player_two: PlayerConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: 1024.0,
            arena_height: 720.0,
            trail_width: 5,
            trail_max_length: 1000,
            frame_rate: 120,
            game_over_linger_ms: 1500,
            background_color: PlayerColor::BLACK,
            player_one: PlayerConfig {
                name: "Green Rider".to_string(),
                start_position: (256.0, 360.0),
                color: PlayerColor::GREEN,
                width: 10,
                direction: Direction::Up,
                speed: 0.3,
            },
            player_two: PlayerConfig {
                name: "Red Rider".to_string(),
                start_position: (768.0, 360.0),
                color: PlayerColor::RED,
                width: 10,
                direction: Direction::Up,
                speed: 0.3,
            },
        }
    }
}

impl GameConfig {
    /// Load config from `LIGHTCYCLE_CONFIG` or `lightcycle.toml`, falling back to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            match Self::from_path(&path) {
                Ok(config) => {
                    tracing::info!(%path, "Loaded configuration from {CONFIG_ENV_VAR}");
                    return config;
                },
                Err(e) => tracing::warn!(%path, "Ignoring {CONFIG_ENV_VAR}: {e}"),
            }
        }
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            match Self::from_path(DEFAULT_CONFIG_FILE) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {DEFAULT_CONFIG_FILE}");
                    return config;
                },
                Err(e) => tracing::warn!("Failed to load {DEFAULT_CONFIG_FILE}: {e}, using defaults"),
            }
        } else {
            tracing::info!("No {DEFAULT_CONFIG_FILE} found, using defaults");
        }
        Self::default()
    }

    /// Read, parse and validate a config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate TOML text. Missing keys take their default values.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.arena_width) || !is_positive(self.arena_height) {
            return Err(ConfigError::Invalid(format!(
                "arena must have finite positive dimensions, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        if self.trail_max_length == 0 {
            return Err(ConfigError::Invalid(
                "trail_max_length must be > 0".to_string(),
            ));
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid("frame_rate must be > 0".to_string()));
        }
        if self.player_one.name == self.player_two.name {
            return Err(ConfigError::Invalid(format!(
                "both players are named \"{}\"",
                self.player_one.name
            )));
        }
        for player in [&self.player_one, &self.player_two] {
            self.validate_player(player)?;
        }
        Ok(())
    }

    fn validate_player(&self, player: &PlayerConfig) -> Result<(), ConfigError> {
        let name = &player.name;
        if player.width == 0 {
            return Err(ConfigError::Invalid(format!("{name}: width must be > 0")));
        }
        if !player.speed.is_finite() || player.speed < MIN_SPEED {
            return Err(ConfigError::Invalid(format!(
                "{name}: speed {} must be a finite value of at least {MIN_SPEED}",
                player.speed
            )));
        }
        // A step as long as the body could jump over a trail cell.
        if player.speed >= f64::from(player.width) {
            return Err(ConfigError::Invalid(format!(
                "{name}: speed {} must be below the width {}",
                player.speed, player.width
            )));
        }
        let r = f64::from(player.width) / 2.0;
        let (x, y) = player.start_position;
        if x < r || y < r || x > self.arena_width - r || y > self.arena_height - r {
            return Err(ConfigError::Invalid(format!(
                "{name}: start position ({x}, {y}) puts the body outside the arena"
            )));
        }
        Ok(())
    }

    /// Arena `(width, height)`.
    pub fn board_size(&self) -> (f64, f64) {
        (self.arena_width, self.arena_height)
    }

    /// Build a fresh running match with seeded trails.
    pub fn build_match_state(&self) -> CoreResult<MatchState> {
        MatchState::new(
            self.build_rider(&self.player_one),
            self.build_rider(&self.player_two),
        )
    }

    fn build_rider(&self, config: &PlayerConfig) -> Rider {
        let player = Player::new(
            config.name.clone(),
            Spawn {
                position: Point::from(config.start_position),
                direction: config.direction,
            },
            config.color,
            config.width,
            config.speed,
        );
        let mut rider = Rider::new(
            player,
            Trail::new(self.trail_max_length, self.trail_width),
        );
        rider.seed();
        rider
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
