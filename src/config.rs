//! Static game configuration
//!
//! Everything here is read once at startup. The simulation only sees
//! `SimConfig`; the rest is for the terminal front end.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file when no CLI path is given.
pub const CONFIG_ENV: &str = "SHOOTER_CONFIG";

/// What happens to a live projectile that leaves the play area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutOfBoundsPolicy {
    /// Keep it live and top up projectile storage.
    #[default]
    Reserve,
    /// Deactivate it.
    Cull,
}

/// What an adversary costs the player when it rams the ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlayerHitPenalty {
    /// One point of score.
    #[default]
    Score,
    /// One life.
    Life,
}

/// Which `GameRules` implementation judges the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RulesKind {
    #[default]
    OpenEnded,
    /// Ends the run through lives (needs the `Life` hit penalty) or through
    /// `breach_ends_game`; `validate` rejects a setup with neither.
    LastStand,
}

/// Simulation tuning, in presentation units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub player_step: i32,
    pub gravity: f32,
    pub player_launch_vel: f32,

    pub projectile_offset_x: i32,
    pub projectile_size: i32,
    pub projectile_velocity: i32,
    /// Intrinsic sprite size, scaled by `projectile_scale` for the hitbox.
    pub projectile_sprite: (i32, i32),
    pub projectile_scale: f32,

    pub adversary_spawn_y: i32,
    pub adversary_width: i32,
    pub adversary_height: i32,
    pub adversary_velocity: i32,
    pub adversary_step_down: i32,

    /// Extra projectile slots reserved when one leaves the play area.
    pub storage_top_up: usize,
    pub out_of_bounds: OutOfBoundsPolicy,
    pub player_hit_penalty: PlayerHitPenalty,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_step: 10,
            gravity: 0.5,
            player_launch_vel: -0.5,

            projectile_offset_x: 10,
            projectile_size: 10,
            projectile_velocity: 10,
            projectile_sprite: (3, 6),
            projectile_scale: 10.0,

            adversary_spawn_y: 100,
            adversary_width: 150,
            adversary_height: 50,
            adversary_velocity: 3,
            adversary_step_down: 50,

            storage_top_up: 20,
            out_of_bounds: OutOfBoundsPolicy::Reserve,
            player_hit_penalty: PlayerHitPenalty::Score,
        }
    }
}

impl SimConfig {
    /// Projectile hitbox size: sprite size times the draw scale.
    pub fn projectile_hitbox(&self) -> (i32, i32) {
        let (w, h) = self.projectile_sprite;
        (
            (w as f32 * self.projectile_scale) as i32,
            (h as f32 * self.projectile_scale) as i32,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Play area in presentation units.
    pub width: i32,
    pub height: i32,
    pub target_fps: u32,
    pub starting_lives: u32,
    pub rules: RulesKind,
    /// `LastStand` only: an adversary reaching the bottom ends the run.
    pub breach_ends_game: bool,
    pub start_muted: bool,
    /// Log file; logging stays off without it unless `RUST_LOG` is set.
    pub log_file: Option<PathBuf>,
    pub sim: SimConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 960,
            height: 572,
            target_fps: 60,
            starting_lives: 3,
            rules: RulesKind::OpenEnded,
            breach_ends_game: false,
            start_muted: false,
            log_file: None,
            sim: SimConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid game config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// CLI path first, then `SHOOTER_CONFIG`, then defaults.
    pub fn resolve(cli_path: Option<PathBuf>) -> Result<Self> {
        let path = cli_path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings the simulation can't work with.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.width > 0, "width must be positive");
        anyhow::ensure!(self.sim.adversary_width > 0, "adversary_width must be positive");
        anyhow::ensure!(self.sim.adversary_height > 0, "adversary_height must be positive");
        anyhow::ensure!(
            self.width > self.sim.adversary_width,
            "width {} must exceed adversary width {}",
            self.width,
            self.sim.adversary_width
        );
        anyhow::ensure!(self.height > 0, "height must be positive");
        anyhow::ensure!(self.target_fps > 0, "target_fps must be positive");
        if self.sim.player_hit_penalty == PlayerHitPenalty::Life {
            anyhow::ensure!(
                self.starting_lives > 0,
                "starting_lives must be positive with the life penalty"
            );
        }
        if self.rules == RulesKind::LastStand {
            anyhow::ensure!(
                self.sim.player_hit_penalty == PlayerHitPenalty::Life || self.breach_ends_game,
                "last_stand needs player_hit_penalty \"life\" or breach_ends_game"
            );
        }
        Ok(())
    }

    /// Duration of one frame at the target rate.
    pub fn frame(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.target_fps.max(1)
    }
}
