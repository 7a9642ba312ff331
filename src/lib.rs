//! Sweep Shooter - a small arcade shooter
//!
//! Core modules:
//! - `entities`: plain data (player, projectiles, adversaries, session flags)
//! - `store`: append-only entity storage with doubling growth
//! - `compute`: the per-tick simulation (spawn, motion, collisions, bounds)
//! - `rules`: optional win/loss hooks fed by tick events
//! - `config`: static tuning loaded from JSON

pub mod compute;
pub mod config;
pub mod entities;
pub mod rules;
pub mod store;

pub use compute::{tick, TickInput};
pub use config::GameConfig;
pub use entities::{GameEvent, GameState, ScreenMode};
pub use store::EntityStore;
