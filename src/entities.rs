//! All game entity types — pure data, no logic beyond constructors and hitboxes.

use crate::config::{GameConfig, SimConfig};
use crate::store::{EntityStore, Live};

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in presentation units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hitbox {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Hitbox {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap: rectangles that only share an edge don't collide.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x.saturating_add(other.w)
            && self.x.saturating_add(self.w) > other.x
            && self.y < other.y.saturating_add(other.h)
            && self.y.saturating_add(self.h) > other.y
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenMode {
    Start,
    Config,
    Game,
    GameOver,
    GameWon,
    GameLost,
    GameRunning,
    GameFinished,
}

impl ScreenMode {
    /// Modes that end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScreenMode::GameOver
                | ScreenMode::GameWon
                | ScreenMode::GameLost
                | ScreenMode::GameFinished
        )
    }
}

/// Flags the presentation layer reads to pick a screen.
#[derive(Clone, Debug)]
pub struct Session {
    pub mode: ScreenMode,
    pub started: bool,
    pub paused: bool,
    pub muted: bool,
}

impl Session {
    pub fn new(muted: bool) -> Self {
        Self {
            mode: ScreenMode::Start,
            started: false,
            paused: false,
            muted,
        }
    }

    /// Ticks only advance while this holds.
    pub fn is_ticking(&self) -> bool {
        self.started && !self.paused
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: i32,
    pub y: i32,
    pub size: i32,
    /// Subtracted from `y` every tick.
    pub velocity: i32,
    pub alive: bool,
}

impl Live for Projectile {
    fn is_alive(&self) -> bool {
        self.alive
    }
}

// ── Adversaries ──────────────────────────────────────────────────────────────

/// Tag fixed at spawn time from the spawn ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdversaryKind {
    Vanguard,
    Flanker,
    Captain,
    Grunt,
}

impl AdversaryKind {
    pub fn for_ordinal(ordinal: u64) -> Self {
        match ordinal {
            0 => AdversaryKind::Vanguard,
            1 => AdversaryKind::Flanker,
            3 => AdversaryKind::Captain,
            _ => AdversaryKind::Grunt,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Adversary {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Added to `x` every tick; sign flips at either side.
    pub velocity: i32,
    pub kind: AdversaryKind,
    pub alive: bool,
}

impl Adversary {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.width, self.height)
    }
}

impl Live for Adversary {
    fn is_alive(&self) -> bool {
        self.alive
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub lives: u32,
    /// Unused by the simulation.
    pub vel_x: f32,
    pub vel_y: f32,
}

impl Player {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.x, self.y, self.width, self.height)
    }
}

// ── Tick events ──────────────────────────────────────────────────────────────

/// Things that happened during one tick, in the order they happened.
/// Indices refer to the projectile / adversary stores.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A fire input spawned this pair; presentation plays the fire cue.
    Fired { projectile: usize, adversary: usize },
    ProjectileHit { projectile: usize, adversary: usize },
    PlayerHit { adversary: usize },
    ProjectileOutOfBounds { projectile: usize },
    AdversaryBounced { adversary: usize },
    AdversaryReachedBottom { adversary: usize },
    LivesExhausted,
    Paused,
    Resumed,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The whole simulation context.  One instance per session, passed by
/// `&mut` into every tick.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub projectiles: EntityStore<Projectile>,
    pub adversaries: EntityStore<Adversary>,
    pub score: i64,
    pub session: Session,
    /// Play area in presentation units.
    pub width: i32,
    pub height: i32,
    pub sim: SimConfig,
    /// Adversaries spawned so far; feeds `AdversaryKind::for_ordinal`.
    pub spawned: u64,
    pub frame: u64,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        let (width, height) = (config.width, config.height);
        GameState {
            player: Player {
                x: width / 2,
                y: height / 2,
                width: (width as f32 * 0.1) as i32,
                height: (height as f32 * 0.1) as i32,
                lives: config.starting_lives,
                vel_x: 0.0,
                vel_y: config.sim.player_launch_vel,
            },
            projectiles: EntityStore::new(),
            adversaries: EntityStore::new(),
            score: 0,
            session: Session::new(config.start_muted),
            width,
            height,
            sim: config.sim.clone(),
            spawned: 0,
            frame: 0,
        }
    }

    pub fn projectile_hitbox(&self, projectile: &Projectile) -> Hitbox {
        let (w, h) = self.sim.projectile_hitbox();
        Hitbox::new(projectile.x, projectile.y, w, h)
    }
}
