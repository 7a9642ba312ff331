//! Game-logic functions.
//!
//! Every function takes the single `GameState` by `&mut` and mutates it in
//! place; nothing here touches the terminal.  Randomness comes in through an
//! injected RNG so tests can seed it.

use log::{debug, info};
use rand::Rng;

use crate::config::{OutOfBoundsPolicy, PlayerHitPenalty};
use crate::entities::{Adversary, AdversaryKind, GameEvent, GameState, Projectile, ScreenMode};

/// Discrete input signals for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held.
    pub move_left: bool,
    /// Held.
    pub move_right: bool,
    /// Pressed this frame.
    pub fire: bool,
    /// Pressed this frame.
    pub pause_toggle: bool,
}

// ── Session transitions ──────────────────────────────────────────────────────

pub fn start_game(state: &mut GameState) {
    state.session.started = true;
    state.session.paused = false;
    state.session.mode = ScreenMode::Game;
    info!("game started");
}

pub fn open_config(state: &mut GameState) {
    state.session.mode = ScreenMode::Config;
}

/// Leave the controls screen.  Does nothing from any other mode.
pub fn back_to_menu(state: &mut GameState) {
    if state.session.mode == ScreenMode::Config {
        state.session.mode = ScreenMode::Start;
    }
}

pub fn toggle_mute(state: &mut GameState) {
    state.session.muted = !state.session.muted;
}

/// Flip the pause flag.  Only meaningful once the game has started.
pub fn toggle_pause(state: &mut GameState) -> Option<GameEvent> {
    if !state.session.started {
        return None;
    }
    state.session.paused = !state.session.paused;
    if state.session.paused {
        info!("paused at frame {}", state.frame);
        Some(GameEvent::Paused)
    } else {
        info!("resumed at frame {}", state.frame);
        Some(GameEvent::Resumed)
    }
}

// ── Player input ─────────────────────────────────────────────────────────────

pub fn move_player_left(state: &mut GameState) {
    state.player.x = (state.player.x - state.sim.player_step).max(0);
}

pub fn move_player_right(state: &mut GameState) {
    let limit = state.width - state.player.width;
    state.player.x = (state.player.x + state.sim.player_step).min(limit);
}

// ── Spawner ──────────────────────────────────────────────────────────────────

/// Spawn one projectile from the ship and one adversary at the top.
/// Firing always produces the pair.
pub fn fire(state: &mut GameState, rng: &mut impl Rng) -> GameEvent {
    let sim = &state.sim;
    let projectile = Projectile {
        x: state.player.x + sim.projectile_offset_x,
        y: state.player.y,
        size: sim.projectile_size,
        velocity: sim.projectile_velocity,
        alive: true,
    };
    let adversary = Adversary {
        x: rng.gen_range(0..state.width),
        y: sim.adversary_spawn_y,
        width: sim.adversary_width,
        height: sim.adversary_height,
        velocity: sim.adversary_velocity,
        kind: AdversaryKind::for_ordinal(state.spawned),
        alive: true,
    };
    debug!(
        "fire: projectile at ({}, {}), {:?} at x={}",
        projectile.x, projectile.y, adversary.kind, adversary.x
    );

    let projectile = state.projectiles.append(projectile);
    let adversary = state.adversaries.append(adversary);
    state.spawned += 1;
    GameEvent::Fired {
        projectile,
        adversary,
    }
}

// ── Motion integrator ────────────────────────────────────────────────────────

/// Move every live entity one step and let the ship settle under gravity.
pub fn integrate(state: &mut GameState) {
    for projectile in state.projectiles.iter_mut().filter(|p| p.alive) {
        projectile.y = projectile.y.saturating_sub(projectile.velocity);
    }
    for adversary in state.adversaries.iter_mut().filter(|a| a.alive) {
        adversary.x = adversary.x.saturating_add(adversary.velocity);
    }
    settle_player(state);
}

/// Constant-gravity fall of the ship, resting on the floor.
fn settle_player(state: &mut GameState) {
    let player = &mut state.player;
    player.y = (player.y as f32 + player.vel_y) as i32;
    player.vel_y += state.sim.gravity;
    if player.y + player.height >= state.height {
        player.y = state.height - player.height;
        player.vel_y = 0.0;
    }
}

// ── Collision resolver ───────────────────────────────────────────────────────

/// Projectiles against adversaries, then the ship against adversaries.
pub fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    // Each projectile takes at most one adversary: the first in store order.
    for pi in 0..state.projectiles.count() {
        let Some(projectile) = state.projectiles.get(pi).filter(|p| p.alive) else {
            continue;
        };
        let shot = state.projectile_hitbox(projectile);
        let target = state
            .adversaries
            .iter_live()
            .find(|(_, a)| a.hitbox().overlaps(&shot))
            .map(|(ai, _)| ai);

        if let Some(ai) = target {
            deactivate_projectile(state, pi);
            deactivate_adversary(state, ai);
            state.score += 1;
            debug!("projectile {} hit adversary {}, score {}", pi, ai, state.score);
            events.push(GameEvent::ProjectileHit {
                projectile: pi,
                adversary: ai,
            });
        }
    }

    let ship = state.player.hitbox();
    let rammed: Vec<usize> = state
        .adversaries
        .iter_live()
        .filter(|(_, a)| a.hitbox().overlaps(&ship))
        .map(|(ai, _)| ai)
        .collect();

    for ai in rammed {
        deactivate_adversary(state, ai);
        events.push(GameEvent::PlayerHit { adversary: ai });
        match state.sim.player_hit_penalty {
            PlayerHitPenalty::Score => state.score -= 1,
            PlayerHitPenalty::Life => {
                let before = state.player.lives;
                state.player.lives = before.saturating_sub(1);
                if before == 1 {
                    events.push(GameEvent::LivesExhausted);
                }
            }
        }
        debug!("adversary {} rammed the ship", ai);
    }
}

fn deactivate_projectile(state: &mut GameState, index: usize) {
    if let Some(p) = state.projectiles.get_mut(index) {
        p.alive = false;
    }
}

fn deactivate_adversary(state: &mut GameState, index: usize) {
    if let Some(a) = state.adversaries.get_mut(index) {
        a.alive = false;
    }
}

// ── Boundary canonicalizer ───────────────────────────────────────────────────

/// Boundary work found for one tick, applied afterwards in a single pass so
/// no store grows while it is being walked.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BoundaryPlan {
    /// Live projectiles outside the play area.
    pub strays: Vec<usize>,
    /// Live adversaries touching either side.
    pub bounces: Vec<usize>,
}

pub fn plan_bounds(state: &GameState) -> BoundaryPlan {
    let strays = state
        .projectiles
        .iter_live()
        .filter(|(_, p)| p.y < 0 || p.x > state.width || p.x < 0)
        .map(|(i, _)| i)
        .collect();
    let bounces = state
        .adversaries
        .iter_live()
        .filter(|(_, a)| a.x == 0 || a.x >= state.width - a.width)
        .map(|(i, _)| i)
        .collect();
    BoundaryPlan { strays, bounces }
}

pub fn apply_bounds(state: &mut GameState, plan: &BoundaryPlan, events: &mut Vec<GameEvent>) {
    for &pi in &plan.strays {
        events.push(GameEvent::ProjectileOutOfBounds { projectile: pi });
        if state.sim.out_of_bounds == OutOfBoundsPolicy::Cull {
            deactivate_projectile(state, pi);
        }
    }
    if state.sim.out_of_bounds == OutOfBoundsPolicy::Reserve && !plan.strays.is_empty() {
        state.projectiles.reserve_headroom(state.sim.storage_top_up);
    }

    let floor = state.height;
    let step = state.sim.adversary_step_down;
    for &ai in &plan.bounces {
        let Some(adversary) = state.adversaries.get_mut(ai) else {
            continue;
        };
        let was_above = adversary.y.saturating_add(adversary.height) < floor;
        adversary.velocity = -adversary.velocity;
        adversary.y = adversary.y.saturating_add(step);
        events.push(GameEvent::AdversaryBounced { adversary: ai });
        if was_above && adversary.y.saturating_add(adversary.height) >= floor {
            debug!("adversary {} reached the bottom", ai);
            events.push(GameEvent::AdversaryReachedBottom { adversary: ai });
        }
    }
}

pub fn canonicalize_bounds(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let plan = plan_bounds(state);
    apply_bounds(state, &plan, events);
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Returns what happened, in order.
///
/// The pause toggle is handled first; everything else only runs while the
/// game is started and not paused.
pub fn tick(state: &mut GameState, input: &TickInput, rng: &mut impl Rng) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause_toggle {
        events.extend(toggle_pause(state));
    }
    if !state.session.is_ticking() {
        return events;
    }
    state.frame += 1;

    // ── 1. Input ─────────────────────────────────────────────────────────────
    if input.move_right {
        move_player_right(state);
    }
    if input.move_left {
        move_player_left(state);
    }
    if input.fire {
        events.push(fire(state, rng));
    }

    // ── 2. Motion ────────────────────────────────────────────────────────────
    integrate(state);

    // ── 3. Collisions ────────────────────────────────────────────────────────
    resolve_collisions(state, &mut events);

    // ── 4. Bounds ────────────────────────────────────────────────────────────
    canonicalize_bounds(state, &mut events);

    events
}
