use sweep_shooter::compute::*;
use sweep_shooter::config::{GameConfig, OutOfBoundsPolicy, PlayerHitPenalty};
use sweep_shooter::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Started game, ship resting on the floor at x=480 (hitbox 480..576 × 515..572).
fn make_state() -> GameState {
    let mut s = GameState::new(&GameConfig::default());
    start_game(&mut s);
    s.player.y = 515;
    s.player.vel_y = 0.0;
    s
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn idle() -> TickInput {
    TickInput::default()
}

fn add_projectile(s: &mut GameState, x: i32, y: i32) -> usize {
    s.projectiles.append(Projectile {
        x,
        y,
        size: 10,
        velocity: 10,
        alive: true,
    })
}

fn add_adversary(s: &mut GameState, x: i32, y: i32, velocity: i32) -> usize {
    s.adversaries.append(Adversary {
        x,
        y,
        width: 150,
        height: 50,
        velocity,
        kind: AdversaryKind::Grunt,
        alive: true,
    })
}

// ── GameState::new ────────────────────────────────────────────────────────────

#[test]
fn new_state_player_layout() {
    let s = GameState::new(&GameConfig::default());
    assert_eq!(s.player.x, 480); // width / 2
    assert_eq!(s.player.y, 286); // height / 2
    assert_eq!(s.player.width, 96);
    assert_eq!(s.player.height, 57);
    assert_eq!(s.player.lives, 3);
}

#[test]
fn new_state_is_on_the_menu() {
    let s = GameState::new(&GameConfig::default());
    assert_eq!(s.session.mode, ScreenMode::Start);
    assert!(!s.session.started);
    assert!(!s.session.paused);
    assert!(s.projectiles.is_empty());
    assert!(s.adversaries.is_empty());
    assert_eq!(s.score, 0);
}

// ── Session transitions ───────────────────────────────────────────────────────

#[test]
fn tick_before_start_does_nothing() {
    let mut s = GameState::new(&GameConfig::default());
    let input = TickInput { fire: true, ..idle() };
    let events = tick(&mut s, &input, &mut seeded_rng());
    assert!(events.is_empty());
    assert_eq!(s.projectiles.count(), 0);
    assert_eq!(s.player.y, 286);
}

#[test]
fn pause_before_start_is_ignored() {
    let mut s = GameState::new(&GameConfig::default());
    assert_eq!(toggle_pause(&mut s), None);
    assert!(!s.session.paused);
}

#[test]
fn config_screen_round_trip() {
    let mut s = GameState::new(&GameConfig::default());
    open_config(&mut s);
    assert_eq!(s.session.mode, ScreenMode::Config);
    back_to_menu(&mut s);
    assert_eq!(s.session.mode, ScreenMode::Start);
}

#[test]
fn back_to_menu_ignored_during_play() {
    let mut s = make_state();
    back_to_menu(&mut s);
    assert_eq!(s.session.mode, ScreenMode::Game);
}

#[test]
fn mute_toggles() {
    let mut s = make_state();
    toggle_mute(&mut s);
    assert!(s.session.muted);
    toggle_mute(&mut s);
    assert!(!s.session.muted);
}

// ── Player movement ───────────────────────────────────────────────────────────

#[test]
fn move_left_normal() {
    let mut s = make_state();
    move_player_left(&mut s);
    assert_eq!(s.player.x, 470);
}

#[test]
fn move_left_clamps_at_zero() {
    let mut s = make_state();
    s.player.x = 4;
    move_player_left(&mut s);
    assert_eq!(s.player.x, 0);
}

#[test]
fn move_right_clamps_at_far_edge() {
    let mut s = make_state();
    s.player.x = 860;
    move_player_right(&mut s);
    assert_eq!(s.player.x, 864); // 960 - 96
}

#[test]
fn held_keys_move_during_tick() {
    let mut s = make_state();
    let input = TickInput { move_right: true, ..idle() };
    tick(&mut s, &input, &mut seeded_rng());
    assert_eq!(s.player.x, 490);
}

// ── Spawner ───────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_exactly_one_pair() {
    let mut s = make_state();
    let event = fire(&mut s, &mut seeded_rng());
    assert_eq!(
        event,
        GameEvent::Fired {
            projectile: 0,
            adversary: 0
        }
    );
    assert_eq!(s.projectiles.count(), 1);
    assert_eq!(s.adversaries.count(), 1);

    let p = s.projectiles.get(0).unwrap();
    assert_eq!((p.x, p.y), (490, 515));
    assert_eq!(p.velocity, 10);
    assert!(p.alive);

    let a = s.adversaries.get(0).unwrap();
    assert!((0..960).contains(&a.x));
    assert_eq!(a.y, 100);
    assert_eq!((a.width, a.height), (150, 50));
    assert_eq!(a.velocity, 3);
    assert!(a.alive);
}

#[test]
fn fire_tags_adversaries_by_spawn_order() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..5 {
        fire(&mut s, &mut rng);
    }
    let kinds: Vec<AdversaryKind> = s.adversaries.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            AdversaryKind::Vanguard,
            AdversaryKind::Flanker,
            AdversaryKind::Grunt,
            AdversaryKind::Captain,
            AdversaryKind::Grunt,
        ]
    );
}

// ── Motion integrator ─────────────────────────────────────────────────────────

#[test]
fn projectile_moves_up_by_velocity() {
    let mut s = make_state();
    add_projectile(&mut s, 100, 300);
    tick(&mut s, &idle(), &mut seeded_rng());
    assert_eq!(s.projectiles.get(0).unwrap().y, 290);
}

#[test]
fn adversary_moves_sideways_only() {
    let mut s = make_state();
    add_adversary(&mut s, 300, 100, 3);
    tick(&mut s, &idle(), &mut seeded_rng());
    let a = s.adversaries.get(0).unwrap();
    assert_eq!((a.x, a.y), (303, 100));
}

#[test]
fn inactive_entities_are_frozen() {
    let mut s = make_state();
    add_projectile(&mut s, 100, 300);
    add_adversary(&mut s, 300, 100, 3);
    s.projectiles.get_mut(0).unwrap().alive = false;
    s.adversaries.get_mut(0).unwrap().alive = false;
    tick(&mut s, &idle(), &mut seeded_rng());
    assert_eq!(s.projectiles.get(0).unwrap().y, 300);
    assert_eq!(s.adversaries.get(0).unwrap().x, 300);
}

#[test]
fn ship_falls_to_the_floor_and_rests() {
    let mut s = GameState::new(&GameConfig::default());
    start_game(&mut s);
    let mut rng = seeded_rng();
    tick(&mut s, &idle(), &mut rng);
    assert_eq!(s.player.y, 285); // launched upward by half a unit
    for _ in 0..200 {
        tick(&mut s, &idle(), &mut rng);
    }
    assert_eq!(s.player.y, 515); // 572 - 57
    assert_eq!(s.player.vel_y, 0.0);
}

// ── Boundary canonicalizer: adversaries ───────────────────────────────────────

#[test]
fn adversary_bounces_off_right_side() {
    let mut s = make_state();
    add_adversary(&mut s, 807, 100, 3);
    let events = tick(&mut s, &idle(), &mut seeded_rng());
    let a = s.adversaries.get(0).unwrap();
    assert_eq!(a.x, 810);
    assert_eq!(a.velocity, -3);
    assert_eq!(a.y, 150);
    assert!(events.contains(&GameEvent::AdversaryBounced { adversary: 0 }));
}

#[test]
fn adversary_bounces_at_exactly_zero() {
    let mut s = make_state();
    add_adversary(&mut s, 3, 100, -3);
    tick(&mut s, &idle(), &mut seeded_rng());
    let a = s.adversaries.get(0).unwrap();
    assert_eq!(a.x, 0);
    assert_eq!(a.velocity, 3);
    assert_eq!(a.y, 150);
}

#[test]
fn adversary_skipping_past_zero_does_not_bounce() {
    let mut s = make_state();
    add_adversary(&mut s, 2, 100, -3);
    let events = tick(&mut s, &idle(), &mut seeded_rng());
    let a = s.adversaries.get(0).unwrap();
    assert_eq!(a.x, -1);
    assert_eq!(a.velocity, -3);
    assert_eq!(a.y, 100);
    assert!(events.is_empty());
}

#[test]
fn adversary_leaves_the_edge_after_one_bounce() {
    let mut s = make_state();
    add_adversary(&mut s, 807, 100, 3);
    let mut rng = seeded_rng();
    tick(&mut s, &idle(), &mut rng);
    tick(&mut s, &idle(), &mut rng);
    let a = s.adversaries.get(0).unwrap();
    assert_eq!(a.x, 807);
    assert_eq!(a.y, 150);
}

#[test]
fn adversary_reaching_bottom_is_reported_once() {
    let mut s = make_state();
    add_adversary(&mut s, 807, 500, 3);
    let mut rng = seeded_rng();
    let events = tick(&mut s, &idle(), &mut rng);
    assert!(events.contains(&GameEvent::AdversaryReachedBottom { adversary: 0 }));
    assert!(s.adversaries.get(0).unwrap().alive); // never culled

    // Walk it back to the left edge at x == 0 and bounce again.
    s.adversaries.get_mut(0).unwrap().x = 3;
    let events = tick(&mut s, &idle(), &mut rng);
    assert!(events.contains(&GameEvent::AdversaryBounced { adversary: 0 }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::AdversaryReachedBottom { .. })));
}

#[test]
fn endlessly_bouncing_adversary_saturates_instead_of_overflowing() {
    let mut s = make_state();
    add_adversary(&mut s, 810, i32::MAX - 20, 3);
    let events = tick(&mut s, &idle(), &mut seeded_rng());
    assert!(events.contains(&GameEvent::AdversaryBounced { adversary: 0 }));
    assert_eq!(s.adversaries.get(0).unwrap().y, i32::MAX);
    tick(&mut s, &idle(), &mut seeded_rng());
    assert_eq!(s.adversaries.get(0).unwrap().y, i32::MAX);
}

#[test]
fn adversary_drifting_left_forever_saturates() {
    let mut s = make_state();
    add_adversary(&mut s, i32::MIN + 1, 100, -3);
    tick(&mut s, &idle(), &mut seeded_rng());
    assert_eq!(s.adversaries.get(0).unwrap().x, i32::MIN);
}

// ── Boundary canonicalizer: projectiles ───────────────────────────────────────

#[test]
fn stray_projectile_tops_up_storage_and_stays_live() {
    let mut s = make_state();
    for _ in 0..255 {
        let i = add_projectile(&mut s, 100, 300);
        s.projectiles.get_mut(i).unwrap().alive = false;
    }
    let stray = add_projectile(&mut s, 100, 5);
    assert_eq!(s.projectiles.capacity(), 256);

    let events = tick(&mut s, &idle(), &mut seeded_rng());
    assert!(events.contains(&GameEvent::ProjectileOutOfBounds { projectile: stray }));
    assert!(s.projectiles.get(stray).unwrap().alive);
    assert_eq!(s.projectiles.count(), 256);
    assert_eq!(s.projectiles.capacity(), 276);
}

#[test]
fn stray_projectiles_top_up_once_per_tick() {
    let mut s = make_state();
    for _ in 0..256 {
        add_projectile(&mut s, 1000, 300);
    }
    tick(&mut s, &idle(), &mut seeded_rng());
    assert_eq!(s.projectiles.capacity(), 276);
}

#[test]
fn stray_projectile_culled_under_cull_policy() {
    let mut s = make_state();
    s.sim.out_of_bounds = OutOfBoundsPolicy::Cull;
    add_projectile(&mut s, 1000, 300); // right of the play area
    add_projectile(&mut s, -5, 300); // left of it
    add_projectile(&mut s, 100, 300); // inside
    tick(&mut s, &idle(), &mut seeded_rng());
    assert!(!s.projectiles.get(0).unwrap().alive);
    assert!(!s.projectiles.get(1).unwrap().alive);
    assert!(s.projectiles.get(2).unwrap().alive);
    assert_eq!(s.projectiles.count(), 3);
}

#[test]
fn stray_projectile_climbing_forever_saturates() {
    let mut s = make_state();
    add_projectile(&mut s, 100, i32::MIN + 5);
    tick(&mut s, &idle(), &mut seeded_rng());
    let p = s.projectiles.get(0).unwrap();
    assert_eq!(p.y, i32::MIN);
    assert!(p.alive);
}

// ── Collision resolver ────────────────────────────────────────────────────────

#[test]
fn projectile_hit_scores_and_deactivates_both() {
    let mut s = make_state();
    add_projectile(&mut s, 490, 495); // moves to 485: box 490..520 × 485..545
    add_adversary(&mut s, 490, 460, 3); // moves to 493: box 493..643 × 460..510
    let events = tick(&mut s, &idle(), &mut seeded_rng());
    assert!(!s.projectiles.get(0).unwrap().alive);
    assert!(!s.adversaries.get(0).unwrap().alive);
    assert_eq!(s.score, 1);
    assert!(events.contains(&GameEvent::ProjectileHit {
        projectile: 0,
        adversary: 0
    }));
}

#[test]
fn projectile_takes_only_the_first_adversary() {
    let mut s = make_state();
    add_projectile(&mut s, 300, 210);
    add_adversary(&mut s, 250, 180, 3);
    add_adversary(&mut s, 260, 190, 3);
    tick(&mut s, &idle(), &mut seeded_rng());
    assert!(!s.adversaries.get(0).unwrap().alive);
    assert!(s.adversaries.get(1).unwrap().alive);
    assert_eq!(s.score, 1);
}

#[test]
fn dead_adversary_is_not_hit_again() {
    let mut s = make_state();
    add_projectile(&mut s, 300, 210);
    add_projectile(&mut s, 310, 210);
    add_adversary(&mut s, 250, 180, 3);
    tick(&mut s, &idle(), &mut seeded_rng());
    assert!(!s.projectiles.get(0).unwrap().alive);
    assert!(s.projectiles.get(1).unwrap().alive);
    assert_eq!(s.score, 1);
}

#[test]
fn touching_edges_do_not_collide() {
    let mut s = make_state();
    // After moving: projectile 300..330 × 150..210, adversary 330..480 × 100..150.
    add_projectile(&mut s, 300, 160);
    add_adversary(&mut s, 327, 100, 3);
    tick(&mut s, &idle(), &mut seeded_rng());
    assert!(s.projectiles.get(0).unwrap().alive);
    assert_eq!(s.score, 0);
}

#[test]
fn ramming_the_ship_costs_a_point() {
    let mut s = make_state();
    add_adversary(&mut s, 450, 500, 3); // box 453..603 × 500..550 over the ship
    let events = tick(&mut s, &idle(), &mut seeded_rng());
    assert!(!s.adversaries.get(0).unwrap().alive);
    assert_eq!(s.score, -1);
    assert_eq!(s.player.lives, 3);
    assert!(events.contains(&GameEvent::PlayerHit { adversary: 0 }));
}

#[test]
fn ramming_costs_a_life_under_life_penalty() {
    let mut s = make_state();
    s.sim.player_hit_penalty = PlayerHitPenalty::Life;
    add_adversary(&mut s, 450, 500, 3);
    let events = tick(&mut s, &idle(), &mut seeded_rng());
    assert_eq!(s.score, 0);
    assert_eq!(s.player.lives, 2);
    assert!(!events.contains(&GameEvent::LivesExhausted));
}

#[test]
fn last_life_lost_is_reported() {
    let mut s = make_state();
    s.sim.player_hit_penalty = PlayerHitPenalty::Life;
    s.player.lives = 1;
    add_adversary(&mut s, 450, 500, 3);
    add_adversary(&mut s, 460, 500, 3);
    let events = tick(&mut s, &idle(), &mut seeded_rng());
    assert_eq!(s.player.lives, 0); // saturates
    let exhausted = events
        .iter()
        .filter(|e| **e == GameEvent::LivesExhausted)
        .count();
    assert_eq!(exhausted, 1);
}

#[test]
fn resolving_without_overlaps_is_a_no_op() {
    let mut s = make_state();
    add_projectile(&mut s, 100, 300);
    add_adversary(&mut s, 600, 100, 3);
    let mut events = Vec::new();
    resolve_collisions(&mut s, &mut events);
    resolve_collisions(&mut s, &mut events);
    assert!(events.is_empty());
    assert_eq!(s.score, 0);
    assert!(s.projectiles.get(0).unwrap().alive);
    assert!(s.adversaries.get(0).unwrap().alive);
}

// ── Full scenario ─────────────────────────────────────────────────────────────

#[test]
fn fire_move_hit_pause_scenario() {
    let mut s = make_state();
    let mut rng = seeded_rng();

    let events = tick(&mut s, &TickInput { fire: true, ..idle() }, &mut rng);
    assert!(matches!(events[0], GameEvent::Fired { .. }));
    assert_eq!(s.projectiles.count(), 1);
    assert_eq!(s.adversaries.count(), 1);
    assert!(s.projectiles.get(0).unwrap().alive);
    assert!(s.adversaries.get(0).unwrap().alive);
    assert_eq!(s.score, 0);

    let y_before = s.projectiles.get(0).unwrap().y;
    tick(&mut s, &idle(), &mut rng);
    assert_eq!(s.projectiles.get(0).unwrap().y, y_before - 10);
    assert_eq!(s.score, 0);

    // Park the adversary right above the projectile.
    let p = s.projectiles.get(0).unwrap().clone();
    {
        let a = s.adversaries.get_mut(0).unwrap();
        a.x = p.x;
        a.y = p.y - 30;
        a.velocity = 3;
    }
    tick(&mut s, &idle(), &mut rng);
    assert!(!s.projectiles.get(0).unwrap().alive);
    assert!(!s.adversaries.get(0).unwrap().alive);
    assert_eq!(s.score, 1);

    // A fresh pair, then pause: nothing moves until unpaused.
    tick(&mut s, &TickInput { fire: true, ..idle() }, &mut rng);
    let events = tick(&mut s, &TickInput { pause_toggle: true, ..idle() }, &mut rng);
    assert_eq!(events, vec![GameEvent::Paused]);
    let frozen_p = s.projectiles.get(1).unwrap().clone();
    let frozen_a = s.adversaries.get(1).unwrap().clone();
    for _ in 0..5 {
        tick(&mut s, &TickInput { fire: true, move_left: true, ..idle() }, &mut rng);
    }
    assert_eq!(s.projectiles.get(1).unwrap(), &frozen_p);
    assert_eq!(s.adversaries.get(1).unwrap(), &frozen_a);
    assert_eq!(s.projectiles.count(), 2);

    let events = tick(&mut s, &TickInput { pause_toggle: true, ..idle() }, &mut rng);
    assert_eq!(events[0], GameEvent::Resumed);
    assert_eq!(s.projectiles.get(1).unwrap().y, frozen_p.y - 10);
}
