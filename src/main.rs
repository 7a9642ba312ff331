mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use sweep_shooter::compute::{back_to_menu, open_config, start_game, tick, toggle_mute, TickInput};
use sweep_shooter::config::GameConfig;
use sweep_shooter::entities::{GameEvent, GameState, ScreenMode};
use sweep_shooter::rules;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// at 60 FPS, 8 frames (≈133 ms) outlasts the OS key-repeat interval.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

const LEFT_KEYS: [KeyCode; 3] = [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT_KEYS: [KeyCode; 3] = [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw / alternate-screen mode while we run, so log lines
/// go to the configured file.  Without one, logging stays off unless
/// `RUST_LOG` asks for it.
fn init_logging(config: &GameConfig) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }
    builder.init();
    Ok(())
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// What the outer loop should do after handling a key.
enum Flow {
    Continue,
    Quit,
}

/// One-shot actions for a key press, depending on the screen.
/// Edge-triggered game inputs are accumulated into `input`.
fn on_press(
    state: &mut GameState,
    config: &GameConfig,
    code: KeyCode,
    modifiers: KeyModifiers,
    input: &mut TickInput,
) -> Flow {
    if let KeyCode::Char('c') = code {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return Flow::Quit;
        }
    }
    match state.session.mode {
        ScreenMode::Start => match code {
            KeyCode::Enter | KeyCode::Char('1') => start_game(state),
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('2') => open_config(state),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
            _ => {}
        },
        ScreenMode::Config => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Flow::Quit,
            _ => back_to_menu(state),
        },
        mode if mode.is_terminal() => match code {
            KeyCode::Char('r') | KeyCode::Char('R') => *state = GameState::new(config),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
            _ => {}
        },
        _ => match code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('p') | KeyCode::Char('P') => input.pause_toggle = true,
            KeyCode::Char(' ') | KeyCode::Char('o') | KeyCode::Char('O') => input.fire = true,
            KeyCode::Char('m') | KeyCode::Char('M') => toggle_mute(state),
            _ => {}
        },
    }
    Flow::Continue
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: a `key_frame` map records the frame of the last press/repeat
/// event for every key.  Movement is "held" while its key is fresh, which
/// lets fire and movement overlap.  Fire and pause act on the press edge.
///
/// Works on keyboard-enhancement terminals (real `Release` events) and on
/// classic terminals, where keys expire after `HOLD_WINDOW` frames of silence.
fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, config: &GameConfig) -> Result<()> {
    let mut rng = thread_rng();
    let rules = rules::from_config(config);
    let frame_len = config.frame();

    let mut state = GameState::new(config);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut input = TickInput::default();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    if let Flow::Quit = on_press(&mut state, config, code, modifiers, &mut input) {
                        return Ok(());
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Simulate ──────────────────────────────────────────────────────────
        if state.session.started {
            input.move_left = any_held(&key_frame, &LEFT_KEYS, frame);
            input.move_right = any_held(&key_frame, &RIGHT_KEYS, frame);

            let events = tick(&mut state, &input, &mut rng);
            if events.iter().any(|e| matches!(e, GameEvent::Fired { .. })) {
                display::fire_cue(out, &state)?;
            }
            rules::apply_rules(rules.as_ref(), &mut state, &events);
        }

        display::render(out, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = GameConfig::resolve(std::env::args_os().nth(1).map(PathBuf::from))?;
    init_logging(&config)?;
    log::info!("starting with {}x{} play area at {} fps", config.width, config.height, config.target_fps);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("cannot enter raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking event reads live on their own thread so the frame loop never
    // waits on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        log::error!("{:#}", err);
    }
    result
}
