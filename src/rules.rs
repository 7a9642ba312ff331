//! Win/loss hooks
//!
//! The simulation never ends a run by itself. A `GameRules` implementation
//! looks at the state and the tick's events and may return a terminal mode.

use log::info;

use crate::config::{GameConfig, RulesKind};
use crate::entities::{GameEvent, GameState, ScreenMode};

pub trait GameRules {
    fn judge(&self, state: &GameState, events: &[GameEvent]) -> Option<ScreenMode>;
}

/// Runs until the player quits.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenEnded;

impl GameRules for OpenEnded {
    fn judge(&self, _state: &GameState, _events: &[GameEvent]) -> Option<ScreenMode> {
        None
    }
}

/// Lost when the last life goes; optionally over when an adversary gets
/// to the bottom of the play area.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastStand {
    pub breach_ends_game: bool,
}

impl GameRules for LastStand {
    fn judge(&self, _state: &GameState, events: &[GameEvent]) -> Option<ScreenMode> {
        if events.contains(&GameEvent::LivesExhausted) {
            return Some(ScreenMode::GameLost);
        }
        let breached = events
            .iter()
            .any(|e| matches!(e, GameEvent::AdversaryReachedBottom { .. }));
        if self.breach_ends_game && breached {
            return Some(ScreenMode::GameOver);
        }
        None
    }
}

pub fn from_config(config: &GameConfig) -> Box<dyn GameRules> {
    match config.rules {
        RulesKind::OpenEnded => Box::new(OpenEnded),
        RulesKind::LastStand => Box::new(LastStand {
            breach_ends_game: config.breach_ends_game,
        }),
    }
}

/// Ask `rules` for a verdict and, if there is one, stop the run.
pub fn apply_rules(
    rules: &dyn GameRules,
    state: &mut GameState,
    events: &[GameEvent],
) -> Option<ScreenMode> {
    let verdict = rules.judge(state, events)?;
    state.session.mode = verdict;
    state.session.started = false;
    state.session.paused = false;
    info!("run ended: {:?}, score {}", verdict, state.score);
    Some(verdict)
}
