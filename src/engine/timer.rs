//! Round timer engine.
//!
//! This module provides the countdown state machine:
//! - Session setup from a roll setting
//! - Start/stop toggling without losing the countdown
//! - Per-tick countdown, round boundaries and the end-of-round warning
//! - Effects describing what the display and alert sinks should do
//!
//! The engine performs no I/O. Ticks come from the host (see
//! [`SessionRunner`](super::SessionRunner)).

use serde::Serialize;
use tracing::{debug, info};

use super::error::TimerError;
use crate::types::{
    DisplayUpdate, EngineState, RollSetting, RoundTimerConfig, MINUTE_ROLLOVER,
};

// ============================================================================
// TimerEffect
// ============================================================================

/// Observable output of the engine, consumed by the render and alert sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum TimerEffect {
    /// A new round began (progress reset, round counter incremented)
    RoundStarted {
        /// Number of the round that just began
        round: u32,
        /// Rounds in the session
        total_rounds: u32,
    },
    /// The configured warning offset was reached in the final minute
    Warning {
        /// Round the warning belongs to
        round: u32,
        /// Seconds left in the round
        seconds_left: u32,
    },
    /// Countdown, progress and round counter to render
    Display(DisplayUpdate),
    /// A round other than the last reached zero
    RoundCompleted {
        /// Number of the round that finished
        round: u32,
        /// Rounds in the session
        total_rounds: u32,
    },
    /// The final round reached zero
    SessionCompleted {
        /// Rounds in the session
        total_rounds: u32,
    },
    /// The engine moved between ready and running
    StateChanged {
        /// State after the change
        state: EngineState,
    },
}

impl TimerEffect {
    /// Returns true if this effect ends the session.
    pub fn is_session_end(&self) -> bool {
        matches!(self, TimerEffect::SessionCompleted { .. })
    }
}

// ============================================================================
// RoundTimerEngine
// ============================================================================

/// Countdown state machine for one training session.
///
/// Seconds count from `60` down to `0` inside each minute; `60` marks the top
/// of a minute before any of it has elapsed. A freshly loaded round therefore
/// reads `round_duration_minutes:60`, which is what the round-boundary check
/// looks for.
#[derive(Debug, Clone, Default)]
pub struct RoundTimerEngine {
    config: Option<RoundTimerConfig>,
    remaining_minutes: u32,
    remaining_seconds: u32,
    completed_rounds: u32,
    elapsed_ticks: u32,
    progress_fraction: f64,
    is_session_active: bool,
    is_running: bool,
}

impl RoundTimerEngine {
    /// Creates an engine with no session loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `setting` and loads it as a new session.
    ///
    /// Any session in progress is discarded and the engine is left ready but
    /// not running.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidConfig` if the setting is out of range.
    /// The engine is unchanged in that case.
    pub fn accept(&mut self, setting: RollSetting) -> Result<(), TimerError> {
        let config = RoundTimerConfig::try_from(setting)?;
        self.accept_config(config);
        Ok(())
    }

    /// Loads an already validated configuration as a new session.
    pub fn accept_config(&mut self, config: RoundTimerConfig) {
        self.remaining_minutes = config.round_duration_minutes();
        self.remaining_seconds = MINUTE_ROLLOVER;
        self.completed_rounds = 0;
        self.elapsed_ticks = 0;
        self.progress_fraction = 0.0;
        self.is_session_active = true;
        self.is_running = false;
        self.config = Some(config);

        info!(
            "Session loaded: {} x {} min rounds, warning at {}s",
            config.total_rounds(),
            config.round_duration_minutes(),
            config.warning_offset_seconds()
        );
    }

    /// Arms the engine so ticks are consumed.
    ///
    /// Starting an engine that is already running does nothing.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InactiveSession` if no session is loaded or the
    /// session has completed.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if !self.has_active_session() {
            debug!("Start ignored: no active session");
            return Err(TimerError::InactiveSession);
        }
        if !self.is_running {
            self.is_running = true;
            debug!("Timer armed at {}", self.snapshot().countdown_label());
        }
        Ok(())
    }

    /// Disarms the engine, keeping the remaining time.
    ///
    /// Stopping an engine that is not running does nothing.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InactiveSession` if no session is loaded or the
    /// session has completed.
    pub fn stop(&mut self) -> Result<(), TimerError> {
        if !self.has_active_session() {
            debug!("Stop ignored: no active session");
            return Err(TimerError::InactiveSession);
        }
        if self.is_running {
            self.is_running = false;
            debug!("Timer paused at {}", self.snapshot().countdown_label());
        }
        Ok(())
    }

    /// Switches between running and paused.
    ///
    /// Returns the state after the switch.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InactiveSession` if no session is loaded or the
    /// session has completed.
    pub fn toggle_start(&mut self) -> Result<EngineState, TimerError> {
        if self.is_running {
            self.stop()?;
        } else {
            self.start()?;
        }
        Ok(self.state())
    }

    /// Advances the countdown by one second.
    ///
    /// Returns the effects of this tick in order. A `Display` effect is always
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InactiveSession` if the engine is not running. No
    /// state changes in that case.
    pub fn tick(&mut self) -> Result<Vec<TimerEffect>, TimerError> {
        let config = match self.config {
            Some(config) if self.is_running => config,
            _ => {
                debug!("Tick ignored: timer not running");
                return Err(TimerError::InactiveSession);
            }
        };

        let mut effects = Vec::with_capacity(3);
        let total_rounds = config.total_rounds();

        if self.remaining_minutes == config.round_duration_minutes()
            && self.remaining_seconds == MINUTE_ROLLOVER
            && self.completed_rounds < total_rounds
        {
            self.elapsed_ticks = 0;
            self.progress_fraction = 0.0;
            self.completed_rounds += 1;
            debug!("Round {}/{} started", self.completed_rounds, total_rounds);
            effects.push(TimerEffect::RoundStarted {
                round: self.completed_rounds,
                total_rounds,
            });
        }

        self.count_down_one_second();

        if self.remaining_minutes == 0
            && self.remaining_seconds == config.warning_offset_seconds()
        {
            debug!("Warning for round {}", self.completed_rounds);
            effects.push(TimerEffect::Warning {
                round: self.completed_rounds,
                seconds_left: self.remaining_seconds,
            });
        }

        let ticks_per_round = config.ticks_per_round();
        self.elapsed_ticks = (self.elapsed_ticks + 1).min(ticks_per_round);
        self.progress_fraction =
            (f64::from(self.elapsed_ticks) / f64::from(ticks_per_round)).clamp(0.0, 1.0);

        effects.push(TimerEffect::Display(self.snapshot()));

        if self.remaining_minutes == 0 && self.remaining_seconds == 0 {
            self.is_running = false;
            if self.completed_rounds < total_rounds {
                self.remaining_seconds = MINUTE_ROLLOVER;
                self.remaining_minutes = config.round_duration_minutes();
                info!("Round {}/{} complete", self.completed_rounds, total_rounds);
                effects.push(TimerEffect::RoundCompleted {
                    round: self.completed_rounds,
                    total_rounds,
                });
            } else {
                self.is_session_active = false;
                info!("Session complete after {} rounds", total_rounds);
                effects.push(TimerEffect::SessionCompleted { total_rounds });
            }
        }

        Ok(effects)
    }

    /// Moves the minute/second pair one second closer to `0:00`.
    fn count_down_one_second(&mut self) {
        // Roll over before the minute check so an exhausted minute is
        // charged exactly once.
        if self.remaining_seconds == 0 && self.remaining_minutes != 0 {
            self.remaining_seconds = MINUTE_ROLLOVER;
        }
        if self.remaining_seconds == MINUTE_ROLLOVER {
            self.remaining_minutes = self.remaining_minutes.saturating_sub(1);
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
    }

    /// Returns what the display should currently show.
    pub fn snapshot(&self) -> DisplayUpdate {
        DisplayUpdate {
            minutes: self.remaining_minutes,
            seconds: self.remaining_seconds,
            progress_fraction: self.progress_fraction,
            completed_rounds: self.completed_rounds,
            total_rounds: self.config.map_or(0, |c| c.total_rounds()),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> EngineState {
        match (&self.config, self.is_session_active, self.is_running) {
            (None, _, _) => EngineState::Idle,
            (Some(_), false, _) => EngineState::Completed,
            (Some(_), true, true) => EngineState::Running,
            (Some(_), true, false) => EngineState::Ready,
        }
    }

    /// Returns the loaded configuration, if any.
    pub fn config(&self) -> Option<&RoundTimerConfig> {
        self.config.as_ref()
    }

    /// Returns true while ticks should be delivered.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Returns true once a session is loaded and until it completes.
    pub fn is_session_active(&self) -> bool {
        self.is_session_active
    }

    fn has_active_session(&self) -> bool {
        self.config.is_some() && self.is_session_active
    }

    pub fn remaining_minutes(&self) -> u32 {
        self.remaining_minutes
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn completed_rounds(&self) -> u32 {
        self.completed_rounds
    }

    pub fn progress_fraction(&self) -> f64 {
        self.progress_fraction
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_engine(round_time: u32, warning_time: u32, rounds: u32) -> RoundTimerEngine {
        let mut engine = RoundTimerEngine::new();
        engine
            .accept(RollSetting::new(round_time, warning_time, rounds))
            .unwrap();
        engine
    }

    fn run_ticks(engine: &mut RoundTimerEngine, count: u32) -> Vec<TimerEffect> {
        let mut effects = Vec::new();
        for _ in 0..count {
            effects.extend(engine.tick().unwrap());
        }
        effects
    }

    // ------------------------------------------------------------------------
    // TimerEffect Tests
    // ------------------------------------------------------------------------

    mod timer_effect_tests {
        use super::*;

        #[test]
        fn test_is_session_end() {
            assert!(TimerEffect::SessionCompleted { total_rounds: 3 }.is_session_end());
            assert!(!TimerEffect::RoundCompleted {
                round: 1,
                total_rounds: 3
            }
            .is_session_end());
        }

        #[test]
        fn test_serialize_warning() {
            let effect = TimerEffect::Warning {
                round: 2,
                seconds_left: 10,
            };
            let json = serde_json::to_string(&effect).unwrap();
            assert_eq!(json, r#"{"effect":"warning","round":2,"secondsLeft":10}"#);
        }

        #[test]
        fn test_serialize_display() {
            let effect = TimerEffect::Display(DisplayUpdate {
                minutes: 4,
                seconds: 59,
                progress_fraction: 0.0,
                completed_rounds: 1,
                total_rounds: 3,
            });
            let json = serde_json::to_string(&effect).unwrap();
            assert!(json.contains("\"effect\":\"display\""));
            assert!(json.contains("\"minutes\":4"));
            assert!(json.contains("\"completedRounds\":1"));
        }

        #[test]
        fn test_serialize_state_changed() {
            let effect = TimerEffect::StateChanged {
                state: EngineState::Running,
            };
            let json = serde_json::to_string(&effect).unwrap();
            assert_eq!(json, r#"{"effect":"state_changed","state":"running"}"#);
        }
    }

    // ------------------------------------------------------------------------
    // Transition Tests
    // ------------------------------------------------------------------------

    mod transition_tests {
        use super::*;

        #[test]
        fn test_new_engine_is_idle() {
            let engine = RoundTimerEngine::new();
            assert_eq!(engine.state(), EngineState::Idle);
            assert!(!engine.is_running());
            assert!(!engine.is_session_active());
            assert!(engine.config().is_none());
        }

        #[test]
        fn test_accept_initializes_countdown() {
            let engine = create_engine(5, 10, 3);
            assert_eq!(engine.state(), EngineState::Ready);
            assert_eq!(engine.remaining_minutes(), 5);
            assert_eq!(engine.remaining_seconds(), 60);
            assert_eq!(engine.completed_rounds(), 0);
            assert_eq!(engine.progress_fraction(), 0.0);
            assert!(engine.is_session_active());
        }

        #[test]
        fn test_accept_invalid_leaves_engine_unchanged() {
            let mut engine = RoundTimerEngine::new();
            let result = engine.accept(RollSetting::new(5, 60, 3));
            assert!(matches!(result, Err(TimerError::InvalidConfig(_))));
            assert_eq!(engine.state(), EngineState::Idle);

            let mut engine = create_engine(5, 10, 3);
            engine.start().unwrap();
            let result = engine.accept(RollSetting::new(0, 10, 3));
            assert!(result.is_err());
            assert_eq!(engine.state(), EngineState::Running);
        }

        #[test]
        fn test_accept_replaces_running_session() {
            let mut engine = create_engine(5, 10, 3);
            engine.start().unwrap();
            run_ticks(&mut engine, 42);

            engine.accept(RollSetting::new(2, 5, 1)).unwrap();

            assert_eq!(engine.state(), EngineState::Ready);
            assert_eq!(engine.remaining_minutes(), 2);
            assert_eq!(engine.remaining_seconds(), 60);
            assert_eq!(engine.completed_rounds(), 0);
        }

        #[test]
        fn test_toggle_start_while_idle_is_noop() {
            let mut engine = RoundTimerEngine::new();
            let result = engine.toggle_start();
            assert_eq!(result, Err(TimerError::InactiveSession));
            assert_eq!(engine.state(), EngineState::Idle);
        }

        #[test]
        fn test_toggle_start_and_pause() {
            let mut engine = create_engine(5, 10, 3);

            assert_eq!(engine.toggle_start(), Ok(EngineState::Running));
            run_ticks(&mut engine, 75);
            assert_eq!(engine.toggle_start(), Ok(EngineState::Ready));

            // Pausing keeps the remaining time
            assert_eq!(engine.remaining_minutes(), 3);
            assert_eq!(engine.remaining_seconds(), 45);

            assert_eq!(engine.toggle_start(), Ok(EngineState::Running));
            assert_eq!(engine.remaining_minutes(), 3);
            assert_eq!(engine.remaining_seconds(), 45);
        }

        #[test]
        fn test_start_twice_is_noop() {
            let mut engine = create_engine(1, 10, 1);
            engine.start().unwrap();
            engine.start().unwrap();
            assert_eq!(engine.state(), EngineState::Running);
        }

        #[test]
        fn test_stop_while_ready_is_noop() {
            let mut engine = create_engine(1, 10, 1);
            engine.stop().unwrap();
            assert_eq!(engine.state(), EngineState::Ready);
        }

        #[test]
        fn test_start_stop_without_session() {
            let mut engine = RoundTimerEngine::new();
            assert_eq!(engine.start(), Err(TimerError::InactiveSession));
            assert_eq!(engine.stop(), Err(TimerError::InactiveSession));
        }

        #[test]
        fn test_tick_while_not_running() {
            let mut engine = RoundTimerEngine::new();
            assert_eq!(engine.tick(), Err(TimerError::InactiveSession));

            let mut engine = create_engine(5, 10, 3);
            assert_eq!(engine.tick(), Err(TimerError::InactiveSession));
            assert_eq!(engine.remaining_seconds(), 60);
            assert_eq!(engine.completed_rounds(), 0);
        }

        #[test]
        fn test_completed_session_rejects_start() {
            let mut engine = create_engine(1, 10, 1);
            engine.start().unwrap();
            run_ticks(&mut engine, 60);

            assert_eq!(engine.state(), EngineState::Completed);
            assert_eq!(engine.toggle_start(), Err(TimerError::InactiveSession));
            assert_eq!(engine.tick(), Err(TimerError::InactiveSession));
        }

        #[test]
        fn test_accept_after_completion() {
            let mut engine = create_engine(1, 10, 1);
            engine.start().unwrap();
            run_ticks(&mut engine, 60);

            engine.accept(RollSetting::new(1, 10, 2)).unwrap();
            assert_eq!(engine.state(), EngineState::Ready);
            assert_eq!(engine.completed_rounds(), 0);
        }
    }

    // ------------------------------------------------------------------------
    // Tick Tests
    // ------------------------------------------------------------------------

    mod tick_tests {
        use super::*;

        #[test]
        fn test_first_tick_starts_round() {
            let mut engine = create_engine(5, 10, 3);
            engine.start().unwrap();

            let effects = engine.tick().unwrap();

            assert_eq!(
                effects[0],
                TimerEffect::RoundStarted {
                    round: 1,
                    total_rounds: 3
                }
            );
            assert_eq!(engine.completed_rounds(), 1);
            assert_eq!(engine.remaining_minutes(), 4);
            assert_eq!(engine.remaining_seconds(), 59);
        }

        #[test]
        fn test_every_tick_emits_display() {
            let mut engine = create_engine(1, 30, 2);
            engine.start().unwrap();

            for _ in 0..60 {
                let effects = engine.tick().unwrap();
                let displays = effects
                    .iter()
                    .filter(|e| matches!(e, TimerEffect::Display(_)))
                    .count();
                assert_eq!(displays, 1);
            }
        }

        #[test]
        fn test_minute_rollover() {
            let mut engine = create_engine(5, 10, 1);
            engine.start().unwrap();

            run_ticks(&mut engine, 60);
            assert_eq!(engine.remaining_minutes(), 4);
            assert_eq!(engine.remaining_seconds(), 0);

            engine.tick().unwrap();
            assert_eq!(engine.remaining_minutes(), 3);
            assert_eq!(engine.remaining_seconds(), 59);
        }

        #[test]
        fn test_warning_fires_at_offset() {
            let mut engine = create_engine(5, 10, 3);
            engine.start().unwrap();

            let effects = run_ticks(&mut engine, 289);
            assert!(!effects
                .iter()
                .any(|e| matches!(e, TimerEffect::Warning { .. })));

            let effects = engine.tick().unwrap();
            assert_eq!(engine.remaining_minutes(), 0);
            assert_eq!(engine.remaining_seconds(), 10);
            assert!(effects.contains(&TimerEffect::Warning {
                round: 1,
                seconds_left: 10
            }));
        }

        #[test]
        fn test_warning_not_fired_in_earlier_minutes() {
            // 10 seconds into every minute, but only the final minute counts
            let mut engine = create_engine(3, 10, 1);
            engine.start().unwrap();

            let effects = run_ticks(&mut engine, 180);
            let warnings = effects
                .iter()
                .filter(|e| matches!(e, TimerEffect::Warning { .. }))
                .count();
            assert_eq!(warnings, 1);
        }

        #[test]
        fn test_warning_offset_zero_fires_with_completion() {
            let mut engine = create_engine(1, 0, 1);
            engine.start().unwrap();
            run_ticks(&mut engine, 59);

            let effects = engine.tick().unwrap();
            assert!(matches!(effects[0], TimerEffect::Warning { seconds_left: 0, .. }));
            assert!(matches!(effects[1], TimerEffect::Display(_)));
            assert!(effects[2].is_session_end());
        }

        #[test]
        fn test_round_completion_resets_countdown_and_disarms() {
            let mut engine = create_engine(1, 10, 2);
            engine.start().unwrap();
            run_ticks(&mut engine, 59);

            let effects = engine.tick().unwrap();

            // Display shows the finished round before the reset
            match &effects[0] {
                TimerEffect::Display(update) => {
                    assert_eq!(update.countdown_label(), "00:00");
                    assert_eq!(update.progress_fraction, 1.0);
                }
                other => panic!("Expected Display, got {:?}", other),
            }
            assert_eq!(
                effects[1],
                TimerEffect::RoundCompleted {
                    round: 1,
                    total_rounds: 2
                }
            );
            assert_eq!(engine.state(), EngineState::Ready);
            assert_eq!(engine.remaining_minutes(), 1);
            assert_eq!(engine.remaining_seconds(), 60);
            assert_eq!(engine.completed_rounds(), 1);
        }

        #[test]
        fn test_next_round_boundary_after_restart() {
            let mut engine = create_engine(1, 10, 2);
            engine.start().unwrap();
            run_ticks(&mut engine, 60);

            engine.start().unwrap();
            let effects = engine.tick().unwrap();

            assert_eq!(
                effects[0],
                TimerEffect::RoundStarted {
                    round: 2,
                    total_rounds: 2
                }
            );
            assert_eq!(engine.completed_rounds(), 2);
            assert!(engine.progress_fraction() < 0.05);
        }

        #[test]
        fn test_progress_advances_per_tick() {
            let mut engine = create_engine(2, 10, 1);
            engine.start().unwrap();

            run_ticks(&mut engine, 30);
            assert!((engine.progress_fraction() - 0.25).abs() < 1e-9);

            run_ticks(&mut engine, 60);
            assert!((engine.progress_fraction() - 0.75).abs() < 1e-9);
        }

        #[test]
        fn test_session_completion() {
            let mut engine = create_engine(1, 10, 2);
            engine.start().unwrap();
            run_ticks(&mut engine, 60);
            engine.start().unwrap();
            let effects = run_ticks(&mut engine, 60);

            assert_eq!(
                effects.last(),
                Some(&TimerEffect::SessionCompleted { total_rounds: 2 })
            );
            assert_eq!(engine.state(), EngineState::Completed);
            assert!(!engine.is_session_active());
            assert!(!engine.is_running());
            assert_eq!(engine.completed_rounds(), 2);
            assert_eq!(engine.remaining_minutes(), 0);
            assert_eq!(engine.remaining_seconds(), 0);
        }

        #[test]
        fn test_snapshot_after_accept() {
            let engine = create_engine(5, 10, 3);
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.countdown_label(), "05:00");
            assert_eq!(snapshot.round_label(), "0/3");
            assert_eq!(snapshot.progress_fraction, 0.0);
        }

        #[test]
        fn test_snapshot_idle() {
            let engine = RoundTimerEngine::new();
            assert_eq!(engine.snapshot().total_rounds, 0);
        }
    }
}
