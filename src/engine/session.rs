//! Session runner: the tick source for a [`RoundTimerEngine`].
//!
//! The runner owns the engine inside a single task and multiplexes the
//! one-second interval with incoming commands, so ticks never interleave with
//! start/stop or a new setting.

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::timer::{RoundTimerEngine, TimerEffect};
use crate::types::RollSetting;

/// Nominal tick period.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

// ============================================================================
// SessionCommand
// ============================================================================

/// User input delivered to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Switch between running and paused (tap)
    Toggle,
    /// Arm the timer
    Start,
    /// Pause the timer
    Stop,
    /// Replace the session with a new setting
    Accept(RollSetting),
    /// Stop the runner
    Quit,
}

// ============================================================================
// SessionOptions
// ============================================================================

/// Runner behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Time between ticks
    pub tick_period: Duration,
    /// Re-arm automatically after each round except the last
    pub auto_advance: bool,
    /// Return from [`SessionRunner::run`] once the session completes
    pub exit_on_complete: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            auto_advance: false,
            exit_on_complete: true,
        }
    }
}

// ============================================================================
// SessionRunner
// ============================================================================

/// Drives an engine from a tokio interval and a command channel.
pub struct SessionRunner {
    engine: RoundTimerEngine,
    effect_tx: mpsc::UnboundedSender<TimerEffect>,
    options: SessionOptions,
}

impl SessionRunner {
    /// Creates a runner around `engine`, forwarding effects to `effect_tx`.
    pub fn new(
        engine: RoundTimerEngine,
        effect_tx: mpsc::UnboundedSender<TimerEffect>,
        options: SessionOptions,
    ) -> Self {
        Self {
            engine,
            effect_tx,
            options,
        }
    }

    /// Runs until the session completes, `Quit` arrives, or every command
    /// sender is dropped.
    ///
    /// Returns the engine in its final state. The effect channel closes when
    /// this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the effect receiver has been dropped.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    ) -> Result<RoundTimerEngine> {
        let mut ticker = interval(self.options.tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a fresh interval completes immediately
        ticker.reset();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !self.engine.is_running() {
                        continue;
                    }
                    let finished = self.handle_tick()?;
                    if finished && self.options.exit_on_complete {
                        break;
                    }
                }
                command = commands.recv() => {
                    match command {
                        Some(SessionCommand::Quit) => {
                            info!("Session runner stopped by user");
                            break;
                        }
                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                        Some(command) => self.handle_command(command, &mut ticker)?,
                    }
                }
            }
        }

        Ok(self.engine)
    }

    /// Feeds one tick to the engine and forwards its effects.
    ///
    /// Returns true if the session completed on this tick.
    fn handle_tick(&mut self) -> Result<bool> {
        let effects = match self.engine.tick() {
            Ok(effects) => effects,
            Err(e) if e.is_benign() => {
                debug!("Tick dropped: {}", e);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        };

        let mut round_completed = false;
        let mut session_completed = false;
        for effect in effects {
            if effect.is_session_end() {
                session_completed = true;
            } else if matches!(effect, TimerEffect::RoundCompleted { .. }) {
                round_completed = true;
            }
            self.send(effect)?;
        }

        if round_completed {
            if self.options.auto_advance {
                self.engine.start()?;
                debug!("Auto-advancing to the next round");
            } else {
                self.send_state()?;
            }
        }
        if session_completed {
            self.send_state()?;
        }

        Ok(session_completed)
    }

    /// Applies one user command to the engine.
    fn handle_command(&mut self, command: SessionCommand, ticker: &mut Interval) -> Result<()> {
        let was_running = self.engine.is_running();
        let is_accept = matches!(command, SessionCommand::Accept(_));

        let result = match command {
            SessionCommand::Toggle => self.engine.toggle_start().map(|_| ()),
            SessionCommand::Start => self.engine.start(),
            SessionCommand::Stop => self.engine.stop(),
            SessionCommand::Accept(setting) => self.engine.accept(setting),
            SessionCommand::Quit => Ok(()),
        };

        match result {
            Ok(()) if is_accept => {
                // Show the fresh countdown right away
                self.send(TimerEffect::Display(self.engine.snapshot()))?;
            }
            Ok(()) => {}
            Err(e) if e.is_benign() => {
                debug!("Command ignored: {}", e);
                return Ok(());
            }
            Err(e) => {
                warn!("Command rejected: {}", e);
                return Ok(());
            }
        }

        if self.engine.is_running() && !was_running {
            // A full period until the first second is charged
            ticker.reset();
        }
        self.send_state()
    }

    fn send_state(&self) -> Result<()> {
        self.send(TimerEffect::StateChanged {
            state: self.engine.state(),
        })
    }

    fn send(&self, effect: TimerEffect) -> Result<()> {
        self.effect_tx
            .send(effect)
            .context("Failed to send timer effect")
    }
}

// ============================================================================
// Tests
// ============================================================================
