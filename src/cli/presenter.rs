//! Routes timer effects to the terminal and the alert sound.

use anyhow::{Context, Result};
use tracing::warn;

use super::display::Display;
use crate::engine::TimerEffect;
use crate::sound::{SoundPlayer, SoundSource};

/// How effects are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable countdown line
    #[default]
    Text,
    /// One JSON object per effect
    Json,
}

/// How a warning reached the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alert {
    Sound,
    Bell,
    Silent,
}

/// Render and alert sink for a running session.
pub struct Presenter<P: SoundPlayer> {
    player: Option<P>,
    source: SoundSource,
    mode: OutputMode,
}

impl<P: SoundPlayer> Presenter<P> {
    /// Creates a presenter. Without a working audio device the warning rings
    /// the terminal bell in text mode.
    pub fn new(player: Option<P>, source: SoundSource, mode: OutputMode) -> Self {
        Self {
            player,
            source,
            mode,
        }
    }

    /// Returns the sound player, if any.
    pub fn player(&self) -> Option<&P> {
        self.player.as_ref()
    }

    /// Renders one effect and plays the alert for warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the effect cannot be serialized in JSON mode.
    /// Sound failures are logged, never returned.
    pub fn handle(&self, effect: &TimerEffect) -> Result<()> {
        match self.mode {
            OutputMode::Json => println!("{}", Self::to_json(effect)?),
            OutputMode::Text => Self::render_text(effect),
        }

        if let TimerEffect::Warning { .. } = effect {
            self.alert();
        }
        Ok(())
    }

    /// Serializes an effect as a single JSON line.
    pub fn to_json(effect: &TimerEffect) -> Result<String> {
        serde_json::to_string(effect).context("Failed to serialize timer effect")
    }

    fn render_text(effect: &TimerEffect) {
        match effect {
            TimerEffect::Display(update) => Display::render_update(update),
            TimerEffect::RoundStarted {
                round,
                total_rounds,
            } => Display::show_round_started(*round, *total_rounds),
            TimerEffect::Warning { seconds_left, .. } => Display::show_warning(*seconds_left),
            TimerEffect::RoundCompleted {
                round,
                total_rounds,
            } => Display::show_round_completed(*round, *total_rounds),
            TimerEffect::SessionCompleted { total_rounds } => {
                Display::show_session_completed(*total_rounds)
            }
            TimerEffect::StateChanged { state } => Display::show_state(*state),
        }
    }

    fn alert(&self) -> Alert {
        let alert = match &self.player {
            Some(player) => match player.play(&self.source) {
                Ok(()) => Alert::Sound,
                Err(e) if e.is_device_error() => {
                    warn!("Audio device unavailable, using terminal bell: {}", e);
                    self.fallback_alert()
                }
                Err(e) => {
                    warn!("Failed to play warning sound: {}", e);
                    Alert::Silent
                }
            },
            None => self.fallback_alert(),
        };

        if alert == Alert::Bell {
            Display::ring_bell();
        }
        alert
    }

    fn fallback_alert(&self) -> Alert {
        match self.mode {
            OutputMode::Text => Alert::Bell,
            // The bell byte would corrupt the JSON stream
            OutputMode::Json => Alert::Silent,
        }
    }
}
