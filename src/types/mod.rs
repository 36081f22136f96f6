//! Core data types for the round timer.
//!
//! This module defines the data structures used for:
//! - Session configuration with validation
//! - Engine state reporting
//! - Display updates handed to the render sink

mod error;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// Seconds value marking the top of a minute, before the first second of it
/// has elapsed.
pub const MINUTE_ROLLOVER: u32 = 60;

/// Highest accepted warning offset.
pub const MAX_WARNING_OFFSET_SECONDS: u32 = 59;

// ============================================================================
// EngineState
// ============================================================================

/// Represents the state of the round timer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No session has been accepted
    #[default]
    Idle,
    /// Session accepted, countdown not consuming ticks
    Ready,
    /// Countdown consuming ticks
    Running,
    /// Every round of the session has finished
    Completed,
}

impl EngineState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Ready => "ready",
            EngineState::Running => "running",
            EngineState::Completed => "completed",
        }
    }

}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RollSetting
// ============================================================================

/// Raw session settings as entered by the user.
///
/// Nothing is checked here; conversion into a [`RoundTimerConfig`] validates
/// the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollSetting {
    /// Round length in whole minutes
    pub round_time: u32,
    /// Seconds left in the final minute when the warning sounds
    pub warning_time: u32,
    /// Number of rounds in the session
    pub number_of_rounds: u32,
}

impl Default for RollSetting {
    fn default() -> Self {
        Self {
            round_time: 5,
            warning_time: 10,
            number_of_rounds: 5,
        }
    }
}

impl RollSetting {
    /// Creates a new setting.
    pub fn new(round_time: u32, warning_time: u32, number_of_rounds: u32) -> Self {
        Self {
            round_time,
            warning_time,
            number_of_rounds,
        }
    }

    /// Creates a setting from a preset's round length.
    pub fn from_preset(preset: RollPreset, warning_time: u32, number_of_rounds: u32) -> Self {
        Self::new(preset.round_minutes(), warning_time, number_of_rounds)
    }
}

// ============================================================================
// RoundTimerConfig
// ============================================================================

/// Validated, immutable description of a training session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTimerConfig {
    round_duration_minutes: u32,
    warning_offset_seconds: u32,
    total_rounds: u32,
}

impl RoundTimerConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first out-of-range value.
    pub fn new(
        round_duration_minutes: u32,
        warning_offset_seconds: u32,
        total_rounds: u32,
    ) -> Result<Self, ConfigError> {
        if round_duration_minutes == 0 {
            return Err(ConfigError::RoundDuration(round_duration_minutes));
        }
        if total_rounds == 0 {
            return Err(ConfigError::TotalRounds(total_rounds));
        }
        if warning_offset_seconds > MAX_WARNING_OFFSET_SECONDS {
            return Err(ConfigError::WarningOffset(warning_offset_seconds));
        }
        // total_ticks must fit in u32
        let fits = round_duration_minutes
            .checked_mul(MINUTE_ROLLOVER)
            .and_then(|ticks| ticks.checked_mul(total_rounds))
            .is_some();
        if !fits {
            return Err(ConfigError::SessionTooLong {
                minutes: round_duration_minutes,
                rounds: total_rounds,
            });
        }
        Ok(Self {
            round_duration_minutes,
            warning_offset_seconds,
            total_rounds,
        })
    }

    /// Whole minutes per round.
    pub fn round_duration_minutes(&self) -> u32 {
        self.round_duration_minutes
    }

    /// Seconds remaining in the final minute at which the warning fires.
    pub fn warning_offset_seconds(&self) -> u32 {
        self.warning_offset_seconds
    }

    /// Number of rounds in the session.
    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    /// Ticks needed to run one round to zero.
    pub fn ticks_per_round(&self) -> u32 {
        self.round_duration_minutes * MINUTE_ROLLOVER
    }

    /// Ticks needed to run the whole session.
    pub fn total_ticks(&self) -> u32 {
        self.ticks_per_round() * self.total_rounds
    }
}

impl TryFrom<RollSetting> for RoundTimerConfig {
    type Error = ConfigError;

    fn try_from(setting: RollSetting) -> Result<Self, Self::Error> {
        Self::new(
            setting.round_time,
            setting.warning_time,
            setting.number_of_rounds,
        )
    }
}

// ============================================================================
// RollPreset
// ============================================================================

/// Named round lengths, following adult competition match times per belt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RollPreset {
    White,
    Blue,
    Purple,
    Brown,
    Black,
}

impl RollPreset {
    /// Every preset, shortest round first.
    pub const ALL: [RollPreset; 5] = [
        RollPreset::White,
        RollPreset::Blue,
        RollPreset::Purple,
        RollPreset::Brown,
        RollPreset::Black,
    ];

    /// Round length in minutes.
    pub fn round_minutes(&self) -> u32 {
        match self {
            RollPreset::White => 5,
            RollPreset::Blue => 6,
            RollPreset::Purple => 7,
            RollPreset::Brown => 8,
            RollPreset::Black => 10,
        }
    }

    /// Returns the string representation of the preset.
    pub fn as_str(&self) -> &'static str {
        match self {
            RollPreset::White => "white",
            RollPreset::Blue => "blue",
            RollPreset::Purple => "purple",
            RollPreset::Brown => "brown",
            RollPreset::Black => "black",
        }
    }
}

// ============================================================================
// DisplayUpdate
// ============================================================================

/// Snapshot of everything the render sink shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayUpdate {
    /// Remaining whole minutes
    pub minutes: u32,
    /// Remaining seconds, `60` at the top of a minute
    pub seconds: u32,
    /// Elapsed fraction of the current round
    pub progress_fraction: f64,
    /// Rounds started so far
    pub completed_rounds: u32,
    /// Rounds in the session
    pub total_rounds: u32,
}

impl DisplayUpdate {
    /// Formats the countdown as `MM:SS`.
    ///
    /// The rollover value `60` reads as `00`: `5:60` is five minutes left.
    pub fn countdown_label(&self) -> String {
        let seconds = if self.seconds == MINUTE_ROLLOVER {
            0
        } else {
            self.seconds
        };
        format!("{:02}:{:02}", self.minutes, seconds)
    }

    /// Formats the round counter as `completed/total`.
    pub fn round_label(&self) -> String {
        format!("{}/{}", self.completed_rounds, self.total_rounds)
    }
}

// ============================================================================
// Tests
// ============================================================================
