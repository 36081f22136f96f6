//! Display utilities for the round timer CLI.
//!
//! This module provides formatted terminal output for:
//! - The live countdown line (time, round counter, progress bar)
//! - Round and session messages
//! - Preset listing and errors

use std::io::{self, Write};

use crate::types::{DisplayUpdate, EngineState, RollPreset, RoundTimerConfig};

/// Width of the progress bar, in cells.
pub const PROGRESS_BAR_WIDTH: usize = 30;

/// Clears the current terminal line.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Redraws the countdown line in place.
    pub fn render_update(update: &DisplayUpdate) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}{}", CLEAR_LINE, Self::format_update(update));
        let _ = stdout.flush();
    }

    /// Shows the session settings before the first round.
    pub fn show_session_banner(config: &RoundTimerConfig) {
        println!(
            "{} x {} min rounds, warning at 0:{:02}",
            config.total_rounds(),
            config.round_duration_minutes(),
            config.warning_offset_seconds()
        );
        println!("Enter: start/pause   s: start   stop: pause   q: quit");
    }

    /// Shows a state change message.
    pub fn show_state(state: EngineState) {
        let message = match state {
            EngineState::Running => "> running",
            EngineState::Ready => "|| stopped (Enter to start)",
            EngineState::Completed => "session complete",
            EngineState::Idle => "no session",
        };
        Self::show_line(message);
    }

    /// Shows the start of a round.
    pub fn show_round_started(round: u32, total_rounds: u32) {
        Self::show_line(&format!("Round {}/{}", round, total_rounds));
    }

    /// Shows the end-of-round warning.
    pub fn show_warning(seconds_left: u32) {
        Self::show_line(&format!("! {} seconds left", seconds_left));
    }

    /// Shows the end of a round.
    pub fn show_round_completed(round: u32, total_rounds: u32) {
        Self::show_line(&format!("Round {}/{} done", round, total_rounds));
    }

    /// Shows the end of the session.
    pub fn show_session_completed(total_rounds: u32) {
        Self::show_line(&format!("All {} rounds done", total_rounds));
    }

    /// Lists the presets.
    pub fn show_presets() {
        println!("{}", Self::format_presets());
    }

    /// Rings the terminal bell.
    pub fn ring_bell() {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\x07");
        let _ = stdout.flush();
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Prints a message on its own line, replacing the countdown line.
    fn show_line(message: &str) {
        println!("{}{}", CLEAR_LINE, message);
    }

    /// Formats the countdown line.
    pub fn format_update(update: &DisplayUpdate) -> String {
        format!(
            "Round {:>5}  {}  {} {:>3}%",
            update.round_label(),
            update.countdown_label(),
            Self::format_progress_bar(update.progress_fraction, PROGRESS_BAR_WIDTH),
            (update.progress_fraction * 100.0).round() as u32
        )
    }

    /// Formats a progress fraction as a bar of `width` cells.
    pub fn format_progress_bar(fraction: f64, width: usize) -> String {
        let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }

    /// Formats the preset table.
    pub fn format_presets() -> String {
        RollPreset::ALL
            .iter()
            .map(|p| format!("{:<8}{:>3} min", p.as_str(), p.round_minutes()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// ============================================================================
// Tests
// ============================================================================
