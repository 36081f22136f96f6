//! Command definitions for the round timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{RollPreset, RollSetting};

/// Round length used when neither `--minutes` nor `--preset` is given.
pub const DEFAULT_ROUND_MINUTES: u32 = 5;

// ============================================================================
// CLI Structure
// ============================================================================

/// Round timer for grappling practice sessions
#[derive(Parser, Debug)]
#[command(
    name = "rolltimer",
    version,
    about = "Round timer for grappling practice sessions",
    long_about = "Counts down each round, sounds a warning near the end of the round,\n\
                  and stops after the last round. Press Enter to start or pause.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a session of timed rounds
    Run(RunArgs),

    /// List the named round-length presets
    Presets,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Round length in minutes (1-99) [default: 5]
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..=99),
        conflicts_with = "preset"
    )]
    pub minutes: Option<u32>,

    /// Take the round length from a belt preset
    #[arg(short, long, value_enum)]
    pub preset: Option<RollPreset>,

    /// Seconds left in the final minute when the warning sounds (0-59)
    #[arg(
        short,
        long,
        default_value = "10",
        value_parser = clap::value_parser!(u32).range(0..=59)
    )]
    pub warning: u32,

    /// Number of rounds (1-99)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=99)
    )]
    pub rounds: u32,

    /// Start the next round automatically when one ends
    #[arg(short, long)]
    pub auto_advance: bool,

    /// Start the first round immediately instead of waiting for Enter
    #[arg(short, long)]
    pub start: bool,

    /// Disable the warning sound
    #[arg(long)]
    pub no_sound: bool,

    /// Audio file to play as the warning
    #[arg(long, value_name = "PATH", conflicts_with = "no_sound")]
    pub sound: Option<PathBuf>,

    /// Print every timer event as a JSON line
    #[arg(long)]
    pub json: bool,

    /// Tick period in milliseconds
    #[arg(
        long,
        hide = true,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub tick_millis: u64,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            minutes: None,
            preset: None,
            warning: 10,
            rounds: 5,
            auto_advance: false,
            start: false,
            no_sound: false,
            sound: None,
            json: false,
            tick_millis: 1000,
        }
    }
}

impl RunArgs {
    /// Resolves the arguments into a roll setting.
    pub fn setting(&self) -> RollSetting {
        let round_time = self
            .preset
            .map(|p| p.round_minutes())
            .or(self.minutes)
            .unwrap_or(DEFAULT_ROUND_MINUTES);
        RollSetting::new(round_time, self.warning, self.rounds)
    }
}

// ============================================================================
// Tests
// ============================================================================
