//! Roll Timer Library
//!
//! This library provides the core functionality for the round timer CLI.
//! It includes:
//! - Round timer engine (countdown state machine and tick algorithm)
//! - Session runner that delivers ticks and user commands in order
//! - Type definitions for settings, configuration and display updates
//! - Sound playback for the end-of-round warning
//! - CLI command parsing and display utilities

pub mod cli;
pub mod engine;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use engine::{
    RoundTimerEngine, SessionCommand, SessionOptions, SessionRunner, TimerEffect, TimerError,
};
pub use types::{
    ConfigError, DisplayUpdate, EngineState, RollPreset, RollSetting, RoundTimerConfig,
};

// Re-export sound types
pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};
