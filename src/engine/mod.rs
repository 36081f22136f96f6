//! Engine module for the round timer.
//!
//! This module contains the core timer functionality:
//! - `timer`: Countdown state machine and tick algorithm
//! - `session`: Tick source that serializes ticks and user commands
//! - `error`: Engine error types

pub mod error;
pub mod session;
pub mod timer;

pub use error::TimerError;
pub use session::{SessionCommand, SessionOptions, SessionRunner, DEFAULT_TICK_PERIOD};
pub use timer::{RoundTimerEngine, TimerEffect};
