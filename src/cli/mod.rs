//! CLI module for the round timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Terminal output formatting
//! - `presenter`: Routing of timer effects to the display and sound
//! - `run`: The interactive session loop

pub mod commands;
pub mod display;
pub mod presenter;
pub mod run;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
pub use presenter::{OutputMode, Presenter};
