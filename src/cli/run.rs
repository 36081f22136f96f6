//! The `run` command: wires the engine, tick source, input and sinks together.

use std::io::BufRead;
use std::thread;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::debug;

use super::commands::RunArgs;
use super::display::Display;
use super::presenter::{OutputMode, Presenter};
use crate::engine::{RoundTimerEngine, SessionCommand, SessionOptions, SessionRunner, TimerEffect};
use crate::sound::{try_create_player, SoundSource};
use crate::types::EngineState;

/// Maps one line of keyboard input to a command.
///
/// An empty line (Enter) toggles the timer; `s` and `stop` arm or pause it
/// regardless of the current state.
pub fn parse_input(line: &str) -> Option<SessionCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "p" | "pause" => Some(SessionCommand::Toggle),
        "s" | "start" => Some(SessionCommand::Start),
        "stop" => Some(SessionCommand::Stop),
        "q" | "quit" | "exit" => Some(SessionCommand::Quit),
        _ => None,
    }
}

/// Runs a session in the terminal until it completes or the user quits.
///
/// Returns the final engine state.
///
/// # Errors
///
/// Returns an error for invalid settings, an unreadable sound file, or a
/// failure inside the session task.
pub async fn run(args: &RunArgs) -> Result<EngineState> {
    let mut engine = RoundTimerEngine::new();
    engine
        .accept(args.setting())
        .context("Invalid session settings")?;
    if args.start {
        engine.start()?;
    }

    let source = match &args.sound {
        Some(path) => SoundSource::from_path(path)
            .with_context(|| format!("Cannot use sound file {}", path.display()))?,
        None => SoundSource::default(),
    };
    let player = if args.no_sound {
        None
    } else {
        try_create_player()
    };
    let mode = if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let presenter = Presenter::new(player, source, mode);

    if let (OutputMode::Text, Some(config)) = (mode, engine.config()) {
        Display::show_session_banner(config);
    }
    presenter.handle(&TimerEffect::StateChanged {
        state: engine.state(),
    })?;
    presenter.handle(&TimerEffect::Display(engine.snapshot()))?;

    let (effect_tx, mut effect_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let options = SessionOptions {
        tick_period: Duration::from_millis(args.tick_millis),
        auto_advance: args.auto_advance,
        exit_on_complete: true,
    };
    let session = tokio::spawn(SessionRunner::new(engine, effect_tx, options).run(command_rx));

    spawn_input_reader(command_tx.clone());

    let interrupt_tx = command_tx;
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received");
            let _ = interrupt_tx.send(SessionCommand::Quit);
        }
    });

    while let Some(effect) = effect_rx.recv().await {
        presenter.handle(&effect)?;
    }

    interrupt.abort();
    let engine = session.await.context("Session task failed")??;

    if mode == OutputMode::Text {
        println!();
    }
    Ok(engine.state())
}

/// Reads keyboard input on a dedicated thread.
///
/// Blocking stdin reads stay off the runtime so shutdown never waits on the
/// keyboard. End of input stops the reader but not the session.
fn spawn_input_reader(command_tx: mpsc::UnboundedSender<SessionCommand>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let Some(command) = parse_input(&line) else {
                debug!("Ignoring input: {:?}", line);
                continue;
            };
            if command_tx.send(command).is_err() {
                break;
            }
        }
        debug!("Input reader finished");
    });
}
