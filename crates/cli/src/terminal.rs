// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Line-oriented terminal front end.
//!
//! Prints the message history as it grows and every connection state change,
//! and maps input lines to session commands. Lines starting with `/` are
//! commands, anything else is sent as a message.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::warn;

use banter_core::{ConnectionState, ConnectionStatus, Message};

use crate::error::Result;
use crate::session::{SessionError, SessionEvent, SessionHandle};

/// Example prompts offered to new users.
pub const EXAMPLE_PROMPTS: [&str; 6] = [
    "What's my account balance?",
    "Block my debit card",
    "Apply for a $15,000 loan for home improvement",
    "Show my recent transactions",
    "Unblock my card",
    "Transfer $500 to savings",
];

const COMMANDS_HELP: &str = "\
Commands:
  /examples     List example prompts
  /1 .. /6      Send an example prompt
  /clear        Clear the message history
  /reconnect    Reconnect now
  /disconnect   Close the connection
  /help         Show this help
  /quit         Leave the session";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Blank line.
    Empty,
    Send(String),
    /// Send `EXAMPLE_PROMPTS[index]`.
    Example(usize),
    Examples,
    Clear,
    Reconnect,
    Disconnect,
    Help,
    Quit,
    Unknown(String),
}

/// Parse one line of user input.
///
/// Message text is sent exactly as typed; trimming only decides whether the
/// line is blank or a command.
pub fn parse_input(line: &str) -> InputCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return InputCommand::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return InputCommand::Send(line.to_string());
    };

    match command.to_ascii_lowercase().as_str() {
        "examples" => InputCommand::Examples,
        "clear" => InputCommand::Clear,
        "reconnect" => InputCommand::Reconnect,
        "disconnect" => InputCommand::Disconnect,
        "help" | "?" => InputCommand::Help,
        "quit" | "exit" | "q" => InputCommand::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if (1..=EXAMPLE_PROMPTS.len()).contains(&n) => InputCommand::Example(n - 1),
            _ => InputCommand::Unknown(trimmed.to_string()),
        },
    }
}

/// Render a message as `[origin] text`.
pub fn format_message(message: &Message) -> String {
    format!("[{}] {}", message.origin, message.text)
}

/// Human-readable connection status.
pub fn describe_status(status: &ConnectionStatus) -> String {
    match status.state {
        ConnectionState::Disconnected if status.retries_exhausted => format!(
            "{} (gave up after {} attempts, use /reconnect)",
            status.state.label(),
            status.attempt
        ),
        ConnectionState::Disconnected if status.attempt > 0 => {
            format!("{} (retry {} scheduled)", status.state.label(), status.attempt)
        }
        ConnectionState::Connecting if status.attempt > 0 => {
            format!("{} (attempt {})", status.state.label(), status.attempt)
        }
        _ => status.state.label().to_string(),
    }
}

/// Forward stdin lines to a channel from a dedicated thread.
///
/// Blocking reads stay off the runtime so shutdown never waits on the
/// terminal.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (lines, receiver) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if lines.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Run the interactive loop until `/quit`, end of input, or the session
/// task stops.
pub async fn run<W: Write>(
    handle: &SessionHandle,
    mut input: mpsc::UnboundedReceiver<String>,
    out: &mut W,
) -> Result<()> {
    let mut events = handle.subscribe();

    writeln!(out, "-- {} --", describe_status(&handle.status()))?;
    for message in &handle.messages() {
        writeln!(out, "{}", format_message(message))?;
    }
    writeln!(out, "Type a message, /examples for ideas or /help for commands.")?;

    loop {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else { break };
                if execute(handle, parse_input(&line), out).await?.is_break() {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(event) => render_event(&event, out)?,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "terminal fell behind session events");
                }
                Err(RecvError::Closed) => break,
            },
        }
        out.flush()?;
    }
    Ok(())
}

async fn execute<W: Write>(
    handle: &SessionHandle,
    command: InputCommand,
    out: &mut W,
) -> Result<ControlFlow<()>> {
    match command {
        InputCommand::Empty => {}
        InputCommand::Send(text) => send(handle, &text, out).await?,
        InputCommand::Example(index) => {
            if let Some(prompt) = EXAMPLE_PROMPTS.get(index) {
                send(handle, prompt, out).await?;
            }
        }
        InputCommand::Examples => {
            for (n, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
                writeln!(out, "  /{}  {}", n + 1, prompt)?;
            }
        }
        InputCommand::Clear => handle.clear_messages().await?,
        InputCommand::Reconnect => handle.reconnect().await?,
        InputCommand::Disconnect => handle.disconnect().await?,
        InputCommand::Help => writeln!(out, "{COMMANDS_HELP}")?,
        InputCommand::Quit => return Ok(ControlFlow::Break(())),
        InputCommand::Unknown(command) => {
            writeln!(out, "unknown command: {command}\n  hint: /help lists the commands")?;
        }
    }
    Ok(ControlFlow::Continue(()))
}

async fn send<W: Write>(handle: &SessionHandle, text: &str, out: &mut W) -> Result<()> {
    match handle.send_message(text).await {
        Ok(_) => Ok(()),
        Err(SessionError::SessionClosed) => Err(SessionError::SessionClosed.into()),
        Err(e) => {
            writeln!(out, "error: {e}")?;
            Ok(())
        }
    }
}

fn render_event<W: Write>(event: &SessionEvent, out: &mut W) -> std::io::Result<()> {
    match event {
        SessionEvent::StatusChanged(status) => writeln!(out, "-- {} --", describe_status(status)),
        SessionEvent::MessageAppended(message) => writeln!(out, "{}", format_message(message)),
        SessionEvent::MessagesCleared => writeln!(out, "-- history cleared --"),
    }
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
