//! The session executor: one connection, one command queue, one exit status.
//!
//! The executor owns the connection for the process lifetime. Commands are
//! dispatched strictly first-in first-out; the next frame is written only
//! after the previous command's completion signal has been observed, because
//! later commands may depend on daemon state mutated by earlier ones. A
//! per-command timeout or a dropped connection aborts the remaining queue.
//! The connection is released on every exit path.

use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use crate::builder::{CommandQueue, SessionSettings};
use crate::command::Command;
use crate::dispatch::{DispatchOutcome, dispatch_line};
use crate::errors::AppError;
use crate::transport::{Connection, connect};

/// Lifecycle of the session's single connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    Unconnected,
    Connecting,
    Ready,
    Dispatching,
    AwaitingCompletion,
    Closed,
}

/// Executes the queued commands and computes the final status.
pub(crate) struct Session {
    state: SessionState,
    cursor: usize,
    statuses: Vec<i32>,
}

impl Session {
    pub(crate) const fn new() -> Self {
        Self {
            state: SessionState::Unconnected,
            cursor: 0,
            statuses: Vec::new(),
        }
    }

    /// Runs every queued command in order and resolves the exit status.
    ///
    /// Returns the policy-resolved status when all commands completed, or the
    /// first fatal error. The connection is dropped on both paths.
    pub(crate) fn run<W: Write>(
        &mut self,
        queue: &CommandQueue,
        stdout: &mut W,
    ) -> Result<i32, AppError> {
        self.transition(SessionState::Connecting);
        let connection = connect(&queue.settings.endpoint, queue.settings.connect_timeout)?;
        self.transition(SessionState::Ready);

        let mut reader = BufReader::new(connection);
        let result = self.run_queue(queue, &mut reader, stdout);
        self.transition(SessionState::Closed);
        drop(reader);
        result
    }

    fn run_queue<W: Write>(
        &mut self,
        queue: &CommandQueue,
        reader: &mut BufReader<Connection>,
        stdout: &mut W,
    ) -> Result<i32, AppError> {
        for (index, command) in queue.commands.iter().enumerate() {
            self.cursor = index;
            self.transition(SessionState::Dispatching);
            tracing::debug!(command = %command.describe(), index = self.cursor, "dispatching command");

            let frame = command
                .encode(&queue.context)
                .to_jsonl()
                .map_err(AppError::SerialiseRequest)?;
            reader
                .get_mut()
                .write_all(frame.as_bytes())
                .and_then(|()| reader.get_mut().flush())
                .map_err(AppError::SendRequest)?;

            self.transition(SessionState::AwaitingCompletion);
            let status = await_completion(reader, command, &queue.settings, stdout)?;
            self.statuses.push(status);
        }
        Ok(queue.settings.exit_policy.resolve(&self.statuses))
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }
}

/// Blocks until the in-flight command's completion signal, its timeout, or a
/// connection drop. Inbound frames are dispatched as they arrive.
fn await_completion<W: Write>(
    reader: &mut BufReader<Connection>,
    command: &Command,
    settings: &SessionSettings,
    stdout: &mut W,
) -> Result<i32, AppError> {
    let deadline = settings
        .command_timeout
        .map(|timeout| Instant::now() + timeout);
    let timeout_ms = settings
        .command_timeout
        .map_or(0, |timeout| timeout.as_millis() as u64);
    let mut line = String::new();

    loop {
        if let Some(deadline) = deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(AppError::CommandTimeout {
                    command: command.describe(),
                    timeout_ms,
                });
            }
            reader
                .get_ref()
                .set_read_timeout(Some(remaining))
                .map_err(AppError::ReadResponse)?;
        }

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => {
                return Err(AppError::ConnectionClosed {
                    command: command.describe(),
                });
            }
            Ok(_) => {
                if line.trim().is_empty() {
                    continue;
                }
                if let DispatchOutcome::Completed(status) =
                    dispatch_line(&line, stdout, settings.silent)?
                {
                    return Ok(status);
                }
            }
            Err(error) if is_timeout(&error) => {
                return Err(AppError::CommandTimeout {
                    command: command.describe(),
                    timeout_ms,
                });
            }
            Err(error) => return Err(AppError::ReadResponse(error)),
        }
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
