//! Inbound frame dispatch.
//!
//! Each complete line read from the connection is handled here, independent
//! of which command is in flight. Textual responses are rendered and flushed
//! immediately; completion signals are handed back to the session executor;
//! anything else is a protocol violation that is logged and skipped, never
//! silently dropped and never fatal. Rendering is synchronous and bounded.

use std::io::Write;

use scry_protocol::ServerMessage;

use crate::errors::AppError;

/// What the executor should do after one inbound frame.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DispatchOutcome {
    /// Keep waiting; the frame did not complete the exchange.
    Continue,
    /// The in-flight command finished with this status.
    Completed(i32),
}

pub(crate) fn dispatch_line<W: Write>(
    line: &str,
    stdout: &mut W,
    silent: bool,
) -> Result<DispatchOutcome, AppError> {
    match serde_json::from_str::<ServerMessage>(line) {
        Ok(ServerMessage::Response { text }) => {
            if !silent && !text.is_empty() {
                writeln!(stdout, "{text}").map_err(AppError::ForwardResponse)?;
                stdout.flush().map_err(AppError::ForwardResponse)?;
            }
            Ok(DispatchOutcome::Continue)
        }
        Ok(ServerMessage::Done { status }) => Ok(DispatchOutcome::Completed(status)),
        Err(error) => {
            tracing::warn!(%error, payload = line.trim_end(), "unexpected message from daemon");
            Ok(DispatchOutcome::Continue)
        }
    }
}
