//! CLI entrypoint for the scry client.
//!
//! The binary delegates to [`scry_cli::run`], which loads configuration,
//! compiles the queued commands, and executes them against the configured
//! daemon transport.

use std::io::{self, IsTerminal, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let mut stdin: StdinLock<'_> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    scry_cli::run(
        std::env::args_os(),
        &mut stdin,
        &mut stdout,
        &mut stderr,
        stdout_is_terminal,
    )
}
