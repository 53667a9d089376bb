//! Command-line client runtime for the scryd code-indexing daemon.
//!
//! The crate owns argument parsing, configuration bootstrapping, command
//! compilation, and session execution over the daemon transport. The runtime
//! is designed to be exercised both from the binary entrypoint and from tests
//! where configuration loading and IO streams can be substituted.

use std::env;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{CommandFactory, FromArgMatches};

mod builder;
mod cli;
mod command;
mod config;
mod dispatch;
mod errors;
mod session;
mod telemetry;
mod terminal;
mod transport;

use crate::builder::{BuildInputs, build};
use crate::cli::Cli;
use crate::config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use crate::config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use crate::errors::AppError;
use crate::session::Session;

/// CLI flags recognised by the configuration loader.
///
/// MAINTENANCE: This list must be kept in sync with the configuration flags
/// defined in `scry-config`. When adding new configuration options, update
/// this array accordingly.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--daemon-socket",
    "--log-filter",
    "--log-format",
    "--exit-policy",
];

/// Bundles the IO streams provided to the CLI runtime.
///
/// `IoStreams` owns the long-lived handles used while compiling and executing
/// commands: stdin feeds unsaved-file overlays and batched compile commands,
/// stdout receives daemon responses, stderr receives diagnostics.
pub(crate) struct IoStreams<'a, S: Read, W: Write, E: Write> {
    pub(crate) stdin: &'a mut S,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, S: Read, W: Write, E: Write> IoStreams<'a, S, W, E> {
    pub(crate) fn new(
        stdin: &'a mut S,
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

struct CliRunner<'a, S: Read, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, S, W, E>,
    loader: &'a L,
}

impl<'a, S, W, E, L> CliRunner<'a, S, W, E, L>
where
    S: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, S, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = prepare_cli_arguments(&args, &split);

        match self.parse_and_execute(&args, &split, cli_arguments) {
            Ok(exit_code) => exit_code,
            Err(error) => {
                let _ = writeln!(self.io.stderr, "{error}");
                ExitCode::FAILURE
            }
        }
    }

    fn parse_and_execute(
        &mut self,
        args: &[OsString],
        split: &ConfigArgumentSplit,
        cli_arguments: Vec<OsString>,
    ) -> Result<ExitCode, AppError> {
        let matches = match Cli::command().try_get_matches_from(cli_arguments) {
            Ok(matches) => matches,
            Err(error)
                if matches!(
                    error.kind(),
                    clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
                ) =>
            {
                write!(self.io.stdout, "{error}").map_err(AppError::ForwardResponse)?;
                return Ok(ExitCode::SUCCESS);
            }
            Err(error) => return Err(AppError::CliUsage(error)),
        };
        let cli = Cli::from_arg_matches(&matches).map_err(AppError::CliUsage)?;
        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let argv: Vec<String> = args
            .iter()
            .map(|argument| argument.to_string_lossy().into_owned())
            .collect();
        let cwd = current_directory()?;

        let inputs = BuildInputs {
            cli: &cli,
            matches: &matches,
            config: &config,
            argv,
            cwd,
            terminal_width: terminal::terminal_width(),
            stdout_is_terminal: self.io.stdout_is_terminal(),
        };
        let queue = build(&inputs, &mut *self.io.stdin, &mut *self.io.stderr)?;

        let mut session = Session::new();
        let status = session.run(&queue, &mut *self.io.stdout)?;
        Ok(exit_code_from_status(status))
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, S, W, E>(
    args: I,
    stdin: &mut S,
    stdout: &mut W,
    stderr: &mut E,
    stdout_is_terminal: bool,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    S: Read,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr, stdout_is_terminal);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, S, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, S, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    S: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    let mut cli_arguments: Vec<OsString> = Vec::new();
    if let Some(first) = args.first() {
        cli_arguments.push(first.clone());
    }
    if split.command_start < args.len() {
        cli_arguments.extend(args[split.command_start..].iter().cloned());
    }
    cli_arguments
}

fn current_directory() -> Result<Utf8PathBuf, AppError> {
    let cwd = env::current_dir()
        .map_err(|error| AppError::Usage(format!("cannot determine working directory: {error}")))?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|cwd| AppError::Usage(format!("working directory {} is not UTF-8", cwd.display())))
}

fn exit_code_from_status(status: i32) -> ExitCode {
    if (0..=255).contains(&status) {
        ExitCode::from(status as u8)
    } else {
        ExitCode::FAILURE
    }
}
