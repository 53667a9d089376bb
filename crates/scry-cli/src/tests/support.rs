//! Shared harness for CLI tests.

mod fake_daemon;

use std::ffi::OsString;
use std::io::Cursor;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};

use scry_config::{Config, SocketEndpoint};
use scry_protocol::ServerMessage;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

pub(in crate::tests) use fake_daemon::FakeDaemon;

/// One JSONL completion signal.
pub(in crate::tests) fn done_line(status: i32) -> String {
    serde_json::to_string(&ServerMessage::Done { status }).unwrap_or_default()
}

/// One JSONL textual response.
pub(in crate::tests) fn response_line(text: &str) -> String {
    serde_json::to_string(&ServerMessage::Response {
        text: text.to_owned(),
    })
    .unwrap_or_default()
}

/// `count` scripts that each answer one request with the given lines.
pub(in crate::tests) fn scripts_of(count: usize, lines: Vec<String>) -> Vec<Vec<String>> {
    std::iter::repeat_with(|| lines.clone()).take(count).collect()
}

pub(in crate::tests) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Drives the CLI runtime against a [`FakeDaemon`] with captured streams.
#[derive(Default)]
pub(in crate::tests) struct TestWorld {
    pub config: Config,
    pub daemon: Option<FakeDaemon>,
    pub stdin: Vec<u8>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
}

impl TestWorld {
    /// Starts a daemon answering each request with the given scripts and
    /// points the configuration at it.
    pub fn start_daemon(&mut self, scripts: Vec<Vec<String>>) -> Result<()> {
        let daemon = FakeDaemon::spawn(scripts)?;
        self.config.daemon_socket = SocketEndpoint::tcp("127.0.0.1", daemon.port());
        self.daemon = Some(daemon);
        Ok(())
    }

    /// Runs the CLI with whitespace-split arguments.
    pub fn run(&mut self, command: &str) -> Result<()> {
        let args = Self::build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut stdin = Cursor::new(std::mem::take(&mut self.stdin));
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let exit = {
            let mut io = IoStreams::new(&mut stdin, &mut stdout, &mut stderr, false);
            run_with_loader(args, &mut io, &loader)
        };
        self.stdout = stdout;
        self.stderr = stderr;
        self.exit_code = Some(exit);
        self.requests.clear();
        if let Some(daemon) = self.daemon.as_mut() {
            self.requests = daemon.take_requests()?;
        }
        Ok(())
    }

    fn build_args(command: &str) -> Vec<OsString> {
        let mut args = vec![OsString::from("scry")];
        let trimmed = command.trim();
        if !trimmed.is_empty() {
            args.extend(
                trimmed
                    .split_whitespace()
                    .map(|token| OsString::from(token.trim_matches('"'))),
            );
        }
        args
    }

    pub fn stdout_text(&self) -> Result<String> {
        String::from_utf8(self.stdout.clone()).context("stdout utf8")
    }

    pub fn stderr_text(&self) -> Result<String> {
        String::from_utf8(self.stderr.clone()).context("stderr utf8")
    }

    pub fn assert_exit_code(&self, expected: u8) -> Result<()> {
        let exit = self.exit_code.ok_or_else(|| anyhow!("exit code missing"))?;
        if exit != ExitCode::from(expected) {
            return Err(anyhow!("expected exit code {expected}, got {exit:?}"));
        }
        Ok(())
    }

    pub fn assert_failure(&self) -> Result<()> {
        let exit = self.exit_code.ok_or_else(|| anyhow!("exit code missing"))?;
        if exit != ExitCode::FAILURE {
            return Err(anyhow!("expected failure, got {exit:?}"));
        }
        Ok(())
    }

    /// The `kind` tag of each recorded request, in arrival order.
    pub fn request_kinds(&self) -> Vec<String> {
        self.requests
            .iter()
            .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
            .filter_map(|value| value["kind"].as_str().map(str::to_owned))
            .collect()
    }
}
