//! Tests for the command sequence builder.
//!
//! Cover ordering, exclusive-mode enforcement, silent suppression, eager
//! location encoding, and the unsaved-file stdin contract — everything that
//! must fail before a single byte reaches the wire.

use std::io::Cursor;

use camino::Utf8PathBuf;
use clap::{CommandFactory, FromArgMatches};

use scry_config::{Config, SocketEndpoint};
use scry_protocol::{OffsetRange, QueryFlags, QueryType, encode_path_with_range};

use crate::builder::{BuildInputs, CommandQueue, build};
use crate::cli::Cli;
use crate::command::Command;
use crate::errors::AppError;

fn build_queue_with_stdin(args: &[&str], stdin_bytes: &[u8]) -> Result<CommandQueue, AppError> {
    let mut full = vec!["scry"];
    full.extend_from_slice(args);
    let argv: Vec<String> = full.iter().map(|argument| (*argument).to_owned()).collect();
    let matches = Cli::command()
        .try_get_matches_from(full)
        .expect("arguments should parse");
    let cli = Cli::from_arg_matches(&matches).expect("cli from matches");
    let config = Config::default();
    let inputs = BuildInputs {
        cli: &cli,
        matches: &matches,
        config: &config,
        argv,
        cwd: Utf8PathBuf::from("/work"),
        terminal_width: 80,
        stdout_is_terminal: false,
    };
    let mut stdin = Cursor::new(stdin_bytes.to_vec());
    let mut stderr = Vec::new();
    build(&inputs, &mut stdin, &mut stderr)
}

fn build_queue(args: &[&str]) -> Result<CommandQueue, AppError> {
    build_queue_with_stdin(args, b"")
}

fn query_types(queue: &CommandQueue) -> Vec<QueryType> {
    queue
        .commands
        .iter()
        .filter_map(|command| match command {
            Command::Query(query) => Some(query.query_type),
            _ => None,
        })
        .collect()
}

#[test]
fn commands_accumulate_in_flag_order() {
    let queue = build_queue(&["--status", "--reindex", "foo", "--status"]).expect("build");
    assert_eq!(
        query_types(&queue),
        vec![QueryType::Status, QueryType::Reindex, QueryType::Status]
    );
}

#[test]
fn repeated_flags_yield_independent_commands() {
    let queue = build_queue(&["--project", "alpha", "--project", "beta"]).expect("build");
    let queries: Vec<&str> = queue
        .commands
        .iter()
        .filter_map(|command| match command {
            Command::Query(query) => Some(query.query.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(queries, vec!["alpha", "beta"]);
}

#[test]
fn second_mode_flag_fails_the_whole_parse() {
    let error = build_queue(&["--follow-location", "/tmp/a.cpp:1:1", "--list-symbols", "main"])
        .expect_err("exclusive modes must not coexist");
    assert!(matches!(
        error,
        AppError::ExclusiveMode {
            first: "follow-location",
            second: "list-symbols",
        }
    ));
}

#[test]
fn repeating_one_mode_flag_also_fails() {
    let error = build_queue(&[
        "--follow-location",
        "/tmp/a.cpp:1:1",
        "--follow-location",
        "/tmp/b.cpp:2:2",
    ])
    .expect_err("a second mode selection must fail");
    assert!(matches!(error, AppError::ExclusiveMode { .. }));
}

#[test]
fn project_selection_is_silenced_alongside_other_commands() {
    let queue = build_queue(&["--project", "foo", "--status"]).expect("build");
    assert!(queue.commands[0].is_silent());
    assert!(!queue.commands[1].is_silent());
}

#[test]
fn lone_project_selection_stays_audible() {
    let queue = build_queue(&["--project", "foo"]).expect("build");
    assert!(!queue.commands[0].is_silent());
}

#[test]
fn malformed_location_fails_before_anything_is_queued() {
    let error = build_queue(&["--follow-location", "nope"]).expect_err("bad location");
    assert!(matches!(error, AppError::Location(_)));
}

#[test]
fn follow_location_encodes_a_canonical_token() {
    let queue = build_queue(&["--follow-location", "./src/../src/a.rs:3:4"]).expect("build");
    let Command::Query(query) = &queue.commands[0] else {
        panic!("expected a query command");
    };
    assert_eq!(query.query, "/work/src/a.rs:3:4");
    assert!(query.extra_flags.contains(QueryFlags::HAS_LOCATION));
}

#[test]
fn quit_server_defaults_to_exit_code_zero() {
    let queue = build_queue(&["--quit-server"]).expect("build");
    assert_eq!(queue.commands[0], Command::Quit { exit_code: 0 });
}

#[test]
fn quit_server_accepts_an_explicit_code() {
    let queue = build_queue(&["--quit-server", "7"]).expect("build");
    assert_eq!(queue.commands[0], Command::Quit { exit_code: 7 });
}

#[test]
fn quit_server_rejects_non_numeric_codes() {
    let error = build_queue(&["--quit-server", "soon"]).expect_err("bad quit code");
    assert!(matches!(error, AppError::Usage(_)));
}

#[test]
fn empty_invocation_queues_nothing() {
    let error = build_queue(&[]).expect_err("no commands");
    assert!(matches!(error, AppError::NoCommands));
}

#[test]
fn socket_address_overrides_the_configured_endpoint() {
    let queue = build_queue(&["--socket-address", "localhost:9005", "--status"]).expect("build");
    assert_eq!(
        queue.settings.endpoint,
        SocketEndpoint::tcp("localhost", 9005)
    );
}

#[test]
fn socket_address_rejects_bad_ports() {
    let error =
        build_queue(&["--socket-address", "localhost:http", "--status"]).expect_err("bad port");
    assert!(matches!(error, AppError::Usage(_)));
}

#[test]
fn range_filter_parses_into_the_context() {
    let queue = build_queue(&["--range-filter", "1-5", "--status"]).expect("build");
    assert_eq!(
        queue.context.range_filter,
        Some(OffsetRange::new(1, 5).expect("range"))
    );
}

#[test]
fn inverted_range_filter_fails() {
    let error = build_queue(&["--range-filter", "9-3", "--status"]).expect_err("bad range");
    assert!(matches!(error, AppError::Range(_)));
}

#[test]
fn unsaved_file_reads_exactly_the_declared_bytes() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let path = file.path().to_str().expect("utf8 path").to_owned();
    let spec = format!("{path}:5");
    let queue =
        build_queue_with_stdin(&["--unsaved-file", &spec, "--status"], b"hellomore").expect("build");
    let contents = queue
        .context
        .unsaved_files
        .values()
        .next()
        .expect("one unsaved file");
    assert_eq!(contents, "hello");
}

#[test]
fn unsaved_file_short_read_fails_loudly() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let path = file.path().to_str().expect("utf8 path").to_owned();
    let spec = format!("{path}:10");
    let error = build_queue_with_stdin(&["--unsaved-file", &spec, "--status"], b"hi")
        .expect_err("short read");
    assert!(matches!(
        error,
        AppError::UnsavedFileShortRead {
            expected: 10,
            actual: 2,
            ..
        }
    ));
}

#[test]
fn unsaved_file_spec_requires_a_byte_count() {
    let error =
        build_queue_with_stdin(&["--unsaved-file", "main.cpp", "--status"], b"").expect_err("spec");
    assert!(matches!(error, AppError::UnsavedFileSyntax(_)));
}

#[test]
fn tokens_queries_carry_a_compound_payload() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let path = file.path().to_str().expect("utf8 path").to_owned();
    let spec = format!("{path}:1-9");
    let queue = build_queue(&["--tokens", &spec]).expect("build");
    let Command::Query(query) = &queue.commands[0] else {
        panic!("expected a query command");
    };
    assert_eq!(query.query_type, QueryType::Tokens);
    let expected = encode_path_with_range(
        camino::Utf8Path::new(&path),
        OffsetRange::new(1, 9).expect("range"),
    );
    assert_eq!(query.query, expected);
}

#[test]
fn dependency_filter_requires_an_existing_file() {
    let error = build_queue(&["--dependency-filter", "/definitely/missing.c", "--status"])
        .expect_err("missing dependency filter");
    assert!(matches!(error, AppError::Usage(_)));
}
