//! Tests for the session executor against the fake daemon.
//!
//! Exercise FIFO dispatch, timeout abort, exit-policy resolution, response
//! rendering, and connection failures end to end through the CLI runtime.

use crate::tests::support::{TestWorld, done_line, response_line, scripts_of};

use scry_config::{ExitPolicy, SocketEndpoint};
use scry_protocol::QueryFlags;

#[test]
fn query_then_quit_runs_in_order_and_exits_zero() {
    let mut world = TestWorld::default();
    world
        .start_daemon(scripts_of(4, vec![done_line(0)]))
        .expect("start daemon");
    world
        .run("--follow-location /tmp/a.cpp:10:4 --quit-server")
        .expect("run");
    world.assert_exit_code(0).expect("exit code");
    assert_eq!(world.request_kinds(), vec!["query", "quit"]);

    let first: serde_json::Value =
        serde_json::from_str(&world.requests[0]).expect("first request json");
    assert_eq!(first["query_type"], "follow_location");
    assert_eq!(first["query"], "/tmp/a.cpp:10:4");
}

#[test]
fn timeout_aborts_the_remaining_queue() {
    let mut world = TestWorld::default();
    // One script with no completion signal: the first command hangs.
    world.start_daemon(vec![Vec::new()]).expect("start daemon");
    world
        .run("--timeout 100 --status --status")
        .expect("run");
    world.assert_failure().expect("failure");
    assert_eq!(
        world.requests.len(),
        1,
        "commands after a timeout must never be sent"
    );
    assert!(
        world.stderr_text().expect("stderr").contains("timed out"),
        "timeout should be reported"
    );
}

#[test]
fn any_zero_policy_propagates_the_last_status_when_none_succeeded() {
    let mut world = TestWorld::default();
    world
        .start_daemon(vec![vec![done_line(3)], vec![done_line(5)]])
        .expect("start daemon");
    world.run("--status --status").expect("run");
    world.assert_exit_code(5).expect("exit code");
}

#[test]
fn any_zero_policy_succeeds_when_any_command_succeeded() {
    let mut world = TestWorld::default();
    world
        .start_daemon(vec![vec![done_line(3)], vec![done_line(0)]])
        .expect("start daemon");
    world.run("--status --status").expect("run");
    world.assert_exit_code(0).expect("exit code");
}

#[test]
fn completion_policy_ignores_nonzero_statuses() {
    let mut world = TestWorld::default();
    world.config.exit_policy = ExitPolicy::Completion;
    world
        .start_daemon(vec![vec![done_line(3)], vec![done_line(5)]])
        .expect("start daemon");
    world.run("--status --status").expect("run");
    world.assert_exit_code(0).expect("exit code");
}

#[test]
fn responses_render_to_stdout_as_they_arrive() {
    let mut world = TestWorld::default();
    world
        .start_daemon(vec![vec![response_line("/tmp/a.cpp:10:4 int x"), done_line(0)]])
        .expect("start daemon");
    world.run("--status").expect("run");
    world.assert_exit_code(0).expect("exit code");
    assert_eq!(world.stdout_text().expect("stdout"), "/tmp/a.cpp:10:4 int x\n");
}

#[test]
fn silent_mode_suppresses_response_text() {
    let mut world = TestWorld::default();
    world
        .start_daemon(vec![vec![response_line("noise"), done_line(0)]])
        .expect("start daemon");
    world.run("-Q --status").expect("run");
    world.assert_exit_code(0).expect("exit code");
    assert!(world.stdout_text().expect("stdout").is_empty());
}

#[test]
fn unknown_inbound_frames_are_logged_and_skipped() {
    let mut world = TestWorld::default();
    world
        .start_daemon(vec![vec![
            String::from("{\"kind\":\"progress\",\"pct\":50}"),
            done_line(0),
        ]])
        .expect("start daemon");
    world.run("--status").expect("run");
    world.assert_exit_code(0).expect("exit code");
    assert!(world.stdout_text().expect("stdout").is_empty());
}

#[test]
fn connection_failure_aborts_before_any_command() {
    let mut world = TestWorld::default();
    world.config.daemon_socket = SocketEndpoint::tcp("127.0.0.1", 1);
    world.run("--status").expect("run");
    world.assert_failure().expect("failure");
    assert!(
        world
            .stderr_text()
            .expect("stderr")
            .contains("failed to connect"),
        "connection errors should be reported"
    );
}

#[test]
fn suppressed_project_selection_travels_with_the_silent_flag() {
    let mut world = TestWorld::default();
    world
        .start_daemon(scripts_of(4, vec![done_line(0)]))
        .expect("start daemon");
    world.run("--project foo --is-indexing").expect("run");
    world.assert_exit_code(0).expect("exit code");

    let first: serde_json::Value =
        serde_json::from_str(&world.requests[0]).expect("first request json");
    let second: serde_json::Value =
        serde_json::from_str(&world.requests[1]).expect("second request json");
    let silent = u64::from(QueryFlags::SILENT.bits());
    let first_flags = first["flags"].as_u64().expect("first flags");
    let second_flags = second["flags"].as_u64().expect("second flags");
    assert_ne!(first_flags & silent, 0, "project selection must be silent");
    assert_eq!(second_flags & silent, 0, "other queries stay audible");
}
