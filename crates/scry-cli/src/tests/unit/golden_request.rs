//! Golden wire-format check for outbound query frames.
//!
//! The daemon parses these frames byte for byte; this test pins the exact
//! serialisation so field reordering or renaming shows up as a diff.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use scry_protocol::{LogLevel, LogStyle, QueryFlags, QueryType};

use crate::command::{Command, QueryCommand, SessionContext};

fn golden_context() -> SessionContext {
    SessionContext {
        query_flags: QueryFlags::empty(),
        max: None,
        range_filter: None,
        path_filters: BTreeSet::new(),
        kind_filters: BTreeSet::new(),
        build_index: 0,
        current_file: Vec::new(),
        terminal_width: 80,
        unsaved_files: Arc::new(BTreeMap::new()),
        argv: vec![
            String::from("scry"),
            String::from("--follow-location"),
            String::from("/tmp/a.cpp:10:4"),
        ],
        guess_flags: false,
        project_root: None,
        path_environment: Vec::new(),
        log_level: LogLevel::Error,
        log_style: LogStyle::Plain,
    }
}

#[test]
fn follow_location_request_matches_golden() {
    let context = golden_context();
    let command = Command::Query(
        QueryCommand::new(QueryType::FollowLocation, "/tmp/a.cpp:10:4")
            .with_flags(QueryFlags::HAS_LOCATION),
    );
    let actual = command
        .encode(&context)
        .to_jsonl()
        .expect("serialise request");
    let expected = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/golden/request_follow_location.jsonl"
    ));
    assert_eq!(actual, expected);
}
