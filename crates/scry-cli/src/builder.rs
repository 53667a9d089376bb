//! Compiles parsed CLI arguments into the ordered command queue.
//!
//! Commands accumulate strictly in the order their flags appeared on the
//! command line; the order is recovered from the clap matches. All user-input
//! validation happens here, before anything is queued, so a bad argument
//! never produces a partially sent message.

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::io::{BufRead, BufReader, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use clap::ArgMatches;

use scry_config::{Config, ExitPolicy, SocketEndpoint};
use scry_protocol::{
    Location, LogLevel, LogStyle, OffsetRange, PathFilter, PathFilterKind, QueryFlags, QueryType,
    encode_path_list, encode_path_with_range, encode_paths_with_args,
};

use crate::cli::Cli;
use crate::command::{Command, CompileCommand, QueryCommand, SessionContext};
use crate::errors::AppError;

/// Everything the session executor needs: the ordered commands, the shared
/// encoding context, and the connection settings.
#[derive(Debug)]
pub(crate) struct CommandQueue {
    pub(crate) commands: Vec<Command>,
    pub(crate) context: SessionContext,
    pub(crate) settings: SessionSettings,
}

/// Connection and policy settings for one session.
#[derive(Debug, Clone)]
pub(crate) struct SessionSettings {
    pub(crate) endpoint: SocketEndpoint,
    pub(crate) connect_timeout: Duration,
    pub(crate) command_timeout: Option<Duration>,
    pub(crate) exit_policy: ExitPolicy,
    pub(crate) silent: bool,
}

/// Inputs the builder consumes besides the IO streams.
pub(crate) struct BuildInputs<'a> {
    pub(crate) cli: &'a Cli,
    pub(crate) matches: &'a ArgMatches,
    pub(crate) config: &'a Config,
    pub(crate) argv: Vec<String>,
    pub(crate) cwd: Utf8PathBuf,
    pub(crate) terminal_width: u32,
    pub(crate) stdout_is_terminal: bool,
}

/// Flags whose queries require exclusive selection.
const MODE_FLAGS: &[&str] = &[
    "follow_location",
    "references",
    "references_name",
    "find_symbols",
    "list_symbols",
    "symbol_info",
];

/// Queue-producing flags, in declaration order. Encounter order on the
/// command line decides dispatch order, not this table.
const QUEUE_FLAGS: &[&str] = &[
    "follow_location",
    "references",
    "references_name",
    "find_symbols",
    "list_symbols",
    "symbol_info",
    "project",
    "delete_project",
    "clear",
    "current_project",
    "status",
    "reindex",
    "check_reindex",
    "find_file",
    "is_indexed",
    "is_indexing",
    "sources",
    "job_count",
    "remove",
    "fixits",
    "preprocess",
    "dump_file",
    "check_includes",
    "dump_file_maps",
    "dependencies",
    "all_dependencies",
    "tokens",
    "suspend",
    "set_buffers",
    "list_buffers",
    "class_hierarchy",
    "diagnose",
    "compile",
    "load_compilation_database",
    "quit_server",
    "tail_logs",
    "diagnostics",
];

pub(crate) fn build<S, E>(
    inputs: &BuildInputs<'_>,
    stdin: &mut S,
    stderr: &mut E,
) -> Result<CommandQueue, AppError>
where
    S: Read,
    E: Write,
{
    let settings = session_settings(inputs.cli, inputs.config)?;
    let context = session_context(inputs, stdin)?;
    let mut commands = collect_commands(inputs, stdin, stderr)?;
    if commands.is_empty() {
        return Err(AppError::NoCommands);
    }
    apply_silent_rule(&mut commands);
    Ok(CommandQueue {
        commands,
        context,
        settings,
    })
}

fn session_settings(cli: &Cli, config: &Config) -> Result<SessionSettings, AppError> {
    let endpoint = if let Some(address) = cli.socket_address.as_deref() {
        SocketEndpoint::from_host_port(address)
            .map_err(|error| AppError::Usage(format!("invalid --socket-address {address}: {error}")))?
    } else if let Some(path) = cli.socket_file.as_deref() {
        SocketEndpoint::unix(path)
    } else {
        config.daemon_socket().clone()
    };
    Ok(SessionSettings {
        endpoint,
        connect_timeout: Duration::from_millis(cli.connect_timeout),
        command_timeout: cli.timeout.filter(|ms| *ms > 0).map(Duration::from_millis),
        exit_policy: cli.exit_policy.unwrap_or_else(|| config.exit_policy()),
        silent: cli.silent,
    })
}

fn session_context<S: Read>(
    inputs: &BuildInputs<'_>,
    stdin: &mut S,
) -> Result<SessionContext, AppError> {
    let cli = inputs.cli;
    let cwd = &inputs.cwd;

    let mut path_filters = BTreeSet::new();
    for value in &cli.path_filter {
        path_filters.insert(PathFilter {
            path: absolutise(cwd, value),
            kind: PathFilterKind::SelfPath,
        });
    }
    for value in &cli.dependency_filter {
        let path = absolutise(cwd, value);
        if !path.is_file() {
            return Err(AppError::Usage(format!(
                "'{value}' doesn't seem to be a file"
            )));
        }
        path_filters.insert(PathFilter {
            path,
            kind: PathFilterKind::Dependency,
        });
    }

    let range_filter = cli
        .range_filter
        .as_deref()
        .map(parse_range)
        .transpose()?;

    let project_root = cli
        .project_root
        .as_deref()
        .map(|value| {
            let path = absolutise(cwd, value);
            if path.is_dir() {
                Ok(path)
            } else {
                Err(AppError::Usage(format!(
                    "'{value}' does not seem to be a directory"
                )))
            }
        })
        .transpose()?;

    Ok(SessionContext {
        query_flags: query_flags(cli, inputs.stdout_is_terminal),
        max: cli.max,
        range_filter,
        path_filters,
        kind_filters: cli.kind_filter.iter().cloned().collect(),
        build_index: cli.build_index.unwrap_or(0),
        current_file: cli
            .current_file
            .iter()
            .map(|value| absolutise(cwd, value))
            .collect(),
        terminal_width: inputs.terminal_width,
        unsaved_files: Arc::new(read_unsaved_files(cli, cwd, stdin)?),
        argv: inputs.argv.clone(),
        guess_flags: cli.guess_flags,
        project_root,
        path_environment: path_environment(),
        log_level: session_log_level(cli),
        log_style: match cli.log_style.as_deref() {
            Some("structured") => LogStyle::Structured,
            _ => LogStyle::Plain,
        },
    })
}

fn query_flags(cli: &Cli, stdout_is_terminal: bool) -> QueryFlags {
    let pairs = [
        (cli.no_context, QueryFlags::NO_CONTEXT),
        (cli.match_regexp, QueryFlags::MATCH_REGEX),
        (cli.match_icase, QueryFlags::MATCH_CASE_INSENSITIVE),
        (cli.reverse_sort, QueryFlags::REVERSE_SORT),
        (cli.all_references, QueryFlags::ALL_REFERENCES),
        (cli.rename, QueryFlags::RENAME),
        (cli.find_virtuals, QueryFlags::FIND_VIRTUALS),
        (cli.absolute_path, QueryFlags::ABSOLUTE_PATH),
        (cli.declaration_only, QueryFlags::DECLARATION_ONLY),
        (cli.definition_only, QueryFlags::DEFINITION_ONLY),
        (cli.cursor_kind, QueryFlags::CURSOR_KIND),
        (cli.display_name, QueryFlags::DISPLAY_NAME),
        (cli.containing_function, QueryFlags::CONTAINING_FUNCTION),
        (
            cli.containing_function_location,
            QueryFlags::CONTAINING_FUNCTION_LOCATION,
        ),
        (cli.wildcard_symbol_names, QueryFlags::WILDCARD_SYMBOL_NAMES),
        (cli.filter_system_headers, QueryFlags::FILTER_SYSTEM_HEADERS),
        (cli.strip_paren, QueryFlags::STRIP_PARENTHESES),
        (cli.silent_query, QueryFlags::SILENT_QUERY),
        (cli.wait, QueryFlags::WAIT),
        (
            cli.no_sort_references_by_input,
            QueryFlags::NO_SORT_REFERENCES_BY_INPUT,
        ),
        (cli.find_file_prefer_exact, QueryFlags::FIND_FILE_PREFER_EXACT),
        (cli.dump_include_headers, QueryFlags::DUMP_INCLUDE_HEADERS),
        (cli.tokens_include_symbols, QueryFlags::TOKENS_INCLUDE_SYMBOLS),
    ];
    let mut flags = QueryFlags::empty();
    for (enabled, flag) in pairs {
        if enabled {
            flags |= flag;
        }
    }
    if cli.no_color || !stdout_is_terminal {
        flags |= QueryFlags::NO_COLOR;
    }
    flags
}

fn session_log_level(cli: &Cli) -> LogLevel {
    if cli.silent {
        return LogLevel::Error;
    }
    match cli.verbose {
        0 => LogLevel::Error,
        1 => LogLevel::Warning,
        2 => LogLevel::Info,
        _ => LogLevel::Debug,
    }
}

fn read_unsaved_files<S: Read>(
    cli: &Cli,
    cwd: &Utf8Path,
    stdin: &mut S,
) -> Result<BTreeMap<Utf8PathBuf, String>, AppError> {
    let mut unsaved = BTreeMap::new();
    for entry in &cli.unsaved_file {
        let (path_text, byte_text) = entry
            .rsplit_once(':')
            .ok_or_else(|| AppError::UnsavedFileSyntax(entry.clone()))?;
        let bytes = byte_text
            .parse::<usize>()
            .ok()
            .filter(|bytes| *bytes > 0)
            .ok_or_else(|| AppError::UnsavedFileSyntax(entry.clone()))?;
        let path = absolutise(cwd, path_text);
        if !path.is_file() {
            return Err(AppError::Usage(format!(
                "can't open '{path_text}' for reading"
            )));
        }
        let mut contents = vec![0_u8; bytes];
        let mut filled = 0_usize;
        while filled < bytes {
            let read = stdin
                .read(&mut contents[filled..])
                .map_err(AppError::ReadStdin)?;
            if read == 0 {
                return Err(AppError::UnsavedFileShortRead {
                    path: path_text.to_owned(),
                    expected: bytes,
                    actual: filled,
                });
            }
            filled += read;
        }
        let contents = String::from_utf8(contents)
            .map_err(|_| AppError::UnsavedFileEncoding(path_text.to_owned()))?;
        unsaved.insert(path, contents);
    }
    Ok(unsaved)
}

fn path_environment() -> Vec<Utf8PathBuf> {
    env::var_os("PATH")
        .map(|value| {
            env::split_paths(&value)
                .filter_map(|entry| Utf8PathBuf::from_path_buf(entry).ok())
                .collect()
        })
        .unwrap_or_default()
}

struct Occurrence<'a> {
    index: usize,
    flag: &'static str,
    value: &'a str,
}

fn occurrences<'a>(cli: &'a Cli, matches: &ArgMatches) -> Vec<Occurrence<'a>> {
    let mut items: Vec<Occurrence<'a>> = Vec::new();
    for &flag in QUEUE_FLAGS {
        let values = queue_values(cli, flag);
        if let Some(indices) = matches.indices_of(flag) {
            for (index, value) in indices.zip(values.iter()) {
                items.push(Occurrence {
                    index,
                    flag,
                    value: value.as_str(),
                });
            }
        }
    }
    items.sort_by_key(|occurrence| occurrence.index);
    items
}

fn queue_values<'a>(cli: &'a Cli, flag: &str) -> &'a [String] {
    match flag {
        "follow_location" => &cli.follow_location,
        "references" => &cli.references,
        "references_name" => &cli.references_name,
        "find_symbols" => &cli.find_symbols,
        "list_symbols" => &cli.list_symbols,
        "symbol_info" => &cli.symbol_info,
        "project" => &cli.project,
        "delete_project" => &cli.delete_project,
        "clear" => &cli.clear,
        "current_project" => &cli.current_project,
        "status" => &cli.status,
        "reindex" => &cli.reindex,
        "check_reindex" => &cli.check_reindex,
        "find_file" => &cli.find_file,
        "is_indexed" => &cli.is_indexed,
        "is_indexing" => &cli.is_indexing,
        "sources" => &cli.sources,
        "job_count" => &cli.job_count,
        "remove" => &cli.remove,
        "fixits" => &cli.fixits,
        "preprocess" => &cli.preprocess,
        "dump_file" => &cli.dump_file,
        "check_includes" => &cli.check_includes,
        "dump_file_maps" => &cli.dump_file_maps,
        "dependencies" => &cli.dependencies,
        "all_dependencies" => &cli.all_dependencies,
        "tokens" => &cli.tokens,
        "suspend" => &cli.suspend,
        "set_buffers" => &cli.set_buffers,
        "list_buffers" => &cli.list_buffers,
        "class_hierarchy" => &cli.class_hierarchy,
        "diagnose" => &cli.diagnose,
        "compile" => &cli.compile,
        "load_compilation_database" => &cli.load_compilation_database,
        "quit_server" => &cli.quit_server,
        "tail_logs" => &cli.tail_logs,
        "diagnostics" => &cli.diagnostics,
        _ => &[],
    }
}

fn collect_commands<S, E>(
    inputs: &BuildInputs<'_>,
    stdin: &mut S,
    stderr: &mut E,
) -> Result<Vec<Command>, AppError>
where
    S: Read,
    E: Write,
{
    let cwd = &inputs.cwd;
    let mut commands = Vec::new();
    let mut selected_mode: Option<&'static str> = None;

    for occurrence in occurrences(inputs.cli, inputs.matches) {
        if MODE_FLAGS.contains(&occurrence.flag) {
            if let Some(first) = selected_mode {
                return Err(AppError::ExclusiveMode {
                    first: flag_name(first),
                    second: flag_name(occurrence.flag),
                });
            }
            selected_mode = Some(occurrence.flag);
        }
        compile_occurrence(&occurrence, cwd, stdin, stderr, &mut commands)?;
    }
    Ok(commands)
}

/// The user-facing spelling of a queue flag.
fn flag_name(flag: &'static str) -> &'static str {
    match flag {
        "follow_location" => "follow-location",
        "references" => "references",
        "references_name" => "references-name",
        "find_symbols" => "find-symbols",
        "list_symbols" => "list-symbols",
        "symbol_info" => "symbol-info",
        other => other,
    }
}

fn compile_occurrence<S, E>(
    occurrence: &Occurrence<'_>,
    cwd: &Utf8Path,
    stdin: &mut S,
    stderr: &mut E,
    commands: &mut Vec<Command>,
) -> Result<(), AppError>
where
    S: Read,
    E: Write,
{
    let value = occurrence.value;
    match occurrence.flag {
        "follow_location" => commands.push(location_query(QueryType::FollowLocation, value, cwd)?),
        "references" => commands.push(location_query(QueryType::ReferencesLocation, value, cwd)?),
        "symbol_info" => commands.push(location_query(QueryType::SymbolInfo, value, cwd)?),
        "class_hierarchy" => commands.push(location_query(QueryType::ClassHierarchy, value, cwd)?),
        "references_name" => {
            commands.push(text_query(QueryType::ReferencesName, value));
        }
        "find_symbols" => commands.push(text_query(QueryType::FindSymbols, value)),
        "list_symbols" => commands.push(text_query(QueryType::ListSymbols, value)),
        "delete_project" => commands.push(text_query(QueryType::DeleteProject, value)),
        "clear" => commands.push(text_query(QueryType::ClearProjects, "")),
        "current_project" => commands.push(Command::Query(
            QueryCommand::new(QueryType::Project, "")
                .with_flags(QueryFlags::CURRENT_PROJECT_ONLY),
        )),
        "is_indexing" => commands.push(text_query(QueryType::IsIndexing, "")),
        "list_buffers" => commands.push(text_query(QueryType::SetBuffers, "")),
        "project" => commands.push(resolved_text_query(QueryType::Project, value, cwd)),
        "status" => commands.push(resolved_text_query(QueryType::Status, value, cwd)),
        "reindex" => commands.push(resolved_text_query(QueryType::Reindex, value, cwd)),
        "check_reindex" => commands.push(resolved_text_query(QueryType::CheckReindex, value, cwd)),
        "sources" => commands.push(resolved_text_query(QueryType::Sources, value, cwd)),
        "job_count" => commands.push(text_query(QueryType::JobCount, value)),
        "find_file" => commands.push(text_query(QueryType::FindFile, value)),
        "remove" => {
            let path = absolutise(cwd, value);
            let query = if path.exists() {
                path.into_string()
            } else {
                value.to_owned()
            };
            commands.push(text_query(QueryType::RemoveFile, &query));
        }
        "is_indexed" => commands.push(existing_path_query(QueryType::IsIndexed, value, cwd, true)?),
        "dump_file" => commands.push(existing_path_query(QueryType::DumpFile, value, cwd, false)?),
        "check_includes" => {
            let command = existing_path_query(QueryType::DumpFile, value, cwd, false)?;
            let Command::Query(query) = command else {
                return Ok(());
            };
            commands.push(Command::Query(
                query.with_flags(QueryFlags::DUMP_CHECK_INCLUDES),
            ));
        }
        "fixits" => commands.push(existing_path_query(QueryType::FixIts, value, cwd, false)?),
        "diagnose" => commands.push(existing_path_query(QueryType::Diagnose, value, cwd, false)?),
        "preprocess" => {
            commands.push(existing_path_query(QueryType::PreprocessFile, value, cwd, false)?);
        }
        "dependencies" => {
            commands.push(compound_query(QueryType::Dependencies, value, cwd)?);
        }
        "dump_file_maps" => {
            commands.push(compound_query(QueryType::DumpFileMaps, value, cwd)?);
        }
        "all_dependencies" => {
            let modes: Vec<String> = split_list(value, ',');
            let payload = encode_paths_with_args(Utf8Path::new(""), &modes);
            commands.push(text_query(QueryType::Dependencies, &payload));
        }
        "tokens" => commands.push(tokens_query(value, cwd)?),
        "suspend" => commands.push(suspend_query(value, cwd)?),
        "set_buffers" => commands.push(set_buffers_query(value, cwd, stdin, stderr)?),
        "compile" => compile_command(value, cwd, stdin, commands)?,
        "load_compilation_database" => {
            commands.push(compilation_database_command(value, cwd)?);
        }
        "quit_server" => {
            let exit_code = value
                .parse::<i32>()
                .map_err(|_| AppError::Usage(format!("invalid --quit-server code '{value}'")))?;
            commands.push(Command::Quit { exit_code });
        }
        "tail_logs" => commands.push(Command::LogSubscribe { level: None }),
        "diagnostics" => commands.push(Command::LogSubscribe {
            level: Some(LogLevel::Diagnostics),
        }),
        _ => {}
    }
    Ok(())
}

fn location_query(
    query_type: QueryType,
    value: &str,
    cwd: &Utf8Path,
) -> Result<Command, AppError> {
    let location = Location::parse(value, cwd)?;
    Ok(Command::Query(
        QueryCommand::new(query_type, location.encode()).with_flags(QueryFlags::HAS_LOCATION),
    ))
}

fn text_query(query_type: QueryType, value: &str) -> Command {
    Command::Query(QueryCommand::new(query_type, value))
}

/// Resolves path-like arguments when they exist on disk, as the daemon
/// expects canonical paths for path-valued queries.
fn resolved_text_query(query_type: QueryType, value: &str, cwd: &Utf8Path) -> Command {
    if value.is_empty() {
        return text_query(query_type, "");
    }
    let path = absolutise(cwd, value);
    if path.exists() {
        text_query(query_type, path.as_str())
    } else {
        text_query(query_type, value)
    }
}

fn existing_path_query(
    query_type: QueryType,
    value: &str,
    cwd: &Utf8Path,
    allow_directory: bool,
) -> Result<Command, AppError> {
    let path = absolutise(cwd, value);
    if !path.exists() {
        return Err(AppError::Usage(format!("'{value}' does not exist")));
    }
    if path.is_dir() {
        if !allow_directory {
            return Err(AppError::Usage(format!("'{value}' is not a file")));
        }
        let mut with_slash = path.into_string();
        if !with_slash.ends_with('/') {
            with_slash.push('/');
        }
        return Ok(text_query(query_type, &with_slash));
    }
    Ok(text_query(query_type, path.as_str()))
}

fn compound_query(
    query_type: QueryType,
    value: &str,
    cwd: &Utf8Path,
) -> Result<Command, AppError> {
    let mut parts = value.split(',');
    let file = parts.next().unwrap_or_default();
    let path = absolutise(cwd, file);
    if !path.is_file() {
        return Err(AppError::Usage(format!("'{file}' is not a file")));
    }
    let args: Vec<String> = parts
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect();
    let payload = encode_paths_with_args(&path, &args);
    Ok(text_query(query_type, &payload))
}

fn tokens_query(value: &str, cwd: &Utf8Path) -> Result<Command, AppError> {
    let (file, range) = match value.rsplit_once(':') {
        Some((file, range_text)) if looks_like_range(range_text) => {
            (file, parse_range(range_text)?)
        }
        _ => (value, full_range()),
    };
    let path = absolutise(cwd, file);
    if !path.is_file() {
        return Err(AppError::Usage(format!("'{file}' is not a file")));
    }
    let payload = encode_path_with_range(&path, range);
    Ok(text_query(QueryType::Tokens, &payload))
}

fn suspend_query(value: &str, cwd: &Utf8Path) -> Result<Command, AppError> {
    if value.is_empty() || value == "clear" || value == "all" {
        return Ok(text_query(QueryType::Suspend, value));
    }
    let path = absolutise(cwd, value);
    if !path.is_file() {
        return Err(AppError::Usage(format!("'{value}' is not a file")));
    }
    Ok(text_query(QueryType::Suspend, path.as_str()))
}

fn set_buffers_query<S, E>(
    value: &str,
    cwd: &Utf8Path,
    stdin: &mut S,
    stderr: &mut E,
) -> Result<Command, AppError>
where
    S: Read,
    E: Write,
{
    let entries: Vec<String> = if value == "-" {
        let reader = BufReader::new(stdin);
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(line.map_err(AppError::ReadStdin)?);
        }
        lines
    } else {
        split_list(value, ';')
    };

    let mut paths = Vec::new();
    for entry in entries {
        if entry.is_empty() {
            continue;
        }
        let path = absolutise(cwd, &entry);
        if path.is_file() {
            paths.push(path);
        } else {
            writeln!(stderr, "\"{entry}\" doesn't seem to be a file.")
                .map_err(AppError::ForwardResponse)?;
        }
    }
    let payload = encode_path_list(&paths);
    Ok(text_query(QueryType::SetBuffers, &payload))
}

fn compile_command<S: Read>(
    value: &str,
    cwd: &Utf8Path,
    stdin: &mut S,
    commands: &mut Vec<Command>,
) -> Result<(), AppError> {
    if value == "-" || value.is_empty() {
        let reader = BufReader::new(stdin);
        for line in reader.lines() {
            let line = line.map_err(AppError::ReadStdin)?;
            if !line.trim().is_empty() {
                commands.push(Command::Compile(CompileCommand::Arguments {
                    working_directory: cwd.to_path_buf(),
                    arguments: line,
                }));
            }
        }
        return Ok(());
    }
    commands.push(Command::Compile(CompileCommand::Arguments {
        working_directory: cwd.to_path_buf(),
        arguments: value.to_owned(),
    }));
    Ok(())
}

fn compilation_database_command(value: &str, cwd: &Utf8Path) -> Result<Command, AppError> {
    let mut directory = if value.is_empty() {
        cwd.to_path_buf()
    } else {
        absolutise(cwd, value)
    };
    if directory.is_file() && directory.as_str().ends_with("/compile_commands.json") {
        directory = directory
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or(directory);
    }
    if !directory.is_dir() {
        return Err(AppError::Usage(format!(
            "'{value}' is not a directory"
        )));
    }
    if !directory.join("compile_commands.json").is_file() {
        return Err(AppError::Usage(format!(
            "no compile_commands.json file in '{directory}'"
        )));
    }
    Ok(Command::Compile(CompileCommand::CompilationDatabase {
        directory,
    }))
}

fn apply_silent_rule(commands: &mut [Command]) {
    let selectors = commands
        .iter()
        .filter(|command| command.is_project_selection())
        .count();
    if commands.len() > selectors {
        for command in commands.iter_mut() {
            if command.is_project_selection() {
                command.mark_silent();
            }
        }
    }
}

fn split_list(value: &str, separator: char) -> Vec<String> {
    value
        .split(separator)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_range(text: &str) -> Result<OffsetRange, AppError> {
    let (start_text, end_text) = text
        .split_once('-')
        .ok_or_else(|| AppError::RangeSyntax(text.to_owned()))?;
    let start = if start_text.is_empty() {
        0
    } else {
        start_text
            .parse::<u32>()
            .map_err(|_| AppError::RangeSyntax(text.to_owned()))?
    };
    let end = if end_text.is_empty() {
        u32::MAX
    } else {
        end_text
            .parse::<u32>()
            .map_err(|_| AppError::RangeSyntax(text.to_owned()))?
    };
    Ok(OffsetRange::new(start, end)?)
}

fn looks_like_range(text: &str) -> bool {
    text.contains('-')
        && !text.is_empty()
        && text.chars().all(|ch| ch.is_ascii_digit() || ch == '-')
}

const fn full_range() -> OffsetRange {
    match OffsetRange::new(0, u32::MAX) {
        Ok(range) => range,
        Err(_) => unreachable!(),
    }
}

/// Resolves `.` and `..` lexically and anchors relative paths at `base`.
fn absolutise(base: &Utf8Path, text: &str) -> Utf8PathBuf {
    let path = Utf8Path::new(text);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut resolved = Utf8PathBuf::new();
    for component in joined.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_str()),
        }
    }
    resolved
}
