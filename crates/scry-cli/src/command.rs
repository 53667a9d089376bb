//! Compiled commands and the session context they are encoded against.
//!
//! A [`Command`] is one intent ready for the wire. Encoding is pure: the same
//! command against the same context always produces the same frame, and
//! exactly one frame is produced per call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use camino::Utf8PathBuf;
use scry_protocol::{
    ClientMessage, IndexPayload, LogLevel, LogStyle, LogSubscribePayload, OffsetRange, PathFilter,
    QueryFlags, QueryPayload, QueryType, QuitPayload,
};

/// Session-wide state shared by every encoded command.
///
/// Assembled once by the sequence builder and never mutated afterwards;
/// unsaved-file overlays are shared by reference rather than copied into
/// each message.
#[derive(Debug, Clone)]
pub(crate) struct SessionContext {
    pub(crate) query_flags: QueryFlags,
    pub(crate) max: Option<u32>,
    pub(crate) range_filter: Option<OffsetRange>,
    pub(crate) path_filters: BTreeSet<PathFilter>,
    pub(crate) kind_filters: BTreeSet<String>,
    pub(crate) build_index: u64,
    pub(crate) current_file: Vec<Utf8PathBuf>,
    pub(crate) terminal_width: u32,
    pub(crate) unsaved_files: Arc<BTreeMap<Utf8PathBuf, String>>,
    pub(crate) argv: Vec<String>,
    pub(crate) guess_flags: bool,
    pub(crate) project_root: Option<Utf8PathBuf>,
    pub(crate) path_environment: Vec<Utf8PathBuf>,
    pub(crate) log_level: LogLevel,
    pub(crate) log_style: LogStyle,
}

/// One compiled intent, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// A query against the index.
    Query(QueryCommand),
    /// A request for the daemon to exit.
    Quit {
        /// Exit code requested of the daemon.
        exit_code: i32,
    },
    /// A subscription to the daemon's log stream.
    LogSubscribe {
        /// Verbosity of the stream; `None` follows the session verbosity.
        level: Option<LogLevel>,
    },
    /// A request to index a compilation unit or database.
    Compile(CompileCommand),
}

/// Query payload and per-command flag additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryCommand {
    pub(crate) query_type: QueryType,
    pub(crate) query: String,
    pub(crate) extra_flags: QueryFlags,
}

impl QueryCommand {
    pub(crate) fn new(query_type: QueryType, query: impl Into<String>) -> Self {
        Self {
            query_type,
            query: query.into(),
            extra_flags: QueryFlags::empty(),
        }
    }

    pub(crate) fn with_flags(mut self, flags: QueryFlags) -> Self {
        self.extra_flags |= flags;
        self
    }
}

/// The two mutually exclusive ways a compile request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompileCommand {
    /// A raw compiler invocation relative to a working directory.
    Arguments {
        working_directory: Utf8PathBuf,
        arguments: String,
    },
    /// A directory holding `compile_commands.json`.
    CompilationDatabase { directory: Utf8PathBuf },
}

impl Command {
    /// Produces the single wire frame for this command.
    pub(crate) fn encode<'a>(&'a self, ctx: &'a SessionContext) -> ClientMessage<'a> {
        match self {
            Self::Query(query) => ClientMessage::Query(QueryPayload {
                query_type: query.query_type,
                query: &query.query,
                flags: ctx.query_flags | query.extra_flags,
                max: ctx.max,
                path_filters: &ctx.path_filters,
                kind_filters: &ctx.kind_filters,
                range_filter: ctx.range_filter,
                build_index: ctx.build_index,
                current_file: &ctx.current_file,
                terminal_width: ctx.terminal_width,
                unsaved_files: &ctx.unsaved_files,
                argv: &ctx.argv,
            }),
            Self::Quit { exit_code } => ClientMessage::Quit(QuitPayload {
                exit_code: *exit_code,
            }),
            Self::LogSubscribe { level } => ClientMessage::LogSubscribe(LogSubscribePayload {
                level: level.unwrap_or(ctx.log_level),
                style: ctx.log_style,
                argv: &ctx.argv,
            }),
            Self::Compile(compile) => {
                let (working_directory, arguments, database) = match compile {
                    CompileCommand::Arguments {
                        working_directory,
                        arguments,
                    } => (Some(working_directory.as_path()), arguments.as_str(), None),
                    CompileCommand::CompilationDatabase { directory } => {
                        (None, "", Some(directory.as_path()))
                    }
                };
                ClientMessage::Index(IndexPayload {
                    working_directory,
                    arguments,
                    compilation_database_dir: database,
                    guess_flags: ctx.guess_flags,
                    project_root: ctx.project_root.as_deref(),
                    path_environment: &ctx.path_environment,
                    argv: &ctx.argv,
                })
            }
        }
    }

    /// Diagnostic description used for dispatch tracing; never sent.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Query(query) => format!("query {:?} {}", query.query_type, query.query),
            Self::Quit { exit_code } => format!("quit({exit_code})"),
            Self::LogSubscribe { .. } => String::from("log-subscribe"),
            Self::Compile(CompileCommand::Arguments {
                working_directory, ..
            }) => {
                format!("index {working_directory}")
            }
            Self::Compile(CompileCommand::CompilationDatabase { directory }) => {
                format!("index-db {directory}")
            }
        }
    }

    /// Whether this is a project-selection query with a non-empty payload.
    pub(crate) fn is_project_selection(&self) -> bool {
        matches!(
            self,
            Self::Query(QueryCommand {
                query_type: QueryType::Project,
                query,
                ..
            }) if !query.is_empty()
        )
    }

    /// Marks the command's echo as suppressed.
    pub(crate) fn mark_silent(&mut self) {
        if let Self::Query(query) = self {
            query.extra_flags |= QueryFlags::SILENT;
        }
    }

    /// Whether the command carries the echo-suppression flag.
    #[cfg(test)]
    pub(crate) fn is_silent(&self) -> bool {
        matches!(self, Self::Query(query) if query.extra_flags.contains(QueryFlags::SILENT))
    }
}
