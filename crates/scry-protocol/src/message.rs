//! Frame shapes exchanged with the daemon.
//!
//! Outbound frames borrow session state so a command can be encoded without
//! copying shared data such as unsaved-file overlays; inbound frames are
//! owned. Both directions are newline-delimited JSON with a `kind` tag. Map
//! and set fields use ordered collections so encoding the same command twice
//! yields identical bytes.

use std::collections::{BTreeMap, BTreeSet};

use bitflags::bitflags;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// The fixed enumeration of query kinds understood by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Jump to the target of the symbol at a location.
    FollowLocation,
    /// Find references to the symbol at a location.
    ReferencesLocation,
    /// Find references to symbols matching a name.
    ReferencesName,
    /// Find symbols matching a pattern.
    FindSymbols,
    /// List symbol names matching a pattern.
    ListSymbols,
    /// Describe the symbol at a location.
    SymbolInfo,
    /// Dump daemon status.
    Status,
    /// Reindex all files or files matching a pattern.
    Reindex,
    /// Check whether reindexing is necessary.
    CheckReindex,
    /// Select or list projects.
    Project,
    /// Delete projects matching a pattern.
    DeleteProject,
    /// Clear all projects.
    ClearProjects,
    /// Print files matching a pattern.
    FindFile,
    /// Check whether a source file is indexed.
    IsIndexed,
    /// Check whether indexing is in progress.
    IsIndexing,
    /// Dump the recorded sources for a file.
    Sources,
    /// Set or query the daemon job count.
    JobCount,
    /// Remove a file from its project.
    RemoveFile,
    /// Fetch fix-it hints for a file.
    FixIts,
    /// Preprocess a file.
    PreprocessFile,
    /// Dump a source file's index data.
    DumpFile,
    /// Dump the file maps for a file.
    DumpFileMaps,
    /// Dump dependencies for one or all files.
    Dependencies,
    /// Dump tokens for a file, optionally within a byte range.
    Tokens,
    /// Toggle or list suspended files.
    Suspend,
    /// Replace the set of active editor buffers.
    SetBuffers,
    /// Dump the class hierarchy at a location.
    ClassHierarchy,
    /// Resend diagnostics for a file.
    Diagnose,
}

bitflags! {
    /// Boolean query modifiers composed into one bitset on the wire.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
    pub struct QueryFlags: u32 {
        /// Omit source context lines from results.
        const NO_CONTEXT = 1 << 0;
        /// Treat text patterns as regular expressions.
        const MATCH_REGEX = 1 << 1;
        /// Match case-insensitively.
        const MATCH_CASE_INSENSITIVE = 1 << 2;
        /// Reverse the result sort order.
        const REVERSE_SORT = 1 << 3;
        /// Include declarations and definitions among references.
        const ALL_REFERENCES = 1 << 4;
        /// Results feed a rename operation.
        const RENAME = 1 << 5;
        /// Include virtual overrides among references.
        const FIND_VIRTUALS = 1 << 6;
        /// Print absolute paths.
        const ABSOLUTE_PATH = 1 << 7;
        /// Disable colourised context.
        const NO_COLOR = 1 << 8;
        /// Keep only declarations.
        const DECLARATION_ONLY = 1 << 9;
        /// Keep only definitions.
        const DEFINITION_ONLY = 1 << 10;
        /// Include the cursor kind in symbol output.
        const CURSOR_KIND = 1 << 11;
        /// Include display names in symbol output.
        const DISPLAY_NAME = 1 << 12;
        /// Include the containing function name.
        const CONTAINING_FUNCTION = 1 << 13;
        /// Include the containing function location.
        const CONTAINING_FUNCTION_LOCATION = 1 << 14;
        /// Expand `*` wildcards in symbol patterns.
        const WILDCARD_SYMBOL_NAMES = 1 << 15;
        /// Apply path filters to system headers too.
        const FILTER_SYSTEM_HEADERS = 1 << 16;
        /// Strip parentheses from symbol names.
        const STRIP_PARENTHESES = 1 << 17;
        /// Ask the daemon not to log this request.
        const SILENT_QUERY = 1 << 18;
        /// Suppress the textual echo of this command.
        const SILENT = 1 << 19;
        /// The query payload is an encoded location token.
        const HAS_LOCATION = 1 << 20;
        /// Restrict a project query to the current project.
        const CURRENT_PROJECT_ONLY = 1 << 21;
        /// Wait for reindexing to finish before replying.
        const WAIT = 1 << 22;
        /// Do not sort references by input position.
        const NO_SORT_REFERENCES_BY_INPUT = 1 << 23;
        /// Prefer exact over partial file-name matches.
        const FIND_FILE_PREFER_EXACT = 1 << 24;
        /// Also dump dependency headers with a file dump.
        const DUMP_INCLUDE_HEADERS = 1 << 25;
        /// Include symbol data with token dumps.
        const TOKENS_INCLUDE_SYMBOLS = 1 << 26;
        /// Run include checking instead of a plain file dump.
        const DUMP_CHECK_INCLUDES = 1 << 27;
    }
}

impl Serialize for QueryFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for QueryFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Self::from_bits(bits).ok_or_else(|| {
            serde::de::Error::custom(format!("unknown query flag bits {bits:#x}"))
        })
    }
}

/// How a path filter constrains results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathFilterKind {
    /// Matches files whose identity equals the filter path.
    #[serde(rename = "self")]
    SelfPath,
    /// Matches files that depend, directly or transitively, on the path.
    Dependency,
}

/// A `(path, kind)` constraint narrowing which files results may reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PathFilter {
    /// The resolved filter path.
    pub path: Utf8PathBuf,
    /// How the path constrains results.
    pub kind: PathFilterKind,
}

/// Verbosity requested from the daemon's log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warning,
    /// Informational messages.
    Info,
    /// Full debug output.
    Debug,
    /// The asynchronous diagnostics feed.
    Diagnostics,
}

/// Rendering requested for subscribed log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStyle {
    /// Plain text lines.
    #[default]
    Plain,
    /// Structured one-object-per-line output.
    Structured,
}

/// An outbound frame from client to daemon.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientMessage<'a> {
    /// A query against the index.
    Query(QueryPayload<'a>),
    /// A request to index a compilation unit or database.
    Index(IndexPayload<'a>),
    /// A request for the daemon to exit.
    Quit(QuitPayload),
    /// A subscription to the daemon's log stream.
    LogSubscribe(LogSubscribePayload<'a>),
}

impl ClientMessage<'_> {
    /// Renders the frame as one JSONL line, newline included.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Body of a [`ClientMessage::Query`] frame.
#[derive(Debug, Serialize)]
pub struct QueryPayload<'a> {
    /// The query kind.
    pub query_type: QueryType,
    /// Raw text, an encoded location token, or a compound payload.
    pub query: &'a str,
    /// Composed boolean modifiers.
    pub flags: QueryFlags,
    /// Maximum number of results, when capped.
    pub max: Option<u32>,
    /// Path constraints on results.
    pub path_filters: &'a BTreeSet<PathFilter>,
    /// Symbol-kind constraints on results.
    pub kind_filters: &'a BTreeSet<String>,
    /// Byte-range constraint on results.
    pub range_filter: Option<crate::OffsetRange>,
    /// Build ordinal for sources with multiple configurations.
    pub build_index: u64,
    /// Files the editor currently has open, as project hints.
    pub current_file: &'a [Utf8PathBuf],
    /// Terminal width for layout-aware formatting.
    pub terminal_width: u32,
    /// In-memory file contents overriding what is on disk.
    pub unsaved_files: &'a BTreeMap<Utf8PathBuf, String>,
    /// The invoking process's raw argument vector, for daemon-side audit.
    pub argv: &'a [String],
}

/// Body of a [`ClientMessage::Index`] frame.
#[derive(Debug, Serialize)]
pub struct IndexPayload<'a> {
    /// Working directory the compiler arguments are relative to.
    pub working_directory: Option<&'a Utf8Path>,
    /// Raw compiler argument string.
    pub arguments: &'a str,
    /// Directory holding `compile_commands.json`, for database loads.
    pub compilation_database_dir: Option<&'a Utf8Path>,
    /// Whether the daemon should guess missing compile flags.
    pub guess_flags: bool,
    /// Project root override.
    pub project_root: Option<&'a Utf8Path>,
    /// The client's PATH environment, split into entries.
    pub path_environment: &'a [Utf8PathBuf],
    /// The invoking process's raw argument vector, for daemon-side audit.
    pub argv: &'a [String],
}

/// Body of a [`ClientMessage::Quit`] frame.
#[derive(Debug, Serialize)]
pub struct QuitPayload {
    /// Exit code the daemon is asked to terminate with.
    pub exit_code: i32,
}

/// Body of a [`ClientMessage::LogSubscribe`] frame.
#[derive(Debug, Serialize)]
pub struct LogSubscribePayload<'a> {
    /// Verbosity of the subscribed stream.
    pub level: LogLevel,
    /// Rendering of subscribed lines.
    pub style: LogStyle,
    /// The invoking process's raw argument vector, for daemon-side audit.
    pub argv: &'a [String],
}

/// An inbound frame from daemon to client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A textual result line for the in-flight command.
    Response {
        /// The rendered result text.
        text: String,
    },
    /// The completion signal ending one command's exchange.
    Done {
        /// The command's completion status; zero denotes success.
        status: i32,
    },
}
