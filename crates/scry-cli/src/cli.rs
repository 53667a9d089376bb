//! Command-line surface of the scry client.
//!
//! Every query flag may repeat; each occurrence queues one command, and the
//! sequence builder recovers the encounter order from the parsed matches.
//! Flags that merely modify queries are plain booleans folded into the
//! session-wide flag set.

use clap::{ArgAction, Parser};
use scry_config::ExitPolicy;

#[derive(Parser, Debug)]
#[command(
    name = "scry",
    about = "Command-line client for the scryd code-indexing daemon",
    disable_help_subcommand = true
)]
pub(crate) struct Cli {
    // ── Mode queries (pick one per invocation) ─────────────────────────────
    /// Follow the symbol at this location (path:line:col).
    #[arg(short = 'f', long, value_name = "LOCATION", action = ArgAction::Append)]
    pub(crate) follow_location: Vec<String>,
    /// Find references to the symbol at this location.
    #[arg(short = 'r', long, value_name = "LOCATION", action = ArgAction::Append)]
    pub(crate) references: Vec<String>,
    /// Find references to symbols matching this name.
    #[arg(short = 'R', long, value_name = "NAME", action = ArgAction::Append)]
    pub(crate) references_name: Vec<String>,
    /// Find symbols matching this pattern.
    #[arg(short = 'F', long, value_name = "PATTERN", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) find_symbols: Vec<String>,
    /// List symbol names matching this pattern.
    #[arg(short = 'S', long, value_name = "PATTERN", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) list_symbols: Vec<String>,
    /// Describe the symbol at this location.
    #[arg(short = 'U', long, value_name = "LOCATION", action = ArgAction::Append)]
    pub(crate) symbol_info: Vec<String>,

    // ── Project management ─────────────────────────────────────────────────
    /// Select the project matching the argument, or list projects.
    #[arg(short = 'w', long, value_name = "PATTERN", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) project: Vec<String>,
    /// Delete projects matching the pattern.
    #[arg(short = 'W', long, value_name = "PATTERN", action = ArgAction::Append)]
    pub(crate) delete_project: Vec<String>,
    /// Clear all projects.
    #[arg(short = 'C', long, num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) clear: Vec<String>,
    /// Print the path of the current project.
    #[arg(long, num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) current_project: Vec<String>,

    // ── Other queries ──────────────────────────────────────────────────────
    /// Dump daemon status.
    #[arg(short = 's', long, value_name = "SECTION", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) status: Vec<String>,
    /// Reindex all files, or files matching the pattern.
    #[arg(short = 'V', long, value_name = "PATTERN", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) reindex: Vec<String>,
    /// Check whether reindexing is necessary.
    #[arg(short = 'x', long, value_name = "PATTERN", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) check_reindex: Vec<String>,
    /// Print files matching the pattern.
    #[arg(short = 'P', long = "path", value_name = "PATTERN", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) find_file: Vec<String>,
    /// Check whether this source file is indexed.
    #[arg(short = 'T', long, value_name = "FILE", action = ArgAction::Append)]
    pub(crate) is_indexed: Vec<String>,
    /// Check whether the daemon is currently indexing.
    #[arg(long, num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) is_indexing: Vec<String>,
    /// Dump the recorded sources for a file, or all sources.
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) sources: Vec<String>,
    /// Set or query the daemon job count.
    #[arg(short = 'j', long, value_name = "COUNT", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) job_count: Vec<String>,
    /// Remove a file from its project.
    #[arg(short = 'D', long = "remove", value_name = "FILE", action = ArgAction::Append)]
    pub(crate) remove: Vec<String>,
    /// Fetch fix-it hints for a file.
    #[arg(long, value_name = "FILE", action = ArgAction::Append)]
    pub(crate) fixits: Vec<String>,
    /// Preprocess a file.
    #[arg(short = 'E', long = "preprocess", value_name = "FILE", action = ArgAction::Append)]
    pub(crate) preprocess: Vec<String>,
    /// Dump a source file's index data.
    #[arg(short = 'd', long, value_name = "FILE", action = ArgAction::Append)]
    pub(crate) dump_file: Vec<String>,
    /// Check includes for a source file.
    #[arg(long, value_name = "FILE", action = ArgAction::Append)]
    pub(crate) check_includes: Vec<String>,
    /// Dump the file maps for a file (FILE[,ARG...]).
    #[arg(long, value_name = "FILE[,ARG...]", action = ArgAction::Append)]
    pub(crate) dump_file_maps: Vec<String>,
    /// Dump dependencies for a file (FILE[,MODE...]).
    #[arg(long, value_name = "FILE[,MODE...]", action = ArgAction::Append)]
    pub(crate) dependencies: Vec<String>,
    /// Dump dependencies for all files ([MODE,...]).
    #[arg(long, value_name = "MODE[,MODE...]", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) all_dependencies: Vec<String>,
    /// Dump tokens for a file (FILE[:FROM-TO]).
    #[arg(long, value_name = "FILE[:FROM-TO]", action = ArgAction::Append)]
    pub(crate) tokens: Vec<String>,
    /// List suspended files, or toggle suspension for a file, `all`, or `clear`.
    #[arg(short = 'X', long, value_name = "FILE", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) suspend: Vec<String>,
    /// Replace the set of active buffers (PATH;PATH..., or `-` for stdin).
    #[arg(long, value_name = "PATHS", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) set_buffers: Vec<String>,
    /// List the active buffers.
    #[arg(long, num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) list_buffers: Vec<String>,
    /// Dump the class hierarchy for the struct or class at this location.
    #[arg(long, value_name = "LOCATION", action = ArgAction::Append)]
    pub(crate) class_hierarchy: Vec<String>,
    /// Resend diagnostics for a file.
    #[arg(long, value_name = "FILE", action = ArgAction::Append)]
    pub(crate) diagnose: Vec<String>,

    // ── Indexing ───────────────────────────────────────────────────────────
    /// Pass a compile command to the daemon (`-` reads commands from stdin).
    #[arg(short = 'c', long, value_name = "ARGS", action = ArgAction::Append)]
    pub(crate) compile: Vec<String>,
    /// Load compile_commands.json from a directory (defaults to the cwd).
    #[arg(short = 'J', long, value_name = "DIR", num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) load_compilation_database: Vec<String>,
    /// Ask the daemon to guess missing compile flags.
    #[arg(long)]
    pub(crate) guess_flags: bool,
    /// Override the project root for compile commands.
    #[arg(long, value_name = "DIR")]
    pub(crate) project_root: Option<String>,

    // ── Daemon control ─────────────────────────────────────────────────────
    /// Ask the daemon to exit, with an optional exit code.
    #[arg(short = 'q', long, value_name = "CODE", num_args = 0..=1, default_missing_value = "0", action = ArgAction::Append)]
    pub(crate) quit_server: Vec<String>,
    /// Subscribe to the daemon's log stream.
    #[arg(short = 'g', long, num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) tail_logs: Vec<String>,
    /// Subscribe to the daemon's diagnostics feed.
    #[arg(short = 'm', long, num_args = 0..=1, default_missing_value = "", action = ArgAction::Append)]
    pub(crate) diagnostics: Vec<String>,
    /// Rendering for subscribed log lines.
    #[arg(long, value_name = "STYLE", value_parser = ["plain", "structured"])]
    pub(crate) log_style: Option<String>,

    // ── Query modifiers ────────────────────────────────────────────────────
    /// Maximum number of results for queries.
    #[arg(short = 'M', long, value_name = "COUNT")]
    pub(crate) max: Option<u32>,
    /// Filter out results not in this byte range (FROM-TO, either open).
    #[arg(long, value_name = "FROM-TO")]
    pub(crate) range_filter: Option<String>,
    /// Filter out results not matching this path.
    #[arg(short = 'i', long, value_name = "PATH", action = ArgAction::Append)]
    pub(crate) path_filter: Vec<String>,
    /// Filter out results unless this file depends on them.
    #[arg(long, value_name = "FILE", action = ArgAction::Append)]
    pub(crate) dependency_filter: Vec<String>,
    /// Only return results matching this symbol kind.
    #[arg(long, value_name = "KIND", action = ArgAction::Append)]
    pub(crate) kind_filter: Vec<String>,
    /// For sources with multiple builds, use the arg'th.
    #[arg(long, value_name = "INDEX")]
    pub(crate) build_index: Option<u64>,
    /// Tell the daemon which file is being edited, as a project hint.
    #[arg(long, value_name = "FILE", action = ArgAction::Append)]
    pub(crate) current_file: Vec<String>,
    /// Pass an unsaved file (PATH:BYTECOUNT, content follows on stdin).
    #[arg(long, value_name = "PATH:BYTES", action = ArgAction::Append)]
    pub(crate) unsaved_file: Vec<String>,
    /// Don't print context for locations.
    #[arg(short = 'N', long)]
    pub(crate) no_context: bool,
    /// Treat text patterns as regular expressions.
    #[arg(short = 'Z', long = "match-regexp")]
    pub(crate) match_regexp: bool,
    /// Match case-insensitively.
    #[arg(short = 'I', long = "match-icase")]
    pub(crate) match_icase: bool,
    /// Sort output reversed.
    #[arg(short = 'O', long)]
    pub(crate) reverse_sort: bool,
    /// Include declarations, definitions, and constructors among references.
    #[arg(short = 'e', long)]
    pub(crate) all_references: bool,
    /// Results will be used to rename symbols.
    #[arg(long)]
    pub(crate) rename: bool,
    /// Also show other implementations of the function.
    #[arg(short = 'k', long)]
    pub(crate) find_virtuals: bool,
    /// Print files with absolute paths.
    #[arg(short = 'K', long)]
    pub(crate) absolute_path: bool,
    /// Don't colourise context.
    #[arg(long)]
    pub(crate) no_color: bool,
    /// Filter out definitions unless inline.
    #[arg(long)]
    pub(crate) declaration_only: bool,
    /// Filter out declarations unless inline.
    #[arg(long)]
    pub(crate) definition_only: bool,
    /// Include the cursor kind in symbol output.
    #[arg(long)]
    pub(crate) cursor_kind: bool,
    /// Include display names in symbol output.
    #[arg(long)]
    pub(crate) display_name: bool,
    /// Include the name of the containing function.
    #[arg(short = 'o', long)]
    pub(crate) containing_function: bool,
    /// Include the location of the containing function.
    #[arg(long)]
    pub(crate) containing_function_location: bool,
    /// Expand `*` wildcards in symbol patterns.
    #[arg(short = 'a', long)]
    pub(crate) wildcard_symbol_names: bool,
    /// Don't exempt system headers from path filters.
    #[arg(short = 'H', long)]
    pub(crate) filter_system_headers: bool,
    /// Strip parens in various contexts.
    #[arg(short = 'p', long = "strip-paren")]
    pub(crate) strip_paren: bool,
    /// Ask the daemon not to log this request.
    #[arg(long)]
    pub(crate) silent_query: bool,
    /// Wait for reindexing to finish.
    #[arg(long)]
    pub(crate) wait: bool,
    /// Don't sort references by input position.
    #[arg(long)]
    pub(crate) no_sort_references_by_input: bool,
    /// Prefer exact matches over partial matches for --path.
    #[arg(short = 'A', long)]
    pub(crate) find_file_prefer_exact: bool,
    /// Also dump dependency headers with --dump-file.
    #[arg(long)]
    pub(crate) dump_include_headers: bool,
    /// Include symbols for tokens.
    #[arg(long)]
    pub(crate) tokens_include_symbols: bool,

    // ── Session ────────────────────────────────────────────────────────────
    /// Connect to the daemon through this socket file.
    #[arg(short = 'n', long, value_name = "PATH", conflicts_with = "socket_address")]
    pub(crate) socket_file: Option<String>,
    /// Connect to the daemon at this host:port address.
    #[arg(long, value_name = "HOST:PORT")]
    pub(crate) socket_address: Option<String>,
    /// Timeout for connecting to the daemon, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = scry_config::DEFAULT_CONNECT_TIMEOUT_MS)]
    pub(crate) connect_timeout: u64,
    /// Max time in milliseconds to wait for a command to finish (0 disables).
    #[arg(short = 'y', long, value_name = "MS")]
    pub(crate) timeout: Option<u64>,
    /// Be more verbose; repeat to increase.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    /// Be silent.
    #[arg(short = 'Q', long)]
    pub(crate) silent: bool,
    /// Override the configured exit policy.
    #[arg(long, value_name = "POLICY")]
    pub(crate) exit_policy: Option<ExitPolicy>,
}
