//! Location tokens of the form `path:line:col`.
//!
//! The daemon addresses source positions through opaque tokens. Encoding is
//! canonical: the path is lexically normalised against a caller-supplied base
//! directory, so two spellings of the same position produce the same token,
//! and `decode` is the exact inverse of `encode`.

use std::fmt;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A file position identified by path and 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    path: Utf8PathBuf,
    line: u32,
    column: u32,
}

impl Location {
    /// Parses human input of the form `path:line:col`.
    ///
    /// The path is normalised lexically against `base`: relative paths are
    /// joined to it, and `.`/`..` components are resolved without touching the
    /// filesystem. Line and column are 1-based and must be positive.
    pub fn parse(text: &str, base: &Utf8Path) -> Result<Self, LocationParseError> {
        let (rest, column) = split_ordinal(text)?;
        let (path_text, line) = split_ordinal(rest)?;
        if path_text.is_empty() {
            return Err(LocationParseError::MissingPath(text.to_owned()));
        }
        if line == 0 || column == 0 {
            return Err(LocationParseError::ZeroOrdinal(text.to_owned()));
        }
        Ok(Self {
            path: normalise(base, Utf8Path::new(path_text)),
            line,
            column,
        })
    }

    /// Produces the canonical wire token for this location.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{}:{}:{}", self.path, self.line, self.column)
    }

    /// Decodes a wire token produced by [`Location::encode`].
    ///
    /// Rejects tokens whose path is relative or not in canonical form, so a
    /// decoded location always re-encodes to the same bytes.
    pub fn decode(token: &str) -> Result<Self, LocationParseError> {
        let (rest, column) = split_ordinal(token)?;
        let (path_text, line) = split_ordinal(rest)?;
        if path_text.is_empty() {
            return Err(LocationParseError::MissingPath(token.to_owned()));
        }
        if line == 0 || column == 0 {
            return Err(LocationParseError::ZeroOrdinal(token.to_owned()));
        }
        let path = Utf8Path::new(path_text);
        if !path.is_absolute() {
            return Err(LocationParseError::RelativePath(token.to_owned()));
        }
        let normalised = normalise(Utf8Path::new("/"), path);
        if normalised != path {
            return Err(LocationParseError::NotCanonical(token.to_owned()));
        }
        Ok(Self {
            path: normalised,
            line,
            column,
        })
    }

    /// The normalised file path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The 1-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// The 1-based column number.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}:{}", self.path, self.line, self.column)
    }
}

fn split_ordinal(text: &str) -> Result<(&str, u32), LocationParseError> {
    let (rest, digits) = text
        .rsplit_once(':')
        .ok_or_else(|| LocationParseError::MissingComponent(text.to_owned()))?;
    let value = digits
        .parse::<u32>()
        .map_err(|_| LocationParseError::InvalidOrdinal {
            input: text.to_owned(),
            ordinal: digits.to_owned(),
        })?;
    Ok((rest, value))
}

/// Resolves `.` and `..` lexically and anchors relative paths at `base`.
fn normalise(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
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

/// Errors raised when parsing or decoding a location token.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocationParseError {
    /// A `:line:col` component was missing.
    #[error("location '{0}' must have the form path:line:col")]
    MissingComponent(String),
    /// Line or column was not an unsigned integer.
    #[error("location '{input}' has a non-numeric component '{ordinal}'")]
    InvalidOrdinal {
        /// The full input under parse.
        input: String,
        /// The offending line or column text.
        ordinal: String,
    },
    /// Line or column was zero; both are 1-based.
    #[error("location '{0}' has a zero line or column")]
    ZeroOrdinal(String),
    /// The path component was empty.
    #[error("location '{0}' has an empty path")]
    MissingPath(String),
    /// A decoded token carried a relative path.
    #[error("location token '{0}' must carry an absolute path")]
    RelativePath(String),
    /// A decoded token was not in canonical form.
    #[error("location token '{0}' is not canonical")]
    NotCanonical(String),
}
