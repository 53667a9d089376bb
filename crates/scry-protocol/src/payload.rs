//! Length-prefixed compound payload encoding.
//!
//! Compound values travelling inside a query string all use one framing
//! scheme: a type tag, a decimal byte length, `:`, the bytes, `;`. Numeric
//! fields carry their decimal value directly between tag and `;`. Field order
//! is part of the wire contract; decoders consume the whole input and reject
//! anything malformed.
//!
//! Three shapes exist:
//! - path + argument list (`p…;n<count>;s…;s…;`) for dependency and
//!   file-map queries,
//! - path + offset pair (`p…;u<start>;u<end>;`) for token queries,
//! - bare path list (`n<count>;p…;p…;`) for buffer registration.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::range::OffsetRange;

const TAG_PATH: char = 'p';
const TAG_STRING: char = 's';
const TAG_COUNT: char = 'n';
const TAG_OFFSET: char = 'u';

/// Encodes a path followed by a list of argument strings.
#[must_use]
pub fn encode_paths_with_args(path: &Utf8Path, args: &[String]) -> String {
    let mut out = String::new();
    push_sized(&mut out, TAG_PATH, path.as_str());
    push_number(&mut out, TAG_COUNT, args.len() as u64);
    for arg in args {
        push_sized(&mut out, TAG_STRING, arg);
    }
    out
}

/// Decodes the inverse of [`encode_paths_with_args`].
pub fn decode_paths_with_args(
    input: &str,
) -> Result<(Utf8PathBuf, Vec<String>), PayloadDecodeError> {
    let mut cursor = Cursor::new(input);
    let path = Utf8PathBuf::from(cursor.take_sized(TAG_PATH)?);
    let count = cursor.take_number(TAG_COUNT)?;
    let mut args = Vec::new();
    for _ in 0..count {
        args.push(cursor.take_sized(TAG_STRING)?.to_owned());
    }
    cursor.finish()?;
    Ok((path, args))
}

/// Encodes a path followed by a byte-offset range.
#[must_use]
pub fn encode_path_with_range(path: &Utf8Path, range: OffsetRange) -> String {
    let mut out = String::new();
    push_sized(&mut out, TAG_PATH, path.as_str());
    push_number(&mut out, TAG_OFFSET, u64::from(range.start()));
    push_number(&mut out, TAG_OFFSET, u64::from(range.end()));
    out
}

/// Decodes the inverse of [`encode_path_with_range`].
pub fn decode_path_with_range(
    input: &str,
) -> Result<(Utf8PathBuf, OffsetRange), PayloadDecodeError> {
    let mut cursor = Cursor::new(input);
    let path = Utf8PathBuf::from(cursor.take_sized(TAG_PATH)?);
    let start = cursor.take_offset()?;
    let end = cursor.take_offset()?;
    cursor.finish()?;
    let range = OffsetRange::new(start, end)
        .map_err(|error| PayloadDecodeError::InvalidRange(error.to_string()))?;
    Ok((path, range))
}

/// Encodes a bare list of paths.
#[must_use]
pub fn encode_path_list(paths: &[Utf8PathBuf]) -> String {
    let mut out = String::new();
    push_number(&mut out, TAG_COUNT, paths.len() as u64);
    for path in paths {
        push_sized(&mut out, TAG_PATH, path.as_str());
    }
    out
}

/// Decodes the inverse of [`encode_path_list`].
pub fn decode_path_list(input: &str) -> Result<Vec<Utf8PathBuf>, PayloadDecodeError> {
    let mut cursor = Cursor::new(input);
    let count = cursor.take_number(TAG_COUNT)?;
    let mut paths = Vec::new();
    for _ in 0..count {
        paths.push(Utf8PathBuf::from(cursor.take_sized(TAG_PATH)?));
    }
    cursor.finish()?;
    Ok(paths)
}

fn push_sized(out: &mut String, tag: char, value: &str) {
    out.push(tag);
    out.push_str(&value.len().to_string());
    out.push(':');
    out.push_str(value);
    out.push(';');
}

fn push_number(out: &mut String, tag: char, value: u64) {
    out.push(tag);
    out.push_str(&value.to_string());
    out.push(';');
}

struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    const fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn take_tag(&mut self, tag: char) -> Result<(), PayloadDecodeError> {
        let mut chars = self.rest.chars();
        match chars.next() {
            Some(found) if found == tag => {
                self.rest = chars.as_str();
                Ok(())
            }
            Some(found) => Err(PayloadDecodeError::UnexpectedTag {
                expected: tag,
                found,
            }),
            None => Err(PayloadDecodeError::Truncated),
        }
    }

    fn take_digits(&mut self, until: char) -> Result<u64, PayloadDecodeError> {
        let (digits, rest) = self
            .rest
            .split_once(until)
            .ok_or(PayloadDecodeError::Truncated)?;
        let value = digits
            .parse::<u64>()
            .map_err(|_| PayloadDecodeError::BadLength(digits.to_owned()))?;
        self.rest = rest;
        Ok(value)
    }

    fn take_sized(&mut self, tag: char) -> Result<&'a str, PayloadDecodeError> {
        self.take_tag(tag)?;
        let length = self.take_digits(':')?;
        let length = usize::try_from(length)
            .map_err(|_| PayloadDecodeError::BadLength(length.to_string()))?;
        if !self.rest.is_char_boundary(length) || self.rest.len() < length {
            return Err(PayloadDecodeError::Truncated);
        }
        let (value, rest) = self.rest.split_at(length);
        self.rest = rest;
        self.take_terminator()?;
        Ok(value)
    }

    fn take_number(&mut self, tag: char) -> Result<u64, PayloadDecodeError> {
        self.take_tag(tag)?;
        self.take_digits(';')
    }

    fn take_offset(&mut self) -> Result<u32, PayloadDecodeError> {
        let value = self.take_number(TAG_OFFSET)?;
        u32::try_from(value).map_err(|_| PayloadDecodeError::BadLength(value.to_string()))
    }

    fn take_terminator(&mut self) -> Result<(), PayloadDecodeError> {
        let mut chars = self.rest.chars();
        match chars.next() {
            Some(';') => {
                self.rest = chars.as_str();
                Ok(())
            }
            Some(found) => Err(PayloadDecodeError::MissingTerminator(found)),
            None => Err(PayloadDecodeError::Truncated),
        }
    }

    fn finish(&self) -> Result<(), PayloadDecodeError> {
        if self.rest.is_empty() {
            Ok(())
        } else {
            Err(PayloadDecodeError::TrailingData(self.rest.to_owned()))
        }
    }
}

/// Errors raised while decoding a compound payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadDecodeError {
    /// A field carried the wrong type tag.
    #[error("expected field tag '{expected}', found '{found}'")]
    UnexpectedTag {
        /// The tag the decoder required at this position.
        expected: char,
        /// The tag actually present.
        found: char,
    },
    /// The input ended before the field did.
    #[error("payload truncated")]
    Truncated,
    /// A length or numeric field was not a valid decimal.
    #[error("bad length or numeric field '{0}'")]
    BadLength(String),
    /// A sized field was not closed with `;`.
    #[error("missing field terminator, found '{0}'")]
    MissingTerminator(char),
    /// Input remained after the final field.
    #[error("trailing data after payload: '{0}'")]
    TrailingData(String),
    /// An offset pair did not form a valid range.
    #[error("{0}")]
    InvalidRange(String),
}
