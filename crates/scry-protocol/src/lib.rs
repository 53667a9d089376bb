//! Wire types and pure encoders for the scry client/daemon protocol.
//!
//! The crate owns everything the daemon and client must agree on byte for
//! byte: the location token syntax, the length-prefixed compound payload
//! encoding, and the serde shapes of the newline-delimited JSON frames. It
//! performs no I/O; every failure is a value.

mod location;
mod message;
mod payload;
mod range;

pub use location::{Location, LocationParseError};
pub use message::{
    ClientMessage, IndexPayload, LogLevel, LogStyle, LogSubscribePayload, PathFilter,
    PathFilterKind, QueryFlags, QueryPayload, QueryType, QuitPayload, ServerMessage,
};
pub use payload::{
    PayloadDecodeError, decode_path_list, decode_path_with_range, decode_paths_with_args,
    encode_path_list, encode_path_with_range, encode_paths_with_args,
};
pub use range::{InvalidRange, OffsetRange};
