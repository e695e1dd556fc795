use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading a payload.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("unexpected end of payload")]
    UnexpectedEof,
    #[error("length prefix {length} needs at least {needed} bytes, {remaining} remaining")]
    LengthOutOfBounds {
        length: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("invalid UTF-16 string: {0}")]
    InvalidString(#[from] std::char::DecodeUtf16Error),
    #[error("unknown variant {value} for {type_name}")]
    InvalidVariant {
        type_name: &'static str,
        value: u64,
    },
    #[error("IO error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            _ => Self::Io(e),
        }
    }
}

/// Errors raised while writing a payload.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("{what} of {value} does not fit the wire type (max {max})")]
    Overflow {
        what: &'static str,
        value: usize,
        max: usize,
    },
    #[error("string contains a NUL character at {0}")]
    InteriorNul(usize),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Fatal errors raised while setting up a serializer.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("opcode {opcode} is assigned to both {first} and {second}")]
    DuplicateOpCode {
        opcode: u16,
        first: String,
        second: String,
    },
    #[error("message {0} is assigned more than once")]
    DuplicateName(String),
    #[error("message {0} is declared by more than one packet type")]
    DuplicateSchema(&'static str),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("IO error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
