//! Errors raised while decoding network files.

use std::io;

use thiserror::Error;

/// A network file could not be decoded.
///
/// Every variant aborts the whole parse.
#[derive(Debug, Error)]
pub enum FormatError {
    /// A tag or constant did not hold its required value.
    #[error("invalid {width}-byte value {actual:#x} at offset {offset:#x}, expected {expected:#x}")]
    UnexpectedValue {
        offset: usize,
        /// Size of the value in bytes.
        width: usize,
        expected: u64,
        actual: u64,
    },

    #[error("unexpected end of data at offset {offset:#x}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Two elements of one section share an identity key.
    #[error("duplicate {section} entry {key}")]
    DuplicateEntry { section: &'static str, key: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
