//! Binary codec for spline network (`.splnet`) files.
//!
//! The format is a stream of little-endian 16/32/64-bit values. Structure is
//! carried by constant tag tokens rather than lengths, so decoding is a long
//! sequence of "expect this token, then read that value" steps and any
//! mismatch is reported with its byte offset.
//!
//! ## Layers
//!
//! - [`codec`]: primitive reads and writes, `expect`/`peek`, section and
//!   element framing.
//! - [`element`]: the framed layout of each entity kind.
//! - [`file`]: header, the three sections, and whole-file load/save.

pub mod codec;
pub mod element;
mod error;
pub mod file;
pub mod tags;

pub use codec::{FrameReader, FrameWriter, Primitive};
pub use element::Element;
pub use error::FormatError;
pub use file::{HeaderCounts, NetworkFile};
