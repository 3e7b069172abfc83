//! Framed primitive codec.
//!
//! Values are fixed-width little-endian primitives with no alignment or
//! padding. On top of plain reads the reader offers [`FrameReader::expect`]
//! for constant tokens and [`FrameReader::peek`] for the lookahead that
//! drives variable-length lists.

use crate::error::FormatError;
use crate::tags;

/// A fixed-width value that can be read from or written to a frame.
pub trait Primitive: Copy + PartialEq {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn from_le_slice(bytes: &[u8]) -> Self;

    fn write_le(self, out: &mut Vec<u8>);

    /// Bit pattern of the value, widened for error reports.
    fn bits(self) -> u64;
}

macro_rules! impl_primitive {
    ($($ty:ty => |$v:ident| $bits:expr),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }

                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                fn bits(self) -> u64 {
                    let $v = self;
                    $bits
                }
            }
        )*
    };
}

impl_primitive! {
    u16 => |v| u64::from(v),
    u32 => |v| u64::from(v),
    u64 => |v| v,
    f32 => |v| u64::from(v.to_bits()),
}

// ── Reader ──────────────────────────────────────────────────────

/// Sequential reader over an in-memory network file.
#[derive(Debug)]
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte offset from the start of the data.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn slice_at(&self, size: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < size {
            return Err(FormatError::UnexpectedEof {
                offset: self.pos,
                needed: size,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.pos..self.pos + size])
    }

    /// Read a value and advance past it.
    pub fn read<T: Primitive>(&mut self) -> Result<T, FormatError> {
        let value = T::from_le_slice(self.slice_at(T::SIZE)?);
        self.pos += T::SIZE;
        Ok(value)
    }

    /// Read a value without advancing.
    pub fn peek<T: Primitive>(&self) -> Result<T, FormatError> {
        Ok(T::from_le_slice(self.slice_at(T::SIZE)?))
    }

    /// Read a value and fail unless it equals `expected`.
    pub fn expect<T: Primitive>(&mut self, expected: T) -> Result<(), FormatError> {
        let offset = self.pos;
        let actual: T = self.read()?;
        if actual != expected {
            return Err(FormatError::UnexpectedValue {
                offset,
                width: T::SIZE,
                expected: expected.bits(),
                actual: actual.bits(),
            });
        }
        Ok(())
    }

    /// Expect each token of `sequence` in turn.
    pub fn expect_all(&mut self, sequence: &[u16]) -> Result<(), FormatError> {
        sequence.iter().try_for_each(|&tag| self.expect(tag))
    }

    /// Whether the next 16-bit token equals `tag`.
    ///
    /// This is the continuation test of every variable-length list: the list
    /// ends at the first token that does not match.
    pub fn next_is(&self, tag: u16) -> Result<bool, FormatError> {
        Ok(self.peek::<u16>()? == tag)
    }

    pub fn expect_section_header(&mut self, section: u16) -> Result<(), FormatError> {
        self.expect(section)?;
        self.expect_all(&tags::SECTION_HEADER_TAIL)
    }

    pub fn expect_element_header(&mut self) -> Result<(), FormatError> {
        self.expect_all(&tags::ELEMENT_HEADER)
    }

    /// Expect an element footer; the sentinel depends on `is_final`.
    pub fn expect_element_footer(&mut self, is_final: bool) -> Result<(), FormatError> {
        self.expect_all(&tags::ELEMENT_FOOTER)?;
        self.expect(sentinel(is_final))
    }
}

// ── Writer ──────────────────────────────────────────────────────

/// Sequential writer producing a network file in memory.
#[derive(Debug, Default)]
pub struct FrameWriter {
    buf: Vec<u8>,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Bytes written so far.
    pub fn offset(&self) -> usize {
        self.buf.len()
    }

    pub fn write<T: Primitive>(&mut self, value: T) {
        value.write_le(&mut self.buf);
    }

    pub fn write_all(&mut self, sequence: &[u16]) {
        for &tag in sequence {
            self.write(tag);
        }
    }

    pub fn write_section_header(&mut self, section: u16) {
        self.write(section);
        self.write_all(&tags::SECTION_HEADER_TAIL);
    }

    pub fn write_element_header(&mut self) {
        self.write_all(&tags::ELEMENT_HEADER);
    }

    pub fn write_element_footer(&mut self, is_final: bool) {
        self.write_all(&tags::ELEMENT_FOOTER);
        self.write(sentinel(is_final));
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

fn sentinel(is_final: bool) -> u16 {
    if is_final {
        tags::SENTINEL_FINAL
    } else {
        tags::SENTINEL_MORE
    }
}
