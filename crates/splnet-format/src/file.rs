//! Whole-file load and save.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ header tokens (8 x u16)                  │
//! │ 0x000c anchor_count: u32                 │
//! │ 0x000c route_count: u32                  │
//! │ 0x000c strip_count: u32                  │
//! │ 0x0004                                   │
//! ├──────────────────────────────────────────┤
//! │ section 0x05f4: anchor_count anchors     │
//! │ section 0x05f5: route_count routes       │
//! │ section 0x05f6: strip_count strips       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Elements are written in ascending key order and the last element of each
//! section carries the final sentinel. Files written by the host application
//! are sorted the same way, so load followed by save reproduces them byte for
//! byte.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use splnet_core::{Anchor, Network, Route, Strip};
use tracing::{debug, info, warn};

use crate::codec::{FrameReader, FrameWriter};
use crate::element::Element;
use crate::error::FormatError;
use crate::tags;

/// Entity counts declared by a file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderCounts {
    pub anchors: u32,
    pub routes: u32,
    pub strips: u32,
}

/// A network file: the network plus the on-disk framing around it.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkFile {
    pub network: Network,
}

impl NetworkFile {
    pub fn new(network: Network) -> Self {
        Self { network }
    }

    /// Serialize to the binary file layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = FrameWriter::with_capacity(estimated_size(&self.network));
        write_header(&mut writer, self.counts());
        write_section(&mut writer, self.network.anchors());
        write_section(&mut writer, self.network.routes());
        write_section(&mut writer, self.network.strips());
        writer.into_bytes()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), FormatError> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Deserialize from the binary file layout.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let mut reader = FrameReader::new(data);
        let counts = read_header(&mut reader)?;
        debug!(
            anchors = counts.anchors,
            routes = counts.routes,
            strips = counts.strips,
            "read file header"
        );

        let mut network = Network::new();
        *network.anchors_mut() = read_section(&mut reader, counts.anchors, |a: &Anchor| a.id)?;
        *network.routes_mut() = read_section(&mut reader, counts.routes, |r: &Route| r.id)?;
        *network.strips_mut() = read_section(&mut reader, counts.strips, Strip::key)?;

        if reader.remaining() > 0 {
            warn!(
                offset = reader.offset(),
                bytes = reader.remaining(),
                "ignoring trailing data after strip section"
            );
        }

        Ok(Self { network })
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, FormatError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Read and decode the network file at `path`.
    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let data = fs::read(path)?;
        let file = Self::from_bytes(&data)?;
        info!(
            path = %path.display(),
            bytes = data.len(),
            anchors = file.network.anchor_count(),
            routes = file.network.route_count(),
            strips = file.network.strip_count(),
            "loaded network"
        );
        Ok(file)
    }

    /// Encode and write the network file to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), FormatError> {
        let bytes = self.to_bytes();
        fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "saved network");
        Ok(())
    }

    /// Counts taken from the current map sizes.
    pub fn counts(&self) -> HeaderCounts {
        HeaderCounts {
            anchors: self.network.anchor_count() as u32,
            routes: self.network.route_count() as u32,
            strips: self.network.strip_count() as u32,
        }
    }
}

fn read_header(reader: &mut FrameReader<'_>) -> Result<HeaderCounts, FormatError> {
    reader.expect_all(&tags::FILE_HEADER)?;
    reader.expect(tags::COUNT_PREFIX)?;
    let anchors = reader.read()?;
    reader.expect(tags::COUNT_PREFIX)?;
    let routes = reader.read()?;
    reader.expect(tags::COUNT_PREFIX)?;
    let strips = reader.read()?;
    reader.expect(tags::FILE_HEADER_END)?;
    Ok(HeaderCounts {
        anchors,
        routes,
        strips,
    })
}

fn write_header(writer: &mut FrameWriter, counts: HeaderCounts) {
    writer.write_all(&tags::FILE_HEADER);
    for count in [counts.anchors, counts.routes, counts.strips] {
        writer.write(tags::COUNT_PREFIX);
        writer.write(count);
    }
    writer.write(tags::FILE_HEADER_END);
}

fn read_section<K, T, F>(
    reader: &mut FrameReader<'_>,
    count: u32,
    key_of: F,
) -> Result<BTreeMap<K, T>, FormatError>
where
    K: Ord + Display,
    T: Element,
    F: Fn(&T) -> K,
{
    reader.expect_section_header(T::SECTION_TAG)?;
    let mut items = BTreeMap::new();
    for index in 0..count {
        let item = T::decode(reader, index + 1 == count)?;
        let key = key_of(&item);
        if items.contains_key(&key) {
            return Err(FormatError::DuplicateEntry {
                section: T::SECTION,
                key: key.to_string(),
            });
        }
        items.insert(key, item);
    }
    debug!(section = T::SECTION, count, offset = reader.offset(), "read section");
    Ok(items)
}

fn write_section<K, T: Element>(writer: &mut FrameWriter, items: &BTreeMap<K, T>) {
    writer.write_section_header(T::SECTION_TAG);
    let last = items.len().saturating_sub(1);
    for (index, item) in items.values().enumerate() {
        item.encode(writer, index == last);
    }
}

fn estimated_size(network: &Network) -> usize {
    // Typical element sizes, only used to size the output buffer.
    64 + network.anchor_count() * 36 + network.route_count() * 60 + network.strip_count() * 44
}
