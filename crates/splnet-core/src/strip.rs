//! Strips: directed edges between two anchors carrying one or more routes.
//!
//! Both endpoint fields are packed:
//!
//! ```text
//! source:       [ anchor id << 6 | type (6 bits) ]
//! destination:  [ anchor id << 3 | 000           ]
//! ```
//!
//! Bits shifted out of the top of the 32-bit field are lost, so the source
//! endpoint only keeps the low 26 bits of an anchor id and the destination
//! endpoint the low 29.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Width of the type field at the bottom of the packed source id.
pub const SOURCE_TYPE_BITS: u32 = 6;
/// Mask of the type field inside the packed source id.
pub const SOURCE_TYPE_MASK: u32 = (1 << SOURCE_TYPE_BITS) - 1;
/// Shift applied to the anchor id stored in the packed destination id.
pub const DESTINATION_SHIFT: u32 = 3;

/// Anchor-id bits that survive packing into a source endpoint.
pub const SOURCE_ANCHOR_MASK: u32 = u32::MAX >> SOURCE_TYPE_BITS;
/// Anchor-id bits that survive packing into a destination endpoint.
pub const DESTINATION_ANCHOR_MASK: u32 = u32::MAX >> DESTINATION_SHIFT;

/// Pack a type and an anchor id into a raw source field.
pub const fn pack_source(type_bits: u8, anchor_id: u32) -> u32 {
    (type_bits as u32 & SOURCE_TYPE_MASK) | (anchor_id << SOURCE_TYPE_BITS)
}

/// Split a raw source field into its type bits and anchor id.
pub const fn unpack_source(raw: u32) -> (u8, u32) {
    ((raw & SOURCE_TYPE_MASK) as u8, raw >> SOURCE_TYPE_BITS)
}

/// Pack an anchor id into a raw destination field.
pub const fn pack_destination(anchor_id: u32) -> u32 {
    anchor_id << DESTINATION_SHIFT
}

/// Recover the anchor id from a raw destination field.
pub const fn unpack_destination(raw: u32) -> u32 {
    raw >> DESTINATION_SHIFT
}

/// Transport type of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StripType {
    DirtRoad,
    Railroad,
    SeaConnection,
    PortConnection,
}

impl StripType {
    pub const ALL: [StripType; 4] = [
        StripType::DirtRoad,
        StripType::Railroad,
        StripType::SeaConnection,
        StripType::PortConnection,
    ];

    /// Decode a 6-bit type field. Unknown values yield `None`.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(StripType::DirtRoad),
            0x01 => Some(StripType::Railroad),
            0x02 => Some(StripType::SeaConnection),
            0x03 => Some(StripType::PortConnection),
            _ => None,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            StripType::DirtRoad => 0x00,
            StripType::Railroad => 0x01,
            StripType::SeaConnection => 0x02,
            StripType::PortConnection => 0x03,
        }
    }
}

impl fmt::Display for StripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StripType::DirtRoad => "dirt road",
            StripType::Railroad => "railroad",
            StripType::SeaConnection => "sea connection",
            StripType::PortConnection => "port connection",
        };
        f.write_str(name)
    }
}

/// A directed edge between two anchors.
///
/// Most strips carry a single route; a handful carry several to model forks
/// and merges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strip {
    #[serde(rename = "sourceID")]
    raw_source: u32,
    #[serde(rename = "destinationID")]
    raw_destination: u32,
    #[serde(rename = "routeIDs")]
    pub route_ids: Vec<u64>,
}

impl Strip {
    pub fn new(
        strip_type: StripType,
        source_id: u32,
        destination_id: u32,
        route_ids: Vec<u64>,
    ) -> Self {
        Self {
            raw_source: pack_source(strip_type.bits(), source_id),
            raw_destination: pack_destination(destination_id),
            route_ids,
        }
    }

    /// Build a strip from the packed fields exactly as they appear on disk.
    pub fn from_raw(raw_source: u32, raw_destination: u32, route_ids: Vec<u64>) -> Self {
        Self {
            raw_source,
            raw_destination,
            route_ids,
        }
    }

    pub fn raw_source(&self) -> u32 {
        self.raw_source
    }

    pub fn raw_destination(&self) -> u32 {
        self.raw_destination
    }

    /// The 6-bit type field, including values outside [`StripType`].
    pub fn type_bits(&self) -> u8 {
        unpack_source(self.raw_source).0
    }

    pub fn strip_type(&self) -> Option<StripType> {
        StripType::from_bits(self.type_bits())
    }

    pub fn source_id(&self) -> u32 {
        unpack_source(self.raw_source).1
    }

    /// Replace the source anchor, keeping the type bits.
    pub fn set_source_id(&mut self, anchor_id: u32) {
        self.raw_source = pack_source(self.type_bits(), anchor_id);
    }

    pub fn destination_id(&self) -> u32 {
        unpack_destination(self.raw_destination)
    }

    pub fn set_destination_id(&mut self, anchor_id: u32) {
        self.raw_destination = pack_destination(anchor_id);
    }

    /// Identity key, ordered the way strips are sorted in network files.
    pub fn key(&self) -> StripKey {
        StripKey {
            raw_destination: self.raw_destination,
            raw_source: self.raw_source,
        }
    }

    /// Rewrite every route reference found in `map`, leaving others alone.
    pub fn remap_routes(&mut self, map: &BTreeMap<u64, u64>) {
        for route in &mut self.route_ids {
            if let Some(&new_id) = map.get(route) {
                *route = new_id;
            }
        }
    }
}

impl fmt::Display for Strip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Strip {}->{}", self.source_id(), self.destination_id())?;
        match self.strip_type() {
            Some(t) => write!(f, " ({t})"),
            None => write!(f, " (type {:#x})", self.type_bits()),
        }
    }
}

/// Identity of a strip: the raw destination field, then the raw source field.
///
/// Renders as `"<destination>:<source>"` so it can key interchange documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StripKey {
    pub raw_destination: u32,
    pub raw_source: u32,
}

impl fmt::Display for StripKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.raw_destination, self.raw_source)
    }
}

/// A strip key string was not of the form `"<destination>:<source>"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid strip key {0:?}: expected \"<destination>:<source>\"")]
pub struct ParseStripKeyError(String);

impl FromStr for StripKey {
    type Err = ParseStripKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseStripKeyError(s.to_string());
        let (destination, source) = s.split_once(':').ok_or_else(err)?;
        Ok(StripKey {
            raw_destination: destination.trim().parse().map_err(|_| err())?,
            raw_source: source.trim().parse().map_err(|_| err())?,
        })
    }
}

impl Serialize for StripKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StripKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
