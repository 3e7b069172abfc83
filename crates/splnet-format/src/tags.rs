//! Constant tokens of the network file format.
//!
//! The format has no length fields inside sections. Structure is expressed by
//! these fixed 16-bit tokens, so every one of them has to be reproduced
//! exactly for the host application to accept a file.

/// File header tokens preceding the three entity counts.
pub const FILE_HEADER: [u16; 8] = [0x00ee, 0x0001, 0x000c, 0x0004, 0x0000, 0x045a, 0x0001, 0x0003];
/// Prefix of each entity count in the file header.
pub const COUNT_PREFIX: u16 = 0x000c;
/// Token closing the file header.
pub const FILE_HEADER_END: u16 = 0x0004;

/// Section identifiers, in file order.
pub const ANCHOR_SECTION: u16 = 0x05f4;
pub const ROUTE_SECTION: u16 = 0x05f5;
pub const STRIP_SECTION: u16 = 0x05f6;
/// Constants following a section identifier.
pub const SECTION_HEADER_TAIL: [u16; 3] = [0x0001, 0x0003, 0x0003];

pub const ELEMENT_HEADER: [u16; 2] = [0x000b, 0x0001];
pub const ELEMENT_FOOTER: [u16; 2] = [0x0004, 0x0004];
/// Footer sentinel of every element except the last in its section.
pub const SENTINEL_MORE: u16 = 0x0003;
/// Footer sentinel of the last element in its section.
pub const SENTINEL_FINAL: u16 = 0x0004;

pub const ANCHOR_ID: u16 = 0x0014;
pub const ANCHOR_BODY: [u16; 3] = [0x004c, 0x0001, 0x0003];
pub const ANCHOR_POSITION: u16 = 0x000d;

pub const ROUTE_ID: u16 = 0x029c;
pub const ROUTE_BODY: [u16; 3] = [0x05f7, 0x0001, 0x0003];
/// Prefix of each anchor reference inside a route.
pub const ROUTE_ANCHOR_REF: u16 = 0x0014;

pub const STRIP_ENDPOINTS: u16 = 0x029c;
pub const STRIP_BODY: [u16; 3] = [0x05f5, 0x0001, 0x0003];
/// Prefix of each route reference inside a strip.
pub const STRIP_ROUTE_REF: u16 = 0x029c;
