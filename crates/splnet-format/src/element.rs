//! Element codecs for anchors, routes and strips.
//!
//! Every element is wrapped in an element header and footer. The footer's
//! sentinel marks the last element of a section and cannot be derived from
//! the element itself, so `is_final` is passed in on both paths.

use splnet_core::{Anchor, Route, Strip};

use crate::codec::{FrameReader, FrameWriter};
use crate::error::FormatError;
use crate::tags;

/// An entity with a fixed framed layout.
pub trait Element: Sized {
    /// Section name used in diagnostics.
    const SECTION: &'static str;

    /// Section identifier token.
    const SECTION_TAG: u16;

    /// Decode one element. `is_final` must be true for the last element of
    /// its section.
    fn decode(reader: &mut FrameReader<'_>, is_final: bool) -> Result<Self, FormatError>;

    /// Encode one element. `is_final` must be true for the last element of
    /// its section.
    fn encode(&self, writer: &mut FrameWriter, is_final: bool);
}

impl Element for Anchor {
    const SECTION: &'static str = "anchor";
    const SECTION_TAG: u16 = tags::ANCHOR_SECTION;

    fn decode(reader: &mut FrameReader<'_>, is_final: bool) -> Result<Self, FormatError> {
        reader.expect_element_header()?;
        reader.expect(tags::ANCHOR_ID)?;
        let id: u32 = reader.read()?;
        reader.expect_all(&tags::ANCHOR_BODY)?;
        reader.expect(tags::ANCHOR_POSITION)?;
        let pos_x = reader.read()?;
        reader.expect(tags::ANCHOR_POSITION)?;
        let pos_y = reader.read()?;
        reader.expect_element_footer(is_final)?;
        Ok(Anchor { id, pos_x, pos_y })
    }

    fn encode(&self, writer: &mut FrameWriter, is_final: bool) {
        writer.write_element_header();
        writer.write(tags::ANCHOR_ID);
        writer.write(self.id);
        writer.write_all(&tags::ANCHOR_BODY);
        writer.write(tags::ANCHOR_POSITION);
        writer.write(self.pos_x);
        writer.write(tags::ANCHOR_POSITION);
        writer.write(self.pos_y);
        writer.write_element_footer(is_final);
    }
}

impl Element for Route {
    const SECTION: &'static str = "route";
    const SECTION_TAG: u16 = tags::ROUTE_SECTION;

    fn decode(reader: &mut FrameReader<'_>, is_final: bool) -> Result<Self, FormatError> {
        reader.expect_element_header()?;
        reader.expect(tags::ROUTE_ID)?;
        let id: u64 = reader.read()?;
        reader.expect_all(&tags::ROUTE_BODY)?;

        // No count is stored: references continue until the next token is
        // something other than an anchor-reference tag (normally the footer).
        let mut anchors: Vec<u32> = Vec::new();
        while reader.next_is(tags::ROUTE_ANCHOR_REF)? {
            reader.expect(tags::ROUTE_ANCHOR_REF)?;
            anchors.push(reader.read()?);
        }

        reader.expect_element_footer(is_final)?;
        Ok(Route { id, anchors })
    }

    fn encode(&self, writer: &mut FrameWriter, is_final: bool) {
        writer.write_element_header();
        writer.write(tags::ROUTE_ID);
        writer.write(self.id);
        writer.write_all(&tags::ROUTE_BODY);
        for &anchor in &self.anchors {
            writer.write(tags::ROUTE_ANCHOR_REF);
            writer.write(anchor);
        }
        writer.write_element_footer(is_final);
    }
}

impl Element for Strip {
    const SECTION: &'static str = "strip";
    const SECTION_TAG: u16 = tags::STRIP_SECTION;

    fn decode(reader: &mut FrameReader<'_>, is_final: bool) -> Result<Self, FormatError> {
        reader.expect_element_header()?;
        reader.expect(tags::STRIP_ENDPOINTS)?;
        let raw_source: u32 = reader.read()?;
        let raw_destination: u32 = reader.read()?;
        reader.expect_all(&tags::STRIP_BODY)?;

        // Same scheme as routes, with the route-reference tag as lookahead.
        let mut route_ids: Vec<u64> = Vec::new();
        while reader.next_is(tags::STRIP_ROUTE_REF)? {
            reader.expect(tags::STRIP_ROUTE_REF)?;
            route_ids.push(reader.read()?);
        }

        reader.expect_element_footer(is_final)?;
        Ok(Strip::from_raw(raw_source, raw_destination, route_ids))
    }

    fn encode(&self, writer: &mut FrameWriter, is_final: bool) {
        writer.write_element_header();
        writer.write(tags::STRIP_ENDPOINTS);
        writer.write(self.raw_source());
        writer.write(self.raw_destination());
        writer.write_all(&tags::STRIP_BODY);
        for &route in &self.route_ids {
            writer.write(tags::STRIP_ROUTE_REF);
            writer.write(route);
        }
        writer.write_element_footer(is_final);
    }
}
