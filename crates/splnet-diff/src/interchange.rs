//! JSON interchange documents for diffs.
//!
//! ```json
//! {
//!     "anchorChanges": { "deletions": {}, "additions": { "3": { "id": 3, "posX": 1.0, "posY": 2.0 } }, "edits": {} },
//!     "stripChanges": { "deletions": {}, "additions": {}, "edits": { "16:193": [ {..}, {..} ] } },
//!     "routeChanges": { "deletions": {}, "additions": {}, "edits": {} }
//! }
//! ```
//!
//! Keys are entity ids as decimal strings; strip keys are `"<raw destination>:<raw source>"`.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::diff::Diff;
use crate::error::DiffError;

/// Indent used when none is configured.
pub const DEFAULT_INDENT: usize = 4;

/// Render `diff` as pretty JSON with `indent` spaces, ending in a newline.
pub fn to_json_pretty(diff: &Diff, indent: usize) -> Result<String, DiffError> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    diff.serialize(&mut ser)?;
    out.push(b'\n');
    String::from_utf8(out).map_err(|e| DiffError::Interchange(serde::ser::Error::custom(e)))
}

pub fn from_json(text: &str) -> Result<Diff, DiffError> {
    Ok(serde_json::from_str(text)?)
}

/// Read a diff document from disk.
pub fn read_diff(path: &Path) -> Result<Diff, DiffError> {
    let text = fs::read_to_string(path)?;
    from_json(&text)
}

/// Write a diff document to disk.
pub fn write_diff(path: &Path, diff: &Diff, indent: usize) -> Result<(), DiffError> {
    let text = to_json_pretty(diff, indent)?;
    fs::write(path, text)?;
    Ok(())
}
