//! Relationship (.rels) parsing for OPC packages.
//!
//! Every part in an OPC package may carry a `_rels/<name>.rels` sibling
//! describing where its referenced parts live. This module parses those
//! files and resolves relative targets against the source part's base
//! directory; only the subset the report pipeline needs is implemented.

use crate::pptx::error::{PptxError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Relationship type URI of the package's main document part.
pub const OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// A single relationship from a source part to a target.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    pub r_id: String,

    /// Relationship type URI
    pub reltype: String,

    /// Target reference - a part reference or an external URL
    pub target_ref: String,

    /// Whether this is an external relationship
    pub is_external: bool,
}

/// Parse a relationships XML document.
///
/// Returns the relationships in document order. Attributes other than
/// `Id`, `Type`, `Target` and `TargetMode` are ignored.
pub fn parse_relationships(xml: &[u8]) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut rels = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut is_external = false;

                    for attr in e.attributes().flatten() {
                        let value = std::str::from_utf8(&attr.value)
                            .map_err(|e| PptxError::Xml(e.to_string()))?
                            .to_string();
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(value),
                            b"Type" => reltype = Some(value),
                            b"Target" => target_ref = Some(value),
                            b"TargetMode" => is_external = value == "External",
                            _ => {},
                        }
                    }

                    if let (Some(r_id), Some(reltype), Some(target_ref)) =
                        (r_id, reltype, target_ref)
                    {
                        rels.push(Relationship {
                            r_id,
                            reltype,
                            target_ref,
                            is_external,
                        });
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(PptxError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(rels)
}

/// Resolve a relative relationship target against a base directory.
///
/// `base_dir` is the directory of the source part within the archive
/// (e.g. `"ppt"` for `ppt/presentation.xml`); the result is an archive
/// member name without a leading slash.
pub fn resolve_target(base_dir: &str, target_ref: &str) -> String {
    // Package-absolute targets already name the member directly.
    if let Some(absolute) = target_ref.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target_ref.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}
