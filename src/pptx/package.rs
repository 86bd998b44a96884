//! Package access for PowerPoint presentations.
//!
//! A `.pptx` file is a ZIP archive of XML parts wired together by OPC
//! relationships. [`Package`] loads the member table into memory, resolves
//! the presentation-ordered slide list, and re-serializes the archive with
//! the same members in the same order. Parts other than the rewritten
//! slide round-trip byte-for-byte.

use crate::pptx::error::{PptxError, Result};
use crate::pptx::rels::{self, OFFICE_DOCUMENT};
use crate::pptx::slide::{self, Slide};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

/// Archive member name of the package-level relationships part.
const ROOT_RELS: &str = "_rels/.rels";

/// A PowerPoint (.pptx) package held in memory.
///
/// This is the document handle of one editing invocation: created by a
/// load, mutated by replacement, consumed by serialization, then
/// discarded. Owned exclusively by one editor instance.
///
/// # Examples
///
/// ```rust,no_run
/// use deckstamp::pptx::Package;
///
/// let pkg = Package::open("presentation.pptx".as_ref())?;
/// println!("presentation has {} slides", pkg.slide_count());
/// # Ok::<(), deckstamp::pptx::PptxError>(())
/// ```
#[derive(Debug)]
pub struct Package {
    /// Member names in original archive order
    member_order: Vec<String>,

    /// Member name to decompressed content
    blobs: HashMap<String, Vec<u8>>,

    /// Slide member names in presentation order
    slide_parts: Vec<String>,
}

impl Package {
    /// Open a .pptx package from a file path.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PptxError::PackageNotFound(path.display().to_string()));
        }
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Open a .pptx package from in-memory bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

        let mut member_order = Vec::with_capacity(archive.len());
        let mut blobs = HashMap::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut blob = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut blob)?;
            member_order.push(name.clone());
            blobs.insert(name, blob);
        }

        let slide_parts = resolve_slide_parts(&blobs)?;

        Ok(Self {
            member_order,
            blobs,
            slide_parts,
        })
    }

    /// Get the number of slides in the presentation.
    #[inline]
    pub fn slide_count(&self) -> usize {
        self.slide_parts.len()
    }

    /// Get a read-only view of a slide by 0-based index.
    pub fn slide(&self, index: usize) -> Result<Slide<'_>> {
        let xml = self.slide_xml(index)?;
        Ok(Slide::new(xml))
    }

    /// Get the raw part XML of a slide by 0-based index.
    pub fn slide_xml(&self, index: usize) -> Result<&[u8]> {
        let name = self
            .slide_parts
            .get(index)
            .ok_or_else(|| PptxError::PartNotFound(format!("slide index {index}")))?;
        self.blobs
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| PptxError::PartNotFound(name.clone()))
    }

    /// Replace placeholder text in a slide, by 0-based index.
    ///
    /// Rewrites the slide part in place and returns the number of
    /// substring occurrences replaced. See [`slide::replace_text`] for the
    /// substitution contract.
    pub fn replace_text_in_slide(
        &mut self,
        index: usize,
        replacements: &[(String, String)],
    ) -> Result<usize> {
        let name = self
            .slide_parts
            .get(index)
            .ok_or_else(|| PptxError::PartNotFound(format!("slide index {index}")))?
            .clone();
        let xml = self
            .blobs
            .get(&name)
            .ok_or_else(|| PptxError::PartNotFound(name.clone()))?;

        let (rewritten, replacements_made) = slide::replace_text(xml, replacements)?;
        self.blobs.insert(name, rewritten);
        Ok(replacements_made)
    }

    /// Serialize the package back into `.pptx` bytes.
    ///
    /// Members are written in their original archive order with Deflate
    /// compression.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for name in &self.member_order {
            let blob = self
                .blobs
                .get(name)
                .ok_or_else(|| PptxError::PartNotFound(name.clone()))?;
            writer.start_file(name.as_str(), options)?;
            writer.write_all(blob)?;
        }

        Ok(writer.finish()?.into_inner())
    }
}

/// Resolve the slide member names in presentation order.
///
/// Follows the OPC chain: the package relationships name the presentation
/// part, its `<p:sldIdLst>` gives slide r:ids in presentation order, and
/// the presentation part's relationships map each r:id to a slide member.
/// Member-name sorting is never consulted; reordered decks keep their
/// authored order.
fn resolve_slide_parts(blobs: &HashMap<String, Vec<u8>>) -> Result<Vec<String>> {
    let root_rels = blobs
        .get(ROOT_RELS)
        .ok_or_else(|| PptxError::PartNotFound(ROOT_RELS.to_string()))?;
    let pres_part = rels::parse_relationships(root_rels)?
        .into_iter()
        .find(|r| r.reltype == OFFICE_DOCUMENT && !r.is_external)
        .map(|r| rels::resolve_target("", &r.target_ref))
        .ok_or_else(|| {
            PptxError::InvalidFormat("no officeDocument relationship in package".to_string())
        })?;

    let pres_xml = blobs
        .get(&pres_part)
        .ok_or_else(|| PptxError::PartNotFound(pres_part.clone()))?;
    let rids = slide_rids(pres_xml)?;

    let (base_dir, pres_file) = match pres_part.rsplit_once('/') {
        Some((dir, file)) => (dir.to_string(), file.to_string()),
        None => (String::new(), pres_part.clone()),
    };
    let pres_rels_name = if base_dir.is_empty() {
        format!("_rels/{pres_file}.rels")
    } else {
        format!("{base_dir}/_rels/{pres_file}.rels")
    };
    let pres_rels_xml = blobs
        .get(&pres_rels_name)
        .ok_or_else(|| PptxError::PartNotFound(pres_rels_name.clone()))?;

    let by_id: HashMap<String, String> = rels::parse_relationships(pres_rels_xml)?
        .into_iter()
        .filter(|r| !r.is_external)
        .map(|r| (r.r_id.clone(), rels::resolve_target(&base_dir, &r.target_ref)))
        .collect();

    let mut slide_parts = Vec::with_capacity(rids.len());
    for rid in rids {
        let member = by_id
            .get(&rid)
            .ok_or_else(|| PptxError::InvalidRelationship(rid.clone()))?;
        if !blobs.contains_key(member) {
            return Err(PptxError::PartNotFound(member.clone()));
        }
        slide_parts.push(member.clone());
    }
    Ok(slide_parts)
}

/// Get the relationship IDs of all slides in presentation order.
///
/// Counts the `<p:sldId>` elements of the presentation part and reads
/// their `r:id` attributes.
fn slide_rids(pres_xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(pres_xml);
    reader.config_mut().trim_text(true);

    let mut rids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sldId" {
                    for attr in e.attributes().flatten() {
                        // sldId carries both an unprefixed numeric id and
                        // the r:id relationship reference; relationship IDs
                        // are arbitrary xsd:IDs, so select by the qualified
                        // attribute name, never by the value's shape.
                        let is_rel_id = attr.key.local_name().as_ref() == b"id"
                            && attr.key.prefix().is_some_and(|p| p.as_ref() == b"r");
                        if is_rel_id {
                            let rid = std::str::from_utf8(&attr.value)
                                .map_err(|e| PptxError::Xml(e.to_string()))?;
                            rids.push(rid.to_string());
                            break;
                        }
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(PptxError::Xml(e.to_string())),
            _ => {},
        }
        buf.clear();
    }

    Ok(rids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::testutil::{minimal_pptx, pptx_from_members};

    #[test]
    fn loads_minimal_package() {
        let data = minimal_pptx(&[&["Hello MPE"], &["second slide"]]);
        let pkg = Package::from_bytes(&data).unwrap();
        assert_eq!(pkg.slide_count(), 2);
        assert_eq!(pkg.slide(0).unwrap().text().unwrap(), "Hello MPE");
        assert_eq!(pkg.slide(1).unwrap().text().unwrap(), "second slide");
    }

    #[test]
    fn missing_file_reports_package_not_found() {
        let err = Package::open("no-such-deck.pptx".as_ref()).unwrap_err();
        assert!(matches!(err, PptxError::PackageNotFound(_)));
    }

    #[test]
    fn rejects_non_zip_bytes() {
        let err = Package::from_bytes(b"this is not a zip archive").unwrap_err();
        assert!(matches!(err, PptxError::Zip(_)));
    }

    #[test]
    fn rejects_zip_without_office_document() {
        let data = pptx_from_members(&[("hello.txt", b"hi".to_vec())]);
        let err = Package::from_bytes(&data).unwrap_err();
        assert!(matches!(err, PptxError::PartNotFound(_)));
    }

    #[test]
    fn slide_order_follows_sld_id_list_not_member_names() {
        // slide1.xml and slide2.xml are listed in reverse order in the
        // presentation; the package must honor the sldIdLst order.
        let members = vec![
            (
                "_rels/.rels".to_string(),
                br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#.to_vec(),
            ),
            (
                "ppt/presentation.xml".to_string(),
                br#"<?xml version="1.0"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst><p:sldId id="256" r:id="rId3"/><p:sldId id="257" r:id="rId2"/></p:sldIdLst></p:presentation>"#.to_vec(),
            ),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/></Relationships>"#.to_vec(),
            ),
            (
                "ppt/slides/slide1.xml".to_string(),
                crate::pptx::testutil::slide_part(&["I am slide1.xml"]),
            ),
            (
                "ppt/slides/slide2.xml".to_string(),
                crate::pptx::testutil::slide_part(&["I am slide2.xml"]),
            ),
        ];
        let members: Vec<(&str, Vec<u8>)> =
            members.iter().map(|(n, b)| (n.as_str(), b.clone())).collect();
        let data = pptx_from_members(&members);

        let pkg = Package::from_bytes(&data).unwrap();
        assert_eq!(pkg.slide(0).unwrap().text().unwrap(), "I am slide2.xml");
        assert_eq!(pkg.slide(1).unwrap().text().unwrap(), "I am slide1.xml");
    }

    #[test]
    fn relationship_ids_need_not_look_like_rid() {
        // r:id is an arbitrary xsd:ID; nothing requires the "rId" spelling.
        let members = vec![
            (
                "_rels/.rels".to_string(),
                br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#.to_vec(),
            ),
            (
                "ppt/presentation.xml".to_string(),
                br#"<?xml version="1.0"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst><p:sldId id="256" r:id="slideOne"/></p:sldIdLst></p:presentation>"#.to_vec(),
            ),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="slideOne" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/></Relationships>"#.to_vec(),
            ),
            (
                "ppt/slides/slide1.xml".to_string(),
                crate::pptx::testutil::slide_part(&["only slide"]),
            ),
        ];
        let members: Vec<(&str, Vec<u8>)> =
            members.iter().map(|(n, b)| (n.as_str(), b.clone())).collect();
        let data = pptx_from_members(&members);

        let pkg = Package::from_bytes(&data).unwrap();
        assert_eq!(pkg.slide_count(), 1);
        assert_eq!(pkg.slide(0).unwrap().text().unwrap(), "only slide");
    }

    #[test]
    fn replace_rewrites_only_the_target_slide() {
        let data = minimal_pptx(&[&["Hello MPE"], &["MPE again"]]);
        let mut pkg = Package::from_bytes(&data).unwrap();

        let made = pkg
            .replace_text_in_slide(0, &[("MPE".to_string(), "$120 B".to_string())])
            .unwrap();
        assert_eq!(made, 1);
        assert_eq!(pkg.slide(0).unwrap().text().unwrap(), "Hello $120 B");
        assert_eq!(pkg.slide(1).unwrap().text().unwrap(), "MPE again");
    }

    #[test]
    fn serialization_round_trips() {
        let data = minimal_pptx(&[&["Hello MPE"]]);
        let mut pkg = Package::from_bytes(&data).unwrap();
        pkg.replace_text_in_slide(0, &[("MPE".to_string(), "world".to_string())])
            .unwrap();

        let bytes = pkg.to_bytes().unwrap();
        let reloaded = Package::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.slide_count(), 1);
        assert_eq!(reloaded.slide(0).unwrap().text().unwrap(), "Hello world");
    }

    #[test]
    fn untouched_members_round_trip_byte_for_byte() {
        let data = minimal_pptx(&[&["keep me"]]);
        let pkg = Package::from_bytes(&data).unwrap();
        let bytes = pkg.to_bytes().unwrap();
        let reloaded = Package::from_bytes(&bytes).unwrap();

        assert_eq!(pkg.member_order, reloaded.member_order);
        for name in &pkg.member_order {
            assert_eq!(pkg.blobs[name], reloaded.blobs[name], "member {name}");
        }
    }
}
