//! PowerPoint (.pptx) container support.
//!
//! A minimal Office Open XML layer for the report pipeline:
//!
//! - [`Package`]: the `.pptx` archive in memory, with slide parts resolved
//!   in presentation order
//! - [`Slide`]: read-only text access to one slide part
//! - [`slide::replace_text`]: the streaming run-text substitution pass
//! - [`rels`]: OPC relationship (.rels) parsing
//!
//! Only what the substitution pipeline needs is implemented; everything
//! else in the container round-trips as opaque bytes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use deckstamp::pptx::Package;
//!
//! let mut pkg = Package::open("presentation.pptx".as_ref())?;
//! println!("slides: {}", pkg.slide_count());
//!
//! // Replace on the first slide (indices are 0-based here; the editor
//! // layer exposes the 1-based surface)
//! let made = pkg.replace_text_in_slide(
//!     0,
//!     &[("MPE".to_string(), "$120 B".to_string())],
//! )?;
//! println!("replacements made: {made}");
//!
//! let bytes = pkg.to_bytes()?;
//! # let _ = bytes;
//! # Ok::<(), deckstamp::pptx::PptxError>(())
//! ```

pub mod error;
pub mod package;
pub mod rels;
pub mod slide;

pub use error::{PptxError, Result};
pub use package::Package;
pub use slide::Slide;

#[cfg(test)]
pub(crate) mod testutil {
    //! In-memory `.pptx` fixtures for tests.

    use std::io::Write;

    /// Build a slide part with one shape holding one paragraph of `runs`.
    pub fn slide_part(runs: &[&str]) -> Vec<u8> {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody><a:p>"#,
        );
        for run in runs {
            xml.push_str("<a:r><a:rPr lang=\"en-US\"/><a:t>");
            xml.push_str(run);
            xml.push_str("</a:t></a:r>");
        }
        xml.push_str("</a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>");
        xml.into_bytes()
    }

    /// Zip up named members into archive bytes.
    pub fn pptx_from_members(members: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, blob) in members {
            writer.start_file(*name, options).unwrap();
            writer.write_all(blob).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// Build a minimal valid `.pptx` with one shape per slide; each slide's
    /// paragraph holds the given runs, slides in presentation order.
    pub fn minimal_pptx(slides: &[&[&str]]) -> Vec<u8> {
        let mut members: Vec<(String, Vec<u8>)> = Vec::new();

        let mut content_types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
        );
        for i in 1..=slides.len() {
            content_types.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            ));
        }
        content_types.push_str("</Types>");
        members.push(("[Content_Types].xml".to_string(), content_types.into_bytes()));

        members.push((
            "_rels/.rels".to_string(),
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#.to_vec(),
        ));

        let mut sld_id_lst = String::new();
        let mut pres_rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for i in 1..=slides.len() {
            sld_id_lst.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                255 + i,
                i + 1
            ));
            pres_rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{i}.xml"/>"#,
                i + 1
            ));
        }
        pres_rels.push_str("</Relationships>");

        members.push((
            "ppt/presentation.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><p:sldIdLst>{sld_id_lst}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#
            )
            .into_bytes(),
        ));
        members.push((
            "ppt/_rels/presentation.xml.rels".to_string(),
            pres_rels.into_bytes(),
        ));

        for (i, runs) in slides.iter().enumerate() {
            members.push((
                format!("ppt/slides/slide{}.xml", i + 1),
                slide_part(runs),
            ));
        }

        let borrowed: Vec<(&str, Vec<u8>)> = members
            .iter()
            .map(|(n, b)| (n.as_str(), b.clone()))
            .collect();
        pptx_from_members(&borrowed)
    }
}
