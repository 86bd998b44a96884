//! Slide text access and in-place substitution.
//!
//! A slide part is PresentationML: shapes (`<p:sp>`) own text bodies
//! (`<p:txBody>`) holding paragraphs (`<a:p>`) of runs (`<a:r>`), each run
//! carrying one contiguous text span (`<a:t>`) with uniform formatting.
//!
//! Substitution is a streaming rewrite: every XML event is copied through
//! unchanged except the text content of run `<a:t>` elements inside shape
//! text bodies. No element is ever created or removed, so the document
//! structure is preserved by construction. A placeholder split across two
//! runs by a formatting boundary is not matched; that is a documented
//! limitation of run-level substitution, not a defect.
//!
//! The reader hands entity references (`&amp;`, `&#233;`, ...) over as
//! separate events, so a run's text is assembled from its text and
//! reference events before matching; placeholders and values containing
//! `&` or `<` behave like any other text.

use crate::pptx::error::{PptxError, Result};
use quick_xml::events::{BytesText, Event};
use quick_xml::{Reader, Writer};

/// A read-only view of a slide part.
///
/// Borrowed from the owning [`Package`](crate::pptx::Package); exposes text
/// extraction for callers that want to show the slide's current content.
#[derive(Debug, Clone, Copy)]
pub struct Slide<'a> {
    /// Raw slide part XML
    xml: &'a [u8],
}

impl<'a> Slide<'a> {
    /// Create a slide view over raw part XML.
    pub(crate) fn new(xml: &'a [u8]) -> Self {
        Self { xml }
    }

    /// Get the raw slide part XML.
    #[inline]
    pub fn xml(&self) -> &'a [u8] {
        self.xml
    }

    /// Extract all text from this slide.
    ///
    /// Paragraph texts within one text frame are joined with newlines;
    /// non-empty text frames are joined with blank lines.
    pub fn text(&self) -> Result<String> {
        let mut reader = Reader::from_reader(self.xml);

        let mut frames: Vec<String> = Vec::new();
        let mut paragraphs: Vec<String> = Vec::new();
        let mut paragraph = String::new();

        let mut sp_depth = 0usize;
        let mut in_tx_body = false;
        let mut in_text = false;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"sp" => sp_depth += 1,
                    b"txBody" if sp_depth > 0 => {
                        in_tx_body = true;
                        paragraphs.clear();
                    },
                    b"p" if in_tx_body => paragraph.clear(),
                    b"t" if in_tx_body => in_text = true,
                    _ => {},
                },
                Ok(Event::Text(e)) if in_text => {
                    let text = std::str::from_utf8(e.as_ref())
                        .map_err(|e| PptxError::Xml(e.to_string()))?;
                    paragraph.push_str(text);
                },
                Ok(Event::GeneralRef(e)) if in_text => {
                    paragraph.push_str(&resolve_reference(e.as_ref())?);
                },
                Ok(Event::End(e)) => match e.local_name().as_ref() {
                    b"sp" => sp_depth = sp_depth.saturating_sub(1),
                    b"txBody" if in_tx_body => {
                        in_tx_body = false;
                        let frame = paragraphs.join("\n");
                        let frame = frame.trim();
                        if !frame.is_empty() {
                            frames.push(frame.to_string());
                        }
                    },
                    b"p" if in_tx_body => paragraphs.push(std::mem::take(&mut paragraph)),
                    b"t" => in_text = false,
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(PptxError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(frames.join("\n\n"))
    }
}

/// Replace placeholder text in a slide part.
///
/// For every run text inside a shape text body, each
/// `(placeholder, value)` pair is applied in order, replacing every
/// occurrence of `placeholder` (plain case-sensitive substring match) with
/// `value`. Pair order matters when one placeholder is a substring of
/// another; pairs are applied sequentially, not simultaneously.
///
/// A run's text is assembled from all its text and entity-reference
/// events before matching, so `<a:t>A &amp; B</a:t>` matches the
/// placeholder `"A & B"`. Runs with no match are written back exactly as
/// read; rewritten runs carry the replaced text as a single escaped span.
///
/// Returns the rewritten part XML and the total number of occurrences
/// replaced. Zero replacements is not an error.
pub fn replace_text(
    xml: &[u8],
    replacements: &[(String, String)],
) -> Result<(Vec<u8>, usize)> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));

    let mut sp_depth = 0usize;
    let mut in_tx_body = false;
    let mut in_run = false;
    let mut in_run_text = false;
    let mut replacements_made = 0usize;

    // The run text currently being assembled, with the raw events backing
    // it, replayed verbatim when nothing matches.
    let mut run_text = String::new();
    let mut run_events: Vec<Event<'static>> = Vec::new();
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| PptxError::Xml(e.to_string()))?;

        let mut stashed = false;
        match &event {
            Event::Eof => break,
            Event::Start(e) => match e.local_name().as_ref() {
                b"sp" => sp_depth += 1,
                b"txBody" if sp_depth > 0 => in_tx_body = true,
                b"r" if in_tx_body => in_run = true,
                b"t" if in_run => {
                    in_run_text = true;
                    run_text.clear();
                    run_events.clear();
                },
                _ => {},
            },
            Event::End(e) => {
                if e.local_name().as_ref() == b"t" && in_run_text {
                    in_run_text = false;

                    let mut text = std::mem::take(&mut run_text);
                    let mut changed = false;
                    for (placeholder, value) in replacements {
                        let occurrences = text.matches(placeholder.as_str()).count();
                        if occurrences > 0 {
                            text = text.replace(placeholder.as_str(), value);
                            replacements_made += occurrences;
                            changed = true;
                        }
                    }

                    if changed {
                        run_events.clear();
                        writer
                            .write_event(Event::Text(BytesText::new(&text)))
                            .map_err(|e| PptxError::Xml(e.to_string()))?;
                    } else {
                        for kept in run_events.drain(..) {
                            writer
                                .write_event(kept)
                                .map_err(|e| PptxError::Xml(e.to_string()))?;
                        }
                    }
                }
                match e.local_name().as_ref() {
                    b"sp" => sp_depth = sp_depth.saturating_sub(1),
                    b"txBody" => in_tx_body = false,
                    b"r" => in_run = false,
                    _ => {},
                }
            },
            Event::Text(e) if in_run_text => {
                run_text.push_str(
                    std::str::from_utf8(e.as_ref())
                        .map_err(|e| PptxError::Xml(e.to_string()))?,
                );
                stashed = true;
            },
            Event::GeneralRef(e) if in_run_text => {
                run_text.push_str(&resolve_reference(e.as_ref())?);
                stashed = true;
            },
            _ => {},
        }

        if stashed {
            run_events.push(event.into_owned());
        } else {
            writer
                .write_event(event)
                .map_err(|e| PptxError::Xml(e.to_string()))?;
        }
        buf.clear();
    }

    Ok((writer.into_inner(), replacements_made))
}

/// Resolve a general entity reference (the text between `&` and `;`) to
/// the character(s) it stands for.
///
/// Handles the five predefined XML entities plus decimal and hexadecimal
/// character references. Anything else is a format error; slide parts
/// carry no DTD to declare custom entities.
fn resolve_reference(raw: &[u8]) -> Result<String> {
    let name = std::str::from_utf8(raw).map_err(|e| PptxError::Xml(e.to_string()))?;
    let entity = format!("&{name};");
    let resolved =
        quick_xml::escape::unescape(&entity).map_err(|e| PptxError::Xml(e.to_string()))?;
    Ok(resolved.into_owned())
}
