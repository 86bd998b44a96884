//! Report editing: load a deck, stamp placeholders into one slide, save.
//!
//! [`ReportEditor`] is the single owner of the document handle for one
//! invocation. Its lifecycle is a two-state machine: `Unloaded` until
//! [`load`](ReportEditor::load) succeeds (a failed load leaves it
//! `Unloaded`), then `Loaded`, in which
//! [`replace_in_slide`](ReportEditor::replace_in_slide) and
//! [`save`](ReportEditor::save) may each be called any number of times.
//! Every call is synchronous and blocking; nothing here retries.

use crate::pathsafe::{self, PathError};
use crate::pptx::{Package, PptxError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Error types for editor operations.
///
/// Every variant is a terminal failure of the current invocation; errors
/// propagate to the invoking shell (CLI or HTTP), which alone decides how
/// to present them.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The input path is unreadable or not a valid presentation container
    #[error("failed to load presentation: {0}")]
    DocumentLoad(#[source] PptxError),

    /// A loaded document's part failed to parse or rewrite
    #[error("document error: {0}")]
    Document(#[source] PptxError),

    /// The requested slide is outside the presentation
    #[error("slide {requested} out of range: presentation has {available} slide(s)")]
    SlideOutOfRange { requested: u32, available: usize },

    /// An operation was invoked before a successful load
    #[error("invalid editor state: {0}")]
    InvalidState(&'static str),

    /// The output path escapes the output directory
    #[error("{0}")]
    PathTraversal(#[source] PathError),

    /// Serialization or the rename-publish step failed
    #[error("failed to persist report: {0}")]
    Persistence(String),
}

/// Outcome of one substitution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacementReport {
    /// Total substring occurrences replaced. Zero is not an error:
    /// placeholders absent from the slide are silently ignored.
    pub replacements_made: usize,
}

/// Handle for one load → replace → save invocation over a deck.
///
/// # Examples
///
/// ```rust,no_run
/// use deckstamp::editor::ReportEditor;
///
/// let mut editor = ReportEditor::new("input.pptx");
/// editor.load()?;
/// let report = editor.replace_in_slide(
///     2,
///     &[("MPE".to_string(), "$120 B".to_string())],
/// )?;
/// println!("made {} replacements", report.replacements_made);
/// let path = editor.save("output".as_ref())?;
/// println!("report generated: {}", path.display());
/// # Ok::<(), deckstamp::editor::EditorError>(())
/// ```
pub struct ReportEditor {
    /// Path of the input presentation
    input_path: PathBuf,

    /// The loaded document handle; `None` while unloaded
    package: Option<Package>,
}

impl ReportEditor {
    /// Create an editor for the presentation at `input_path`.
    ///
    /// Nothing is read until [`load`](Self::load).
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            package: None,
        }
    }

    /// Whether a presentation has been loaded.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.package.is_some()
    }

    /// Load the presentation from the input path.
    ///
    /// Fails with [`EditorError::DocumentLoad`] if the path does not
    /// exist, is unreadable, or is not a valid `.pptx` container; the
    /// editor stays unloaded in that case.
    pub fn load(&mut self) -> Result<()> {
        let package = Package::open(&self.input_path).map_err(EditorError::DocumentLoad)?;
        tracing::info!(
            path = %self.input_path.display(),
            slides = package.slide_count(),
            "loaded presentation"
        );
        self.package = Some(package);
        Ok(())
    }

    /// Replace placeholders in the given slide (1-indexed).
    ///
    /// Each `(placeholder, value)` pair is applied in order to the text of
    /// every run in every paragraph of every shape text frame on the
    /// slide; every occurrence is replaced. Pair order matters when one
    /// placeholder is a substring of another.
    ///
    /// Fails with [`EditorError::SlideOutOfRange`] when `slide_number` is
    /// outside `[1, slide_count]`, leaving the document unmodified.
    pub fn replace_in_slide(
        &mut self,
        slide_number: u32,
        replacements: &[(String, String)],
    ) -> Result<ReplacementReport> {
        let package = self
            .package
            .as_mut()
            .ok_or(EditorError::InvalidState("presentation not loaded"))?;

        let available = package.slide_count();
        if slide_number < 1 || slide_number as usize > available {
            return Err(EditorError::SlideOutOfRange {
                requested: slide_number,
                available,
            });
        }

        let replacements_made = package
            .replace_text_in_slide(slide_number as usize - 1, replacements)
            .map_err(EditorError::Document)?;

        tracing::info!(slide_number, replacements_made, "replaced placeholders");
        Ok(ReplacementReport { replacements_made })
    }

    /// Save the (possibly mutated) presentation into `output_dir`.
    ///
    /// The output filename is `report_generated_<YYYYMMDD_HHMMSS>.pptx`
    /// (local time). The document is serialized to a temporary file in the
    /// output directory and atomically renamed into place, so no partial
    /// file is ever visible at the final path. Two saves within the same
    /// wall-clock second collide on the filename; the later rename
    /// silently replaces the earlier file.
    ///
    /// Returns the final path.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf> {
        let package = self
            .package
            .as_ref()
            .ok_or(EditorError::InvalidState("presentation not loaded"))?;

        let timestamp = pathsafe::generate_timestamp();
        let filename = format!("report_generated_{timestamp}.pptx");
        let output_path = pathsafe::safe_path(output_dir, &filename).map_err(|e| match e {
            PathError::Traversal { .. } => EditorError::PathTraversal(e),
            PathError::Io(_) => EditorError::Persistence(e.to_string()),
        })?;

        let bytes = package
            .to_bytes()
            .map_err(|e| EditorError::Persistence(e.to_string()))?;
        pathsafe::atomic_write(&output_path, bytes.as_slice())
            .map_err(|e| EditorError::Persistence(e.to_string()))?;

        tracing::info!(path = %output_path.display(), "report saved");
        Ok(output_path)
    }
}
