//! Deckstamp - stamp placeholder values into a PowerPoint deck
//!
//! This library replaces text placeholders inside a single slide of a
//! `.pptx` presentation and writes the result to a new file with a
//! timestamped, collision-free name. It is consumed by the `deckstamp`
//! CLI and, behind the `server` feature, by a thin HTTP API.
//!
//! # Features
//!
//! - **Validated configuration**: JSON config with a fixed schema
//!   (target slide number plus a placeholder→value map)
//! - **Run-level substitution**: plain substring replacement over the
//!   text runs of one slide; document structure is never altered
//! - **Safe persistence**: sanitized filenames, a directory-traversal
//!   guard, and atomic temp-file-then-rename publishing
//!
//! # Example - Generating a report
//!
//! ```no_run
//! use deckstamp::config::load_config;
//! use deckstamp::editor::ReportEditor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load and validate the replacement config
//! let config = load_config("report_config.json".as_ref())?;
//!
//! // Load the deck, stamp the target slide, save the report
//! let mut editor = ReportEditor::new("input.pptx");
//! editor.load()?;
//! editor.replace_in_slide(config.slide_number, &config.replacement_pairs())?;
//! let path = editor.save("output".as_ref())?;
//!
//! println!("Report generated: {}", path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Reading slide text
//!
//! ```no_run
//! use deckstamp::pptx::Package;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pkg = Package::open("input.pptx".as_ref())?;
//! for index in 0..pkg.slide_count() {
//!     println!("Slide {}: {}", index + 1, pkg.slide(index)?.text()?);
//! }
//! # Ok(())
//! # }
//! ```

/// Configuration parsing and validation
pub mod config;

/// The load → replace → save editing pipeline
pub mod editor;

/// Safe filesystem primitives (sanitization, traversal guard, atomic write)
pub mod pathsafe;

/// Minimal PowerPoint (.pptx) container support
pub mod pptx;

/// HTTP shell over the editing pipeline
#[cfg(feature = "server")]
pub mod server;

// Re-export the invocation surface for convenience
pub use config::{ReportConfig, load_config};
pub use editor::{ReplacementReport, ReportEditor};
