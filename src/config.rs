//! Configuration parsing and validation.
//!
//! A report configuration is a small JSON document naming the target slide
//! and the placeholder replacements to apply:
//!
//! ```json
//! {
//!     "slide_number": 2,
//!     "replacements": {
//!         "MPE": "$120 B",
//!         "decrease_percent": "3.5%"
//!     }
//! }
//! ```
//!
//! Parsing is two-stage so failures classify cleanly: bytes that are not
//! valid JSON fail with [`ConfigError::MalformedInput`], while valid JSON
//! that does not match the schema (missing field, extra field, wrong type,
//! `slide_number < 1`) fails with [`ConfigError::SchemaViolation`].

use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::path::Path;
use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Error types for configuration loading.
///
/// Configuration errors are always caller-input errors, never transient;
/// nothing here is retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration bytes are not valid JSON
    #[error("malformed JSON in config: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// The configuration JSON does not match the expected schema
    #[error("config schema violation: {0}")]
    SchemaViolation(String),

    /// The configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A validated report configuration.
///
/// Immutable after construction; built once per invocation by
/// [`load_config`] and handed to the editor.
///
/// `replacements` preserves the JSON document's key order (serde_json's
/// `preserve_order` feature), which is load-bearing: when one placeholder
/// is a substring of another, keys are applied sequentially in that order.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Target slide, 1-indexed. Checked against the loaded document at
    /// substitution time, not here: the slide count is unknown until load.
    pub slide_number: u32,
    /// Placeholder string to replacement value. Values may be any JSON
    /// scalar; they are rendered as text at substitution time.
    pub replacements: serde_json::Map<String, Value>,
}

impl ReportConfig {
    /// Replacement pairs in document key order, values rendered as text.
    pub fn replacement_pairs(&self) -> Vec<(String, String)> {
        self.replacements
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v).into_owned()))
            .collect()
    }
}

/// Render a replacement value as the text that gets substituted.
///
/// Strings render without surrounding quotes; every other value uses its
/// JSON form.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

/// Load and validate a report configuration from a JSON file.
///
/// # Examples
///
/// ```rust,no_run
/// use deckstamp::config::load_config;
///
/// let config = load_config("report_config.json".as_ref())?;
/// println!("target slide: {}", config.slide_number);
/// # Ok::<(), deckstamp::config::ConfigError>(())
/// ```
pub fn load_config(path: &Path) -> Result<ReportConfig> {
    let bytes = std::fs::read(path)?;
    let config = parse_config(&bytes)?;
    tracing::info!(slide_number = config.slide_number, "loaded config");
    Ok(config)
}

/// Parse and validate configuration bytes.
pub fn parse_config(bytes: &[u8]) -> Result<ReportConfig> {
    // Stage 1: syntax. Anything that is not valid JSON is malformed input.
    let value: Value =
        serde_json::from_slice(bytes).map_err(ConfigError::MalformedInput)?;

    // Stage 2: structure. The schema requires exactly `slide_number` and
    // `replacements`; `deny_unknown_fields` rejects extra top-level keys.
    let config: ReportConfig = serde_json::from_value(value)
        .map_err(|e| ConfigError::SchemaViolation(e.to_string()))?;

    if config.slide_number < 1 {
        return Err(ConfigError::SchemaViolation(
            "slide_number must be >= 1".to_string(),
        ));
    }

    Ok(config)
}
