/// Error types for PPTX container operations.
use thiserror::Error;

/// Result type for PPTX container operations.
pub type Result<T> = std::result::Result<T, PptxError>;

/// Error types for PPTX container operations.
#[derive(Error, Debug)]
pub enum PptxError {
    /// Package file not found
    #[error("package not found: {0}")]
    PackageNotFound(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("part not found: {0}")]
    PartNotFound(String),

    /// Invalid relationship
    #[error("invalid relationship: {0}")]
    InvalidRelationship(String),

    /// Invalid format
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for PptxError {
    fn from(err: quick_xml::Error) -> Self {
        PptxError::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for PptxError {
    fn from(err: zip::result::ZipError) -> Self {
        PptxError::Zip(err.to_string())
    }
}
