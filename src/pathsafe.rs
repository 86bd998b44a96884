//! Safe filesystem primitives for publishing generated reports.
//!
//! Everything that touches the output directory goes through this module:
//! filename sanitization, the directory-traversal guard, the
//! temp-file-then-rename atomic write, and timestamp generation for output
//! filenames.
//!
//! The traversal guard is purely lexical. It defends against crafted
//! filenames escaping the output directory; it does not defend against
//! races between resolution and use.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Result type for path safety operations.
pub type Result<T> = std::result::Result<T, PathError>;

/// Error types for path safety operations.
#[derive(Error, Debug)]
pub enum PathError {
    /// A filename resolved outside the base directory
    #[error("path traversal detected: {filename:?} escapes {base:?}")]
    Traversal { filename: String, base: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Sanitize a filename for use inside the output directory.
///
/// Every character outside `[A-Za-z0-9_.-]` is replaced with `_`.
/// Total: never fails, never changes the length of the name.
///
/// # Examples
///
/// ```
/// use deckstamp::pathsafe::sanitize_filename;
///
/// assert_eq!(sanitize_filename("report 1.pptx"), "report_1.pptx");
/// assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Generate a timestamp in `YYYYMMDD_HHMMSS` format (local time).
///
/// Two invocations within the same wall-clock second produce the same
/// string; callers publishing under timestamped names get last-writer-wins
/// semantics in that case.
pub fn generate_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Compute a safe path for `filename` under `base_dir`.
///
/// The raw filename, joined under the resolved base directory and resolved
/// lexically, must stay under the base; otherwise this fails with
/// [`PathError::Traversal`]. The returned path uses the sanitized form of
/// the filename (see [`sanitize_filename`]).
///
/// The check runs on the raw name, before sanitization, so that names like
/// `"../../etc/passwd"` are rejected rather than silently neutralized.
///
/// # Examples
///
/// ```
/// use deckstamp::pathsafe::safe_path;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = safe_path(dir.path(), "report 1.pptx").unwrap();
/// assert!(path.ends_with("report_1.pptx"));
///
/// assert!(safe_path(dir.path(), "../../etc/passwd").is_err());
/// ```
pub fn safe_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    let base = resolve_base(base_dir)?;

    let traversal = || PathError::Traversal {
        filename: filename.to_string(),
        base: base.clone(),
    };

    // Lexical resolution of the raw name against the resolved base.
    let mut resolved = base.clone();
    for component in Path::new(filename).components() {
        match component {
            Component::Normal(c) => resolved.push(c),
            Component::CurDir => {},
            Component::ParentDir => {
                if !resolved.pop() {
                    return Err(traversal());
                }
            },
            // An absolute filename always escapes the base.
            Component::RootDir | Component::Prefix(_) => return Err(traversal()),
        }
    }
    if !resolved.starts_with(&base) {
        return Err(traversal());
    }

    Ok(base.join(sanitize_filename(filename)))
}

/// Write `source`'s bytes to `target_path` atomically.
///
/// The bytes are streamed into a uniquely named temporary file created in
/// the same directory as `target_path` (so the subsequent rename stays on
/// one filesystem and is atomic), then the temporary file is renamed onto
/// the target. A rename onto an existing path silently replaces it.
///
/// Any observer of `target_path` sees either the previous state (absent or
/// old content) or the fully written new content, never a partial file.
/// Parent directories are created if absent.
///
/// `source` may be anything readable: an open [`std::fs::File`] or an
/// in-memory buffer (`&[u8]` implements [`Read`]).
pub fn atomic_write<R: Read>(target_path: &Path, mut source: R) -> Result<()> {
    let parent = match target_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    io::copy(&mut source, &mut tmp)?;

    // persist renames within `parent`; on failure the temp file is dropped
    // and removed, leaving the target untouched.
    tmp.persist(target_path).map_err(|e| PathError::Io(e.error))?;
    Ok(())
}

/// Resolve the base directory for the traversal check.
///
/// Canonicalized (symlinks resolved) when it exists; otherwise its
/// absolute form, normalized lexically.
fn resolve_base(base_dir: &Path) -> Result<PathBuf> {
    if base_dir.exists() {
        return Ok(fs::canonicalize(base_dir)?);
    }

    let absolute = std::path::absolute(base_dir)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            },
            Component::CurDir => {},
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}
