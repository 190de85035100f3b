//! Template sources: where template text comes from.
//!
//! A [`TemplateSource`] is a read-only tree with three top-level roots,
//! `layout/`, `component/` and `page/`, any of which may be absent. Two
//! implementations ship with the crate:
//!
//! - [`MemorySource`]: templates held in memory, typically embedded at
//!   compile time with `include_str!`
//! - [`DirSource`]: templates read from a directory on disk
//!
//! Sources are only consulted while a [`Views`](crate::Views) is being built.
//! Once built, rendering never touches the source again.
//!
//! # Logical Names
//!
//! A template's logical name is its path up to the first `.`, with the root
//! segment kept as a prefix:
//!
//! | Path | Logical name |
//! |------|--------------|
//! | `page/home.html` | `page/home` |
//! | `component/nav/menu.html.j2` | `component/nav/menu` |
//! | `layout/base` | `layout/base` |

mod dir;
mod memory;

use std::io;

pub use dir::DirSource;
pub use memory::MemorySource;

use crate::error::ViewError;
use crate::layer::Layer;

/// One entry produced by walking a [`TemplateSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    /// `/`-separated path, including the root segment.
    pub path: String,
    /// Whether this entry is a directory.
    pub is_dir: bool,
}

impl AssetEntry {
    /// Creates a file entry.
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }

    /// Creates a directory entry.
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }
}

/// A read-only tree of template files.
///
/// Implementations must walk deterministically: the same tree yields the same
/// entries in the same order every time. Order matters because later sources
/// win when two of them resolve to the same logical name.
pub trait TemplateSource {
    /// Recursively walks the tree below `root`, yielding files and directories
    /// in pre-order.
    ///
    /// Returns an error of kind [`io::ErrorKind::NotFound`] if `root` does not
    /// exist.
    fn walk(&self, root: &str) -> io::Result<Vec<AssetEntry>>;

    /// Reads a whole file.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn walk(&self, root: &str) -> io::Result<Vec<AssetEntry>> {
        (**self).walk(root)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}

impl<T: TemplateSource + ?Sized> TemplateSource for Box<T> {
    fn walk(&self, root: &str) -> io::Result<Vec<AssetEntry>> {
        (**self).walk(root)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }
}

/// Lists the template files of one layer, in walk order.
///
/// Directories are skipped. A missing layer root is not an error: it yields
/// an empty list, so a tree without any layouts still builds.
///
/// # Errors
///
/// Returns [`ViewError::SourceRead`] if the root exists but cannot be walked.
pub fn list_assets(source: &dyn TemplateSource, layer: Layer) -> Result<Vec<String>, ViewError> {
    let entries = match source.walk(layer.root()) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(ViewError::source_read(layer.root(), err)),
    };

    Ok(entries
        .into_iter()
        .filter(|entry| !entry.is_dir)
        .map(|entry| entry.path)
        .collect())
}

/// Derives a template's logical name from its path.
///
/// Everything from the first `.` on is dropped; a path without a `.` is used
/// verbatim. The layer prefix is never stripped.
///
/// ```rust
/// use viewstack::resolve_name;
///
/// assert_eq!(resolve_name("page/home.html"), "page/home");
/// assert_eq!(resolve_name("component/card.html.j2"), "component/card");
/// assert_eq!(resolve_name("layout/base"), "layout/base");
/// ```
pub fn resolve_name(path: &str) -> &str {
    match path.split_once('.') {
        Some((name, _)) => name,
        None => path,
    }
}

/// Reads a source file as UTF-8 text.
pub(crate) fn read_text(source: &dyn TemplateSource, path: &str) -> Result<String, ViewError> {
    let bytes = source
        .read(path)
        .map_err(|e| ViewError::source_read(path, e))?;

    String::from_utf8(bytes).map_err(|e| {
        ViewError::source_read(path, io::Error::new(io::ErrorKind::InvalidData, e))
    })
}
