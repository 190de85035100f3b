//! In-memory template source.

use std::collections::{BTreeMap, BTreeSet};
use std::io;

use super::{AssetEntry, TemplateSource};

/// Templates held in memory, keyed by `/`-separated path.
///
/// This is the usual source for release builds, where templates are embedded
/// with `include_str!`:
///
/// ```rust
/// use viewstack::MemorySource;
///
/// let source = MemorySource::from_entries(&[
///     ("layout/base.html", "<main>{% include page_template %}</main>"),
///     ("page/home.html", "Welcome"),
/// ]);
/// assert_eq!(source.len(), 2);
/// ```
///
/// Walks visit paths in lexical order by path segment, the same order a
/// sorted directory walk produces.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source from `(path, content)` pairs.
    ///
    /// A path given more than once keeps its last content.
    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        entries.iter().copied().collect()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        let path = path.into();
        self.files
            .insert(path.trim_matches('/').to_string(), content.into());
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the source holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P, C> FromIterator<(P, C)> for MemorySource
where
    P: Into<String>,
    C: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (P, C)>>(iter: I) -> Self {
        let mut source = Self::new();
        for (path, content) in iter {
            source.insert(path, content);
        }
        source
    }
}

impl TemplateSource for MemorySource {
    fn walk(&self, root: &str) -> io::Result<Vec<AssetEntry>> {
        let root = root.trim_matches('/');

        if self.files.contains_key(root) {
            return Ok(vec![AssetEntry::file(root)]);
        }

        let prefix = format!("{}/", root);
        let mut paths: Vec<&str> = self
            .files
            .keys()
            .map(String::as_str)
            .filter(|path| path.starts_with(&prefix))
            .collect();

        if paths.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", root),
            ));
        }

        // Segment-wise ordering puts "a/b" before "a.txt", like a directory walk.
        paths.sort_by(|a, b| a.split('/').cmp(b.split('/')));

        let mut entries = vec![AssetEntry::dir(root)];
        let mut seen_dirs = BTreeSet::new();

        for path in paths {
            let mut offset = prefix.len();
            while let Some(i) = path[offset..].find('/') {
                let dir = &path[..offset + i];
                if seen_dirs.insert(dir) {
                    entries.push(AssetEntry::dir(dir));
                }
                offset += i + 1;
            }
            entries.push(AssetEntry::file(path));
        }

        Ok(entries)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path.trim_matches('/'))
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(entries: &[AssetEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_walk_yields_directories_in_pre_order() {
        let source = MemorySource::from_entries(&[
            ("page/b.html", "b"),
            ("page/a.txt", "a"),
            ("page/a/nested.html", "nested"),
        ]);

        let entries = source.walk("page").unwrap();
        assert_eq!(
            paths(&entries),
            vec!["page", "page/a", "page/a/nested.html", "page/a.txt", "page/b.html"]
        );
        assert!(entries[0].is_dir);
        assert!(entries[1].is_dir);
        assert!(!entries[2].is_dir);
    }

    #[test]
    fn test_walk_emits_each_directory_once() {
        let source = MemorySource::from_entries(&[
            ("component/nav/a.html", "a"),
            ("component/nav/b.html", "b"),
        ]);

        let dirs: Vec<_> = source
            .walk("component")
            .unwrap()
            .into_iter()
            .filter(|e| e.is_dir)
            .map(|e| e.path)
            .collect();
        assert_eq!(dirs, vec!["component", "component/nav"]);
    }

    #[test]
    fn test_walk_missing_root_is_not_found() {
        let source = MemorySource::from_entries(&[("page/home.html", "home")]);

        let err = source.walk("layout").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_walk_does_not_match_sibling_prefix() {
        let source = MemorySource::from_entries(&[("pages/home.html", "home")]);

        assert!(source.walk("page").is_err());
    }

    #[test]
    fn test_read_and_overwrite() {
        let mut source = MemorySource::new();
        source.insert("page/home.html", "first");
        source.insert("/page/home.html", "second");

        assert_eq!(source.len(), 1);
        assert_eq!(source.read("page/home.html").unwrap(), b"second");
        assert_eq!(
            source.read("page/missing.html").unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
