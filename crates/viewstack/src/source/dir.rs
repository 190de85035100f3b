//! Filesystem-backed template source.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{AssetEntry, TemplateSource};

/// Templates read from a directory on disk.
///
/// The directory is expected to contain `layout/`, `component/` and `page/`
/// subdirectories (any of which may be missing). Entries within a directory
/// are visited in file-name order, so walks are stable across platforms.
/// Symbolic links below the walk root are listed as files and never
/// descended into.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Creates a source rooted at `root`.
    ///
    /// The directory is not checked until the source is walked.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this source reads from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

impl TemplateSource for DirSource {
    fn walk(&self, root: &str) -> io::Result<Vec<AssetEntry>> {
        let root = root.trim_matches('/');
        let start = self.resolve(root);
        let metadata = fs::metadata(&start)?;

        if !metadata.is_dir() {
            return Ok(vec![AssetEntry::file(root)]);
        }

        let mut entries = vec![AssetEntry::dir(root)];
        walk_recursive(&start, root, &mut entries)?;
        Ok(entries)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path))
    }
}

fn walk_recursive(current: &Path, logical: &str, entries: &mut Vec<AssetEntry>) -> io::Result<()> {
    let mut children = fs::read_dir(current)?.collect::<Result<Vec<_>, _>>()?;
    children.sort_by_key(|entry| entry.file_name());

    for child in children {
        let file_name = child.file_name();
        let name = file_name.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("non UTF-8 file name in {}", current.display()),
            )
        })?;
        let path = format!("{}/{}", logical, name);

        if child.file_type()?.is_dir() {
            entries.push(AssetEntry::dir(path.clone()));
            walk_recursive(&child.path(), &path, entries)?;
        } else {
            entries.push(AssetEntry::file(path));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, path: &str, content: &str) {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn test_walk_sorted_pre_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "page/b.html", "b");
        write(&dir, "page/a.html", "a");
        write(&dir, "page/nested/c.html", "c");

        let source = DirSource::new(dir.path());
        let entries = source.walk("page").unwrap();

        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "page",
                "page/a.html",
                "page/b.html",
                "page/nested",
                "page/nested/c.html"
            ]
        );
        assert!(entries[3].is_dir);
    }

    #[test]
    fn test_walk_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let source = DirSource::new(dir.path());

        let err = source.walk("layout").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_does_not_follow_directory_symlinks() {
        let dir = TempDir::new().unwrap();
        write(&dir, "page/a.html", "a");
        std::os::unix::fs::symlink(dir.path().join("page"), dir.path().join("page/loop")).unwrap();

        let source = DirSource::new(dir.path());
        let entries = source.walk("page").unwrap();

        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["page", "page/a.html", "page/loop"]);
        assert!(!entries[2].is_dir);

        let err = source.read("page/loop").unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_uses_slash_paths() {
        let dir = TempDir::new().unwrap();
        write(&dir, "component/nav/menu.html", "menu");

        let source = DirSource::new(dir.path());
        assert_eq!(source.read("component/nav/menu.html").unwrap(), b"menu");
    }
}
