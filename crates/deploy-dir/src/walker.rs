//! Recursive directory walk
//!
//! Produces one [`FileEntry`] per regular file under a root, depth-first.
//! Children of each directory are visited in name order so that two walks
//! over the same tree always yield the same sequence. Symbolic links are
//! skipped, never followed.

use std::path::Path;

use crate::error::{BundleError, Result};
use crate::fs::{EntryKind, SourceFs};

/// A regular file found by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the walk root, `/`-separated, no leading slash
    pub relative_path: String,
    pub raw_bytes: Vec<u8>,
}

/// Walk `root` and read every regular file below it.
///
/// # Errors
/// * [`BundleError::DirectoryNotFound`] if `root` is missing or not a directory
/// * [`BundleError::InvalidFileName`] for a name that is not valid UTF-8
/// * [`BundleError::Io`] if any listing or read fails
pub fn walk<F: SourceFs + ?Sized>(fs: &F, root: &Path) -> Result<Vec<FileEntry>> {
    if !fs.is_dir(root) {
        return Err(BundleError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    walk_dir(fs, root, "", &mut files)?;
    Ok(files)
}

fn walk_dir<F: SourceFs + ?Sized>(
    fs: &F,
    dir: &Path,
    prefix: &str,
    files: &mut Vec<FileEntry>,
) -> Result<()> {
    let mut entries = fs.read_dir(dir).map_err(|e| BundleError::io(dir, e))?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    for entry in entries {
        let name = entry
            .name
            .ok_or_else(|| BundleError::InvalidFileName(entry.path.clone()))?;
        let relative_path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        match entry.kind {
            EntryKind::Dir => walk_dir(fs, &entry.path, &relative_path, files)?,
            EntryKind::File => {
                let raw_bytes = fs
                    .read(&entry.path)
                    .map_err(|e| BundleError::io(&entry.path, e))?;
                files.push(FileEntry {
                    relative_path,
                    raw_bytes,
                });
            }
            EntryKind::Symlink => {
                tracing::debug!("Skipping symbolic link: {}", relative_path);
            }
            EntryKind::Other => {
                tracing::debug!("Skipping special file: {}", relative_path);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::{LocalFs, MemoryFs};
    use std::fs;

    fn paths(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.relative_path.as_str()).collect()
    }

    #[test]
    fn test_walk_sorted_depth_first() {
        let mut fs = MemoryFs::new();
        fs.insert_file("site/z.txt", "z");
        fs.insert_file("site/b/inner.css", "c");
        fs.insert_file("site/a.html", "a");
        fs.insert_file("site/b/deep/x.js", "x");
        fs.insert_file("site/c.md", "m");

        let files = walk(&fs, Path::new("site")).unwrap();

        assert_eq!(
            paths(&files),
            vec!["a.html", "b/deep/x.js", "b/inner.css", "c.md", "z.txt"]
        );
        assert_eq!(files[0].raw_bytes, b"a");
    }

    #[test]
    fn test_walk_skips_empty_dirs_and_symlinks() {
        let mut fs = MemoryFs::new();
        fs.insert_dir("site/empty");
        fs.insert_symlink("site/link");
        fs.insert_file("site/real.txt", "r");

        let files = walk(&fs, Path::new("site")).unwrap();
        assert_eq!(paths(&files), vec!["real.txt"]);
    }

    #[test]
    fn test_walk_missing_root() {
        let fs = MemoryFs::new();
        let err = walk(&fs, Path::new("missing")).unwrap_err();
        assert!(matches!(err, BundleError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_walk_root_is_file() {
        let mut fs = MemoryFs::new();
        fs.insert_file("file.txt", "x");
        let err = walk(&fs, Path::new("file.txt")).unwrap_err();
        assert!(matches!(err, BundleError::DirectoryNotFound(_)));
    }

    #[test]
    fn test_walk_local_nested() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("assets/img")).unwrap();
        fs::write(root.join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(root.join("assets/img/logo.svg"), "<svg/>").unwrap();

        let files = walk(&LocalFs, root).unwrap();
        assert_eq!(paths(&files), vec!["assets/img/logo.svg", "index.html"]);
        assert_eq!(files[1].raw_bytes, b"<h1>hi</h1>");
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_local_does_not_follow_symlinks() {
        let temp = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        fs::write(temp.path().join("public.txt"), "public").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("escape")).unwrap();
        std::os::unix::fs::symlink(
            temp.path().join("public.txt"),
            temp.path().join("alias.txt"),
        )
        .unwrap();

        let files = walk(&LocalFs, temp.path()).unwrap();
        assert_eq!(paths(&files), vec!["public.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_rejects_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("ok.txt"), "ok").unwrap();
        let bad = temp.path().join(OsStr::from_bytes(b"bad\xff.txt"));
        fs::write(&bad, "bad").unwrap();

        let err = walk(&LocalFs, temp.path()).unwrap_err();
        match err {
            BundleError::InvalidFileName(path) => assert_eq!(path, bad),
            other => panic!("expected InvalidFileName, got {:?}", other),
        }
    }
}
