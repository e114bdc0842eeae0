//! Filesystem capability used by the walker
//!
//! The bundler only needs to list directories, read files and ask whether a
//! path is a directory. [`LocalFs`] provides that over `std::fs`;
//! [`MemoryFs`] holds a tree in memory.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a directory entry, as reported without following links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// Sockets, FIFOs, devices
    Other,
}

/// One child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// File name, or `None` when it is not valid UTF-8
    pub name: Option<String>,
    /// Full path of the entry
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Read-only access to a directory tree
pub trait SourceFs {
    /// Whether `path` exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// List the direct children of a directory, in no particular order
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read a whole file
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl SourceFs for LocalFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            // DirEntry::file_type does not traverse links
            let file_type = entry.file_type()?;
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Dir
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            entries.push(DirEntry {
                name: entry.file_name().into_string().ok(),
                path: entry.path(),
                kind,
            });
        }
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
    Symlink,
}

/// In-memory directory tree
///
/// Paths are stored as given; callers should use the same form (relative or
/// absolute) for inserts and lookups.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    nodes: BTreeMap<PathBuf, Node>,
}

impl MemoryFs {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating any missing parent directories
    pub fn insert_file(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        self.insert_parents(path);
        self.nodes.insert(path.to_path_buf(), Node::File(contents.into()));
    }

    /// Add an empty directory, creating any missing parents
    pub fn insert_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.insert_parents(path);
        self.nodes.insert(path.to_path_buf(), Node::Dir);
    }

    /// Add a symbolic link entry. The target is irrelevant since links are
    /// never followed.
    pub fn insert_symlink(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.insert_parents(path);
        self.nodes.insert(path.to_path_buf(), Node::Symlink);
    }

    fn insert_parents(&mut self, path: &Path) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir);
        }
    }

    fn is_root(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || path == Path::new(".")
    }
}

impl SourceFs for MemoryFs {
    fn is_dir(&self, path: &Path) -> bool {
        self.is_root(path) || matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        if !self.is_dir(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", path.display()),
            ));
        }

        let root = self.is_root(path);
        let entries = self
            .nodes
            .iter()
            .filter(|(p, _)| {
                let parent = p.parent().unwrap_or_else(|| Path::new(""));
                if root {
                    parent.as_os_str().is_empty()
                } else {
                    parent == path
                }
            })
            .map(|(p, node)| DirEntry {
                name: p
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string),
                path: p.clone(),
                kind: match node {
                    Node::File(_) => EntryKind::File,
                    Node::Dir => EntryKind::Dir,
                    Node::Symlink => EntryKind::Symlink,
                },
            })
            .collect();
        Ok(entries)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.nodes.get(path) {
            Some(Node::File(bytes)) => Ok(bytes.clone()),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }
}
