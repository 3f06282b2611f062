//! In-memory filesystem.
//!
//! Listings return entries in insertion order, the way a sandbox filesystem
//! returns them in creation order.

use super::DirEntry;
use super::EntryKind;
use super::VirtualFs;
use std::io;

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Directory(Vec<(String, Node)>),
}

impl Node {
    const fn kind(&self) -> EntryKind {
        match self {
            Self::File(_) => EntryKind::File,
            Self::Directory(_) => EntryKind::Directory,
        }
    }
}

/// In-memory virtual filesystem.
///
/// Builder methods create missing parent directories. A path component that
/// currently names a file is replaced by a directory when something is
/// inserted beneath it.
///
/// # Examples
///
/// ```
/// use treeport_core::fs::MemoryFs;
/// use treeport_core::fs::VirtualFs;
///
/// let fs = MemoryFs::new()
///     .with_file("/a.txt", "x")
///     .with_file("/sub/b.txt", "y")
///     .with_dir("/empty");
///
/// let names: Vec<_> = fs
///     .list_directory("/")?
///     .into_iter()
///     .map(|e| e.name)
///     .collect();
/// assert_eq!(names, ["a.txt", "sub", "empty"]);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFs {
    root: Node,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Creates an empty filesystem containing only `/`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::Directory(Vec::new()),
        }
    }

    /// Adds a text file, creating parent directories as needed.
    #[must_use]
    pub fn with_file(mut self, path: &str, content: impl Into<String>) -> Self {
        self.insert(path, Node::File(content.into().into_bytes()));
        self
    }

    /// Adds a file with raw bytes. Reading it fails if it is not UTF-8.
    #[must_use]
    pub fn with_bytes(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, Node::File(content.into()));
        self
    }

    /// Adds an empty directory, creating parents as needed.
    #[must_use]
    pub fn with_dir(mut self, path: &str) -> Self {
        self.insert(path, Node::Directory(Vec::new()));
        self
    }

    /// Adds or replaces a text file in place.
    pub fn insert_file(&mut self, path: &str, content: impl Into<String>) {
        self.insert(path, Node::File(content.into().into_bytes()));
    }

    fn insert(&mut self, path: &str, node: Node) {
        let components: Vec<&str> = split(path).collect();
        let Some((last, parents)) = components.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        for name in parents {
            current = child_dir_mut(current, name);
        }

        if let Node::Directory(children) = current {
            if let Some(slot) = children.iter_mut().find(|(n, _)| n == last) {
                // Keep an existing directory when re-adding it.
                if !(matches!(slot.1, Node::Directory(_)) && matches!(node, Node::Directory(_))) {
                    slot.1 = node;
                }
            } else {
                children.push(((*last).to_string(), node));
            }
        }
    }

    fn lookup(&self, path: &str) -> Option<&Node> {
        let mut current = &self.root;
        for name in split(path) {
            let Node::Directory(children) = current else {
                return None;
            };
            current = children.iter().find(|(n, _)| n == name).map(|(_, c)| c)?;
        }
        Some(current)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".")
}

fn child_dir_mut<'a>(node: &'a mut Node, name: &str) -> &'a mut Node {
    if !matches!(node, Node::Directory(_)) {
        *node = Node::Directory(Vec::new());
    }
    let Node::Directory(children) = node else {
        unreachable!("node was just made a directory");
    };

    let idx = if let Some(idx) = children.iter().position(|(n, _)| n == name) {
        if !matches!(children[idx].1, Node::Directory(_)) {
            children[idx].1 = Node::Directory(Vec::new());
        }
        idx
    } else {
        children.push((name.to_string(), Node::Directory(Vec::new())));
        children.len() - 1
    };
    &mut children[idx].1
}

impl VirtualFs for MemoryFs {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        match self.lookup(path) {
            Some(Node::Directory(children)) => Ok(children
                .iter()
                .map(|(name, node)| DirEntry {
                    name: name.clone(),
                    kind: node.kind(),
                })
                .collect()),
            Some(Node::File(_)) => Err(io::Error::other(format!("not a directory: {path}"))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {path}"),
            )),
        }
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        match self.lookup(path) {
            Some(Node::File(data)) => String::from_utf8(data.clone()).map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{path} is not valid UTF-8: {e}"),
                )
            }),
            Some(Node::Directory(_)) => {
                Err(io::Error::other(format!("is a directory: {path}")))
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {path}"),
            )),
        }
    }
}
