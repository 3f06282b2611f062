//! Filesystem capability consumed by the walker and the exporters.
//!
//! Exporters never touch the host filesystem directly. They go through
//! [`VirtualFs`], which exposes exactly the two operations a sandbox file
//! tree offers: listing a directory with entry kinds, and reading a file as
//! UTF-8 text. Paths are POSIX strings rooted at `/`.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryFs`]: an in-memory tree, used for tests and for embedding
//! - [`LocalFs`]: a host directory mounted at `/`

mod local;
mod memory;

pub use local::LocalFs;
pub use memory::MemoryFs;

use std::io;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,

    /// Directory.
    Directory,
}

/// A directory entry as returned by [`VirtualFs::list_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name (single component, not a full path).
    pub name: String,

    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl DirEntry {
    /// Creates a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Returns `true` for directory entries.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Read-only view of a virtual file tree.
///
/// Implementations define listing order; callers must not assume it is
/// sorted.
///
/// # Examples
///
/// ```
/// use treeport_core::fs::MemoryFs;
/// use treeport_core::fs::VirtualFs;
///
/// let fs = MemoryFs::new().with_file("/src/index.ts", "export {}");
/// let entries = fs.list_directory("/src")?;
/// assert_eq!(entries[0].name, "index.ts");
/// assert_eq!(fs.read_file("/src/index.ts")?, "export {}");
/// # Ok::<(), std::io::Error>(())
/// ```
pub trait VirtualFs {
    /// Lists the entries of the directory at `path`.
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>>;

    /// Reads the file at `path` as UTF-8 text.
    fn read_file(&self, path: &str) -> io::Result<String>;
}

impl<T: VirtualFs + ?Sized> VirtualFs for &T {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        (**self).list_directory(path)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        (**self).read_file(path)
    }
}
