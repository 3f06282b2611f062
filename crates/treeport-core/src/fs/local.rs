//! Host directory mounted as a virtual filesystem.

use super::DirEntry;
use super::EntryKind;
use super::VirtualFs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Host directory exposed through [`VirtualFs`].
///
/// The virtual path `/` maps onto `root`; `/src/main.ts` maps onto
/// `root/src/main.ts`. Listings follow `std::fs::read_dir` order. Symbolic
/// links are reported with the kind of their target; a link whose target
/// cannot be resolved is listed as a file, so reading it fails on its own
/// instead of failing the listing.
///
/// # Examples
///
/// ```no_run
/// use treeport_core::fs::LocalFs;
/// use treeport_core::fs::VirtualFs;
///
/// let fs = LocalFs::new("./my-project");
/// for entry in fs.list_directory("/")? {
///     println!("{} ({:?})", entry.name, entry.kind);
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Mounts `root` at `/`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the host directory mounted at `/`.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a virtual path to a host path under `root`.
    ///
    /// Rejects `..` components instead of canonicalizing, so a path can
    /// never climb out of the mount.
    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let mut full = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => full.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("path escapes root: {path}"),
                    ));
                }
            }
        }
        Ok(full)
    }
}

impl VirtualFs for LocalFs {
    fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
        let dir = self.resolve(path)?;
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            // `metadata` follows symlinks, `file_type` does not.
            let is_dir = match std::fs::metadata(entry.path()) {
                Ok(meta) => meta.is_dir(),
                Err(e) => {
                    tracing::debug!(
                        path,
                        name = %name,
                        error = %e,
                        "cannot resolve entry, listing as file"
                    );
                    entry.file_type()?.is_dir()
                }
            };
            let kind = if is_dir {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirEntry { name, kind });
        }

        Ok(entries)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path)?)
    }
}
