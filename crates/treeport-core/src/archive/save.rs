//! Save targets for serialized archives.

use crate::ExportError;
use crate::Result;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tempfile::PersistError;

/// Destination for a finished archive, the "save as" step of an export.
pub trait SaveTarget {
    /// Stores `bytes` under `file_name` and returns where they ended up.
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Saves archives into a host directory.
///
/// The archive is first written to a temporary file in the destination
/// directory and then renamed into place, so a failed save never leaves a
/// truncated archive behind. The temporary file is released explicitly on
/// every path.
///
/// # Examples
///
/// ```no_run
/// use treeport_core::archive::DirectorySaveTarget;
/// use treeport_core::archive::SaveTarget;
///
/// let target = DirectorySaveTarget::new("./downloads").with_overwrite(false);
/// let path = target.save("project.zip", b"PK\x05\x06")?;
/// println!("saved to {}", path.display());
/// # Ok::<(), treeport_core::ExportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySaveTarget {
    /// Saves into `dir`, replacing existing files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: true,
        }
    }

    /// Sets whether an existing file may be replaced.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Destination directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let dest = self.dir.join(file_name);
        if !self.overwrite && dest.exists() {
            return Err(ExportError::OutputExists { path: dest });
        }

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        if let Err(e) = tmp.write_all(bytes).and_then(|()| tmp.as_file().sync_all()) {
            release(tmp);
            return Err(e.into());
        }

        let persisted = if self.overwrite {
            tmp.persist(&dest)
        } else {
            tmp.persist_noclobber(&dest)
        };

        match persisted {
            Ok(_file) => {
                tracing::debug!(path = %dest.display(), bytes = bytes.len(), "archive saved");
                Ok(dest)
            }
            Err(PersistError { error, file }) => {
                release(file);
                if error.kind() == std::io::ErrorKind::AlreadyExists {
                    Err(ExportError::OutputExists { path: dest })
                } else {
                    Err(error.into())
                }
            }
        }
    }
}

fn release(tmp: NamedTempFile) {
    let path = tmp.path().to_path_buf();
    if let Err(e) = tmp.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary archive");
    }
}
