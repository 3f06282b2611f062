//! Zip export of a virtual project tree.
//!
//! The export runs in three steps:
//!
//! 1. [`build_archive`] walks the tree and reads every file into a
//!    [`ProjectArchive`] keyed by project-relative path. Unreadable files
//!    are skipped with a warning.
//! 2. [`ProjectArchive::to_zip`] serializes the archive. Failure here is
//!    fatal.
//! 3. A [`SaveTarget`] stores the bytes under the configured file name.
//!
//! [`export_archive`] runs all three.

mod save;

pub use save::DirectorySaveTarget;
pub use save::SaveTarget;

use crate::ExportConfig;
use crate::ExportError;
use crate::ExportReport;
use crate::ProgressCallback;
use crate::Result;
use crate::filters::archive_key;
use crate::fs::VirtualFs;
use crate::walker::collect_files;
use std::collections::HashMap;
use std::io::Cursor;
use std::io::Write;
use std::time::Instant;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// In-memory archive: project-relative path to text content.
///
/// Keys are unique. Inserting an existing key replaces its content and keeps
/// its original position, so serialization follows first-insertion order.
///
/// # Examples
///
/// ```
/// use treeport_core::archive::ProjectArchive;
///
/// let mut archive = ProjectArchive::new();
/// archive.insert("a.txt", "x");
/// archive.insert("sub/b.txt", "y");
/// assert_eq!(archive.insert("a.txt", "z").as_deref(), Some("x"));
///
/// assert_eq!(archive.len(), 2);
/// assert_eq!(archive.get("a.txt"), Some("z"));
/// assert_eq!(archive.keys().collect::<Vec<_>>(), ["a.txt", "sub/b.txt"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProjectArchive {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl ProjectArchive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `content` under `key`, returning the replaced content.
    pub fn insert(&mut self, key: impl Into<String>, content: impl Into<String>) -> Option<String> {
        let key = key.into();
        let content = content.into();
        if let Some(&idx) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[idx].1, content));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, content));
        None
    }

    /// Content stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, content)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes the archive as a zip file.
    ///
    /// One file entry per key; no directory entries and no permission bits.
    /// `Some(0)` stores entries uncompressed, `Some(1..=9)` deflates at that
    /// level, `None` deflates at the zip crate default.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::ArchiveSerialization` if the zip writer fails.
    pub fn to_zip(&self, compression_level: Option<u8>) -> Result<Vec<u8>> {
        let options = if compression_level == Some(0) {
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored)
        } else {
            SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(compression_level.map(i64::from))
        };

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (key, content) in &self.entries {
            zip.start_file(key.as_str(), options).map_err(|e| {
                ExportError::ArchiveSerialization(format!("failed to start entry {key}: {e}"))
            })?;
            zip.write_all(content.as_bytes()).map_err(|e| {
                ExportError::ArchiveSerialization(format!("failed to write entry {key}: {e}"))
            })?;
        }

        let cursor = zip.finish().map_err(|e| {
            ExportError::ArchiveSerialization(format!("failed to finish archive: {e}"))
        })?;
        Ok(cursor.into_inner())
    }
}

/// Reads every non-excluded file into a [`ProjectArchive`].
///
/// Walks from `/`. Each file is read as text; a read failure is logged,
/// recorded as a report warning and skipped. Keys are computed with
/// [`archive_key`] against `config.project_root`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a directory cannot
/// be listed. Individual file read failures are not errors.
///
/// # Examples
///
/// ```
/// use treeport_core::ExportConfig;
/// use treeport_core::NoopProgress;
/// use treeport_core::archive::build_archive;
/// use treeport_core::fs::MemoryFs;
///
/// let fs = MemoryFs::new()
///     .with_file("/a.txt", "x")
///     .with_file("/sub/b.txt", "y")
///     .with_file("/node_modules/c.txt", "z");
///
/// let (archive, report) = build_archive(&fs, &ExportConfig::default(), &mut NoopProgress)?;
/// assert_eq!(archive.keys().collect::<Vec<_>>(), ["a.txt", "sub/b.txt"]);
/// assert_eq!(report.files_added, 2);
/// # Ok::<(), treeport_core::ExportError>(())
/// ```
pub fn build_archive<F: VirtualFs + ?Sized>(
    fs: &F,
    config: &ExportConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<(ProjectArchive, ExportReport)> {
    config.validate()?;

    let files = collect_files(fs, "/", &config.exclusions)?;
    tracing::debug!(count = files.len(), "files to be added to archive");

    let mut archive = ProjectArchive::new();
    let mut report = ExportReport::new();
    let total = files.len();

    for (idx, path) in files.iter().enumerate() {
        progress.on_entry_start(path, total, idx + 1);

        match fs.read_file(path) {
            Ok(content) => {
                let key = archive_key(path, &config.project_root);
                tracing::debug!(key = %key, "adding file to archive");
                report.bytes_read += content.len() as u64;
                if archive.insert(key.clone(), content).is_some() {
                    tracing::warn!(
                        key = %key,
                        path = %path,
                        "archive key collision, earlier entry replaced"
                    );
                    report.add_warning(format!("{path} replaced an earlier entry at {key}"));
                } else {
                    report.files_added += 1;
                }
            }
            Err(source) => {
                let err = ExportError::ReadFile {
                    path: path.clone(),
                    source,
                };
                tracing::warn!(error = %err, "skipping file");
                report.files_skipped += 1;
                report.add_warning(err.to_string());
            }
        }

        progress.on_entry_complete(path);
    }

    Ok((archive, report))
}

/// Builds, serializes and saves the project archive.
///
/// The archive is saved under `config.output_name`. Nothing is saved if
/// serialization fails.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - A directory cannot be listed
/// - Zip serialization fails
/// - The save target fails
pub fn export_archive<F: VirtualFs + ?Sized>(
    fs: &F,
    config: &ExportConfig,
    target: &dyn SaveTarget,
    progress: &mut dyn ProgressCallback,
) -> Result<ExportReport> {
    let start = Instant::now();

    let (archive, mut report) = build_archive(fs, config, progress)?;
    let bytes = archive.to_zip(config.compression_level)?;
    report.archive_bytes = bytes.len() as u64;

    let path = target.save(&config.output_name, &bytes)?;
    report.output_path = Some(path);
    report.duration = start.elapsed();

    progress.on_complete();

    Ok(report)
}
