//! Operation reports and progress reporting.

use std::path::PathBuf;
use std::time::Duration;

/// Report of an archive export.
///
/// # Examples
///
/// ```
/// use treeport_core::ExportReport;
///
/// let mut report = ExportReport::default();
/// report.files_added = 10;
/// report.bytes_read = 1000;
/// report.archive_bytes = 250;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert!(!report.has_warnings());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    /// Number of files written into the archive.
    pub files_added: usize,

    /// Number of files skipped because they could not be read.
    pub files_skipped: usize,

    /// Total text bytes read from the source filesystem.
    pub bytes_read: u64,

    /// Size of the serialized archive.
    pub archive_bytes: u64,

    /// Where the save target stored the archive, once saved.
    pub output_path: Option<PathBuf>,

    /// Duration of the export.
    pub duration: Duration,

    /// Warnings generated during export.
    pub warnings: Vec<String>,
}

impl ExportReport {
    /// Creates a new empty export report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the compression ratio (bytes read / archive size).
    ///
    /// Returns 0.0 if either side is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.archive_bytes == 0 || self.bytes_read == 0 {
            return 0.0;
        }
        self.bytes_read as f64 / self.archive_bytes as f64
    }
}

/// Report of a publish run.
///
/// Only produced when every file was uploaded; a failed run surfaces as an
/// error instead.
#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    /// `true` if the branch was missing and had to be created.
    pub initialized_repo: bool,

    /// Files that did not exist remotely before the run.
    pub files_created: usize,

    /// Files that existed remotely and were overwritten.
    pub files_updated: usize,

    /// Total text bytes uploaded (before base64).
    pub bytes_uploaded: u64,

    /// Repository paths uploaded, in upload order.
    pub uploaded: Vec<String>,

    /// Duration of the run.
    pub duration: Duration,
}

impl PublishReport {
    /// Creates a new empty publish report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of files uploaded.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.files_created + self.files_updated
    }
}

/// Callback trait for progress reporting during export and publish.
///
/// Paths are the virtual paths produced by the walker.
///
/// # Examples
///
/// ```
/// use treeport_core::ProgressCallback;
///
/// struct SimpleProgress;
///
/// impl ProgressCallback for SimpleProgress {
///     fn on_entry_start(&mut self, path: &str, total: usize, current: usize) {
///         println!("[{current}/{total}] {path}");
///     }
///
///     fn on_entry_complete(&mut self, path: &str) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before a file is processed.
    ///
    /// # Arguments
    ///
    /// * `path` - Virtual path of the file
    /// * `total` - Number of files in this run
    /// * `current` - Position of this file (1-indexed)
    fn on_entry_start(&mut self, path: &str, total: usize, current: usize);

    /// Called after a file was processed, whether added or skipped.
    fn on_entry_complete(&mut self, path: &str);

    /// Called once when the run finishes successfully.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &str, _total: usize, _current: usize) {}

    fn on_entry_complete(&mut self, _path: &str) {}

    fn on_complete(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_export_report() {
        let report = ExportReport::new();
        assert_eq!(report.files_added, 0);
        assert_eq!(report.files_skipped, 0);
        assert!(report.output_path.is_none());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_add_warning() {
        let mut report = ExportReport::new();
        report.add_warning("skipped /logo.png");
        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_compression_ratio_edge_cases() {
        let mut report = ExportReport::new();
        assert!(report.compression_ratio().abs() < f64::EPSILON);

        report.bytes_read = 100;
        assert!(report.compression_ratio().abs() < f64::EPSILON);

        report.archive_bytes = 100;
        assert!((report.compression_ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_publish_total_files() {
        let mut report = PublishReport::new();
        report.files_created = 3;
        report.files_updated = 2;
        assert_eq!(report.total_files(), 5);
    }
}
