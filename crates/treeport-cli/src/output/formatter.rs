//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use treeport_core::ExportReport;
use treeport_core::PublishReport;

/// One file the walker would export.
#[derive(Debug, Clone, Serialize)]
pub struct ListedFile {
    /// Virtual path.
    pub path: String,
    /// Archive key and repository path.
    pub key: String,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format archive export result
    fn format_download_result(&self, report: &ExportReport) -> Result<()>;

    /// Format publish result; `target` is `owner/repo@branch`
    fn format_publish_result(&self, target: &str, report: &PublishReport) -> Result<()>;

    /// Format the files an export would include
    fn format_file_list(&self, files: &[ListedFile], long: bool) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
        }
    }
}
