//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::ListedFile;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use treeport_core::ExportReport;
use treeport_core::PublishReport;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct DownloadOutput {
    output_path: Option<String>,
    files_added: usize,
    files_skipped: usize,
    bytes_read: u64,
    archive_bytes: u64,
    compression_ratio: f64,
    duration_ms: u128,
    warnings: Vec<String>,
}

impl From<&ExportReport> for DownloadOutput {
    fn from(report: &ExportReport) -> Self {
        Self {
            output_path: report.output_path.as_ref().map(|p| p.display().to_string()),
            files_added: report.files_added,
            files_skipped: report.files_skipped,
            bytes_read: report.bytes_read,
            archive_bytes: report.archive_bytes,
            compression_ratio: report.compression_ratio(),
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

#[derive(Serialize)]
struct PublishOutput<'a> {
    target: &'a str,
    initialized_repo: bool,
    files_created: usize,
    files_updated: usize,
    bytes_uploaded: u64,
    uploaded: &'a [String],
    duration_ms: u128,
}

impl OutputFormatter for JsonFormatter {
    fn format_download_result(&self, report: &ExportReport) -> Result<()> {
        let output = JsonOutput::success("download", DownloadOutput::from(report));
        Self::output(&output)
    }

    fn format_publish_result(&self, target: &str, report: &PublishReport) -> Result<()> {
        let data = PublishOutput {
            target,
            initialized_repo: report.initialized_repo,
            files_created: report.files_created,
            files_updated: report.files_updated,
            bytes_uploaded: report.bytes_uploaded,
            uploaded: &report.uploaded,
            duration_ms: report.duration.as_millis(),
        };

        let output = JsonOutput::success("publish", data);
        Self::output(&output)
    }

    fn format_file_list(&self, files: &[ListedFile], _long: bool) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            total: usize,
            files: &'a [ListedFile],
        }

        let output = JsonOutput::success(
            "list",
            ListOutput {
                total: files.len(),
                files,
            },
        );
        Self::output(&output)
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
