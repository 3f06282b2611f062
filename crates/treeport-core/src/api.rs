//! High-level entry points for the download and publish actions.

use crate::ExportConfig;
use crate::ExportReport;
use crate::NoopProgress;
use crate::PublishConfig;
use crate::PublishReport;
use crate::Result;
use crate::archive::SaveTarget;
use crate::archive::export_archive;
use crate::fs::VirtualFs;
use crate::publish::RemotePublisher;
use crate::publish::ReqwestTransport;

/// Exports the project tree as `project.zip` into `target`.
///
/// This is the "Download" action: failures are logged and swallowed, and
/// the caller only learns whether a report was produced.
///
/// # Examples
///
/// ```no_run
/// use treeport_core::ExportConfig;
/// use treeport_core::archive::DirectorySaveTarget;
/// use treeport_core::download_project_zip;
/// use treeport_core::fs::LocalFs;
///
/// let fs = LocalFs::new("/srv/sandbox");
/// let target = DirectorySaveTarget::new(".");
/// if let Some(report) = download_project_zip(&fs, &ExportConfig::default(), &target) {
///     println!("archived {} files", report.files_added);
/// }
/// ```
pub fn download_project_zip<F: VirtualFs + ?Sized>(
    fs: &F,
    config: &ExportConfig,
    target: &dyn SaveTarget,
) -> Option<ExportReport> {
    match export_archive(fs, config, target, &mut NoopProgress) {
        Ok(report) => {
            tracing::info!(
                files = report.files_added,
                skipped = report.files_skipped,
                bytes = report.archive_bytes,
                "project archive saved"
            );
            Some(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "error creating project archive");
            None
        }
    }
}

/// Publishes the project tree to the GitHub repository in `config`.
///
/// Uses the blocking reqwest transport. Errors are logged and returned.
///
/// # Errors
///
/// Returns the first error of the publish run. See
/// [`RemotePublisher::publish`].
///
/// # Examples
///
/// ```no_run
/// use treeport_core::PublishConfig;
/// use treeport_core::fs::LocalFs;
/// use treeport_core::upload_to_github;
///
/// let config = PublishConfig::from_env()?;
/// let report = upload_to_github(&LocalFs::new("./site"), &config)?;
/// println!("{} files published", report.total_files());
/// # Ok::<(), treeport_core::ExportError>(())
/// ```
pub fn upload_to_github<F: VirtualFs + ?Sized>(
    fs: &F,
    config: &PublishConfig,
) -> Result<PublishReport> {
    let result = ReqwestTransport::new()
        .and_then(|transport| RemotePublisher::new(transport, config.clone()))
        .and_then(|mut publisher| publisher.publish(fs, &mut NoopProgress));

    match result {
        Ok(report) => {
            tracing::info!(files = report.total_files(), "all files uploaded to GitHub");
            Ok(report)
        }
        Err(e) => {
            tracing::error!(error = %e, "error uploading files to GitHub");
            Err(e)
        }
    }
}
