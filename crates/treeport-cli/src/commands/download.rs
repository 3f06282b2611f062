//! Download command implementation

use super::exclusions;
use super::source_fs;
use crate::cli::DownloadArgs;
use crate::error::convert_export_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use std::path::PathBuf;
use treeport_core::ExportConfig;
use treeport_core::NoopProgress;
use treeport_core::ProgressCallback;
use treeport_core::archive::DirectorySaveTarget;
use treeport_core::export_archive;

pub fn execute(args: &DownloadArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let fs = source_fs(&args.source)?;

    let mut config = ExportConfig::default()
        .with_exclusions(exclusions(&args.source))
        .with_output_name(args.name.as_str());
    if let Some(root) = &args.source.project_root {
        config = config.with_project_root(root.as_str());
    }
    if let Some(level) = args.compression_level {
        config = config.with_compression_level(Some(level));
    }

    let output_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let target = DirectorySaveTarget::new(output_dir).with_overwrite(args.force);

    let mut progress: Box<dyn ProgressCallback> = if !quiet && CliProgress::should_show() {
        Box::new(CliProgress::new("Archiving"))
    } else {
        Box::new(NoopProgress)
    };

    let report = export_archive(&fs, &config, &target, &mut *progress)
        .map_err(|e| convert_export_error(e, &args.source.source))?;
    drop(progress);

    formatter.format_download_result(&report)?;

    Ok(())
}
