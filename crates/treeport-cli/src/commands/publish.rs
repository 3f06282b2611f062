//! Publish command implementation

use super::exclusions;
use super::source_fs;
use crate::cli::PublishArgs;
use crate::error::convert_publish_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use treeport_core::NoopProgress;
use treeport_core::ProgressCallback;
use treeport_core::PublishConfig;
use treeport_core::RemotePublisher;
use treeport_core::config::ENV_API_BASE;
use treeport_core::config::ENV_BRANCH;
use treeport_core::config::ENV_OWNER;
use treeport_core::config::ENV_REPO;
use treeport_core::config::ENV_TOKEN;
use treeport_core::publish::ReqwestTransport;

/// Builds the publish configuration from flags, which clap already backs
/// with the matching environment variables.
fn build_config(args: &PublishArgs) -> treeport_core::Result<PublishConfig> {
    let mut config = PublishConfig::from_lookup(|name| {
        match name {
            ENV_TOKEN => args.token.clone(),
            ENV_OWNER => args.owner.clone(),
            ENV_REPO => args.repo.clone(),
            ENV_BRANCH => args.branch.clone(),
            ENV_API_BASE => args.api_url.clone(),
            _ => None,
        }
    })?
    .with_exclusions(exclusions(&args.source));

    if let Some(root) = &args.source.project_root {
        config = config.with_project_root(root.as_str());
    }
    if let Some(message) = &args.initial_commit_message {
        config = config.with_initial_commit_message(message.as_str());
    }
    Ok(config)
}

pub fn execute(args: &PublishArgs, formatter: &dyn OutputFormatter, quiet: bool) -> Result<()> {
    let fs = source_fs(&args.source)?;
    let config = build_config(args).map_err(convert_publish_error)?;
    let target = format!("{}/{}@{}", config.owner, config.repo, config.branch);

    let transport = ReqwestTransport::new().map_err(convert_publish_error)?;
    let mut publisher = RemotePublisher::new(transport, config).map_err(convert_publish_error)?;

    let mut progress: Box<dyn ProgressCallback> = if !quiet && CliProgress::should_show() {
        Box::new(CliProgress::new("Uploading"))
    } else {
        Box::new(NoopProgress)
    };

    let result = publisher.publish(&fs, &mut *progress);
    drop(progress);

    let report = result.map_err(|e| {
        tracing::error!(error = %e, "error uploading files to GitHub");
        convert_publish_error(e)
    })?;
    tracing::info!(files = report.total_files(), "all files uploaded to GitHub");

    formatter.format_publish_result(&target, &report)?;

    Ok(())
}
