//! Error conversion utilities for CLI.
//!
//! Converts treeport-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use treeport_core::ExportError;
use treeport_core::config::ENV_OWNER;
use treeport_core::config::ENV_REPO;
use treeport_core::config::ENV_TOKEN;

/// Converts an `ExportError` raised while exporting `source`.
pub fn convert_export_error(err: ExportError, source: &Path) -> anyhow::Error {
    match err {
        ExportError::ListDirectory { path, source: io } => {
            anyhow!(
                "Cannot list '{}' in project '{}': {}\n\
                 HINT: Check that the source directory exists and is readable.",
                path,
                source.display(),
                io
            )
        }
        ExportError::OutputExists { path } => {
            anyhow!(
                "Output file already exists: {}\n\
                 HINT: Use --force to overwrite it, or --output-dir to save elsewhere.",
                path.display()
            )
        }
        ExportError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use a level between 0 (store) and 9 (best compression)."
            )
        }
        ExportError::InvalidConfig { reason } => {
            anyhow!("Invalid configuration: {reason}")
        }
        ExportError::Io(io_err) => {
            anyhow!(
                "I/O error while exporting '{}': {}",
                source.display(),
                io_err
            )
        }
        _ => anyhow::Error::from(err).context(format!("Error exporting '{}'", source.display())),
    }
}

/// Converts an `ExportError` raised while publishing.
pub fn convert_publish_error(err: ExportError) -> anyhow::Error {
    match err {
        ExportError::MissingConfig { name } => {
            let hint = match name.as_str() {
                ENV_TOKEN => "Pass --token or set GITHUB_TOKEN.",
                ENV_OWNER => "Pass --owner or set REPO_OWNER.",
                ENV_REPO => "Pass --repo or set REPO_NAME.",
                _ => "Check the publish options.",
            };
            anyhow!("Missing configuration value: {name}\nHINT: {hint}")
        }
        ExportError::RemoteApi {
            operation,
            status: 401,
            message,
        } => {
            anyhow!(
                "{operation}: {message} (HTTP 401)\n\
                 HINT: The token was rejected. Check that it is valid and not expired."
            )
        }
        ExportError::RemoteApi {
            operation,
            status: status @ (403 | 404),
            message,
        } => {
            anyhow!(
                "{operation}: {message} (HTTP {status})\n\
                 HINT: Check the repository name and that the token has write access to it."
            )
        }
        ExportError::Transport { operation, reason } => {
            anyhow!(
                "{operation}: {reason}\n\
                 HINT: Check network connectivity and --api-url."
            )
        }
        ExportError::ReadFile { path, source } => {
            anyhow!(
                "Cannot read '{path}': {source}\n\
                 HINT: Publishing uploads text files only. Exclude binary files with --exclude."
            )
        }
        other => anyhow::Error::from(other).context("Publishing failed"),
    }
}
