//! Subcommand implementations.

pub mod completion;
pub mod download;
pub mod list;
pub mod publish;

use crate::cli::SourceArgs;
use anyhow::Result;
use anyhow::bail;
use treeport_core::filters::ExclusionSet;
use treeport_core::fs::LocalFs;

/// Mounts the source directory as the project tree.
pub fn source_fs(args: &SourceArgs) -> Result<LocalFs> {
    if !args.source.is_dir() {
        bail!(
            "Source is not a directory: {}\n\
             HINT: Pass the directory that holds the project tree.",
            args.source.display()
        );
    }
    Ok(LocalFs::new(&args.source))
}

/// Built-in exclusions (unless disabled) plus every `--exclude`.
pub fn exclusions(args: &SourceArgs) -> ExclusionSet {
    let base = if args.no_default_excludes {
        ExclusionSet::empty()
    } else {
        ExclusionSet::default()
    };
    args.exclude
        .iter()
        .fold(base, |set, member| set.with(member.as_str()))
}
