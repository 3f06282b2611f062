//! List command implementation

use super::exclusions;
use super::source_fs;
use crate::cli::ListArgs;
use crate::error::convert_export_error;
use crate::output::ListedFile;
use crate::output::OutputFormatter;
use anyhow::Result;
use treeport_core::filters::DEFAULT_PROJECT_ROOT;
use treeport_core::filters::archive_key;
use treeport_core::walker::collect_files;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let fs = source_fs(&args.source)?;
    let exclusions = exclusions(&args.source);
    let project_root = args
        .source
        .project_root
        .as_deref()
        .unwrap_or(DEFAULT_PROJECT_ROOT);

    let files: Vec<ListedFile> = collect_files(&fs, "/", &exclusions)
        .map_err(|e| convert_export_error(e, &args.source.source))?
        .into_iter()
        .map(|path| ListedFile {
            key: archive_key(&path, project_root),
            path,
        })
        .collect();

    if files.is_empty() {
        formatter.format_warning(&format!(
            "No files to export in {} (excluded: {exclusions})",
            args.source.source.display()
        ));
    }

    formatter.format_file_list(&files, args.long)?;

    Ok(())
}
