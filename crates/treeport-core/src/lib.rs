//! Export a virtual project tree as a zip archive or publish it to GitHub.
//!
//! `treeport-core` walks a [`VirtualFs`](fs::VirtualFs), an abstract file
//! tree such as a sandbox filesystem, leaves out build output, dependencies
//! and secrets, and then either:
//!
//! - packs every remaining file into `project.zip` and hands it to a
//!   [`SaveTarget`](archive::SaveTarget), or
//! - uploads every remaining file to a GitHub branch through the REST
//!   contents API, creating the branch with an empty commit if needed.
//!
//! # Examples
//!
//! ```
//! use treeport_core::ExportConfig;
//! use treeport_core::NoopProgress;
//! use treeport_core::export_archive;
//! use treeport_core::fs::MemoryFs;
//! use treeport_core::test_utils::MemorySaveTarget;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let fs = MemoryFs::new()
//!     .with_file("/home/project/index.html", "<h1>hi</h1>")
//!     .with_file("/home/project/node_modules/x/index.js", "");
//! let target = MemorySaveTarget::new();
//!
//! let report = export_archive(&fs, &ExportConfig::default(), &target, &mut NoopProgress)?;
//! assert_eq!(report.files_added, 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod filters;
pub mod fs;
pub mod publish;
pub mod report;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod walker;

// Re-export main API types
pub use api::download_project_zip;
pub use api::upload_to_github;
pub use archive::export_archive;
pub use config::ExportConfig;
pub use config::PublishConfig;
pub use error::ExportError;
pub use error::Result;
pub use publish::RemotePublisher;
pub use report::ExportReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::PublishReport;
