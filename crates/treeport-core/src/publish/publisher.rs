//! Repository initialization and sequential file upload.

use super::client::GitHubClient;
use super::transport::Transport;
use crate::ExportError;
use crate::ProgressCallback;
use crate::PublishConfig;
use crate::PublishReport;
use crate::Result;
use crate::filters::remote_path;
use crate::fs::VirtualFs;
use crate::walker::collect_files;
use std::time::Instant;

/// What the publisher knows about the target branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoState {
    /// Not checked yet.
    Unknown,
    /// The branch ref is missing and must be created.
    Uninitialized,
    /// The branch exists; files can be written.
    Ready,
}

/// Publishes a virtual file tree to a GitHub branch.
///
/// Files are uploaded one at a time in walker order through the contents
/// API, one commit per file. The first failure stops the run; files
/// uploaded before it stay on the branch.
///
/// # Examples
///
/// ```no_run
/// use treeport_core::NoopProgress;
/// use treeport_core::PublishConfig;
/// use treeport_core::fs::LocalFs;
/// use treeport_core::publish::RemotePublisher;
/// use treeport_core::publish::ReqwestTransport;
///
/// let config = PublishConfig::from_env()?;
/// let mut publisher = RemotePublisher::new(ReqwestTransport::new()?, config)?;
/// let report = publisher.publish(&LocalFs::new("./site"), &mut NoopProgress)?;
/// println!("uploaded {} files", report.total_files());
/// # Ok::<(), treeport_core::ExportError>(())
/// ```
pub struct RemotePublisher<T: Transport> {
    client: GitHubClient<T>,
    config: PublishConfig,
    state: RepoState,
}

impl<T: Transport> RemotePublisher<T> {
    /// Creates a publisher for the repository in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(transport: T, config: PublishConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: GitHubClient::new(transport, &config),
            config,
            state: RepoState::Unknown,
        })
    }

    /// Current knowledge of the target branch.
    #[must_use]
    pub fn state(&self) -> RepoState {
        self.state
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Returns the GitHub client.
    pub fn client(&self) -> &GitHubClient<T> {
        &self.client
    }

    /// Makes sure the target branch exists.
    ///
    /// A missing branch (404 on its ref) gets an empty tree, a parentless
    /// commit of that tree and a ref pointing at the commit, in that order.
    /// Returns `true` if the branch was created by this call.
    ///
    /// Once `Ready`, later calls make no requests.
    ///
    /// # Errors
    ///
    /// Returns the first failing request's error. Objects created before the
    /// failure are left in place.
    pub fn ensure_initialized(&mut self) -> Result<bool> {
        let mut created = false;
        loop {
            match self.state {
                RepoState::Ready => return Ok(created),
                RepoState::Unknown => {
                    let branch = &self.config.branch;
                    self.state = if self.client.branch_exists(branch)? {
                        tracing::info!(branch = %branch, "repository is already initialized");
                        RepoState::Ready
                    } else {
                        tracing::info!(
                            branch = %branch,
                            "branch does not exist, initializing repository"
                        );
                        RepoState::Uninitialized
                    };
                }
                RepoState::Uninitialized => {
                    let tree = self.client.create_tree_empty()?;
                    let commit = self
                        .client
                        .create_commit(&self.config.initial_commit_message, &tree)?;
                    self.client.create_ref(&self.config.branch, &commit)?;
                    tracing::info!(
                        branch = %self.config.branch,
                        commit = %commit,
                        "branch created"
                    );
                    self.state = RepoState::Ready;
                    created = true;
                }
            }
        }
    }

    /// Uploads every non-excluded file of `fs`.
    ///
    /// Initializes the branch first, then for each file in walker order:
    /// reads it, looks up its current sha and writes it with the message
    /// `Add/update {path}`.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered: initialization, directory
    /// listing, file read or any remote call. No later file is attempted.
    pub fn publish<F: VirtualFs + ?Sized>(
        &mut self,
        fs: &F,
        progress: &mut dyn ProgressCallback,
    ) -> Result<PublishReport> {
        let start = Instant::now();
        let mut report = PublishReport::new();

        report.initialized_repo = self.ensure_initialized()?;

        let files = collect_files(fs, "/", &self.config.exclusions)?;
        let total = files.len();
        tracing::debug!(count = total, "files to be uploaded");

        for (idx, file) in files.iter().enumerate() {
            progress.on_entry_start(file, total, idx + 1);

            let content = fs.read_file(file).map_err(|source| ExportError::ReadFile {
                path: file.clone(),
                source,
            })?;
            let path = remote_path(file, &self.config.project_root);
            let sha = self.client.file_sha(&path, &self.config.branch)?;
            self.client.put_file(
                &path,
                &content,
                &format!("Add/update {path}"),
                &self.config.branch,
                sha.as_deref(),
            )?;
            tracing::debug!(path = %path, updated = sha.is_some(), "uploaded");

            if sha.is_some() {
                report.files_updated += 1;
            } else {
                report.files_created += 1;
            }
            report.bytes_uploaded += content.len() as u64;
            report.uploaded.push(path);

            progress.on_entry_complete(file);
        }

        report.duration = start.elapsed();
        progress.on_complete();

        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::NoopProgress;
    use crate::fs::MemoryFs;
    use crate::publish::HttpMethod;
    use crate::test_utils::ScriptedTransport;
    use serde_json::Value;
    use serde_json::json;

    fn publisher(transport: &ScriptedTransport) -> RemotePublisher<&ScriptedTransport> {
        RemotePublisher::new(transport, PublishConfig::new("tok", "o", "r")).unwrap()
    }

    fn path_of(url: &str) -> &str {
        url.strip_prefix("https://api.github.com/repos/o/r").unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let transport = ScriptedTransport::new();
        let result = RemotePublisher::new(&transport, PublishConfig::new("", "o", "r"));
        assert!(matches!(result, Err(ExportError::MissingConfig { .. })));
    }

    #[test]
    fn test_ensure_initialized_existing_branch() {
        let transport = ScriptedTransport::new().respond(200, json!({"ref": "refs/heads/main"}));
        let mut publisher = publisher(&transport);

        assert_eq!(publisher.state(), RepoState::Unknown);
        assert!(!publisher.ensure_initialized().unwrap());
        assert_eq!(publisher.state(), RepoState::Ready);

        // Ready is sticky; no further requests.
        assert!(!publisher.ensure_initialized().unwrap());
        assert_eq!(transport.requests().len(), 1);
    }

    #[test]
    fn test_ensure_initialized_missing_branch() {
        let transport = ScriptedTransport::new()
            .respond(404, json!({"message": "Not Found"}))
            .respond(201, json!({"sha": "tree"}))
            .respond(201, json!({"sha": "commit"}))
            .respond(201, json!({}));
        let mut publisher = publisher(&transport);

        assert!(publisher.ensure_initialized().unwrap());
        assert_eq!(publisher.state(), RepoState::Ready);

        let urls: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| (r.method, path_of(&r.url).to_string()))
            .collect();
        assert_eq!(
            urls,
            [
                (HttpMethod::Get, "/git/refs/heads/main".to_string()),
                (HttpMethod::Post, "/git/trees".to_string()),
                (HttpMethod::Post, "/git/commits".to_string()),
                (HttpMethod::Post, "/git/refs".to_string()),
            ]
        );
    }

    #[test]
    fn test_ensure_initialized_failure_keeps_state() {
        let transport = ScriptedTransport::new()
            .respond(404, Value::Null)
            .respond(201, json!({"sha": "tree"}))
            .respond(500, json!({"message": "boom"}));
        let mut publisher = publisher(&transport);

        let err = publisher.ensure_initialized().unwrap_err();
        assert_eq!(err.to_string(), "Failed to create initial commit: boom (HTTP 500)");
        assert_eq!(publisher.state(), RepoState::Uninitialized);
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn test_publish_create_and_update() {
        let fs = MemoryFs::new()
            .with_file("/home/project/index.html", "<p>new</p>")
            .with_file("/home/project/app.js", "old")
            .with_file("/home/project/node_modules/x.js", "skip");
        let transport = ScriptedTransport::new()
            .respond(200, json!({}))
            .respond(404, Value::Null)
            .respond(201, json!({}))
            .respond(200, json!({"sha": "app-sha"}))
            .respond(200, json!({}));
        let mut publisher = publisher(&transport);

        let report = publisher.publish(&fs, &mut NoopProgress).unwrap();

        assert!(!report.initialized_repo);
        assert_eq!(report.files_created, 1);
        assert_eq!(report.files_updated, 1);
        assert_eq!(report.uploaded, ["index.html", "app.js"]);
        assert_eq!(report.bytes_uploaded, 13);

        let reqs = transport.requests();
        assert_eq!(reqs.len(), 5);
        let put_new = reqs[2].body.as_ref().unwrap();
        assert_eq!(put_new["message"], "Add/update index.html");
        assert_eq!(put_new["branch"], "main");
        assert!(put_new.get("sha").is_none());

        let put_existing = reqs[4].body.as_ref().unwrap();
        assert_eq!(path_of(&reqs[4].url), "/contents/app.js");
        assert_eq!(put_existing["sha"], "app-sha");
    }

    #[test]
    fn test_publish_stops_at_first_failure() {
        let fs = MemoryFs::new()
            .with_file("/a.txt", "a")
            .with_file("/b.txt", "b")
            .with_file("/c.txt", "c");
        let transport = ScriptedTransport::new()
            .respond(200, json!({}))
            .respond(404, Value::Null)
            .respond(201, json!({}))
            .respond(404, Value::Null)
            .respond(409, json!({"message": "conflict"}));
        let mut publisher = publisher(&transport);

        let err = publisher.publish(&fs, &mut NoopProgress).unwrap_err();

        assert_eq!(err.to_string(), "Failed to upload b.txt: conflict (HTTP 409)");
        let reqs = transport.requests();
        assert_eq!(reqs.len(), 5);
        assert!(reqs.iter().all(|r| !r.url.contains("c.txt")));
    }

    #[test]
    fn test_publish_aborts_before_upload_when_init_fails() {
        let fs = MemoryFs::new().with_file("/a.txt", "a");
        let transport = ScriptedTransport::new()
            .respond(404, Value::Null)
            .respond(403, json!({"message": "Resource not accessible"}));
        let mut publisher = publisher(&transport);

        assert!(publisher.publish(&fs, &mut NoopProgress).is_err());
        assert!(transport.requests().iter().all(|r| !r.url.contains("/contents/")));
    }

    #[test]
    fn test_publish_unreadable_file_aborts() {
        let fs = MemoryFs::new()
            .with_bytes("/bin.dat", vec![0xff, 0xfe])
            .with_file("/a.txt", "a");
        let transport = ScriptedTransport::new().respond(200, json!({}));
        let mut publisher = publisher(&transport);

        let err = publisher.publish(&fs, &mut NoopProgress).unwrap_err();
        assert!(matches!(err, ExportError::ReadFile { ref path, .. } if path == "/bin.dat"));
        assert_eq!(transport.requests().len(), 1);
    }
}
