//! Configuration for archive export and repository publishing.

use crate::ExportError;
use crate::Result;
use crate::filters::DEFAULT_PROJECT_ROOT;
use crate::filters::ExclusionSet;

/// Archive file name handed to the save target by default.
pub const DEFAULT_OUTPUT_NAME: &str = "project.zip";

/// Branch the publisher initializes and writes to by default.
pub const DEFAULT_BRANCH: &str = "main";

/// GitHub REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Environment variable holding the GitHub token.
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";

/// Environment variable holding the repository owner.
pub const ENV_OWNER: &str = "REPO_OWNER";

/// Environment variable holding the repository name.
pub const ENV_REPO: &str = "REPO_NAME";

/// Optional environment variable overriding the API base URL.
pub const ENV_API_BASE: &str = "GITHUB_API_URL";

/// Optional environment variable overriding the target branch.
pub const ENV_BRANCH: &str = "REPO_BRANCH";

/// Configuration for archive export.
///
/// # Examples
///
/// ```
/// use treeport_core::ExportConfig;
/// use treeport_core::filters::ExclusionSet;
///
/// let config = ExportConfig::default();
/// assert_eq!(config.output_name, "project.zip");
///
/// let custom = ExportConfig::default()
///     .with_exclusions(ExclusionSet::empty().with("/target"))
///     .with_compression_level(Some(9));
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Paths containing any of these substrings are left out.
    ///
    /// Default: [`ExclusionSet::default`].
    pub exclusions: ExclusionSet,

    /// Prefix stripped from archive keys when present.
    ///
    /// Default: `/home/project/`.
    pub project_root: String,

    /// File name the archive is saved under.
    ///
    /// Default: `project.zip`.
    pub output_name: String,

    /// Compression level: `Some(0)` stores entries, `Some(1..=9)` deflates.
    /// `None` uses the zip crate default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            exclusions: ExclusionSet::default(),
            project_root: DEFAULT_PROJECT_ROOT.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            compression_level: Some(6),
        }
    }
}

impl ExportConfig {
    /// Creates a new `ExportConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exclusion set.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Sets the project root prefix.
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<String>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Sets the output file name.
    #[must_use]
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Sets the compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Compression level is above 9
    /// - Output name is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(ExportError::InvalidCompressionLevel { level });
        }
        if self.output_name.is_empty()
            || self.output_name.contains('/')
            || self.output_name.contains('\\')
        {
            return Err(ExportError::InvalidConfig {
                reason: format!("output name must be a plain file name: {:?}", self.output_name),
            });
        }
        Ok(())
    }
}

/// Configuration for publishing to a GitHub repository.
///
/// Credentials come from the process environment at call time (see
/// [`PublishConfig::from_env`]); the CLI layers flag overrides on top.
///
/// # Examples
///
/// ```
/// use treeport_core::PublishConfig;
///
/// let config = PublishConfig::new("ghp_example", "octocat", "hello-world");
/// assert_eq!(config.branch, "main");
/// assert_eq!(config.repo_url(), "https://api.github.com/repos/octocat/hello-world");
/// ```
#[derive(Clone)]
pub struct PublishConfig {
    /// Token sent as `Authorization: token <TOKEN>`.
    pub token: String,

    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Branch to initialize and write to.
    ///
    /// Default: `main`.
    pub branch: String,

    /// REST API base URL, without trailing slash.
    ///
    /// Default: `https://api.github.com`.
    pub api_base: String,

    /// Prefix stripped from repository paths when present.
    ///
    /// Default: `/home/project/`.
    pub project_root: String,

    /// Paths containing any of these substrings are not published.
    pub exclusions: ExclusionSet,

    /// Message of the empty commit created on an uninitialized repository.
    ///
    /// Default: `Initial commit`.
    pub initial_commit_message: String,

    /// `User-Agent` header value; GitHub rejects requests without one.
    pub user_agent: String,
}

impl std::fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishConfig")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("api_base", &self.api_base)
            .field("project_root", &self.project_root)
            .field("exclusions", &self.exclusions)
            .field("initial_commit_message", &self.initial_commit_message)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl PublishConfig {
    /// Creates a configuration for `owner/repo` with default settings.
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            branch: DEFAULT_BRANCH.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            project_root: DEFAULT_PROJECT_ROOT.to_string(),
            exclusions: ExclusionSet::default(),
            initial_commit_message: "Initial commit".to_string(),
            user_agent: concat!("treeport/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// Requires `GITHUB_TOKEN`, `REPO_OWNER` and `REPO_NAME`. Honors
    /// `GITHUB_API_URL` and `REPO_BRANCH` when set.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::MissingConfig` naming the first required
    /// variable that is unset or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through an arbitrary variable lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use treeport_core::PublishConfig;
    ///
    /// let vars = HashMap::from([
    ///     ("GITHUB_TOKEN", "t"),
    ///     ("REPO_OWNER", "octocat"),
    ///     ("REPO_NAME", "site"),
    ///     ("REPO_BRANCH", "deploy"),
    /// ]);
    /// let config = PublishConfig::from_lookup(|k| vars.get(k).map(ToString::to_string))?;
    /// assert_eq!(config.branch, "deploy");
    /// # Ok::<(), treeport_core::ExportError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ExportError::MissingConfig {
                    name: name.to_string(),
                })
        };

        let mut config = Self::new(required(ENV_TOKEN)?, required(ENV_OWNER)?, required(ENV_REPO)?);

        if let Some(base) = lookup(ENV_API_BASE).filter(|v| !v.is_empty()) {
            config = config.with_api_base(base);
        }
        if let Some(branch) = lookup(ENV_BRANCH).filter(|v| !v.is_empty()) {
            config.branch = branch;
        }

        Ok(config)
    }

    /// Sets the target branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Sets the API base URL. A trailing slash is removed.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Sets the project root prefix.
    #[must_use]
    pub fn with_project_root(mut self, root: impl Into<String>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Sets the exclusion set.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Sets the initial commit message.
    #[must_use]
    pub fn with_initial_commit_message(mut self, message: impl Into<String>) -> Self {
        self.initial_commit_message = message.into();
        self
    }

    /// Returns `{api_base}/repos/{owner}/{repo}`.
    #[must_use]
    pub fn repo_url(&self) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.owner, self.repo)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if token, owner, repo or branch is empty, owner or
    /// repo contains a `/`, or the API base is not an absolute URL.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("token", &self.token),
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("branch", &self.branch),
        ] {
            if value.trim().is_empty() {
                return Err(ExportError::MissingConfig {
                    name: name.to_string(),
                });
            }
        }
        if self.owner.contains('/') || self.repo.contains('/') {
            return Err(ExportError::InvalidConfig {
                reason: format!(
                    "owner and repo must not contain '/': {}/{}",
                    self.owner, self.repo
                ),
            });
        }
        if reqwest::Url::parse(&self.api_base).is_err() {
            return Err(ExportError::InvalidConfig {
                reason: format!("API base is not a URL: {}", self.api_base),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_export_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.project_root, "/home/project/");
        assert_eq!(config.output_name, "project.zip");
        assert_eq!(config.compression_level, Some(6));
        assert_eq!(config.exclusions, ExclusionSet::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_builder() {
        let config = ExportConfig::new()
            .with_project_root("/workspace/")
            .with_output_name("site.zip")
            .with_compression_level(Some(0));

        assert_eq!(config.project_root, "/workspace/");
        assert_eq!(config.output_name, "site.zip");
        assert_eq!(config.compression_level, Some(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_export_validate_rejects_level() {
        let config = ExportConfig::default().with_compression_level(Some(10));
        assert!(matches!(
            config.validate(),
            Err(ExportError::InvalidCompressionLevel { level: 10 })
        ));
    }

    #[test]
    fn test_export_validate_rejects_output_path() {
        for name in ["", "out/project.zip", "..\\project.zip"] {
            let config = ExportConfig::default().with_output_name(name);
            assert!(matches!(
                config.validate(),
                Err(ExportError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn test_publish_from_lookup() {
        let config = PublishConfig::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "secret"),
            ("REPO_OWNER", "octocat"),
            ("REPO_NAME", "hello"),
        ]))
        .unwrap();

        assert_eq!(config.token, "secret");
        assert_eq!(config.owner, "octocat");
        assert_eq!(config.repo, "hello");
        assert_eq!(config.branch, "main");
        assert_eq!(config.api_base, "https://api.github.com");
    }

    #[test]
    fn test_publish_from_lookup_overrides() {
        let config = PublishConfig::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "secret"),
            ("REPO_OWNER", "octocat"),
            ("REPO_NAME", "hello"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3/"),
            ("REPO_BRANCH", "export"),
        ]))
        .unwrap();

        assert_eq!(config.api_base, "https://ghe.example.com/api/v3");
        assert_eq!(config.branch, "export");
        assert_eq!(
            config.repo_url(),
            "https://ghe.example.com/api/v3/repos/octocat/hello"
        );
    }

    #[test]
    fn test_publish_from_lookup_missing() {
        let err = PublishConfig::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "secret"),
            ("REPO_NAME", "hello"),
        ]))
        .unwrap_err();

        match err {
            ExportError::MissingConfig { name } => assert_eq!(name, "REPO_OWNER"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_publish_from_lookup_empty_is_missing() {
        let err = PublishConfig::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", ""),
            ("REPO_OWNER", "o"),
            ("REPO_NAME", "r"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ExportError::MissingConfig { name } if name == "GITHUB_TOKEN"));
    }

    #[test]
    fn test_publish_validate() {
        assert!(PublishConfig::new("t", "o", "r").validate().is_ok());
        assert!(PublishConfig::new("", "o", "r").validate().is_err());
        assert!(PublishConfig::new("t", "o", "r").with_branch(" ").validate().is_err());
        assert!(matches!(
            PublishConfig::new("t", "o/x", "r").validate(),
            Err(ExportError::InvalidConfig { .. })
        ));
        assert!(matches!(
            PublishConfig::new("t", "o", "r").with_api_base("api.github.com").validate(),
            Err(ExportError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = PublishConfig::new("ghp_supersecret", "o", "r");
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_supersecret"));
        assert!(debug.contains("<redacted>"));
    }
}
