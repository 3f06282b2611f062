//! Path exclusion and archive key computation.
//!
//! Exclusion is plain substring matching against the full virtual path, not
//! glob matching: `/dist` excludes `/dist/app.js` and also `/distance.txt`.

use std::fmt;

/// Substrings excluded by default.
///
/// Dependency installs, version control, build output, coverage reports,
/// the npm lockfile, environment files, and macOS folder metadata.
pub const DEFAULT_EXCLUSIONS: [&str; 8] = [
    "/node_modules",
    "/.git",
    "/dist",
    "/build",
    "/coverage",
    "package-lock.json",
    ".env",
    ".DS_Store",
];

/// Project root prefix stripped from archive keys by default.
pub const DEFAULT_PROJECT_ROOT: &str = "/home/project/";

/// Immutable ordered set of excluded substrings.
///
/// Membership is binary: a path is excluded if any member occurs anywhere in
/// it. Order only matters for [`ExclusionSet::matching`], which reports the
/// first hit.
///
/// # Examples
///
/// ```
/// use treeport_core::filters::ExclusionSet;
///
/// let set = ExclusionSet::default();
/// assert!(set.is_excluded("/node_modules/react/index.js"));
/// assert!(set.is_excluded("/app/.env.local"));
/// assert!(!set.is_excluded("/src/main.ts"));
///
/// let custom = ExclusionSet::new(vec!["secret".to_string()]);
/// assert!(custom.is_excluded("/config/secret.json"));
/// assert!(!custom.is_excluded("/node_modules/x.js"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    members: Vec<String>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUSIONS.iter().map(ToString::to_string).collect())
    }
}

impl ExclusionSet {
    /// Creates a set from the given substrings.
    ///
    /// Empty strings are dropped; an empty member would exclude every path.
    #[must_use]
    pub fn new(members: Vec<String>) -> Self {
        Self {
            members: members.into_iter().filter(|m| !m.is_empty()).collect(),
        }
    }

    /// Creates a set that excludes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Returns a new set with `member` appended.
    #[must_use]
    pub fn with(mut self, member: impl Into<String>) -> Self {
        let member = member.into();
        if !member.is_empty() && !self.members.contains(&member) {
            self.members.push(member);
        }
        self
    }

    /// Returns `true` if any member occurs in `path`.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        self.matching(path).is_some()
    }

    /// Returns the first member that occurs in `path`.
    #[must_use]
    pub fn matching(&self, path: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|m| path.contains(m.as_str()))
            .map(String::as_str)
    }

    /// Iterates over members in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the set excludes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.members.join(", "))
    }
}

/// Computes the archive key for a virtual path.
///
/// Strips `project_root` when the path starts with it, then one leading `/`.
///
/// # Examples
///
/// ```
/// use treeport_core::filters::archive_key;
///
/// assert_eq!(archive_key("/home/project/src/app.ts", "/home/project/"), "src/app.ts");
/// assert_eq!(archive_key("/sub/b.txt", "/home/project/"), "sub/b.txt");
/// assert_eq!(archive_key("a.txt", "/home/project/"), "a.txt");
/// ```
#[must_use]
pub fn archive_key(path: &str, project_root: &str) -> String {
    let relative = if project_root.is_empty() {
        path
    } else {
        path.strip_prefix(project_root).unwrap_or(path)
    };
    relative.strip_prefix('/').unwrap_or(relative).to_string()
}

/// Computes the repository path a virtual file is published under.
///
/// Same rule as [`archive_key`]; kept separate so the two sinks can diverge
/// without touching call sites.
#[must_use]
pub fn remote_path(path: &str, project_root: &str) -> String {
    archive_key(path, project_root)
}
