//! Filtered traversal of a virtual file tree.
//!
//! Produces the list of regular files under a root, depth-first pre-order,
//! in the filesystem's own listing order. An excluded entry is dropped
//! together with everything beneath it: excluded directories are never
//! listed.

use crate::ExportError;
use crate::Result;
use crate::filters::ExclusionSet;
use crate::fs::EntryKind;
use crate::fs::VirtualFs;

/// Walks a virtual filesystem, skipping excluded paths.
///
/// # Examples
///
/// ```
/// use treeport_core::filters::ExclusionSet;
/// use treeport_core::fs::MemoryFs;
/// use treeport_core::walker::TreeWalker;
///
/// let fs = MemoryFs::new()
///     .with_file("/a.txt", "x")
///     .with_file("/sub/b.txt", "y")
///     .with_file("/node_modules/c.txt", "z");
/// let exclusions = ExclusionSet::default();
///
/// let files = TreeWalker::new(&fs, &exclusions).walk("/")?;
/// assert_eq!(files, ["/a.txt", "/sub/b.txt"]);
/// # Ok::<(), treeport_core::ExportError>(())
/// ```
pub struct TreeWalker<'a, F: VirtualFs + ?Sized> {
    fs: &'a F,
    exclusions: &'a ExclusionSet,
}

impl<'a, F: VirtualFs + ?Sized> TreeWalker<'a, F> {
    /// Creates a walker over `fs` using `exclusions`.
    #[must_use]
    pub fn new(fs: &'a F, exclusions: &'a ExclusionSet) -> Self {
        Self { fs, exclusions }
    }

    /// Returns every non-excluded regular file under `root`.
    ///
    /// `root` itself is listed even if it matches an exclusion.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::ListDirectory` for the first directory that
    /// cannot be listed. No partial result is returned.
    pub fn walk(&self, root: &str) -> Result<Vec<String>> {
        let mut files = Vec::new();
        // Pending entries, last element processed first. Children are pushed
        // in reverse so they pop in listing order, which keeps the traversal
        // identical to the recursive pre-order walk.
        let mut stack: Vec<(String, EntryKind)> = Vec::new();
        self.push_children(root, &mut stack)?;

        while let Some((path, kind)) = stack.pop() {
            match kind {
                EntryKind::Directory => {
                    tracing::trace!(path = %path, "directory");
                    self.push_children(&path, &mut stack)?;
                }
                EntryKind::File => {
                    tracing::trace!(path = %path, "file");
                    files.push(path);
                }
            }
        }

        Ok(files)
    }

    fn push_children(&self, dir: &str, stack: &mut Vec<(String, EntryKind)>) -> Result<()> {
        let entries = self
            .fs
            .list_directory(dir)
            .map_err(|source| ExportError::ListDirectory {
                path: dir.to_string(),
                source,
            })?;

        let start = stack.len();
        for entry in entries {
            let full_path = join_path(dir, &entry.name);
            if let Some(member) = self.exclusions.matching(&full_path) {
                tracing::trace!(path = %full_path, exclusion = member, "excluded");
                continue;
            }
            stack.push((full_path, entry.kind));
        }
        stack[start..].reverse();
        Ok(())
    }
}

/// Collects every non-excluded regular file under `root`.
///
/// Convenience wrapper around [`TreeWalker::walk`].
///
/// # Errors
///
/// Returns an error if any directory listing fails.
pub fn collect_files<F: VirtualFs + ?Sized>(
    fs: &F,
    root: &str,
    exclusions: &ExclusionSet,
) -> Result<Vec<String>> {
    TreeWalker::new(fs, exclusions).walk(root)
}

/// Joins a directory path and an entry name.
///
/// The first doubled separator is collapsed, so joining onto `/` yields a
/// single leading slash.
///
/// # Examples
///
/// ```
/// use treeport_core::walker::join_path;
///
/// assert_eq!(join_path("/", "src"), "/src");
/// assert_eq!(join_path("/src", "main.ts"), "/src/main.ts");
/// assert_eq!(join_path("/src/", "main.ts"), "/src/main.ts");
/// ```
#[must_use]
pub fn join_path(dir: &str, name: &str) -> String {
    format!("{dir}/{name}").replacen("//", "/", 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fs::DirEntry;
    use crate::fs::MemoryFs;
    use std::cell::RefCell;
    use std::io;

    fn walk(fs: &MemoryFs) -> Vec<String> {
        collect_files(fs, "/", &ExclusionSet::default()).unwrap()
    }

    #[test]
    fn test_walk_basic_tree() {
        let fs = MemoryFs::new()
            .with_file("/file1.txt", "content1")
            .with_file("/file2.rs", "content2")
            .with_file("/subdir/file3.txt", "content3");

        assert_eq!(walk(&fs), ["/file1.txt", "/file2.rs", "/subdir/file3.txt"]);
    }

    #[test]
    fn test_walk_is_preorder_in_listing_order() {
        let fs = MemoryFs::new()
            .with_file("/z/inner/deep.txt", "")
            .with_file("/a.txt", "")
            .with_file("/z/after.txt", "")
            .with_file("/m.txt", "");

        assert_eq!(
            walk(&fs),
            ["/z/inner/deep.txt", "/z/after.txt", "/a.txt", "/m.txt"]
        );
    }

    #[test]
    fn test_walk_skips_excluded_subtrees() {
        let fs = MemoryFs::new()
            .with_file("/keep.txt", "keep")
            .with_file("/node_modules/react/index.js", "")
            .with_file("/.git/HEAD", "")
            .with_file("/dist/bundle.js", "")
            .with_file("/web/build/index.html", "")
            .with_file("/coverage/lcov.info", "")
            .with_file("/package-lock.json", "")
            .with_file("/.env", "SECRET=1")
            .with_file("/img/.DS_Store", "");

        assert_eq!(walk(&fs), ["/keep.txt"]);
    }

    #[test]
    fn test_walk_never_lists_excluded_directories() {
        struct Recording<'a> {
            inner: &'a MemoryFs,
            listed: RefCell<Vec<String>>,
        }

        impl VirtualFs for Recording<'_> {
            fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
                self.listed.borrow_mut().push(path.to_string());
                self.inner.list_directory(path)
            }

            fn read_file(&self, path: &str) -> io::Result<String> {
                self.inner.read_file(path)
            }
        }

        let inner = MemoryFs::new()
            .with_file("/node_modules/a/b.js", "")
            .with_file("/src/main.ts", "");
        let fs = Recording {
            inner: &inner,
            listed: RefCell::new(Vec::new()),
        };

        let files = collect_files(&fs, "/", &ExclusionSet::default()).unwrap();
        assert_eq!(files, ["/src/main.ts"]);
        assert_eq!(*fs.listed.borrow(), ["/", "/src"]);
    }

    #[test]
    fn test_walk_omits_directories() {
        let fs = MemoryFs::new().with_dir("/empty").with_dir("/a/b/c");
        assert!(walk(&fs).is_empty());
    }

    #[test]
    fn test_walk_from_subdirectory() {
        let fs = MemoryFs::new()
            .with_file("/home/project/src/app.ts", "")
            .with_file("/tmp/scratch.txt", "");

        let files = collect_files(&fs, "/home/project", &ExclusionSet::default()).unwrap();
        assert_eq!(files, ["/home/project/src/app.ts"]);
    }

    #[test]
    fn test_walk_with_custom_exclusions() {
        let fs = MemoryFs::new()
            .with_file("/node_modules/x.js", "")
            .with_file("/target/debug/app", "")
            .with_file("/src/lib.rs", "");
        let exclusions = ExclusionSet::new(vec!["/target".to_string()]);

        let files = collect_files(&fs, "/", &exclusions).unwrap();
        assert_eq!(files, ["/node_modules/x.js", "/src/lib.rs"]);
    }

    #[test]
    fn test_walk_listing_failure_propagates() {
        struct Broken;

        impl VirtualFs for Broken {
            fn list_directory(&self, path: &str) -> io::Result<Vec<DirEntry>> {
                if path == "/" {
                    Ok(vec![DirEntry::file("a.txt"), DirEntry::directory("locked")])
                } else {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
                }
            }

            fn read_file(&self, _path: &str) -> io::Result<String> {
                Ok(String::new())
            }
        }

        let err = collect_files(&Broken, "/", &ExclusionSet::default()).unwrap_err();
        match err {
            ExportError::ListDirectory { path, source } => {
                assert_eq!(path, "/locked");
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_walk_missing_root() {
        let fs = MemoryFs::new();
        let result = collect_files(&fs, "/missing", &ExclusionSet::default());
        assert!(matches!(result, Err(ExportError::ListDirectory { .. })));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "a.txt"), "/a.txt");
        assert_eq!(join_path("/sub", "b.txt"), "/sub/b.txt");
        assert_eq!(join_path("", "c.txt"), "/c.txt");
        // Only the first doubled separator is collapsed.
        assert_eq!(join_path("//x", "y"), "/x/y");
    }
}
