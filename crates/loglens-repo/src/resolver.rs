//! File-name lookup across ordered repository roots.
//!
//! The search is a plain depth-first walk per root. Entries are visited in
//! file-name order so results do not depend on the platform's directory
//! listing order. The first root that contains a matching file wins; files
//! sharing a base name inside one root are not disambiguated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RepoError, Result};

/// Version-control metadata directory skipped during the walk.
pub const VCS_METADATA_DIR: &str = ".git";

/// A named root directory to search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRoot {
    /// Configuration key.
    pub key: String,
    /// Root directory.
    pub path: PathBuf,
}

impl RepositoryRoot {
    /// Creates a repository root.
    #[must_use]
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

/// A file found in one of the roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation {
    /// Absolute path of the matching file.
    pub absolute_file_path: PathBuf,
    /// Root of the repository that owns the file.
    pub owner_repository_path: PathBuf,
}

/// Searches a fixed, ordered list of repository roots.
#[derive(Debug, Clone, Default)]
pub struct RepositoryResolver {
    roots: Vec<RepositoryRoot>,
}

impl RepositoryResolver {
    /// Creates a resolver over the given roots, searched in order.
    #[must_use]
    pub const fn new(roots: Vec<RepositoryRoot>) -> Self {
        Self { roots }
    }

    /// Configured roots.
    #[must_use]
    pub fn roots(&self) -> &[RepositoryRoot] {
        &self.roots
    }

    /// Looks up a root by key.
    #[must_use]
    pub fn root(&self, key: &str) -> Option<&RepositoryRoot> {
        self.roots.iter().find(|r| r.key == key)
    }

    /// Finds the first file named exactly `base_name`.
    ///
    /// # Errors
    ///
    /// See [`find_file`].
    pub fn find_file(&self, base_name: &str) -> Result<Option<ResolvedLocation>> {
        find_file(&self.roots, base_name)
    }
}

/// Finds the first file named exactly `base_name` across `roots`.
///
/// Returns `Ok(None)` when no root contains the file.
///
/// # Errors
///
/// Returns [`RepoError::RootUnreadable`] when the file was not found and at
/// least one configured root could not be listed. A match in a readable root
/// is still returned if another root is broken.
pub fn find_file(roots: &[RepositoryRoot], base_name: &str) -> Result<Option<ResolvedLocation>> {
    if base_name.is_empty() {
        return Ok(None);
    }

    let mut first_failure: Option<RepoError> = None;

    for root in roots {
        match walk(&root.path, base_name) {
            Ok(Some(found)) => {
                let owner = absolute(&root.path);
                debug!(
                    file = base_name,
                    repo = %root.key,
                    path = %found.display(),
                    "source file resolved"
                );
                return Ok(Some(ResolvedLocation {
                    absolute_file_path: absolute(&found),
                    owner_repository_path: owner,
                }));
            }
            Ok(None) => {}
            Err(source) => {
                warn!(repo = %root.key, path = %root.path.display(), error = %source, "repository root unreadable");
                first_failure.get_or_insert(RepoError::RootUnreadable {
                    path: root.path.clone(),
                    source,
                });
            }
        }
    }

    match first_failure {
        Some(error) => Err(error),
        None => {
            debug!(file = base_name, roots = roots.len(), "source file not found");
            Ok(None)
        }
    }
}

/// Depth-first search of one root. Only listing the root itself can fail.
fn walk(root: &Path, base_name: &str) -> io::Result<Option<PathBuf>> {
    let entries = sorted_entries(root)?;
    Ok(search(entries, base_name))
}

fn search(entries: Vec<fs::DirEntry>, base_name: &str) -> Option<PathBuf> {
    for entry in entries {
        let name = entry.file_name();
        if name == VCS_METADATA_DIR {
            continue;
        }

        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        // Symlinked directories are not followed, which rules out cycles.
        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file {
            if name == base_name {
                return Some(path);
            }
        } else if file_type.is_dir() {
            match sorted_entries(&path) {
                Ok(children) => {
                    if let Some(found) = search(children, base_name) {
                        return Some(found);
                    }
                }
                Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable directory"),
            }
        }
    }
    None
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<fs::DirEntry>> {
    let mut entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.filter_map(io::Result::ok).collect();
    entries.sort_by_key(fs::DirEntry::file_name);
    Ok(entries)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(&path, "// source\n").expect("write file");
        path
    }

    fn root(dir: &TempDir, key: &str) -> RepositoryRoot {
        RepositoryRoot::new(key, dir.path())
    }

    #[test]
    fn finds_nested_file() {
        let repo = tempfile::tempdir().expect("tempdir");
        let expected = touch(repo.path(), "foo/bar.c");

        let found = find_file(&[root(&repo, "core")], "bar.c")
            .expect("readable")
            .expect("found");

        assert_eq!(found.absolute_file_path, expected);
        assert_eq!(found.owner_repository_path, repo.path());
    }

    #[test]
    fn second_root_used_when_first_lacks_file() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        touch(first.path(), "src/other.rs");
        let expected = touch(second.path(), "src/core.rs");

        let found = find_file(&[root(&first, "a"), root(&second, "b")], "core.rs")
            .expect("readable")
            .expect("found");

        assert_eq!(found.absolute_file_path, expected);
        assert_eq!(found.owner_repository_path, second.path());
    }

    #[test]
    fn first_root_wins_when_both_match() {
        let first = tempfile::tempdir().expect("tempdir");
        let second = tempfile::tempdir().expect("tempdir");
        let expected = touch(first.path(), "deep/in/tree/core.rs");
        touch(second.path(), "core.rs");

        let found = find_file(&[root(&first, "a"), root(&second, "b")], "core.rs")
            .expect("readable")
            .expect("found");

        assert_eq!(found.absolute_file_path, expected);
    }

    #[test]
    fn skips_vcs_metadata() {
        let repo = tempfile::tempdir().expect("tempdir");
        touch(repo.path(), ".git/HEAD");
        touch(repo.path(), ".git/refs/config.rs");

        assert_eq!(find_file(&[root(&repo, "core")], "HEAD").expect("readable"), None);
        assert_eq!(find_file(&[root(&repo, "core")], "config.rs").expect("readable"), None);
    }

    #[test]
    fn match_is_case_sensitive() {
        let repo = tempfile::tempdir().expect("tempdir");
        touch(repo.path(), "Main.c");

        assert_eq!(find_file(&[root(&repo, "core")], "main.c").expect("readable"), None);
    }

    #[test]
    fn walk_order_is_by_name_depth_first() {
        let repo = tempfile::tempdir().expect("tempdir");
        let expected = touch(repo.path(), "a/x/util.h");
        touch(repo.path(), "b/util.h");
        touch(repo.path(), "c/util.h");

        let found = find_file(&[root(&repo, "core")], "util.h")
            .expect("readable")
            .expect("found");

        assert_eq!(found.absolute_file_path, expected);
    }

    #[test]
    fn directory_with_matching_name_is_not_a_file() {
        let repo = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(repo.path().join("core.rs")).expect("mkdir");

        assert_eq!(find_file(&[root(&repo, "core")], "core.rs").expect("readable"), None);
    }

    #[test]
    fn unreadable_root_fails_loudly_when_nothing_found() {
        let repo = tempfile::tempdir().expect("tempdir");
        let missing = RepositoryRoot::new("gone", repo.path().join("does-not-exist"));

        let result = find_file(&[missing], "core.rs");
        assert!(matches!(result, Err(RepoError::RootUnreadable { .. })));
    }

    #[test]
    fn unreadable_root_does_not_hide_match_elsewhere() {
        let repo = tempfile::tempdir().expect("tempdir");
        touch(repo.path(), "core.rs");
        let missing = RepositoryRoot::new("gone", repo.path().join("does-not-exist"));

        let found = find_file(&[missing, root(&repo, "core")], "core.rs").expect("found despite broken root");
        assert!(found.is_some());
    }

    #[test]
    fn empty_name_or_no_roots_finds_nothing() {
        let repo = tempfile::tempdir().expect("tempdir");
        touch(repo.path(), "a.c");

        assert_eq!(find_file(&[root(&repo, "core")], "").expect("readable"), None);
        assert_eq!(find_file(&[], "a.c").expect("readable"), None);
    }

    #[test]
    fn resolver_looks_up_roots_by_key() {
        let resolver = RepositoryResolver::new(vec![
            RepositoryRoot::new("core", "/src/core"),
            RepositoryRoot::new("ui", "/src/ui"),
        ]);

        assert_eq!(resolver.root("ui").map(|r| r.path.as_path()), Some(Path::new("/src/ui")));
        assert!(resolver.root("missing").is_none());
        assert_eq!(resolver.roots().len(), 2);
    }
}
