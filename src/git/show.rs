//! Reading repository content at a ref: single files and full listings.

use std::path::Path;

use super::process::{run_git, GitError};

/// Content of `path` as it exists at `rref`.
///
/// Returns `Ok(None)` when the path does not exist at that ref (a newly
/// added file, for instance) so the caller can degrade to an empty pane
/// instead of failing.
pub fn content_at(dir: &Path, rref: &str, path: &str) -> Result<Option<String>, GitError> {
    let spec = format!("{rref}:{path}");
    match run_git(dir, &["show", &spec]) {
        Ok(text) => Ok(Some(text)),
        Err(GitError::Failed { stderr, .. })
            if stderr.contains("does not exist")
                || stderr.contains("exists on disk, but not in") =>
        {
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Every path tracked at `rref`, repo-relative.
pub fn tracked_files(dir: &Path, rref: &str) -> Result<Vec<String>, GitError> {
    let output = run_git(dir, &["ls-tree", "-r", "--name-only", rref])?;
    Ok(output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_support::*;

    #[test]
    fn reads_content_at_a_ref() {
        let repo = init_repo("main");
        write_file(repo.path(), "src/lib.rs", "pub fn one() {}\n");
        commit_all(repo.path(), "init");

        let content = content_at(repo.path(), "main", "src/lib.rs").unwrap();
        assert_eq!(content.as_deref(), Some("pub fn one() {}\n"));
    }

    #[test]
    fn missing_path_at_ref_is_none() {
        let repo = init_repo("main");
        write_file(repo.path(), "a.txt", "a\n");
        commit_all(repo.path(), "init");

        let content = content_at(repo.path(), "main", "nope.txt").unwrap();
        assert!(content.is_none());
    }

    #[test]
    fn lists_tracked_files() {
        let repo = init_repo("main");
        write_file(repo.path(), "a.txt", "a\n");
        write_file(repo.path(), "src/lib.rs", "x\n");
        commit_all(repo.path(), "init");

        let mut files = tracked_files(repo.path(), "main").unwrap();
        files.sort();
        assert_eq!(files, vec!["a.txt".to_string(), "src/lib.rs".to_string()]);
    }
}
