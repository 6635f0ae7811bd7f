//! Detection of the branch to compare the current head against.

use std::path::Path;

use super::process::{run_git, GitError};

/// Resolve the comparison branch for `dir`.
///
/// Candidates are tried in a fixed order and the first one whose ref
/// actually resolves wins:
///
/// 1. the repository's configured `init.defaultBranch`,
/// 2. `master`,
/// 3. `main`,
/// 4. the currently checked-out branch,
/// 5. the literal `master`.
///
/// A candidate that does not resolve is skipped, never fatal. Fails with
/// [`GitError::NotARepository`] outside a repository and
/// [`GitError::NoCommits`] when the repository has no commits at all.
pub fn resolve(dir: &Path) -> Result<String, GitError> {
    ensure_repository(dir)?;
    ensure_head(dir)?;

    if let Some(configured) = configured_default(dir) {
        if ref_exists(dir, &configured) {
            return Ok(configured);
        }
    }

    for candidate in ["master", "main"] {
        if ref_exists(dir, candidate) {
            return Ok(candidate.to_string());
        }
    }

    if let Some(current) = current_branch(dir) {
        return Ok(current);
    }

    Ok("master".to_string())
}

/// True when `name` resolves to a commit in `dir`.
pub fn ref_exists(dir: &Path, name: &str) -> bool {
    let spec = format!("{name}^{{commit}}");
    run_git(dir, &["rev-parse", "--verify", "--quiet", &spec])
        .map(|out| !out.trim().is_empty())
        .unwrap_or(false)
}

fn ensure_repository(dir: &Path) -> Result<(), GitError> {
    run_git(dir, &["rev-parse", "--is-inside-work-tree"]).map(|_| ())
}

fn ensure_head(dir: &Path) -> Result<(), GitError> {
    run_git(dir, &["rev-parse", "--verify", "HEAD"]).map(|_| ())
}

/// The `init.defaultBranch` setting, if any.
fn configured_default(dir: &Path) -> Option<String> {
    let value = run_git(dir, &["config", "--get", "init.defaultBranch"]).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Name of the currently checked-out branch, if HEAD is on one.
fn current_branch(dir: &Path) -> Option<String> {
    let name = run_git(dir, &["symbolic-ref", "--short", "HEAD"]).ok()?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
