//! Subprocess boundary for the `git` command-line tool.
//!
//! Every repository interaction goes through [`run_git`]: the command runs
//! with the workspace root as working directory, stdout is captured as UTF-8,
//! and a non-zero exit is turned into a [`GitError`] classified from stderr.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

/// Failures surfaced by git invocations.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository")]
    NotARepository,

    #[error("repository has no commits yet")]
    NoCommits,

    #[error("ambiguous reference: {0}")]
    AmbiguousRef(String),

    #[error("{command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("could not run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Run `git` with the given arguments in `dir` and return its stdout.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String, GitError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_PAGER", "cat")
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(classify_failure(args, &stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Map a failed invocation to the error taxonomy.
///
/// Classification is heuristic: git reports all of these conditions through
/// stderr text, not distinct exit codes. Anything unrecognized stays a
/// generic [`GitError::Failed`] carrying the command line and stderr.
fn classify_failure(args: &[&str], stderr: &str) -> GitError {
    let lower = stderr.to_lowercase();

    if lower.contains("not a git repository") {
        return GitError::NotARepository;
    }

    // An unborn HEAD shows up as "needed a single revision" when verifying
    // HEAD, or as an unknown-revision complaint quoting 'HEAD' itself.
    let verifies_head = args.iter().any(|a| *a == "HEAD");
    if lower.contains("does not have any commits")
        || (verifies_head && lower.contains("needed a single revision"))
        || (lower.contains("'head'") && lower.contains("unknown revision"))
    {
        return GitError::NoCommits;
    }

    if lower.contains("is ambiguous") {
        return GitError::AmbiguousRef(stderr.to_string());
    }

    GitError::Failed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_missing_repository() {
        let err = classify_failure(
            &["rev-parse", "HEAD"],
            "fatal: not a git repository (or any of the parent directories): .git",
        );
        assert!(matches!(err, GitError::NotARepository));
    }

    #[test]
    fn classifies_unborn_head() {
        let err = classify_failure(&["rev-parse", "--verify", "HEAD"], "fatal: Needed a single revision");
        assert!(matches!(err, GitError::NoCommits));

        let err = classify_failure(
            &["rev-parse", "HEAD"],
            "fatal: ambiguous argument 'HEAD': unknown revision or path not in the working tree.",
        );
        assert!(matches!(err, GitError::NoCommits));
    }

    #[test]
    fn classifies_ambiguous_ref() {
        let err = classify_failure(&["rev-parse", "topic"], "warning: refname 'topic' is ambiguous.");
        assert!(matches!(err, GitError::AmbiguousRef(_)));
    }

    #[test]
    fn unrecognized_failure_stays_generic() {
        let err = classify_failure(&["fetch"], "fatal: unable to access remote");
        match err {
            GitError::Failed { command, stderr } => {
                assert_eq!(command, "git fetch");
                assert!(stderr.contains("unable to access"));
            }
            other => panic!("expected generic failure, got {other:?}"),
        }
    }

    #[test]
    fn needed_single_revision_without_head_stays_generic() {
        let err = classify_failure(&["rev-parse", "--verify", "topic"], "fatal: Needed a single revision");
        assert!(matches!(err, GitError::Failed { .. }));
    }

    #[test]
    fn unknown_branch_in_a_range_stays_generic() {
        let err = classify_failure(
            &["diff", "--name-status", "nope...HEAD"],
            "fatal: ambiguous argument 'nope...HEAD': unknown revision or path not in the working tree.",
        );
        assert!(matches!(err, GitError::Failed { .. }));
    }
}
