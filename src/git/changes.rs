//! Loading the list of changed files relative to the comparison branch.

use std::path::Path;

use serde::Serialize;

use super::process::{run_git, GitError};

/// Classification of a changed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Unknown,
}

impl FileStatus {
    /// Map the leading character of a `--name-status` field.
    pub fn from_code(code: char) -> Self {
        match code {
            'M' => FileStatus::Modified,
            'A' => FileStatus::Added,
            'D' => FileStatus::Deleted,
            'R' => FileStatus::Renamed,
            _ => FileStatus::Unknown,
        }
    }
}

/// One changed path with its status, repo-relative and '/'-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: String,
    pub status: FileStatus,
}

/// List the files that differ between `branch` and the current head.
///
/// Runs a three-dot `git diff --name-status`, so the comparison is against
/// the merge base rather than the branch tip. Empty output means zero
/// changes, not an error.
pub fn load(dir: &Path, branch: &str) -> Result<Vec<ChangeRecord>, GitError> {
    let range = format!("{branch}...HEAD");
    let output = run_git(dir, &["diff", "--name-status", &range])?;
    Ok(parse_name_status(&output))
}

/// Parse `status<TAB>path` lines.
///
/// Rename and copy entries carry two paths; only the destination is kept,
/// and the status character alone decides the classification.
pub fn parse_name_status(output: &str) -> Vec<ChangeRecord> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<ChangeRecord> {
    let mut fields = line.split('\t');
    let code = fields.next()?.trim();
    let status = FileStatus::from_code(code.chars().next()?);

    let path = fields.last()?.trim();
    if path.is_empty() {
        return None;
    }

    Some(ChangeRecord {
        path: path.to_string(),
        status,
    })
}
