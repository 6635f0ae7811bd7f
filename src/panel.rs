//! Presentation adapter: the panel contract exposed to a rendering host.
//!
//! The controller owns the materialized tree and the commands a host wires
//! up (refresh, view toggle, file activation). It holds no rendering logic;
//! hosts subscribe a listener and re-render whenever the state is replaced.

use std::path::PathBuf;

use serde::Serialize;

use crate::git::{self, FileStatus, GitError};
use crate::tree::{self, TreeNode, ViewMode};

/// Icon selection for a panel row: one per known status, a default for
/// status-less files, and a folder marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelIcon {
    Modified,
    Added,
    Deleted,
    Renamed,
    Default,
    Folder,
}

impl PanelIcon {
    fn for_entry(is_leaf: bool, status: Option<FileStatus>) -> Self {
        if !is_leaf {
            return PanelIcon::Folder;
        }
        match status {
            Some(FileStatus::Modified) => PanelIcon::Modified,
            Some(FileStatus::Added) => PanelIcon::Added,
            Some(FileStatus::Deleted) => PanelIcon::Deleted,
            Some(FileStatus::Renamed) => PanelIcon::Renamed,
            Some(FileStatus::Unknown) | None => PanelIcon::Default,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            PanelIcon::Modified => "M",
            PanelIcon::Added => "A",
            PanelIcon::Deleted => "D",
            PanelIcon::Renamed => "R",
            PanelIcon::Default => "·",
            PanelIcon::Folder => "▸",
        }
    }
}

/// One row of the panel as the host renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelItem {
    pub label: String,
    pub path: String,
    pub depth: usize,
    pub expandable: bool,
    pub icon: PanelIcon,
    pub status: Option<FileStatus>,
}

/// Convert a materialized tree into display rows.
pub fn panel_items(root: &TreeNode) -> Vec<PanelItem> {
    tree::flatten(root)
        .into_iter()
        .map(|entry| PanelItem {
            label: entry.name,
            path: entry.path,
            depth: entry.depth,
            expandable: !entry.is_leaf,
            icon: PanelIcon::for_entry(entry.is_leaf, entry.status),
            status: entry.status,
        })
        .collect()
}

/// The state a host observes: either fully loaded or fully empty, never a
/// partial tree.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub branch: String,
    pub mode: Option<ViewMode>,
    pub items: Vec<PanelItem>,
    /// User-facing message from the last failed reload, if any.
    pub notice: Option<String>,
}

/// Both sides of a file activation: content at the comparison branch and
/// the working copy. Either side may be absent (added or deleted files).
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub path: String,
    pub branch: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

pub type Listener = Box<dyn Fn(&PanelState)>;

pub struct PanelController {
    dir: PathBuf,
    mode: ViewMode,
    branch_override: Option<String>,
    state: PanelState,
    listeners: Vec<Listener>,
    generation: u64,
}

impl PanelController {
    pub fn new(dir: PathBuf, mode: ViewMode, branch_override: Option<String>) -> Self {
        Self {
            dir,
            mode,
            branch_override,
            state: PanelState::default(),
            listeners: Vec::new(),
            generation: 0,
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The branch the last reload compared against. Part of the public
    /// contract so consumers never reach into loader internals.
    pub fn branch(&self) -> &str {
        &self.state.branch
    }

    /// Re-run the full load and atomically replace the visible state.
    ///
    /// Every failure is caught here: it is logged, mapped to a single
    /// user-facing notice, and resolved into an empty model. Listeners are
    /// notified after the swap in either case.
    pub fn reload(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let outcome = self.load();

        // Concurrent reloads race last-writer-wins; a completion stamped
        // with an older generation must not overwrite a newer tree.
        if generation != self.generation {
            tracing::debug!(generation, "discarding stale reload completion");
            return;
        }

        self.state = match outcome {
            Ok((branch, root)) => PanelState {
                branch,
                mode: Some(self.mode),
                items: panel_items(&root),
                notice: None,
            },
            Err(err) => {
                tracing::warn!(error = %err, "reload failed");
                PanelState {
                    branch: String::new(),
                    mode: Some(self.mode),
                    items: Vec::new(),
                    notice: Some(user_message(&err)),
                }
            }
        };
        self.notify();
    }

    /// Flip between hierarchical and flat arrangement and reload.
    pub fn toggle_view(&mut self) {
        self.mode = self.mode.toggled();
        self.reload();
    }

    /// Gather both sides of a comparison for `path`.
    ///
    /// Failures here are per-invocation: they are returned to the caller
    /// and leave the panel state untouched.
    pub fn open_file(&self, path: &str) -> Result<FileDiff, GitError> {
        let branch = if self.state.branch.is_empty() {
            self.comparison_branch()?
        } else {
            self.state.branch.clone()
        };

        let old = git::content_at(&self.dir, &branch, path)?;
        // Lossy so a binary working copy is still detected downstream
        // instead of being reported as missing.
        let new = std::fs::read(self.dir.join(path))
            .ok()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

        Ok(FileDiff {
            path: path.to_string(),
            branch,
            old,
            new,
        })
    }

    fn comparison_branch(&self) -> Result<String, GitError> {
        match &self.branch_override {
            Some(name) if git::ref_exists(&self.dir, name) => Ok(name.clone()),
            Some(name) => {
                tracing::warn!(branch = %name, "requested branch does not resolve, detecting instead");
                git::resolve(&self.dir)
            }
            None => git::resolve(&self.dir),
        }
    }

    fn load(&self) -> Result<(String, TreeNode), GitError> {
        let branch = self.comparison_branch()?;
        let records = git::load(&self.dir, &branch)?;

        let root = if records.is_empty() && self.mode == ViewMode::Hierarchical {
            // Convenience view only: enumeration failure degrades to empty.
            match git::tracked_files(&self.dir, &branch) {
                Ok(paths) => tree::build_full_tree(&paths),
                Err(err) => {
                    tracing::debug!(error = %err, "full-tree fallback failed");
                    TreeNode::root()
                }
            }
        } else {
            tree::build_tree(&records, self.mode)
        };

        Ok((branch, root))
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.state);
        }
    }
}

fn user_message(err: &GitError) -> String {
    match err {
        GitError::NotARepository => "this directory is not inside a git repository".to_string(),
        GitError::NoCommits => "the repository has no commits to compare against".to_string(),
        GitError::AmbiguousRef(detail) => format!("the comparison branch is ambiguous: {detail}"),
        GitError::Failed { .. } | GitError::Spawn(_) => {
            format!("could not load changes: {err}")
        }
    }
}

/// Virtual addressing for the read-only comparison side: the path plus the
/// branch carried as a query parameter. [`PanelController::open_file`]
/// resolves it on demand by replaying a content-at-ref lookup.
pub fn content_uri(path: &str, branch: &str) -> String {
    format!("sidetree://{path}?ref={branch}")
}
