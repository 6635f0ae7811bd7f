//! Tree materialization: folding a flat change list into a navigable
//! hierarchy, or a flat listing, with ordering computed at read time.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::git::{ChangeRecord, FileStatus};

/// How the panel arranges changed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Hierarchical,
    Flat,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Hierarchical => ViewMode::Flat,
            ViewMode::Flat => ViewMode::Hierarchical,
        }
    }
}

/// One entry in the materialized tree.
///
/// Children are keyed by segment name; insertion order is irrelevant
/// because ordering is computed by [`TreeNode::sorted_children`]. The root
/// node itself is never rendered, only its descendants.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub name: String,
    pub full_path: String,
    pub is_leaf: bool,
    pub status: Option<FileStatus>,
    pub children: HashMap<String, TreeNode>,
}

impl TreeNode {
    pub fn root() -> Self {
        Self::folder("", "")
    }

    fn folder(name: &str, full_path: &str) -> Self {
        Self {
            name: name.to_string(),
            full_path: full_path.to_string(),
            is_leaf: false,
            status: None,
            children: HashMap::new(),
        }
    }

    fn leaf(name: &str, full_path: &str, status: Option<FileStatus>) -> Self {
        Self {
            name: name.to_string(),
            full_path: full_path.to_string(),
            is_leaf: true,
            status,
            children: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Children in display order: folders before files, then by name.
    pub fn sorted_children(&self) -> Vec<&TreeNode> {
        let mut nodes: Vec<&TreeNode> = self.children.values().collect();
        nodes.sort_by(|a, b| match (a.is_leaf, b.is_leaf) {
            (false, true) => Ordering::Less,
            (true, false) => Ordering::Greater,
            _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        });
        nodes
    }
}

/// Materialize a change list as a tree rooted at an unrendered root node.
///
/// Hierarchical mode walks each path's segments, creating folder nodes at
/// most once per distinct prefix. Flat mode attaches one leaf per record
/// directly to the root, keyed by the full path.
pub fn build_tree(records: &[ChangeRecord], mode: ViewMode) -> TreeNode {
    let mut root = TreeNode::root();
    for record in records {
        match mode {
            ViewMode::Hierarchical => {
                insert_hierarchical(&mut root, &record.path, Some(record.status));
            }
            ViewMode::Flat => {
                root.children.insert(
                    record.path.clone(),
                    TreeNode::leaf(&record.path, &record.path, Some(record.status)),
                );
            }
        }
    }
    root
}

/// Materialize a full tracked-file listing, status-less.
///
/// Used as the zero-changes fallback in hierarchical mode so the panel
/// shows repository structure instead of an empty view.
pub fn build_full_tree(paths: &[String]) -> TreeNode {
    let mut root = TreeNode::root();
    for path in paths {
        insert_hierarchical(&mut root, path, None);
    }
    root
}

fn insert_hierarchical(root: &mut TreeNode, path: &str, status: Option<FileStatus>) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return;
    }

    let mut node = root;
    for (i, segment) in segments.iter().enumerate() {
        let is_last = i + 1 == segments.len();
        let prefix = segments[..=i].join("/");
        node = node.children.entry(segment.to_string()).or_insert_with(|| {
            if is_last {
                TreeNode::leaf(segment, &prefix, status)
            } else {
                TreeNode::folder(segment, &prefix)
            }
        });
        if is_last && node.is_leaf {
            node.status = status;
        }
    }
}

/// A depth-annotated display row.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub is_leaf: bool,
    pub status: Option<FileStatus>,
}

/// Flatten the tree into display rows, depth-first in display order.
pub fn flatten(root: &TreeNode) -> Vec<FlatEntry> {
    let mut rows = Vec::new();
    flatten_into(root, 0, &mut rows);
    rows
}

fn flatten_into(node: &TreeNode, depth: usize, rows: &mut Vec<FlatEntry>) {
    for child in node.sorted_children() {
        rows.push(FlatEntry {
            name: child.name.clone(),
            path: child.full_path.clone(),
            depth,
            is_leaf: child.is_leaf,
            status: child.status,
        });
        if !child.is_leaf {
            flatten_into(child, depth + 1, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, status: FileStatus) -> ChangeRecord {
        ChangeRecord {
            path: path.to_string(),
            status,
        }
    }

    fn sample_records() -> Vec<ChangeRecord> {
        vec![
            record("src/a.ts", FileStatus::Modified),
            record("src/b.ts", FileStatus::Added),
            record("README.md", FileStatus::Deleted),
        ]
    }

    #[test]
    fn hierarchical_mode_folds_shared_prefixes() {
        let root = build_tree(&sample_records(), ViewMode::Hierarchical);

        let children = root.sorted_children();
        assert_eq!(children.len(), 2);

        // Folders sort before files.
        assert_eq!(children[0].name, "src");
        assert!(!children[0].is_leaf);
        assert_eq!(children[1].name, "README.md");
        assert!(children[1].is_leaf);
        assert_eq!(children[1].status, Some(FileStatus::Deleted));

        let src = children[0].sorted_children();
        assert_eq!(src.len(), 2);
        assert_eq!(src[0].name, "a.ts");
        assert_eq!(src[0].status, Some(FileStatus::Modified));
        assert_eq!(src[1].name, "b.ts");
        assert_eq!(src[1].status, Some(FileStatus::Added));
    }

    #[test]
    fn leaf_full_path_reconstructs_the_record_path() {
        let records = vec![
            record("a/b/c/deep.rs", FileStatus::Added),
            record("a/b/shallow.rs", FileStatus::Modified),
        ];
        let root = build_tree(&records, ViewMode::Hierarchical);

        fn check(node: &TreeNode, ancestors: &[String]) {
            if node.is_leaf {
                let mut parts = ancestors.to_vec();
                parts.push(node.name.clone());
                assert_eq!(parts.join("/"), node.full_path);
            }
            for child in node.sorted_children() {
                let mut parts = ancestors.to_vec();
                if !node.name.is_empty() {
                    parts.push(node.name.clone());
                }
                check(child, &parts);
            }
        }
        check(&root, &[]);
    }

    #[test]
    fn sibling_names_are_unique() {
        let records = vec![
            record("src/a.rs", FileStatus::Modified),
            record("src/a.rs", FileStatus::Modified),
            record("src/b.rs", FileStatus::Added),
        ];
        let root = build_tree(&records, ViewMode::Hierarchical);
        let src = &root.children["src"];
        assert_eq!(src.children.len(), 2);
    }

    #[test]
    fn flat_mode_has_one_root_child_per_record() {
        let root = build_tree(&sample_records(), ViewMode::Flat);

        assert_eq!(root.children.len(), 3);
        for child in root.sorted_children() {
            assert!(child.is_leaf);
            assert_eq!(child.name, child.full_path);
            assert!(child.children.is_empty());
        }
    }

    #[test]
    fn rebuilding_is_structurally_idempotent() {
        let records = sample_records();
        let first = build_tree(&records, ViewMode::Hierarchical);
        let second = build_tree(&records, ViewMode::Hierarchical);
        assert_eq!(first, second);
        assert_eq!(flatten(&first), flatten(&second));
    }

    #[test]
    fn full_tree_matches_hierarchical_shape_without_statuses() {
        let paths = vec!["src/a.ts".to_string(), "README.md".to_string()];
        let root = build_full_tree(&paths);

        for row in flatten(&root) {
            assert_eq!(row.status, None);
        }
        let children = root.sorted_children();
        assert_eq!(children[0].name, "src");
        assert_eq!(children[1].name, "README.md");
    }

    #[test]
    fn empty_input_yields_an_empty_root() {
        assert!(build_tree(&[], ViewMode::Flat).is_empty());
        assert!(build_tree(&[], ViewMode::Hierarchical).is_empty());
    }

    #[test]
    fn flatten_annotates_depth() {
        let root = build_tree(&sample_records(), ViewMode::Hierarchical);
        let rows = flatten(&root);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].name, "src");
        assert_eq!(rows[0].depth, 0);
        assert_eq!(rows[1].name, "a.ts");
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[2].name, "b.ts");
        assert_eq!(rows[2].depth, 1);
        assert_eq!(rows[3].name, "README.md");
        assert_eq!(rows[3].depth, 0);
    }
}
