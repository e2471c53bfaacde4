//! Folder tree structures for hierarchical display.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use foldershare_core::types::{FolderId, ParentRef};

use super::model::Folder;

/// A node in a folder tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder (may lie outside the caller's view).
    pub parent_id: ParentRef,
    /// When the folder was created.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    /// Child folder nodes.
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Create a leaf node from a folder record.
    pub fn leaf(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            parent_id: folder.parent_id,
            created_at: folder.created_at,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(FolderNode::count).sum::<usize>()
    }

    /// Find a node by id anywhere in this subtree.
    pub fn find(&self, id: &FolderId) -> Option<&FolderNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// A forest of folder nodes, as seen by one caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderTree {
    /// The root node(s) of the tree.
    pub roots: Vec<FolderNode>,
    /// Total number of folders in the tree.
    pub total_folders: u64,
}

impl FolderTree {
    /// Create an empty folder tree.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            total_folders: 0,
        }
    }

    /// Wrap a set of roots, counting every node.
    pub fn from_roots(roots: Vec<FolderNode>) -> Self {
        let total_folders = roots.iter().map(FolderNode::count).sum::<usize>() as u64;
        Self {
            roots,
            total_folders,
        }
    }

    /// Reconstruct a forest from a flat set of folders.
    ///
    /// A folder whose parent is part of the set is attached beneath it.
    /// Every other folder becomes a root, even when it has a real parent
    /// outside the set. Siblings are ordered by name, then id.
    ///
    /// Folders whose parents form a cycle inside the set are never reached
    /// from a root. Each such cycle is broken at its first folder in
    /// sibling order, which becomes a root.
    pub fn from_flat(folders: impl IntoIterator<Item = Folder>) -> Self {
        let by_id: HashMap<FolderId, Folder> =
            folders.into_iter().map(|f| (f.id.clone(), f)).collect();

        let mut children_of: HashMap<FolderId, Vec<Folder>> = HashMap::new();
        let mut tops = Vec::new();
        for folder in by_id.values() {
            match folder.parent_id.folder_id() {
                Some(parent) if parent != &folder.id && by_id.contains_key(parent) => {
                    children_of
                        .entry(parent.clone())
                        .or_default()
                        .push(folder.clone());
                }
                _ => tops.push(folder.clone()),
            }
        }

        sort_siblings(&mut tops);
        let mut roots: Vec<FolderNode> = tops
            .into_iter()
            .map(|folder| attach(folder, &mut children_of))
            .collect();

        loop {
            children_of.retain(|_, children| !children.is_empty());
            let mut stranded: Vec<Folder> = children_of.values().flatten().cloned().collect();
            sort_siblings(&mut stranded);
            let Some(folder) = stranded.into_iter().next() else {
                break;
            };

            if let Some(siblings) = folder
                .parent_id
                .folder_id()
                .and_then(|parent| children_of.get_mut(parent))
            {
                siblings.retain(|f| f.id != folder.id);
            }
            warn!(folder_id = %folder.id, parent = %folder.parent_id, "Folder on a parent cycle shown as a root");
            roots.push(attach(folder, &mut children_of));
        }

        Self::from_roots(roots)
    }

    /// Whether the tree has no folders.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find a node by id anywhere in the tree.
    pub fn find(&self, id: &FolderId) -> Option<&FolderNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Every folder id in the tree, depth-first.
    pub fn ids(&self) -> Vec<FolderId> {
        let mut out = Vec::new();
        let mut stack: Vec<&FolderNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node.id.clone());
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

fn sort_siblings(folders: &mut [Folder]) {
    folders.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

/// Build the node for `folder`, consuming its children from `children_of`
/// so that each folder is placed at most once.
fn attach(folder: Folder, children_of: &mut HashMap<FolderId, Vec<Folder>>) -> FolderNode {
    let mut children = children_of.remove(&folder.id).unwrap_or_default();
    sort_siblings(&mut children);

    let mut node = FolderNode::leaf(folder);
    node.children = children
        .into_iter()
        .map(|child| attach(child, children_of))
        .collect();
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, name: &str, parent: &str) -> Folder {
        Folder {
            id: id.parse().unwrap(),
            name: name.to_string(),
            parent_id: parent.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_flat_nests_and_orders_children() {
        let tree = FolderTree::from_flat(vec![
            folder("c", "C", "a"),
            folder("a", "A", "ROOT"),
            folder("b", "B", "a"),
            folder("d", "D", "b"),
        ]);

        assert_eq!(tree.total_folders, 4);
        assert_eq!(tree.roots.len(), 1);
        let a = &tree.roots[0];
        let names: Vec<&str> = a.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(a.children[0].children[0].name, "D");
        assert_eq!(
            tree.ids().iter().map(|id| id.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "d", "c"]
        );
    }

    #[test]
    fn test_folder_with_parent_outside_set_becomes_root() {
        let tree = FolderTree::from_flat(vec![folder("b", "B", "a"), folder("x", "X", "ROOT")]);
        let names: Vec<&str> = tree.roots.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["B", "X"]);
        assert_eq!(tree.roots[0].parent_id, "a".parse().unwrap());
        assert!(tree.find(&"b".parse().unwrap()).is_some());
    }

    #[test]
    fn test_parent_cycle_is_broken_into_a_root() {
        let tree = FolderTree::from_flat(vec![
            folder("y", "Y", "x"),
            folder("x", "X", "y"),
            folder("z", "Z", "y"),
            folder("top", "Top", "ROOT"),
        ]);

        assert_eq!(tree.total_folders, 4);
        let names: Vec<&str> = tree.roots.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "X"]);

        let x = &tree.roots[1];
        assert_eq!(x.children.len(), 1);
        assert_eq!(x.children[0].name, "Y");
        let under_y: Vec<&str> = x.children[0].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(under_y, vec!["Z"]);
    }

    #[test]
    fn test_empty_input() {
        let tree = FolderTree::from_flat(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree, FolderTree::empty());
    }
}
