//! Presentation boundary: termtree rendering and grid data paths.
//!
//! The index keeps child sets unordered; anything user-facing sorts here, by
//! id, and nowhere else.

use std::fmt;

use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::item::{NodeId, ParentRef, TreeItem};
use crate::store::TreeStore;

pub trait ForestConvert {
    /// One rendered tree per root-level item, roots and siblings sorted by id.
    fn to_tree_strings(&self) -> Vec<Tree<String>>;
}

impl<T: TreeItem + fmt::Display> ForestConvert for TreeStore<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_strings(&self) -> Vec<Tree<String>> {
        self.get_children(&ParentRef::Root)
            .into_iter()
            .sorted_by(|a, b| a.id().cmp(b.id()))
            .map(|root| subtree(self, root))
            .collect()
    }
}

fn subtree<T: TreeItem + fmt::Display>(store: &TreeStore<T>, item: &T) -> Tree<String> {
    let leaves: Vec<_> = store
        .get_children(&ParentRef::Node(item.id().clone()))
        .into_iter()
        .sorted_by(|a, b| a.id().cmp(b.id()))
        .map(|child| subtree(store, child))
        .collect();

    Tree::new(item.to_string()).with_leaves(leaves)
}

/// Root-to-leaf chain of stringified ids for `id`, the path a hierarchical
/// grid feeds its row grouping. Empty when `id` is unknown.
#[instrument(level = "debug", skip(store))]
pub fn data_path<T: TreeItem>(store: &TreeStore<T>, id: &NodeId) -> Vec<String> {
    store
        .get_all_parents(id)
        .iter()
        .rev()
        .map(|item| item.id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Row;

    #[test]
    fn test_data_path_runs_root_to_leaf() {
        let store = TreeStore::new([
            Row::new(1, ParentRef::Root),
            Row::new(2, NodeId::Int(1)),
            Row::new(4, NodeId::Int(2)),
        ])
        .unwrap();

        assert_eq!(data_path(&store, &NodeId::Int(4)), vec!["1", "2", "4"]);
        assert!(data_path(&store, &NodeId::Int(99)).is_empty());
    }
}
