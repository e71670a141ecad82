//! The forest index: id lookups plus a reverse parent-to-children index.

use std::collections::{HashMap, HashSet};

use tracing::instrument;

use crate::errors::{TreeResult, TreeStoreError};
use crate::item::{NodeId, ParentRef, TreeItem};

/// In-memory index over a flat batch of parent-referencing items.
///
/// Two maps kept in lockstep: `items_by_id` is the system of record for item
/// contents, `children_by_parent` is the derived reverse adjacency index. The
/// root sentinel is a valid key holding all top-level ids.
///
/// Parent references form a forest by convention, not by enforcement: no
/// cycle detection runs on mutation, and traversals assume acyclicity.
/// Callers that need the guard run [`TreeStore::check_reparent`] before
/// [`TreeStore::update_item`].
///
/// Single-threaded by design. A host sharing the store across threads must
/// serialize access externally.
#[derive(Debug, Clone)]
pub struct TreeStore<T> {
    items_by_id: HashMap<NodeId, T>,
    children_by_parent: HashMap<ParentRef, HashSet<NodeId>>,
}

impl<T> Default for TreeStore<T> {
    fn default() -> Self {
        Self {
            items_by_id: HashMap::new(),
            children_by_parent: HashMap::new(),
        }
    }
}

impl<T: TreeItem> TreeStore<T> {
    /// Builds the index from an initial batch, inserting in iteration order.
    ///
    /// Aborts with [`TreeStoreError::DuplicateId`] on the first repeated id.
    #[instrument(level = "debug", skip(items))]
    pub fn new(items: impl IntoIterator<Item = T>) -> TreeResult<Self> {
        let mut store = Self::default();
        for item in items {
            store.add_item(item)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.items_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_by_id.is_empty()
    }

    /// Snapshot copy of every stored item, order unspecified.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all(&self) -> Vec<T> {
        self.items_by_id.values().cloned().collect()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_item(&self, id: &NodeId) -> Option<&T> {
        self.items_by_id.get(id)
    }

    /// Direct children of `parent`, order unspecified. Empty if `parent` is
    /// unknown or has none.
    #[instrument(level = "trace", skip(self))]
    pub fn get_children(&self, parent: &ParentRef) -> Vec<&T> {
        match self.children_by_parent.get(parent) {
            Some(children) => children
                .iter()
                .filter_map(|id| self.items_by_id.get(id))
                .collect(),
            None => Vec::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn has_children(&self, parent: &ParentRef) -> bool {
        self.children_by_parent
            .get(parent)
            .is_some_and(|children| !children.is_empty())
    }

    /// Every descendant of `parent`, direct and transitive, order
    /// unspecified. Walks the reverse index with an explicit stack; does not
    /// terminate if a cycle is reachable from `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all_children(&self, parent: &ParentRef) -> Vec<&T> {
        let mut result = Vec::new();
        let mut stack = self.get_children(parent);

        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.get_children(&ParentRef::Node(current.id().clone())));
        }

        result
    }

    /// Ancestor chain `[item, parent, grandparent, .., root-level item]`.
    ///
    /// Unknown ids yield an empty chain; a known item whose parent is missing
    /// yields a one-element chain. Does not terminate on a cyclic chain.
    #[instrument(level = "trace", skip(self))]
    pub fn get_all_parents(&self, id: &NodeId) -> Vec<&T> {
        let mut chain = Vec::new();
        let mut current = self.items_by_id.get(id);

        while let Some(item) = current {
            chain.push(item);
            current = match item.parent() {
                ParentRef::Root => None,
                ParentRef::Node(parent_id) => self.items_by_id.get(parent_id),
            };
        }

        chain
    }

    /// Inserts a new item, registering it under its parent in the reverse
    /// index.
    ///
    /// A parent that does not (yet) exist is legal: the item stays invisible
    /// to traversals rooted above the gap until the parent arrives.
    #[instrument(level = "debug", skip(self, item))]
    pub fn add_item(&mut self, item: T) -> TreeResult<()> {
        if self.items_by_id.contains_key(item.id()) {
            return Err(TreeStoreError::DuplicateId(item.id().clone()));
        }

        self.attach(item.parent().clone(), item.id().clone());
        self.items_by_id.insert(item.id().clone(), item);
        Ok(())
    }

    /// Replaces a stored item wholesale; a full replace, not a patch.
    ///
    /// On a parent change the reverse index moves the id from the old child
    /// set to the new one. No cycle check runs here; that is
    /// [`TreeStore::check_reparent`], opt-in.
    #[instrument(level = "debug", skip(self, item))]
    pub fn update_item(&mut self, item: T) -> TreeResult<()> {
        let old_parent = match self.items_by_id.get(item.id()) {
            Some(existing) => existing.parent().clone(),
            None => return Err(TreeStoreError::UnknownId(item.id().clone())),
        };

        if *item.parent() != old_parent {
            self.detach(&old_parent, item.id())?;
            self.attach(item.parent().clone(), item.id().clone());
        }
        self.items_by_id.insert(item.id().clone(), item);
        Ok(())
    }

    /// Removes an item together with its entire descendant subtree.
    ///
    /// Detaches the item from its parent's child set first, snapshots the
    /// descendant set, then deletes every victim from both maps.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_item(&mut self, id: &NodeId) -> TreeResult<()> {
        let parent = match self.items_by_id.get(id) {
            Some(item) => item.parent().clone(),
            None => return Err(TreeStoreError::UnknownId(id.clone())),
        };

        self.detach(&parent, id)?;

        let doomed: Vec<NodeId> = self
            .get_all_children(&ParentRef::Node(id.clone()))
            .iter()
            .map(|item| item.id().clone())
            .collect();

        for victim in doomed.iter().chain(std::iter::once(id)) {
            self.items_by_id.remove(victim);
            self.children_by_parent.remove(&ParentRef::Node(victim.clone()));
        }
        Ok(())
    }

    /// Opt-in cycle guard for a prospective reparent of `id` under
    /// `new_parent`.
    ///
    /// Walks from `new_parent` toward the root and fails with
    /// [`TreeStoreError::CycleDetected`] if `id` is encountered. The walk is
    /// bounded by the store size, so it terminates even over an already
    /// cyclic graph.
    #[instrument(level = "debug", skip(self))]
    pub fn check_reparent(&self, id: &NodeId, new_parent: &ParentRef) -> TreeResult<()> {
        let mut cursor = new_parent.clone();
        let mut hops = 0usize;

        while let ParentRef::Node(ancestor) = cursor {
            if ancestor == *id {
                return Err(TreeStoreError::CycleDetected {
                    id: id.clone(),
                    parent: new_parent.clone(),
                });
            }
            hops += 1;
            if hops > self.items_by_id.len() {
                break;
            }
            cursor = match self.items_by_id.get(&ancestor) {
                Some(item) => item.parent().clone(),
                None => ParentRef::Root,
            };
        }
        Ok(())
    }

    fn attach(&mut self, parent: ParentRef, child: NodeId) {
        self.children_by_parent.entry(parent).or_default().insert(child);
    }

    fn detach(&mut self, parent: &ParentRef, child: &NodeId) -> TreeResult<()> {
        let removed = self
            .children_by_parent
            .get_mut(parent)
            .is_some_and(|children| children.remove(child));

        if removed {
            Ok(())
        } else {
            Err(TreeStoreError::InconsistentChildSet {
                child: child.clone(),
                parent: parent.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Row;

    fn store() -> TreeStore<Row> {
        TreeStore::new([
            Row::new(1, ParentRef::Root),
            Row::new(2, NodeId::Int(1)),
            Row::new(3, NodeId::Int(1)),
            Row::new(4, NodeId::Int(2)),
        ])
        .expect("seed batch has unique ids")
    }

    #[test]
    fn test_every_id_sits_in_exactly_one_child_set() {
        let store = store();
        for item in store.get_all() {
            let holders = store
                .children_by_parent
                .iter()
                .filter(|(_, children)| children.contains(item.id()))
                .count();
            assert_eq!(holders, 1, "id {} must have exactly one parent slot", item.id());
        }
    }

    #[test]
    fn test_detach_on_corrupt_index_reports_inconsistency() {
        let mut store = store();
        // Simulate a prior invariant violation.
        store
            .children_by_parent
            .get_mut(&ParentRef::Node(NodeId::Int(1)))
            .unwrap()
            .remove(&NodeId::Int(2));

        let err = store.remove_item(&NodeId::Int(2)).unwrap_err();
        assert!(matches!(err, TreeStoreError::InconsistentChildSet { .. }));
    }

    #[test]
    fn test_remove_drops_parent_keys_of_victims() {
        let mut store = store();
        store.remove_item(&NodeId::Int(2)).unwrap();

        assert!(!store
            .children_by_parent
            .contains_key(&ParentRef::Node(NodeId::Int(2))));
        assert!(!store
            .children_by_parent
            .contains_key(&ParentRef::Node(NodeId::Int(4))));
    }
}
