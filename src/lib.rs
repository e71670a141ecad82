//! In-memory forest index for hierarchical grid data.
//!
//! A flat batch of parent-referencing items is indexed twice: by id, and by a
//! reverse parent-to-children adjacency map. Hierarchy queries (children,
//! descendants, ancestor chain) and structural mutation (insert, wholesale
//! update, delete-with-subtree) keep both maps consistent within every call.

pub mod cli;
pub mod display;
pub mod errors;
pub mod item;
pub mod store;
pub mod util;

pub use display::{data_path, ForestConvert};
pub use errors::{TreeResult, TreeStoreError};
pub use item::{NodeId, ParentRef, Row, TreeItem};
pub use store::TreeStore;
