use thiserror::Error;

use crate::item::{NodeId, ParentRef};

#[derive(Error, Debug)]
pub enum TreeStoreError {
    #[error("item with id {0} already exists")]
    DuplicateId(NodeId),

    #[error("item with id {0} does not exist")]
    UnknownId(NodeId),

    /// Defensive check only: the reverse index did not hold a child it must
    /// hold. Signals a prior invariant violation, not a recoverable state.
    #[error("{child} is not a child of {parent}")]
    InconsistentChildSet { child: NodeId, parent: ParentRef },

    #[error("reparenting {id} under {parent} would create a cycle")]
    CycleDetected { id: NodeId, parent: ParentRef },
}

pub type TreeResult<T> = Result<T, TreeStoreError>;
