use types::{Epoch, Hash256, Slot};

/// Errors surfaced by [`crate::ForkChoice`]. Parameterized over the backing store's own error
/// type so a concrete store can report failures specific to its scoring algorithm without this
/// crate needing to know about them.
#[derive(Debug)]
pub enum Error<T> {
    InvalidAttestation(InvalidAttestation),
    InvalidBlock(InvalidBlock),
    /// The backing store rejected an operation.
    ForkChoiceStoreError(T),
    /// `get_head` resolved to a root the caller's chain DAG does not recognize.
    UnknownHeadBlock { beacon_block_root: Hash256 },
}

impl<T> From<InvalidAttestation> for Error<T> {
    fn from(e: InvalidAttestation) -> Self {
        Error::InvalidAttestation(e)
    }
}

impl<T> From<InvalidBlock> for Error<T> {
    fn from(e: InvalidBlock) -> Self {
        Error::InvalidBlock(e)
    }
}

#[derive(Debug)]
pub enum InvalidBlock {
    FutureSlot { present_slot: Slot, block_slot: Slot },
    UnknownParent { parent_root: Hash256 },
}

#[derive(Debug)]
pub enum InvalidAttestation {
    EmptyAttestingIndices,
    FutureEpoch { attestation_epoch: Epoch, current_epoch: Epoch },
    UnknownTargetRoot(Hash256),
}
