use crate::{Error, ForkChoiceStore, InvalidAttestation};
use std::marker::PhantomData;
use types::{Checkpoint, EthSpec, Hash256, Slot};

/// Thin façade forwarding block and attestation events to a [`ForkChoiceStore`] and resolving
/// head queries, generic over the store implementation it drives.
pub struct ForkChoice<T, E> {
    fc_store: T,
    genesis_block_root: Hash256,
    _phantom: PhantomData<E>,
}

impl<T, E> ForkChoice<T, E>
where
    T: ForkChoiceStore<E>,
    E: EthSpec,
{
    pub fn new(fc_store: T, genesis_block_root: Hash256) -> Self {
        Self {
            fc_store,
            genesis_block_root,
            _phantom: PhantomData,
        }
    }

    pub fn store(&self) -> &T {
        &self.fc_store
    }

    pub fn store_mut(&mut self) -> &mut T {
        &mut self.fc_store
    }

    pub fn process_block(
        &mut self,
        block_root: Hash256,
        parent_root: Hash256,
        block_slot: Slot,
        justified_checkpoint: Checkpoint,
        finalized_checkpoint: Checkpoint,
    ) -> Result<(), Error<T::Error>> {
        self.fc_store
            .process_block(
                block_root,
                parent_root,
                block_slot,
                justified_checkpoint,
                finalized_checkpoint,
            )
            .map_err(Error::ForkChoiceStoreError)
    }

    pub fn on_attestation(
        &mut self,
        slot: Slot,
        block_root: Hash256,
        attesting_indices: &[u64],
        wall_slot: Slot,
    ) -> Result<(), Error<T::Error>> {
        if attesting_indices.is_empty() {
            return Err(InvalidAttestation::EmptyAttestingIndices.into());
        }
        self.fc_store
            .on_attestation(slot, block_root, attesting_indices, wall_slot)
            .map_err(Error::ForkChoiceStoreError)
    }

    /// Resolves the current head. Returns `UnknownHeadBlock` rather than bubbling an opaque store
    /// error when the store itself reports the head resolved to a root it no longer tracks; the
    /// pool's adapter treats that case specially.
    pub fn get_head(&mut self, wall_slot: Slot) -> Result<Hash256, Error<T::Error>> {
        self.fc_store
            .get_head(wall_slot)
            .map_err(Error::ForkChoiceStoreError)
    }

    pub fn get_safe_beacon_block_root(&self) -> Hash256 {
        self.fc_store.get_safe_beacon_block_root()
    }

    pub fn prune(&mut self) -> Result<(), Error<T::Error>> {
        self.fc_store.prune().map_err(Error::ForkChoiceStoreError)
    }

    pub fn genesis_block_root(&self) -> Hash256 {
        self.genesis_block_root
    }
}
