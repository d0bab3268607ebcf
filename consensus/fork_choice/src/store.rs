use std::fmt::Debug;
use types::{Checkpoint, EthSpec, Hash256, Slot};

/// The scoring backend the pool drives. Treated as a black box: this crate never reimplements
/// LMD-GHOST or proto-array scoring, it only defines the surface the rest of the pool calls
/// through.
///
/// A concrete implementation owns the block DAG's weight bookkeeping; everything about *how* a
/// head is chosen lives behind `Self::Error` and these five calls.
pub trait ForkChoiceStore<E: EthSpec> {
    type Error: Debug;

    /// Registers a new block in the DAG the store scores over.
    fn process_block(
        &mut self,
        block_root: Hash256,
        parent_root: Hash256,
        block_slot: Slot,
        justified_checkpoint: Checkpoint,
        finalized_checkpoint: Checkpoint,
    ) -> Result<(), Self::Error>;

    /// Credits `attesting_indices`'s votes for `block_root` to the store's internal weights.
    fn on_attestation(
        &mut self,
        slot: Slot,
        block_root: Hash256,
        attesting_indices: &[u64],
        wall_slot: Slot,
    ) -> Result<(), Self::Error>;

    /// Resolves the current canonical head.
    fn get_head(&mut self, wall_slot: Slot) -> Result<Hash256, Self::Error>;

    /// The most recent block considered safe to build on without risk of being reorged away from,
    /// per the store's own safety threshold.
    fn get_safe_beacon_block_root(&self) -> Hash256;

    /// Discards bookkeeping for blocks at or before the current finalized checkpoint.
    fn prune(&mut self) -> Result<(), Self::Error>;
}
