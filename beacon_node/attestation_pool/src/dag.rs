use types::{AttestationData, Epoch, EthSpec, Hash256, Slot};

/// The append-only chain DAG this pool reads against. Out of scope for this crate: block
/// and state storage, committee/shuffling derivation, and execution-payload hash bookkeeping all
/// live on the implementor. The pool only ever reads through this trait; it never owns a DAG.
pub trait ChainDag<E: EthSpec> {
    /// A cheap handle to a known block (e.g. an index into the implementor's block store).
    type BlockRef: Clone + PartialEq;
    /// A cheap handle to a derived `(committee shuffling, proposer schedule)` view at some epoch.
    type EpochRef: Clone;
    /// The beacon state type attestations are checked against during packing.
    type State;

    /// The slot a proposing state is building at.
    fn state_slot(&self, state: &Self::State) -> Slot;

    fn get_finalized_epoch_ref(&self) -> Self::EpochRef;

    fn get_epoch_ref(
        &self,
        block_ref: &Self::BlockRef,
        epoch: Epoch,
        prefer_finalized: bool,
    ) -> Option<Self::EpochRef>;

    fn get_block_ref(&self, root: Hash256) -> Option<Self::BlockRef>;

    fn at_slot(&self, block_ref: &Self::BlockRef, slot: Slot) -> Option<Self::BlockRef>;

    fn block_root(&self, block_ref: &Self::BlockRef) -> Hash256;

    fn head(&self) -> Self::BlockRef;

    fn finalized_head(&self) -> Self::BlockRef;

    fn load_execution_block_hash(&self, block_ref: &Self::BlockRef) -> Option<Hash256>;

    /// The shuffling-defining root a state at `epoch` depends on. Two states attest compatibly at
    /// `epoch` iff their dependent roots agree.
    fn dependent_root(&self, state: &Self::State, epoch: Epoch) -> Hash256;

    /// `true` iff `data`'s committee assignment is valid against `state` (committee membership,
    /// committee length, and any other protocol-level well-formedness check outside this pool's
    /// concern).
    fn check_attestation(&self, state: &Self::State, data: &AttestationData, bits_len: usize) -> bool;

    /// `true` iff the shuffling `data.target` was computed under matches `state`'s view: resolve
    /// the block at `data.target.root`, walk to the dependency slot for `data.target.epoch`, and
    /// compare its root to `state`'s own dependent root for that epoch.
    fn check_attestation_compatible(
        &self,
        state: &Self::State,
        target_epoch: Epoch,
        target_root: Hash256,
    ) -> bool;
}

/// Append-only holding area for block roots referenced by attestations or head resolution that
/// the DAG does not yet know about.
pub trait Quarantine {
    fn add_missing(&mut self, root: Hash256);
}
