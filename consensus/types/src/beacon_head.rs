use crate::Hash256;

/// The result of a head-selection query: the chosen beacon block root plus the execution-layer
/// block hashes a consensus engine would advertise as `safe`/`finalized` in the next forkchoice
/// update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconHead {
    pub head: Hash256,
    pub safe_exec_block_hash: Hash256,
    pub finalized_exec_block_hash: Hash256,
}
