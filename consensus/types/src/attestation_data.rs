use crate::{hash32_concat, Checkpoint, Hash256, Slot};
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

/// The canonical vote payload carried by every attestation, electra or otherwise. Opaque
/// protocol content as far as the pool is concerned: it is hashed, compared and forwarded, never
/// interpreted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode, TreeHash,
)]
pub struct AttestationData {
    pub slot: Slot,
    /// Pre-electra: the committee index this vote was cast for. Post-electra this field is
    /// always zero on the wire; the real committee index lives in `committee_bits` on the
    /// attestation and is extracted into `Entry::data.index` by the pool (see
    /// [`crate::attestation_data::AttestationData::with_index_zeroed`]).
    pub index: u64,
    pub beacon_block_root: Hash256,
    pub source: Checkpoint,
    pub target: Checkpoint,
}

impl AttestationData {
    /// The phase0 vote fingerprint: the plain tree-hash root of the data.
    pub fn phase0_fingerprint(&self) -> Hash256 {
        self.tree_hash_root()
    }

    /// The electra vote fingerprint:
    /// `hash_tree_root([hash_tree_root(data_with_index_zeroed), hash_tree_root(committee_index_u64)])`.
    ///
    /// Two electra attestations with the same vote content but different committee indices are
    /// deliberately made to produce *different* entries, because electra committees are voted on
    /// independently even when the rest of the vote is identical.
    pub fn electra_fingerprint(&self, committee_index: u64) -> Hash256 {
        let data_root = self.with_index_zeroed().tree_hash_root();
        let index_root = committee_index.tree_hash_root();
        hash32_concat(&data_root, &index_root)
    }

    /// Returns a copy of `self` with `index` zeroed, as required before computing the electra
    /// vote fingerprint or serializing an electra on-wire attestation.
    pub fn with_index_zeroed(&self) -> Self {
        Self { index: 0, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(index: u64) -> AttestationData {
        AttestationData {
            slot: Slot::new(10),
            index,
            beacon_block_root: Hash256::repeat_byte(7),
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    #[test]
    fn phase0_fingerprint_ignores_nothing() {
        // Phase0 fingerprints differ if `index` differs: the committee index is part of the
        // hashed struct for the phase0 schema.
        assert_ne!(data(0).phase0_fingerprint(), data(1).phase0_fingerprint());
    }

    #[test]
    fn electra_fingerprint_is_index_sensitive_but_data_invariant() {
        let d = data(0);
        assert_ne!(
            d.electra_fingerprint(0),
            d.electra_fingerprint(1),
            "two electra votes for different committees must never collide"
        );
        // Changing the unused `index` field on the struct itself has no effect once zeroed.
        assert_eq!(data(0).electra_fingerprint(3), data(5).electra_fingerprint(3));
    }
}
