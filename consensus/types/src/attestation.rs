use crate::{AttestationData, EthSpec};
use bls::AggregateSignature;
use serde_derive::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use ssz_types::{BitList, BitVector};
use superstruct::superstruct;
use tree_hash_derive::TreeHash;

/// Aggregation bitfield: one bit per member of the committee the attestation was cast against,
/// for both schema variants. Sized by [`EthSpec::MaxValidatorsPerCommittee`].
pub type AggregationBits<E> = BitList<<E as EthSpec>::MaxValidatorsPerCommittee>;

/// Bitfield of committees represented by an electra attestation. A singleton on ingress; block
/// packing may merge several disjoint-committee attestations sharing the same vote into one
/// attestation with more than one bit set.
pub type CommitteeBits<E> = BitVector<<E as EthSpec>::MaxCommitteesPerSlot>;

/// A single non-overlapping aggregate vote held inside an `Entry`: the committee members whose
/// signature has been folded in, and the BLS sum of exactly those signatures.
///
/// Invariant: `aggregate_signature` equals the BLS sum of the committee members selected by
/// `aggregation_bits`. Nothing in this type enforces that on its own; callers that mutate
/// `aggregation_bits` are responsible for keeping `aggregate_signature` in lock-step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(bound = "E: EthSpec")]
pub struct Validation<E: EthSpec> {
    pub aggregation_bits: AggregationBits<E>,
    pub aggregate_signature: AggregateSignature,
}

impl<E: EthSpec> Validation<E> {
    pub fn new(aggregation_bits: AggregationBits<E>, aggregate_signature: AggregateSignature) -> Self {
        Self {
            aggregation_bits,
            aggregate_signature,
        }
    }
}

/// A validator's signed vote, in either the phase0 or electra on-wire schema.
///
/// The two schemas share `data` and `signature`; `committee_bits` exists only on `Electra`, where
/// it records which committee(s) the attached `aggregation_bits` span. The pool keeps one
/// `CandidateRing` per variant rather than erasing this distinction behind a single bitset type.
#[superstruct(
    variants(Base, Electra),
    variant_attributes(
        derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode, TreeHash),
        serde(bound = "E: EthSpec")
    )
)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
#[serde(bound = "E: EthSpec")]
pub struct Attestation<E: EthSpec> {
    pub aggregation_bits: AggregationBits<E>,
    #[superstruct(only(Electra), partial_getter(rename = "committee_bits_electra"))]
    pub committee_bits: CommitteeBits<E>,
    pub data: AttestationData,
    pub signature: AggregateSignature,
}

impl<E: EthSpec> Attestation<E> {
    pub fn is_electra(&self) -> bool {
        matches!(self, Attestation::Electra(_))
    }

    /// The single committee index this attestation's bits apply to, as extracted from
    /// `committee_bits` for electra or `data.index` for phase0. `None` if `committee_bits` is not
    /// a singleton, which callers must reject on ingress.
    pub fn committee_index(&self) -> Option<u64> {
        match self {
            Attestation::Base(att) => Some(att.data.index),
            Attestation::Electra(att) => single_committee_index::<E>(&att.committee_bits),
        }
    }
}

fn single_committee_index<E: EthSpec>(bits: &CommitteeBits<E>) -> Option<u64> {
    let mut found = None;
    for (i, bit) in bits.iter().enumerate() {
        if bit {
            if found.is_some() {
                return None;
            }
            found = Some(i as u64);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Checkpoint, Hash256, MinimalEthSpec, Slot};

    fn data() -> AttestationData {
        AttestationData {
            slot: Slot::new(1),
            index: 0,
            beacon_block_root: Hash256::zero(),
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    #[test]
    fn single_committee_index_requires_singleton() {
        let mut bits: CommitteeBits<MinimalEthSpec> = CommitteeBits::<MinimalEthSpec>::new();
        assert_eq!(single_committee_index::<MinimalEthSpec>(&bits), None);
        bits.set(2, true).unwrap();
        assert_eq!(single_committee_index::<MinimalEthSpec>(&bits), Some(2));
        bits.set(3, true).unwrap();
        assert_eq!(single_committee_index::<MinimalEthSpec>(&bits), None);
    }

    #[test]
    fn base_variant_reports_committee_index_from_data() {
        let att = AttestationBase::<MinimalEthSpec> {
            aggregation_bits: AggregationBits::<MinimalEthSpec>::with_capacity(4).unwrap(),
            data: data(),
            signature: AggregateSignature::infinity(),
        };
        let att = Attestation::Base(att);
        assert!(!att.is_electra());
        assert_eq!(att.committee_index(), Some(0));
    }
}
