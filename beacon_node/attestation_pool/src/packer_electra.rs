use crate::entry::materialize_attestation;
use crate::packer::greedy_select;
use crate::{CandidateRing, ChainDag, CoverageCache, Schema};
use std::collections::HashMap;
use tree_hash::TreeHash;
use types::{
    AggregationBits, Attestation, AttestationElectra, ChainSpec, CommitteeBits, EthSpec, Hash256,
    Slot,
};

/// Why a group of same-vote, disjoint-committee attestations could not be consolidated into one
/// on-chain aggregate. Either case causes the whole group to be dropped rather than
/// propagated as an error.
#[derive(Debug)]
enum MergeError {
    OverlappingCommittees,
    CombinedBitsExceedCapacity,
}

/// Greedy max-coverage block packing for the electra schema: candidates are drawn from up
/// to `MAX_ATTESTATIONS_ELECTRA * MAX_COMMITTEES_PER_SLOT` scored aggregates, then attestations
/// sharing the same vote and slot but different committees are merged into a single cross-
/// committee attestation before the final `MAX_ATTESTATIONS_ELECTRA` cap is applied.
pub fn pack_electra<E, D>(
    ring: &mut CandidateRing<E>,
    dag: &D,
    state: &D::State,
    spec: &ChainSpec,
) -> Vec<Attestation<E>>
where
    E: EthSpec,
    D: ChainDag<E>,
{
    let proposing_slot = dag.state_slot(state);
    if proposing_slot.as_u64() < spec.min_attestation_inclusion_delay {
        return Vec::new();
    }
    let max_att_slot = proposing_slot - Slot::new(spec.min_attestation_inclusion_delay);

    let mut coverage = CoverageCache::<E>::new();
    let mut candidates = Vec::new();
    let intermediate_cap = spec.max_attestations_electra * spec.max_committees_per_slot;

    'slots: for i in 0..spec.attestation_lookback() as u64 {
        let slot = match max_att_slot.checked_sub(Slot::new(i)) {
            Some(slot) => slot,
            None => break,
        };
        let Some(index) = ring.candidate_index(slot) else {
            continue;
        };
        for entry in ring.bucket_mut(index).values_mut() {
            entry.update_aggregates();
        }
        for entry in ring.bucket(index).values() {
            for validation in entry.aggregates() {
                let attestation = materialize_attestation(&entry.data, validation, Schema::Electra);
                if !dag.check_attestation_compatible(state, entry.data.target.epoch, entry.data.target.root)
                {
                    continue;
                }
                if !dag.check_attestation(state, &entry.data, validation.aggregation_bits.len()) {
                    continue;
                }
                let score = coverage.score(&entry.data, &validation.aggregation_bits);
                if score <= 0 {
                    continue;
                }
                candidates.push(crate::packer::Candidate::new(
                    score,
                    slot,
                    entry.data.index,
                    attestation,
                ));
                if candidates.len() >= intermediate_cap {
                    break 'slots;
                }
            }
        }
    }

    let selected = greedy_select(candidates, intermediate_cap, &mut coverage);
    let consolidated = consolidate(selected);
    consolidated.into_iter().take(spec.max_attestations_electra).collect()
}

/// Groups `selected` by `(hash_tree_root(data), slot)` and merges each group via
/// [`compute_on_chain_aggregate`], dropping any group that fails to merge. `data.index` is
/// already zero on every materialized electra attestation, so no further zeroing is needed here.
fn consolidate<E: EthSpec>(selected: Vec<Attestation<E>>) -> Vec<Attestation<E>> {
    let mut groups: HashMap<(Hash256, Slot), Vec<AttestationElectra<E>>> = HashMap::new();
    for attestation in selected {
        if let Attestation::Electra(att) = attestation {
            let key = (att.data.tree_hash_root(), att.data.slot);
            groups.entry(key).or_default().push(att);
        }
    }

    groups
        .into_values()
        .filter_map(|group| compute_on_chain_aggregate(group).ok())
        .map(Attestation::Electra)
        .collect()
}

/// The single committee index an electra attestation's singleton `committee_bits` points at.
/// Ingestion guarantees this singleton property; an attestation already resident in the pool
/// never violates it.
fn committee_index_of<E: EthSpec>(bits: &CommitteeBits<E>) -> Option<usize> {
    bits.iter().position(|bit| bit)
}

/// Collapses `group` to at most one attestation per committee index, keeping whichever covers the
/// most voters. Greedy selection can pick more than one antichain aggregate from the same entry
/// (same committee) when each still adds new coverage; the cross-committee merge below can only
/// take a single bitset per committee, so any such duplicates are resolved here rather than
/// rejected as an overlap.
fn best_per_committee<E: EthSpec>(group: Vec<AttestationElectra<E>>) -> Vec<AttestationElectra<E>> {
    let mut best: HashMap<usize, AttestationElectra<E>> = HashMap::new();
    for att in group {
        let Some(committee) = committee_index_of(&att.committee_bits) else {
            continue;
        };
        best.entry(committee)
            .and_modify(|existing| {
                if att.aggregation_bits.num_set_bits() > existing.aggregation_bits.num_set_bits() {
                    *existing = att.clone();
                }
            })
            .or_insert(att);
    }
    best.into_values().collect()
}

/// Merges attestations that vote identically but were aggregated independently per committee
/// into one electra attestation with more than one bit set in `committee_bits`.
fn compute_on_chain_aggregate<E: EthSpec>(
    group: Vec<AttestationElectra<E>>,
) -> Result<AttestationElectra<E>, MergeError> {
    let mut group = best_per_committee(group);
    group.sort_by_key(|a| committee_index_of(&a.committee_bits).unwrap_or(usize::MAX));

    let mut committee_bits = CommitteeBits::<E>::new();
    let mut total_len = 0usize;
    for att in &group {
        let committee = committee_index_of(&att.committee_bits).ok_or(MergeError::OverlappingCommittees)?;
        if committee_bits.get(committee).unwrap_or(false) {
            return Err(MergeError::OverlappingCommittees);
        }
        committee_bits
            .set(committee, true)
            .map_err(|_| MergeError::OverlappingCommittees)?;
        total_len += att.aggregation_bits.len();
    }

    let mut combined_bits = AggregationBits::<E>::with_capacity(total_len)
        .map_err(|_| MergeError::CombinedBitsExceedCapacity)?;
    let mut signature = group[0].signature.clone();
    let mut offset = 0;
    for (i, att) in group.iter().enumerate() {
        for (j, bit) in att.aggregation_bits.iter().enumerate() {
            if bit {
                combined_bits
                    .set(offset + j, true)
                    .map_err(|_| MergeError::CombinedBitsExceedCapacity)?;
            }
        }
        offset += att.aggregation_bits.len();
        if i > 0 {
            signature.merge(&att.signature);
        }
    }

    let first = &group[0];
    Ok(AttestationElectra {
        aggregation_bits: combined_bits,
        committee_bits,
        data: first.data,
        signature,
    })
}
