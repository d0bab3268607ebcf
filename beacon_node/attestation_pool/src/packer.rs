use crate::entry::materialize_attestation;
use crate::{CandidateRing, ChainDag, CoverageCache, Schema};
use types::{Attestation, ChainSpec, EthSpec, Slot};

/// A scored packing candidate: one `Validation` within one `Entry`, already materialized as an
/// attestation so the greedy loop never has to re-touch the ring.
pub(crate) struct Candidate<E: EthSpec> {
    score: i64,
    slot: Slot,
    committee_index: u64,
    attestation: Attestation<E>,
}

impl<E: EthSpec> Candidate<E> {
    pub(crate) fn new(score: i64, slot: Slot, committee_index: u64, attestation: Attestation<E>) -> Self {
        Self {
            score,
            slot,
            committee_index,
            attestation,
        }
    }
}

/// Greedy max-coverage block packing for the phase0 schema: ≤ `spec.max_attestations`
/// attestations, selected by largest marginal coverage gain, ties broken by more recent slot.
pub fn pack_phase0<E, D>(
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

    for i in 0..spec.attestation_lookback() as u64 {
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
                let attestation = materialize_attestation(&entry.data, validation, Schema::Base);
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
                candidates.push(Candidate {
                    score,
                    slot,
                    committee_index: entry.data.index,
                    attestation,
                });
            }
        }
    }

    greedy_select(candidates, spec.max_attestations, &mut coverage)
}

/// Shared greedy selection loop for both schemas: repeatedly take the
/// highest-scoring remaining candidate, credit its voters to `coverage`, then drop or re-score
/// every candidate sharing its `(slot, committee_index)` key.
pub(crate) fn greedy_select<E: EthSpec>(
    mut candidates: Vec<Candidate<E>>,
    cap: usize,
    coverage: &mut CoverageCache<E>,
) -> Vec<Attestation<E>> {
    let mut result = Vec::new();

    while !candidates.is_empty() && result.len() < cap {
        let winner_pos = if candidates.len() <= cap - result.len() {
            candidates.len() - 1
        } else {
            candidates
                .iter()
                .enumerate()
                .max_by_key(|(_, c)| (c.score, c.slot))
                .map(|(i, _)| i)
                .expect("candidates is non-empty")
        };

        let winner = candidates.swap_remove(winner_pos);
        let bits = match &winner.attestation {
            Attestation::Base(a) => a.aggregation_bits.clone(),
            Attestation::Electra(a) => a.aggregation_bits.clone(),
        };
        // Credit by the candidate's own `(slot, committee_index)`, not the materialized
        // attestation's embedded data: electra zeroes `data.index` on the wire.
        coverage.add_keyed(winner.slot, winner.committee_index, &bits);

        candidates.retain_mut(|c| {
            if c.slot != winner.slot || c.committee_index != winner.committee_index {
                return true;
            }
            let b = match &c.attestation {
                Attestation::Base(a) => a.aggregation_bits.clone(),
                Attestation::Electra(a) => a.aggregation_bits.clone(),
            };
            c.score = coverage.score_keyed(c.slot, c.committee_index, &b);
            c.score > 0
        });

        result.push(winner.attestation);
    }

    result
}
