use crate::Schema;
use bls::{AggregateSignature, CookedSignature};
use std::collections::HashMap;
use types::{
    AggregationBits, Attestation, AttestationBase, AttestationData, AttestationElectra,
    BitfieldExt, CommitteeBits, EthSpec, Validation,
};

/// A single distinct `AttestationData` (plus, for electra, the committee index extracted from
/// `committee_bits` on ingress) and every vote known for it.
///
/// `singles` and `aggregates` are deliberately never pruned of each other: a single is retained
/// even after it has been folded into an aggregate, because a later aggregate may need topping up
/// from the same single.
#[derive(Debug, Clone)]
pub struct Entry<E: EthSpec> {
    pub data: AttestationData,
    pub committee_len: usize,
    singles: HashMap<usize, CookedSignature>,
    aggregates: Vec<Validation<E>>,
}

impl<E: EthSpec> Entry<E> {
    pub fn new(data: AttestationData, committee_len: usize) -> Self {
        Self {
            data,
            committee_len,
            singles: HashMap::new(),
            aggregates: Vec::new(),
        }
    }

    pub fn aggregates(&self) -> &[Validation<E>] {
        &self.aggregates
    }

    pub fn num_singles(&self) -> usize {
        self.singles.len()
    }

    /// Folds a newly-verified vote in. Returns `true` iff it added information the entry did not
    /// already have.
    pub fn insert(&mut self, bits: &AggregationBits<E>, cooked_sig: CookedSignature) -> bool {
        match bits.single_set_bit() {
            Some(i) => {
                if self.singles.contains_key(&i) {
                    false
                } else {
                    self.singles.insert(i, cooked_sig);
                    true
                }
            }
            None => {
                if self.covers(bits) {
                    return false;
                }
                self.aggregates
                    .retain(|v| !v.aggregation_bits.is_subset_of(bits));
                self.aggregates
                    .push(Validation::new(bits.clone(), AggregateSignature::init(&cooked_sig)));
                true
            }
        }
    }

    /// `true` iff some existing aggregate already covers every voter in `bits`.
    pub fn covers(&self, bits: &AggregationBits<E>) -> bool {
        self.aggregates
            .iter()
            .any(|v| v.aggregation_bits.is_superset_of(bits))
    }

    /// Folds `singles` into the aggregate set, creating one from scratch if none exist yet, then
    /// re-establishes the antichain invariant if anything changed.
    pub fn update_aggregates(&mut self) {
        if self.singles.is_empty() {
            return;
        }

        if self.aggregates.is_empty() {
            let mut bits = AggregationBits::<E>::with_capacity(self.committee_len)
                .expect("committee_len is within MaxValidatorsPerCommittee");
            let mut agg_sig = AggregateSignature::infinity();
            for (&i, sig) in self.singles.iter() {
                bits.set(i, true).expect("i < committee_len");
                agg_sig.aggregate(sig);
            }
            self.aggregates.push(Validation::new(bits, agg_sig));
            return;
        }

        let mut changed = false;
        for validation in self.aggregates.iter_mut() {
            for (&i, sig) in self.singles.iter() {
                if !validation.aggregation_bits.get(i).unwrap_or(false) {
                    validation
                        .aggregation_bits
                        .set(i, true)
                        .expect("i < committee_len");
                    validation.aggregate_signature.aggregate(sig);
                    changed = true;
                }
            }
        }

        if changed {
            self.restore_antichain();
        }
    }

    /// Drops every aggregate whose bits are a proper subset of another's, or whose bits equal an
    /// earlier aggregate's (keeping the lower index of the pair). Quadratic, but the aggregate
    /// count per entry is bounded by protocol constants.
    fn restore_antichain(&mut self) {
        let n = self.aggregates.len();
        let mut keep = vec![true; n];
        for i in 0..n {
            for j in 0..n {
                if i == j || !keep[i] {
                    continue;
                }
                let bits_i = &self.aggregates[i].aggregation_bits;
                let bits_j = &self.aggregates[j].aggregation_bits;
                if bits_i == bits_j {
                    if i > j {
                        keep[i] = false;
                    }
                } else if bits_i.is_subset_of(bits_j) {
                    keep[i] = false;
                }
            }
        }
        let mut keep = keep.into_iter();
        self.aggregates.retain(|_| keep.next().unwrap_or(true));
    }

    /// Materializes `validation` as an on-wire attestation of the given schema.
    pub fn to_attestation(&self, validation: &Validation<E>, schema: Schema) -> Attestation<E> {
        materialize_attestation(&self.data, validation, schema)
    }

    /// One `Validation` per recorded single voter, each a singleton bitset over a fresh
    /// one-signature aggregate. Used by iteration; does not mutate `self.aggregates`.
    pub fn singles_snapshot(&self) -> Vec<Validation<E>> {
        self.singles
            .iter()
            .map(|(&i, sig)| {
                let mut bits = AggregationBits::<E>::with_capacity(self.committee_len)
                    .expect("committee_len is within MaxValidatorsPerCommittee");
                bits.set(i, true).expect("i < committee_len");
                Validation::new(bits, AggregateSignature::init(sig))
            })
            .collect()
    }
}

/// Builds an on-wire attestation from a vote's `data` and one of its `Validation`s. For electra,
/// `committee_bits` is set to the singleton bit for `data.index` and `data.index` itself is
/// zeroed on the emitted `AttestationData`, matching how the committee index travels out-of-band
/// post-upgrade.
pub fn materialize_attestation<E: EthSpec>(
    data: &AttestationData,
    validation: &Validation<E>,
    schema: Schema,
) -> Attestation<E> {
    match schema {
        Schema::Base => Attestation::Base(AttestationBase {
            aggregation_bits: validation.aggregation_bits.clone(),
            data: *data,
            signature: validation.aggregate_signature.clone(),
        }),
        Schema::Electra => {
            let mut committee_bits = CommitteeBits::<E>::new();
            committee_bits
                .set(data.index as usize, true)
                .expect("committee index is within MaxCommitteesPerSlot");
            Attestation::Electra(AttestationElectra {
                aggregation_bits: validation.aggregation_bits.clone(),
                committee_bits,
                data: data.with_index_zeroed(),
                signature: validation.aggregate_signature.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls::generate_deterministic_keypair;
    use types::{Checkpoint, Hash256, MinimalEthSpec, Slot};

    type E = MinimalEthSpec;

    fn data() -> AttestationData {
        AttestationData {
            slot: Slot::new(10),
            index: 0,
            beacon_block_root: Hash256::repeat_byte(1),
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    fn singleton_bits(committee_len: usize, i: usize) -> AggregationBits<E> {
        let mut bits = AggregationBits::<E>::with_capacity(committee_len).unwrap();
        bits.set(i, true).unwrap();
        bits
    }

    fn multi_bits(committee_len: usize, set: &[usize]) -> AggregationBits<E> {
        let mut bits = AggregationBits::<E>::with_capacity(committee_len).unwrap();
        for &i in set {
            bits.set(i, true).unwrap();
        }
        bits
    }

    fn cooked(seed: u64) -> bls::CookedSignature {
        let (sk, _pk) = generate_deterministic_keypair(seed);
        sk.sign(b"vote").into()
    }

    #[test]
    fn dedup_single() {
        let mut entry = Entry::<E>::new(data(), 64);
        let bits = singleton_bits(64, 5);
        assert!(entry.insert(&bits, cooked(5)));
        assert!(!entry.insert(&bits, cooked(5)), "duplicate single is a no-op");
        assert_eq!(entry.num_singles(), 1);
        assert!(entry.aggregates().is_empty());

        entry.update_aggregates();
        assert_eq!(entry.aggregates().len(), 1);
        assert_eq!(entry.aggregates()[0].aggregation_bits.num_set_bits(), 1);
    }

    #[test]
    fn promote_singles_then_top_up() {
        let mut entry = Entry::<E>::new(data(), 64);
        for i in [1usize, 3, 7] {
            assert!(entry.insert(&singleton_bits(64, i), cooked(i as u64)));
        }
        entry.update_aggregates();
        assert_eq!(entry.aggregates().len(), 1);
        assert_eq!(entry.aggregates()[0].aggregation_bits.num_set_bits(), 3);

        assert!(entry.insert(&singleton_bits(64, 2), cooked(2)));
        entry.update_aggregates();
        assert_eq!(entry.aggregates().len(), 1);
        assert_eq!(entry.aggregates()[0].aggregation_bits.num_set_bits(), 4);
        assert_eq!(entry.num_singles(), 4);
    }

    #[test]
    fn subset_suppression() {
        let mut entry = Entry::<E>::new(data(), 8);
        assert!(entry.insert(&multi_bits(8, &[0, 1, 2]), cooked(1)));
        assert!(entry.insert(&multi_bits(8, &[0, 1, 2, 3]), cooked(2)));
        assert_eq!(entry.aggregates().len(), 1);
        assert_eq!(entry.aggregates()[0].aggregation_bits.num_set_bits(), 4);

        assert!(
            !entry.insert(&multi_bits(8, &[0, 1, 2]), cooked(3)),
            "re-inserting a covered aggregate is a no-op"
        );
        assert_eq!(entry.aggregates().len(), 1);
    }

    #[test]
    fn antichain_kept() {
        let mut entry = Entry::<E>::new(data(), 8);
        assert!(entry.insert(&multi_bits(8, &[0, 1]), cooked(1)));
        assert!(entry.insert(&multi_bits(8, &[2, 3]), cooked(2)));
        assert!(entry.insert(&multi_bits(8, &[0, 2]), cooked(3)));
        assert_eq!(entry.aggregates().len(), 3);
    }
}
