use std::collections::HashMap;
use types::{AggregationBits, AttestationData, BitfieldExt, EthSpec, Slot};

/// Per-`(slot, committee_index)` bitmap of voters already credited by on-chain attestations in
/// the proposing state, used to score packing candidates by the *new* information they'd
/// add rather than raw vote count.
pub struct CoverageCache<E: EthSpec> {
    cache: HashMap<(Slot, u64), AggregationBits<E>>,
}

impl<E: EthSpec> CoverageCache<E> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Builds a cache from already-credited `(slot, committee_index, bits)` triples extracted
    /// from the proposing state. Extraction itself — walking pre-Altair pending-attestation lists
    /// versus Altair+ participation bitmaps — is the caller's job; this type only owns the
    /// resulting bitmap and the scoring arithmetic over it.
    pub fn build<I>(credited: I) -> Self
    where
        I: IntoIterator<Item = (Slot, u64, AggregationBits<E>)>,
    {
        let mut cache = Self::new();
        for (slot, index, bits) in credited {
            cache.add_raw(slot, index, &bits);
        }
        cache
    }

    pub fn add(&mut self, data: &AttestationData, bits: &AggregationBits<E>) {
        self.add_raw(data.slot, data.index, bits);
    }

    /// As [`Self::add`], keyed directly by `(slot, committee_index)` rather than an
    /// `AttestationData`. Needed wherever the caller only has a materialized electra attestation
    /// in hand, whose embedded `data.index` is always zero.
    pub fn add_keyed(&mut self, slot: Slot, committee_index: u64, bits: &AggregationBits<E>) {
        self.add_raw(slot, committee_index, bits);
    }

    fn add_raw(&mut self, slot: Slot, index: u64, bits: &AggregationBits<E>) {
        let entry = self
            .cache
            .entry((slot, index))
            .or_insert_with(|| AggregationBits::<E>::with_capacity(bits.len()).expect("bits.len() is a valid capacity"));
        for (i, bit) in bits.iter().enumerate() {
            if bit {
                entry.set(i, true).expect("entry sized to bits.len()");
            }
        }
    }

    /// `bits.count_ones() - overlap_with_already_credited`, or the raw count if this
    /// `(slot, committee_index)` has no prior credit.
    pub fn score(&self, data: &AttestationData, bits: &AggregationBits<E>) -> i64 {
        self.score_keyed(data.slot, data.index, bits)
    }

    /// As [`Self::score`], keyed directly by `(slot, committee_index)`.
    pub fn score_keyed(&self, slot: Slot, committee_index: u64, bits: &AggregationBits<E>) -> i64 {
        let set = bits.num_set_bits() as i64;
        match self.cache.get(&(slot, committee_index)) {
            Some(existing) => set - bits.count_overlap(existing) as i64,
            None => set,
        }
    }
}

impl<E: EthSpec> Default for CoverageCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{Checkpoint, Hash256, MinimalEthSpec};

    type E = MinimalEthSpec;

    fn data(slot: u64, index: u64) -> AttestationData {
        AttestationData {
            slot: Slot::new(slot),
            index,
            beacon_block_root: Hash256::zero(),
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    fn bits(committee_len: usize, set: &[usize]) -> AggregationBits<E> {
        let mut b = AggregationBits::<E>::with_capacity(committee_len).unwrap();
        for &i in set {
            b.set(i, true).unwrap();
        }
        b
    }

    #[test]
    fn score_without_prior_credit_is_raw_count() {
        let cache = CoverageCache::<E>::new();
        let d = data(10, 0);
        assert_eq!(cache.score(&d, &bits(8, &[0, 1, 2])), 3);
    }

    #[test]
    fn score_subtracts_overlap_with_credited_voters() {
        let mut cache = CoverageCache::<E>::new();
        let d = data(10, 0);
        cache.add(&d, &bits(8, &[0, 1]));
        assert_eq!(cache.score(&d, &bits(8, &[0, 1, 2, 3])), 2);
    }

    #[test]
    fn different_committee_keys_do_not_interfere() {
        let mut cache = CoverageCache::<E>::new();
        cache.add(&data(10, 0), &bits(8, &[0, 1]));
        assert_eq!(cache.score(&data(10, 1), &bits(8, &[0, 1])), 2);
    }
}
