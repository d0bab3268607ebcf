use crate::Entry;
use std::collections::HashMap;
use types::{EthSpec, Hash256, Slot};

/// Fixed-size circular buffer of slot buckets, each mapping a vote fingerprint to its `Entry`.
/// One instance is kept per schema variant by the pool.
pub struct CandidateRing<E: EthSpec> {
    window: usize,
    starting_slot: Slot,
    buckets: Vec<HashMap<Hash256, Entry<E>>>,
}

impl<E: EthSpec> CandidateRing<E> {
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "ATTESTATION_LOOKBACK must be positive");
        Self {
            window,
            starting_slot: Slot::new(0),
            buckets: (0..window).map(|_| HashMap::new()).collect(),
        }
    }

    pub fn starting_slot(&self) -> Slot {
        self.starting_slot
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// `Some(slot mod N)` iff `slot` is resident in the current window, else `None`.
    pub fn candidate_index(&self, slot: Slot) -> Option<usize> {
        let window = self.window as u64;
        if slot < self.starting_slot || slot.as_u64() >= self.starting_slot.as_u64() + window {
            return None;
        }
        Some((slot.as_u64() % window) as usize)
    }

    pub fn bucket(&self, index: usize) -> &HashMap<Hash256, Entry<E>> {
        &self.buckets[index]
    }

    pub fn bucket_mut(&mut self, index: usize) -> &mut HashMap<Hash256, Entry<E>> {
        &mut self.buckets[index]
    }

    /// Total number of distinct entries resident across all buckets.
    pub fn num_entries(&self) -> usize {
        self.buckets.iter().map(|b| b.len()).sum()
    }

    /// Mean bucket size across resident buckets with at least one entry, used to size a freshly
    /// reset bucket's capacity hint. Falls back to `128`, the mainnet default committee
    /// size, if every bucket is currently empty.
    pub fn mean_bucket_len(&self) -> usize {
        let (count, sum) = self
            .buckets
            .iter()
            .filter(|b| !b.is_empty())
            .fold((0usize, 0usize), |(count, sum), b| (count + 1, sum + b.len()));
        sum.checked_div(count).unwrap_or(128)
    }

    /// Advances the window to cover `[wall_slot + 1 - N, wall_slot + 1)`, evicting any buckets
    /// that fall out of range. A `wall_slot` that would move `starting_slot` backwards is
    /// rejected (clock regression) and the ring is left unchanged; returns `false` in that case.
    pub fn advance(&mut self, wall_slot: Slot) -> bool {
        let window = self.window as u64;
        let new_start = Slot::new((wall_slot.as_u64() + 1).saturating_sub(window));

        if new_start < self.starting_slot {
            return false;
        }

        let gap = new_start.as_u64() - self.starting_slot.as_u64();
        if gap >= window {
            for bucket in self.buckets.iter_mut() {
                bucket.clear();
            }
        } else {
            for slot_offset in 0..gap {
                let slot = Slot::new(self.starting_slot.as_u64() + slot_offset);
                let index = (slot.as_u64() % window) as usize;
                self.buckets[index].clear();
            }
        }

        self.starting_slot = new_start;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{AttestationData, Checkpoint, MinimalEthSpec};

    type E = MinimalEthSpec;

    fn dummy_entry() -> Entry<E> {
        Entry::new(
            AttestationData {
                slot: Slot::new(0),
                index: 0,
                beacon_block_root: Hash256::zero(),
                source: Checkpoint::default(),
                target: Checkpoint::default(),
            },
            8,
        )
    }

    #[test]
    fn candidate_index_tracks_window() {
        let mut ring = CandidateRing::<E>::new(32);
        assert_eq!(ring.candidate_index(Slot::new(0)), Some(0));
        assert_eq!(ring.candidate_index(Slot::new(32)), None);

        ring.advance(Slot::new(40));
        assert_eq!(ring.starting_slot(), Slot::new(9));
        assert_eq!(ring.candidate_index(Slot::new(8)), None);
        assert_eq!(ring.candidate_index(Slot::new(9)), Some(9));
    }

    #[test]
    fn window_eviction_drops_old_entries() {
        let mut ring = CandidateRing::<E>::new(32);
        assert!(ring.advance(Slot::new(131)));
        assert_eq!(ring.starting_slot(), Slot::new(100));
        let idx = ring.candidate_index(Slot::new(100)).unwrap();
        ring.bucket_mut(idx).insert(Hash256::repeat_byte(9), dummy_entry());
        assert_eq!(ring.num_entries(), 1);

        assert!(ring.advance(Slot::new(140)));
        assert_eq!(ring.starting_slot(), Slot::new(109));
        assert_eq!(ring.candidate_index(Slot::new(100)), None);
        assert_eq!(ring.num_entries(), 0);
    }

    #[test]
    fn clock_regression_is_rejected() {
        let mut ring = CandidateRing::<E>::new(32);
        assert!(ring.advance(Slot::new(100)));
        let before = ring.starting_slot();
        assert!(!ring.advance(Slot::new(10)));
        assert_eq!(ring.starting_slot(), before);
    }
}
