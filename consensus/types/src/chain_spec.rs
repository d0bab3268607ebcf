/// The subset of consensus-layer constants the attestation pool depends on.
///
/// A production chain spec carries hundreds of fields (fork epochs, gwei denominations, gossip
/// parameters, ...); only the ones referenced by aggregation and packing are modelled here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    pub slots_per_epoch: u64,
    pub min_attestation_inclusion_delay: u64,
    pub max_attestations: usize,
    pub max_attestations_electra: usize,
    pub max_committees_per_slot: usize,
}

impl ChainSpec {
    /// `ATTESTATION_LOOKBACK = min(24, SLOTS_PER_EPOCH) + MIN_ATTESTATION_INCLUSION_DELAY`.
    pub fn attestation_lookback(&self) -> usize {
        (self.slots_per_epoch.min(24) + self.min_attestation_inclusion_delay) as usize
    }

    pub fn mainnet() -> Self {
        Self {
            slots_per_epoch: 32,
            min_attestation_inclusion_delay: 1,
            max_attestations: 128,
            max_attestations_electra: 8,
            max_committees_per_slot: 64,
        }
    }

    /// A reduced preset, handy for unit tests that want a small, enumerable window.
    pub fn minimal() -> Self {
        Self {
            slots_per_epoch: 8,
            min_attestation_inclusion_delay: 1,
            max_attestations: 4,
            max_attestations_electra: 2,
            max_committees_per_slot: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_matches_spec_formula() {
        let spec = ChainSpec::mainnet();
        assert_eq!(spec.attestation_lookback(), 25);
    }
}
