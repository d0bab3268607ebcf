use serde_derive::{Deserialize, Serialize};

/// Deployment-tunable pool settings, distinct from the consensus constants carried on
/// `types::ChainSpec`. A node operator can reasonably want to override these without touching
/// anything that affects consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// DoS bound on the number of distinct `AttestationData` fingerprints retained per slot
    /// bucket, independent of `TARGET_AGGREGATORS_PER_COMMITTEE`'s bound on aggregates within a
    /// single entry.
    pub max_attestations_per_slot: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_attestations_per_slot: 16_384,
        }
    }
}
