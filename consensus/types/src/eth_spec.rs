use crate::ChainSpec;
use serde_derive::{Deserialize, Serialize};
use std::fmt::Debug;
use typenum::{Unsigned, U2048, U64};

/// Compile-time parameterisation over the handful of consensus constants this pool actually
/// needs for attestation aggregation and packing.
pub trait EthSpec: 'static + Default + Sync + Send + Clone + Debug + PartialEq + Eq {
    /// Upper bound on the number of validators in a single committee. Used to size the
    /// fixed-capacity aggregation bitlist.
    type MaxValidatorsPerCommittee: Unsigned + Clone + Sync + Send + Debug + PartialEq + Eq;
    /// Upper bound on the number of committees active in a single slot (electra schema).
    type MaxCommitteesPerSlot: Unsigned + Clone + Sync + Send + Debug + PartialEq + Eq;

    fn default_spec() -> ChainSpec;

    fn slots_per_epoch() -> u64 {
        Self::default_spec().slots_per_epoch
    }

    fn max_validators_per_committee() -> usize {
        Self::MaxValidatorsPerCommittee::to_usize()
    }

    fn max_committees_per_slot() -> usize {
        Self::MaxCommitteesPerSlot::to_usize()
    }
}

/// Mainnet preset.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainnetEthSpec;

impl EthSpec for MainnetEthSpec {
    type MaxValidatorsPerCommittee = U2048;
    type MaxCommitteesPerSlot = U64;

    fn default_spec() -> ChainSpec {
        ChainSpec::mainnet()
    }
}

/// A reduced preset used by tests to keep committees and slots small enough to enumerate by
/// hand.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimalEthSpec;

impl EthSpec for MinimalEthSpec {
    type MaxValidatorsPerCommittee = U64;
    type MaxCommitteesPerSlot = U64;

    fn default_spec() -> ChainSpec {
        ChainSpec::minimal()
    }
}
