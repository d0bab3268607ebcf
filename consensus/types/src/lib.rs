//! Consensus types shared across the attestation pool: the newtype time units, the protocol's
//! opaque vote payload, BLS-aggregate-carrying attestations in both wire schemas, and the
//! bitfield/hashing helpers the pool's aggregation logic is built on.

mod attestation;
mod attestation_data;
mod beacon_head;
mod bitfield;
mod chain_spec;
mod checkpoint;
mod eth_spec;
mod hash;
mod slot_epoch;

pub use attestation::{
    AggregationBits, Attestation, AttestationBase, AttestationElectra, CommitteeBits, Validation,
};
pub use attestation_data::AttestationData;
pub use beacon_head::BeaconHead;
pub use bitfield::BitfieldExt;
pub use chain_spec::ChainSpec;
pub use checkpoint::Checkpoint;
pub use eth_spec::{EthSpec, MainnetEthSpec, MinimalEthSpec};
pub use hash::{hash32_concat, Address, Hash256};
pub use slot_epoch::{Epoch, Slot};

pub use ssz_types::{BitList, BitVector};
