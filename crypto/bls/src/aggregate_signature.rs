use crate::hex_bytes;
use crate::signature::SIGNATURE_BYTES_LEN;
use crate::{CookedSignature, Error, Signature};
use blst::min_pk as blst_core;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz::{Decode, DecodeError, Encode};
use tree_hash::{PackedEncoding, TreeHash, TreeHashType};

/// Compressed encoding of the point at infinity on G2: the identity element, and the aggregate
/// signature of zero votes.
const INFINITY_SIGNATURE: [u8; SIGNATURE_BYTES_LEN] = {
    let mut bytes = [0u8; SIGNATURE_BYTES_LEN];
    bytes[0] = 0xc0;
    bytes
};

/// An incrementally extendable BLS aggregate. Mirrors `Entry::aggregates[i].aggregate_signature`:
/// built once from a first vote via [`AggregateSignature::init`], then grown one vote at a time by
/// [`AggregateSignature::aggregate`] as `update_aggregates` tops it up with newly-seen singles.
#[derive(Clone)]
pub struct AggregateSignature(blst_core::AggregateSignature);

impl AggregateSignature {
    /// The aggregate of zero signatures: the identity element.
    pub fn infinity() -> Self {
        let sig = blst_core::Signature::from_bytes(&INFINITY_SIGNATURE)
            .expect("infinity point is always a valid compressed signature encoding");
        Self(blst_core::AggregateSignature::from_signature(&sig))
    }

    /// Starts a new aggregate from a single cooked signature.
    pub fn init(sig: &CookedSignature) -> Self {
        Self(blst_core::AggregateSignature::from_signature(sig.as_raw()))
    }

    /// Folds one more cooked signature into the aggregate.
    ///
    /// The signature has already passed group-membership checks when it was cooked, so this does
    /// not re-validate; it is the cheap path `update_aggregates` relies on.
    pub fn aggregate(&mut self, sig: &CookedSignature) {
        self.0
            .add_signature(sig.as_raw(), false)
            .expect("cooked signatures are pre-validated group members");
    }

    /// Folds the group represented by `other` into `self`, for combining two aggregates that
    /// were each built from disjoint sets of signers (e.g. electra's cross-committee
    /// consolidation, where one aggregate per committee is produced independently before the
    /// attestations are merged).
    pub fn merge(&mut self, other: &AggregateSignature) {
        self.0.add_aggregate(&other.0);
    }

    /// Materializes the aggregate as a plain signature, suitable for embedding in an on-wire
    /// attestation.
    pub fn finish(&self) -> Signature {
        Signature::from_raw(self.0.to_signature())
    }

    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        self.finish().serialize()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let sig = Signature::deserialize(bytes)?;
        Ok(Self(blst_core::AggregateSignature::from_signature(
            sig.as_raw(),
        )))
    }
}

impl PartialEq for AggregateSignature {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for AggregateSignature {}

impl std::fmt::Debug for AggregateSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "AggregateSignature({:?})", self.serialize())
    }
}

impl Serialize for AggregateSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex_bytes::serialize(&self.serialize(), serializer)
    }
}

impl<'de> Deserialize<'de> for AggregateSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = hex_bytes::deserialize(deserializer)?;
        Self::deserialize(&bytes).map_err(serde::de::Error::custom)
    }
}

impl Encode for AggregateSignature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNATURE_BYTES_LEN
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.serialize());
    }

    fn ssz_bytes_len(&self) -> usize {
        SIGNATURE_BYTES_LEN
    }
}

impl Decode for AggregateSignature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        SIGNATURE_BYTES_LEN
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::deserialize(bytes).map_err(|e| DecodeError::BytesInvalid(format!("{e}")))
    }
}

impl TreeHash for AggregateSignature {
    fn tree_hash_type() -> TreeHashType {
        TreeHashType::Vector
    }

    fn tree_hash_packed_encoding(&self) -> PackedEncoding {
        unreachable!("AggregateSignature is not a basic SSZ type and cannot be packed")
    }

    fn tree_hash_packing_factor() -> usize {
        unreachable!("AggregateSignature is not a basic SSZ type and cannot be packed")
    }

    fn tree_hash_root(&self) -> tree_hash::Hash256 {
        tree_hash::merkle_root(&self.serialize(), 0)
    }
}
