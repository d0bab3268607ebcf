use crate::hex_bytes;
use crate::secret_key::DST;
use crate::{Error, PublicKey};
use blst::min_pk as blst_core;
use blst::BLST_ERROR;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz::{Decode, DecodeError, Encode};

pub(crate) const SIGNATURE_BYTES_LEN: usize = 96;

/// A single, uncombined BLS signature over a G2 point.
#[derive(Clone)]
pub struct Signature(blst_core::Signature);

impl Signature {
    pub(crate) fn from_raw(inner: blst_core::Signature) -> Self {
        Self(inner)
    }

    pub(crate) fn as_raw(&self) -> &blst_core::Signature {
        &self.0
    }

    pub(crate) fn into_raw(self) -> blst_core::Signature {
        self.0
    }

    pub fn serialize(&self) -> [u8; SIGNATURE_BYTES_LEN] {
        self.0.compress()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != SIGNATURE_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: SIGNATURE_BYTES_LEN,
            });
        }
        blst_core::Signature::from_bytes(bytes)
            .map(Self)
            .map_err(Error::from)
    }

    pub fn verify(&self, public_key: &PublicKey, msg: &[u8]) -> bool {
        self.0.verify(true, msg, DST, &[], public_key.as_raw(), true) == BLST_ERROR::BLST_SUCCESS
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for Signature {}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Signature({:?})", self.serialize())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex_bytes::serialize(&self.serialize(), serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = hex_bytes::deserialize(deserializer)?;
        Self::deserialize(&bytes).map_err(serde::de::Error::custom)
    }
}

impl Encode for Signature {
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

impl Decode for Signature {
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
