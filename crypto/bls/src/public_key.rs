use crate::hex_bytes;
use crate::Error;
use blst::min_pk as blst_core;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ssz::{Decode, DecodeError, Encode};

const PUBLIC_KEY_BYTES_LEN: usize = 48;

/// A compressed G1 public key.
#[derive(Clone)]
pub struct PublicKey(blst_core::PublicKey);

impl PublicKey {
    pub(crate) fn from_raw(inner: blst_core::PublicKey) -> Self {
        Self(inner)
    }

    pub(crate) fn as_raw(&self) -> &blst_core::PublicKey {
        &self.0
    }

    pub fn serialize(&self) -> [u8; PUBLIC_KEY_BYTES_LEN] {
        self.0.compress()
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != PUBLIC_KEY_BYTES_LEN {
            return Err(Error::InvalidByteLength {
                got: bytes.len(),
                expected: PUBLIC_KEY_BYTES_LEN,
            });
        }
        blst_core::PublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(Error::from)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Eq for PublicKey {}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "PublicKey({:?})", self.serialize())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        hex_bytes::serialize(&self.serialize(), serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = hex_bytes::deserialize(deserializer)?;
        Self::deserialize(&bytes).map_err(serde::de::Error::custom)
    }
}

impl Encode for PublicKey {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        PUBLIC_KEY_BYTES_LEN
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.serialize());
    }

    fn ssz_bytes_len(&self) -> usize {
        PUBLIC_KEY_BYTES_LEN
    }
}

impl Decode for PublicKey {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        PUBLIC_KEY_BYTES_LEN
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::deserialize(bytes).map_err(|e| DecodeError::BytesInvalid(format!("{e}")))
    }
}
