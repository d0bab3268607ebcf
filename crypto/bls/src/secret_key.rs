use crate::{Error, PublicKey, Signature};
use blst::min_pk as blst_core;

/// Domain separation tag for the signature scheme used by attestations: BLS12-381, G2 signatures,
/// proof-of-possession variant.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// A BLS secret scalar. Never serialized; exists only for signing test fixtures and, in a full
/// node, validator key material held by the signer process.
#[derive(Clone)]
pub struct SecretKey(blst_core::SecretKey);

impl SecretKey {
    /// Deterministic key derivation from a seed, used by tests that need reproducible validator
    /// keys without touching a CSPRNG.
    pub fn deterministic(seed: u64) -> Self {
        let mut ikm = [0u8; 32];
        ikm[..8].copy_from_slice(&seed.to_le_bytes());
        let sk = blst_core::SecretKey::key_gen(&ikm, &[]).expect("32-byte IKM is always valid");
        Self(sk)
    }

    pub fn random(ikm: &[u8; 32]) -> Result<Self, Error> {
        blst_core::SecretKey::key_gen(ikm, &[])
            .map(Self)
            .map_err(Error::from)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_raw(self.0.sk_to_pk())
    }

    pub fn sign(&self, msg: &[u8]) -> Signature {
        Signature::from_raw(self.0.sign(msg, DST, &[]))
    }
}
