//! A thin wrapper around `blst`'s `min_pk` (minimal-pubkey-size) BLS12-381 scheme, scoped to what
//! the attestation pool and its tests need: keys, single signatures, cooked (pre-validated)
//! signatures, and an incrementally extendable aggregate.

mod aggregate_signature;
mod cooked_signature;
mod error;
mod hex_bytes;
mod public_key;
mod secret_key;
mod signature;

pub use aggregate_signature::AggregateSignature;
pub use cooked_signature::CookedSignature;
pub use error::Error;
pub use public_key::PublicKey;
pub use secret_key::SecretKey;
pub use signature::Signature;

/// A `(SecretKey, PublicKey)` pair derived from a small integer seed, for use in tests that need
/// reproducible validator identities without touching a CSPRNG.
pub fn generate_deterministic_keypair(seed: u64) -> (SecretKey, PublicKey) {
    let sk = SecretKey::deterministic(seed);
    let pk = sk.public_key();
    (sk, pk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let (sk, pk) = generate_deterministic_keypair(7);
        let msg = b"attestation data root";
        let sig = sk.sign(msg);
        assert!(sig.verify(&pk, msg));
        assert!(!sig.verify(&pk, b"different message"));
    }

    #[test]
    fn aggregate_of_two_verifies_each_contributor() {
        let (sk_a, pk_a) = generate_deterministic_keypair(1);
        let (sk_b, pk_b) = generate_deterministic_keypair(2);
        let msg = b"shared vote content";

        let cooked_a: CookedSignature = sk_a.sign(msg).into();
        let cooked_b: CookedSignature = sk_b.sign(msg).into();

        let mut agg = AggregateSignature::init(&cooked_a);
        agg.aggregate(&cooked_b);
        let combined = agg.finish();

        // The combined signature is not individually valid against either single public key...
        assert!(!combined.verify(&pk_a, msg));
        assert!(!combined.verify(&pk_b, msg));
        // ...but each contributor's own signature still is.
        assert!(sk_a.sign(msg).verify(&pk_a, msg));
        assert!(sk_b.sign(msg).verify(&pk_b, msg));
    }

    #[test]
    fn infinity_is_stable_under_reserialization() {
        let inf = AggregateSignature::infinity();
        let bytes = inf.serialize();
        let round_tripped = AggregateSignature::deserialize(&bytes).unwrap();
        assert_eq!(inf, round_tripped);
    }
}
