pub use ethereum_types::{H160 as Address, H256 as Hash256};

/// `sha256(a || b)`, used to build the electra vote fingerprint from two tree-hash roots (see
/// `AttestationData::electra_fingerprint`).
pub fn hash32_concat(a: &Hash256, b: &Hash256) -> Hash256 {
    let mut preimage = [0u8; 64];
    preimage[..32].copy_from_slice(a.as_bytes());
    preimage[32..].copy_from_slice(b.as_bytes());
    Hash256::from_slice(&eth2_hashing::hash(&preimage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_is_order_sensitive() {
        let a = Hash256::repeat_byte(1);
        let b = Hash256::repeat_byte(2);
        assert_ne!(hash32_concat(&a, &b), hash32_concat(&b, &a));
    }
}
