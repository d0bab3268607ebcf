/// The two attestation wire schemas the pool tracks in parallel. Kept as a tagged enum at the
/// pool boundary rather than a generic bitset type, because the vote fingerprint differs
/// structurally between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Base,
    Electra,
}
