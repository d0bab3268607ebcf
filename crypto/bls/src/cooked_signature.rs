use crate::Signature;
use blst::min_pk as blst_core;

/// A signature that has already been deserialized and its group membership checked by an earlier
/// verification pass (typically signature-set batch verification at the network ingress layer).
///
/// Carrying this type rather than a raw `Signature` lets [`crate::AggregateSignature`] skip
/// per-signature validation when folding votes in, which is where most of a busy pool's BLS CPU
/// time would otherwise go.
#[derive(Clone, Debug)]
pub struct CookedSignature(blst_core::Signature);

impl CookedSignature {
    pub(crate) fn as_raw(&self) -> &blst_core::Signature {
        &self.0
    }
}

impl From<Signature> for CookedSignature {
    fn from(sig: Signature) -> Self {
        Self(sig.into_raw())
    }
}
