//! Slot and Epoch are newtype wrappers around `u64` that prevent accidental arithmetic between
//! the two units. Conversion between them always goes through `slots_per_epoch`.

use serde_derive::{Deserialize, Serialize};
use ssz::{Decode, DecodeError, Encode};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use tree_hash::TreeHash;

/// Delegates SSZ and tree-hash encoding for a `u64` newtype to the inner `u64`'s
/// implementation.
macro_rules! impl_ssz_and_tree_hash {
    ($type:ident) => {
        impl Encode for $type {
            fn is_ssz_fixed_len() -> bool {
                <u64 as Encode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <u64 as Encode>::ssz_fixed_len()
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                self.0.ssz_append(buf)
            }

            fn ssz_bytes_len(&self) -> usize {
                self.0.ssz_bytes_len()
            }
        }

        impl Decode for $type {
            fn is_ssz_fixed_len() -> bool {
                <u64 as Decode>::is_ssz_fixed_len()
            }

            fn ssz_fixed_len() -> usize {
                <u64 as Decode>::ssz_fixed_len()
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
                u64::from_ssz_bytes(bytes).map(Self)
            }
        }

        impl TreeHash for $type {
            fn tree_hash_type() -> tree_hash::TreeHashType {
                <u64 as TreeHash>::tree_hash_type()
            }

            fn tree_hash_packed_encoding(&self) -> tree_hash::PackedEncoding {
                self.0.tree_hash_packed_encoding()
            }

            fn tree_hash_packing_factor() -> usize {
                <u64 as TreeHash>::tree_hash_packing_factor()
            }

            fn tree_hash_root(&self) -> tree_hash::Hash256 {
                self.0.tree_hash_root()
            }
        }
    };
}

macro_rules! impl_common {
    ($type:ident) => {
        impl $type {
            pub const fn new(n: u64) -> Self {
                Self(n)
            }

            pub fn as_u64(&self) -> u64 {
                self.0
            }

            pub fn as_usize(&self) -> usize {
                self.0 as usize
            }

            pub fn saturating_sub(&self, other: impl Into<Self>) -> Self {
                Self(self.0.saturating_sub(other.into().0))
            }

            pub fn saturating_add(&self, other: impl Into<Self>) -> Self {
                Self(self.0.saturating_add(other.into().0))
            }

            pub fn checked_sub(&self, other: impl Into<Self>) -> Option<Self> {
                self.0.checked_sub(other.into().0).map(Self)
            }
        }

        impl From<u64> for $type {
            fn from(n: u64) -> Self {
                Self(n)
            }
        }

        impl From<$type> for u64 {
            fn from(n: $type) -> Self {
                n.0
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl<T: Into<$type>> Add<T> for $type {
            type Output = Self;
            fn add(self, other: T) -> Self {
                Self(self.0 + other.into().0)
            }
        }

        impl<T: Into<$type>> AddAssign<T> for $type {
            fn add_assign(&mut self, other: T) {
                self.0 += other.into().0;
            }
        }

        impl<T: Into<$type>> Sub<T> for $type {
            type Output = Self;
            fn sub(self, other: T) -> Self {
                Self(
                    self.0
                        .checked_sub(other.into().0)
                        .expect("Sub would underflow Slot/Epoch"),
                )
            }
        }

        impl<T: Into<$type>> SubAssign<T> for $type {
            fn sub_assign(&mut self, other: T) {
                self.0 = self.0.checked_sub(other.into().0).expect("SubAssign would underflow");
            }
        }
    };
}

/// A beacon chain slot, the smallest unit of consensus time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Slot(u64);

/// A beacon chain epoch, `slots_per_epoch` slots long.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Epoch(u64);

impl_common!(Slot);
impl_common!(Epoch);
impl_ssz_and_tree_hash!(Slot);
impl_ssz_and_tree_hash!(Epoch);

impl Slot {
    /// Returns the epoch that contains this slot.
    pub fn epoch(&self, slots_per_epoch: u64) -> Epoch {
        Epoch::new(self.0 / slots_per_epoch)
    }
}

impl Epoch {
    /// Returns the first slot of this epoch.
    pub fn start_slot(&self, slots_per_epoch: u64) -> Slot {
        Slot::new(self.0 * slots_per_epoch)
    }

    pub fn previous(&self) -> Epoch {
        Epoch::new(self.0.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_round_trip() {
        let slot = Slot::new(130);
        assert_eq!(slot.epoch(32), Epoch::new(4));
        assert_eq!(Epoch::new(4).start_slot(32), Slot::new(128));
    }

    #[test]
    fn saturating_sub_does_not_panic() {
        let slot = Slot::new(3);
        assert_eq!(slot.saturating_sub(Slot::new(10)), Slot::new(0));
    }
}
