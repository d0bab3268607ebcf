use ssz_types::BitList;
use typenum::Unsigned;

/// Convenience extensions over `ssz_types::BitList` used pervasively by the aggregation logic:
/// subset/superset tests and popcount-based scoring.
pub trait BitfieldExt {
    /// `true` iff every bit set in `self` is also set in `other`. Both bitfields must have the
    /// same logical length.
    fn is_subset_of(&self, other: &Self) -> bool;

    /// `true` iff every bit set in `other` is also set in `self`.
    fn is_superset_of(&self, other: &Self) -> bool {
        other.is_subset_of(self)
    }

    /// The index of the single set bit, or `None` if zero or more than one bit is set.
    fn single_set_bit(&self) -> Option<usize>;

    /// Count of bits set in both `self` and `other`.
    fn count_overlap(&self, other: &Self) -> usize;
}

impl<N: Unsigned + Clone> BitfieldExt for BitList<N> {
    fn is_subset_of(&self, other: &Self) -> bool {
        self.iter()
            .enumerate()
            .all(|(i, bit)| !bit || other.get(i).unwrap_or(false))
    }

    fn single_set_bit(&self) -> Option<usize> {
        let mut found = None;
        for (i, bit) in self.iter().enumerate() {
            if bit {
                if found.is_some() {
                    return None;
                }
                found = Some(i);
            }
        }
        found
    }

    fn count_overlap(&self, other: &Self) -> usize {
        self.iter()
            .zip(other.iter())
            .filter(|(a, b)| *a && *b)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typenum::U64;

    type TestBitList = BitList<U64>;

    fn bits(set: &[usize], len: usize) -> TestBitList {
        let mut b = TestBitList::with_capacity(len).unwrap();
        for &i in set {
            b.set(i, true).unwrap();
        }
        b
    }

    #[test]
    fn subset_and_superset_are_duals() {
        let a = bits(&[0, 1], 8);
        let b = bits(&[0, 1, 2], 8);
        assert!(a.is_subset_of(&b));
        assert!(b.is_superset_of(&a));
        assert!(!b.is_subset_of(&a));
    }

    #[test]
    fn single_set_bit_requires_exactly_one() {
        assert_eq!(bits(&[5], 8).single_set_bit(), Some(5));
        assert_eq!(bits(&[], 8).single_set_bit(), None);
        assert_eq!(bits(&[1, 2], 8).single_set_bit(), None);
    }

    #[test]
    fn overlap_counts_shared_bits() {
        let a = bits(&[0, 1, 2], 8);
        let b = bits(&[1, 2, 3], 8);
        assert_eq!(a.count_overlap(&b), 2);
    }
}
