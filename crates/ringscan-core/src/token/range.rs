use crate::token::{Partitioner, Token};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// TokenRange
/// Closed interval `[lower, upper]` on the ring.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TokenRange {
    lower: Token,
    upper: Token,
}

impl TokenRange {
    /// Build a closed range; bounds are swapped if given in reverse.
    #[must_use]
    pub fn closed(lower: Token, upper: Token) -> Self {
        if lower <= upper {
            Self { lower, upper }
        } else {
            Self {
                lower: upper,
                upper: lower,
            }
        }
    }

    #[must_use]
    pub const fn lower(&self) -> &Token {
        &self.lower
    }

    #[must_use]
    pub const fn upper(&self) -> &Token {
        &self.upper
    }

    #[must_use]
    pub fn contains(&self, token: &Token) -> bool {
        self.lower <= *token && *token <= self.upper
    }

    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }

    /// Number of tokens in the range.
    #[must_use]
    pub fn width(&self) -> BigInt {
        self.upper.as_bigint() - self.lower.as_bigint() + 1
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

///
/// InputPartition
/// One split of the distributed scan, owning a contiguous token range.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct InputPartition {
    pub index: usize,
    pub range: TokenRange,
}

///
/// TokenPartitioner
///
/// Splits the ring of a partitioner into contiguous, non-overlapping ranges
/// that together cover every token exactly once.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenPartitioner {
    partitioner: Partitioner,
    num_splits: usize,
}

impl TokenPartitioner {
    #[must_use]
    pub const fn new(partitioner: Partitioner, num_splits: usize) -> Self {
        Self {
            partitioner,
            num_splits,
        }
    }

    #[must_use]
    pub const fn num_splits(&self) -> usize {
        self.num_splits
    }

    /// Split `i` covers `[min + i*W/n, min + (i+1)*W/n - 1]` where `W` is the
    /// ring width, so split sizes differ by at most one token.
    #[must_use]
    pub fn splits(&self) -> Vec<InputPartition> {
        let ring = self.partitioner.ring();
        let width = ring.width();
        let min = ring.lower().as_bigint().clone();
        let n = BigInt::from(self.num_splits);

        (0..self.num_splits)
            .map(|index| {
                let lower = &min + &width * BigInt::from(index) / &n;
                let upper = &min + &width * BigInt::from(index + 1) / &n - 1;

                InputPartition {
                    index,
                    range: TokenRange::closed(Token::new(lower), Token::new(upper)),
                }
            })
            .collect()
    }

    /// Index of the split owning `token`, if the token is on this ring.
    #[must_use]
    pub fn split_for(&self, token: &Token) -> Option<usize> {
        let ring = self.partitioner.ring();
        if self.num_splits == 0 || !ring.contains(token) {
            return None;
        }

        // invert lower(i) = min + floor(i*W/n): the owner is the largest i
        // with lower(i) <= token
        let offset = token.as_bigint() - ring.lower().as_bigint();
        let n = BigInt::from(self.num_splits);
        let mut index = usize::try_from((offset * &n) / ring.width()).ok()?;
        let splits = self.splits();
        while index + 1 < splits.len() && splits[index + 1].range.lower() <= token {
            index += 1;
        }
        while index > 0 && splits[index].range.lower() > token {
            index -= 1;
        }

        Some(index)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_cover_ring_without_gaps() {
        for partitioner in [Partitioner::Murmur3, Partitioner::Random] {
            for n in [1_usize, 2, 3, 7, 64] {
                let splits = TokenPartitioner::new(partitioner, n).splits();

                assert_eq!(splits.len(), n);
                assert_eq!(splits[0].range.lower(), &partitioner.min_token());
                assert_eq!(splits[n - 1].range.upper(), &partitioner.max_token());
                for pair in splits.windows(2) {
                    let next_lower = pair[0].range.upper().as_bigint() + 1;
                    assert_eq!(pair[1].range.lower().as_bigint(), &next_lower);
                }
            }
        }
    }

    #[test]
    fn zero_splits_is_empty() {
        let partitioner = TokenPartitioner::new(Partitioner::Murmur3, 0);

        assert!(partitioner.splits().is_empty());
        assert_eq!(partitioner.split_for(&Token::from(0_i64)), None);
    }

    #[test]
    fn split_for_agrees_with_ranges() {
        let partitioner = TokenPartitioner::new(Partitioner::Murmur3, 5);
        let splits = partitioner.splits();
        let probes = [i64::MIN, -1, 0, 1, 42, i64::MAX - 1, i64::MAX];

        for probe in probes {
            let token = Token::from(probe);
            let index = partitioner.split_for(&token).unwrap();
            assert!(splits[index].range.contains(&token), "{probe}");
        }
        for split in &splits {
            assert_eq!(partitioner.split_for(split.range.lower()), Some(split.index));
            assert_eq!(partitioner.split_for(split.range.upper()), Some(split.index));
        }
    }

    #[test]
    fn split_for_rejects_tokens_off_ring() {
        let partitioner = TokenPartitioner::new(Partitioner::Random, 4);

        assert_eq!(partitioner.split_for(&Token::from(-1_i64)), None);
    }

    #[test]
    fn range_overlap_and_order() {
        let a = TokenRange::closed(Token::from(5_i64), Token::from(1_i64));
        let b = TokenRange::closed(Token::from(5_i64), Token::from(9_i64));
        let c = TokenRange::closed(Token::from(6_i64), Token::from(9_i64));

        assert_eq!(a.lower(), &Token::from(1_i64));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert_eq!(a.width(), BigInt::from(5));
        assert_eq!(a.to_string(), "[1, 5]");
    }
}
