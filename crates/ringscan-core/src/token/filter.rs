use crate::token::{ResolvedKey, Token, TokenRange};
use serde::{Deserialize, Serialize};

///
/// PartitionKeyFilter
///
/// One fully resolved partition key. Created once per candidate tuple and
/// never mutated; the row scanner uses the token to skip splits and the
/// key bytes to select exactly one partition within a split.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PartitionKeyFilter {
    #[serde(with = "serde_bytes")]
    key: Vec<u8>,
    token: Token,
}

impl PartitionKeyFilter {
    #[must_use]
    pub const fn new(key: Vec<u8>, token: Token) -> Self {
        Self { key, token }
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Whether the split covering `range` may hold this partition.
    #[must_use]
    pub fn overlaps(&self, range: &TokenRange) -> bool {
        range.contains(&self.token)
    }

    /// Whether a partition read from disk is the one this filter selects.
    #[must_use]
    pub fn matches(&self, key: &[u8]) -> bool {
        self.key == key
    }

    /// Inverse of [`Self::matches`], checked token-first so most partitions
    /// are rejected without comparing key bytes.
    #[must_use]
    pub fn skip_partition(&self, key: &[u8], token: &Token) -> bool {
        self.token != *token || !self.matches(key)
    }
}

impl From<ResolvedKey> for PartitionKeyFilter {
    fn from(resolved: ResolvedKey) -> Self {
        Self::new(resolved.key, resolved.token)
    }
}
