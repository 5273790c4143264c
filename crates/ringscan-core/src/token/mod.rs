//! Token ring vocabulary: tokens, ranges, partitioners, the resolver
//! capability, and the partition-key filters handed to the row scanner.

mod filter;
mod range;
mod resolver;

pub use filter::PartitionKeyFilter;
pub use range::{InputPartition, TokenPartitioner, TokenRange};
pub use resolver::{KeyEncodingError, KeyEncodingReason, ResolveError, ResolvedKey, TokenResolver};

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// Token
///
/// Position on the ring. Arbitrary precision so one type covers both the
/// signed 64-bit Murmur3 ring and the `0..=2^127` Random ring.
///

#[derive(
    Clone,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Deref,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
)]
pub struct Token(BigInt);

impl Token {
    #[must_use]
    pub const fn new(value: BigInt) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_bigint(&self) -> &BigInt {
        &self.0
    }
}

impl From<i64> for Token {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

///
/// Partitioner
///
/// Ring partitioner of the cluster. The hash functions themselves live
/// behind [`TokenResolver`]; this type only names the ring and its bounds.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Partitioner {
    Murmur3,
    Random,
}

impl Partitioner {
    /// Fully qualified class name as reported by the cluster.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Murmur3 => "org.apache.cassandra.dht.Murmur3Partitioner",
            Self::Random => "org.apache.cassandra.dht.RandomPartitioner",
        }
    }

    #[must_use]
    pub fn min_token(self) -> Token {
        match self {
            Self::Murmur3 => Token::from(i64::MIN),
            Self::Random => Token::from(0_i64),
        }
    }

    #[must_use]
    pub fn max_token(self) -> Token {
        match self {
            Self::Murmur3 => Token::from(i64::MAX),
            Self::Random => Token::new(BigInt::from(1_u8) << 127_u32),
        }
    }

    /// The whole ring as one closed range.
    #[must_use]
    pub fn ring(self) -> TokenRange {
        TokenRange::closed(self.min_token(), self.max_token())
    }
}

impl fmt::Display for Partitioner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

///
/// UnknownPartitioner
///

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("unsupported partitioner: '{0}'")]
pub struct UnknownPartitioner(pub String);

impl FromStr for Partitioner {
    type Err = UnknownPartitioner;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.rsplit('.').next().unwrap_or(s);
        match short {
            "Murmur3Partitioner" | "Murmur3" | "murmur3" => Ok(Self::Murmur3),
            "RandomPartitioner" | "Random" | "random" => Ok(Self::Random),
            _ => Err(UnknownPartitioner(s.to_string())),
        }
    }
}

///
/// TESTS
///
