use crate::murmur3::hash3_x64_128;
use md5::{Digest, Md5};
use num_bigint::{BigInt, Sign};
use ringscan_core::token::{Partitioner, Token};

/// Token the cluster assigns to a serialized partition key.
///
/// An empty key maps to the partitioner's minimum sentinel, which sorts
/// before every real token.
#[must_use]
pub fn token_for(partitioner: Partitioner, key: &[u8]) -> Token {
    match partitioner {
        Partitioner::Murmur3 => murmur3_token(key),
        Partitioner::Random => random_token(key),
    }
}

fn murmur3_token(key: &[u8]) -> Token {
    if key.is_empty() {
        return Token::from(i64::MIN);
    }

    let hash = hash3_x64_128(key, 0)[0];
    // i64::MIN is reserved for the minimum sentinel
    let hash = if hash == i64::MIN { i64::MAX } else { hash };

    Token::from(hash)
}

fn random_token(key: &[u8]) -> Token {
    if key.is_empty() {
        return Token::from(-1_i64);
    }

    let digest = Md5::digest(key);
    let signed = BigInt::from_signed_bytes_be(&digest);

    Token::new(BigInt::from_biguint(Sign::Plus, signed.magnitude().clone()))
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use ringscan_core::token::TokenPartitioner;

    #[test]
    fn murmur3_known_tokens() {
        assert_eq!(
            token_for(Partitioner::Murmur3, &1_i32.to_be_bytes()),
            Token::from(-4_069_959_284_402_364_209_i64)
        );
        assert_eq!(
            token_for(Partitioner::Murmur3, &2_i32.to_be_bytes()),
            Token::from(-3_248_873_570_005_575_792_i64)
        );
    }

    #[test]
    fn random_token_is_absolute_md5() {
        // md5("a") has the high bit clear
        let positive = token_for(Partitioner::Random, b"a");
        let digest = BigInt::parse_bytes(b"0cc175b9c0f1b6a831c399e269772661", 16)
            .expect("hex literal");
        assert_eq!(positive.as_bigint(), &digest);

        // md5("abc") has it set
        let negative = token_for(Partitioner::Random, b"abc");
        let digest = BigInt::parse_bytes(b"900150983cd24fb0d6963f7d28e17f72", 16)
            .expect("hex literal");
        let modulus = BigInt::from(1) << 128_u32;
        assert_eq!(negative.as_bigint(), &(modulus - digest));
    }

    #[test]
    fn random_tokens_stay_on_ring() {
        let ring = Partitioner::Random.ring();
        for key in [&b"a"[..], b"abc", b"message digest", &[0xff_u8; 64][..]] {
            assert!(ring.contains(&token_for(Partitioner::Random, key)));
        }
    }

    #[test]
    fn empty_keys_map_to_minimum_sentinel() {
        assert_eq!(token_for(Partitioner::Murmur3, &[]), Token::from(i64::MIN));
        assert_eq!(token_for(Partitioner::Random, &[]), Token::from(-1_i64));
    }

    #[test]
    fn minimum_sentinels_against_splits() {
        let murmur3 = TokenPartitioner::new(Partitioner::Murmur3, 4);
        assert_eq!(murmur3.split_for(&token_for(Partitioner::Murmur3, &[])), Some(0));

        let random = TokenPartitioner::new(Partitioner::Random, 4);
        assert_eq!(random.split_for(&token_for(Partitioner::Random, &[])), None);
    }
}
