//! MurmurHash3 x64 128-bit, as computed by Cassandra.
//!
//! Cassandra reads tail bytes as signed and sign-extends them before
//! shifting, so keys whose length is not a multiple of 16 and whose tail
//! holds bytes >= 0x80 hash differently from the reference algorithm.

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// Both 64-bit halves of the hash of `key` with `seed`.
#[must_use]
pub fn hash3_x64_128(key: &[u8], seed: u64) -> [i64; 2] {
    let mut h1 = seed;
    let mut h2 = seed;

    let mut blocks = key.chunks_exact(16);
    for block in &mut blocks {
        let (lo, hi) = block.split_at(8);
        let k1 = u64::from_le_bytes(to_array(lo));
        let k2 = u64::from_le_bytes(to_array(hi));

        h1 ^= mix_k1(k1);
        h1 = h1.rotate_left(27).wrapping_add(h2);
        h1 = h1.wrapping_mul(5).wrapping_add(0x52dc_e729);

        h2 ^= mix_k2(k2);
        h2 = h2.rotate_left(31).wrapping_add(h1);
        h2 = h2.wrapping_mul(5).wrapping_add(0x3849_5ab5);
    }

    let tail = blocks.remainder();
    let mut k1: u64 = 0;
    let mut k2: u64 = 0;
    for (i, byte) in tail.iter().enumerate().rev() {
        let extended = sign_extend(*byte);
        if i >= 8 {
            k2 ^= extended << ((i - 8) * 8);
        } else {
            k1 ^= extended << (i * 8);
        }
    }
    if tail.len() > 8 {
        h2 ^= mix_k2(k2);
    }
    if !tail.is_empty() {
        h1 ^= mix_k1(k1);
    }

    let len = key.len() as u64;
    h1 ^= len;
    h2 ^= len;

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    h1 = fmix(h1);
    h2 = fmix(h2);

    h1 = h1.wrapping_add(h2);
    h2 = h2.wrapping_add(h1);

    [reinterpret(h1), reinterpret(h2)]
}

const fn mix_k1(k1: u64) -> u64 {
    k1.wrapping_mul(C1).rotate_left(31).wrapping_mul(C2)
}

const fn mix_k2(k2: u64) -> u64 {
    k2.wrapping_mul(C2).rotate_left(33).wrapping_mul(C1)
}

const fn fmix(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;

    k
}

fn sign_extend(byte: u8) -> u64 {
    i64::from(byte.cast_signed()).cast_unsigned()
}

const fn reinterpret(value: u64) -> i64 {
    value.cast_signed()
}

fn to_array(bytes: &[u8]) -> [u8; 8] {
    let mut out = [0; 8];
    out.copy_from_slice(bytes);
    out
}

///
/// TESTS
///
