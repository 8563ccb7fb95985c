//! Variable-length hash H'.
//!
//! BLAKE2b caps its digest at 64 bytes; the algorithm needs both tiny tags
//! and whole 1024-byte seed blocks. H' bridges the gap: short outputs are a
//! single digest over a length-prefixed message, long outputs chain 64-byte
//! digests and emit the first half of each, so every output byte depends on
//! the full input.

use super::{blake2b, Blake2b, MAX_DIGEST_LEN};
use crate::bytes::le32;

/// Number of bytes each intermediate digest contributes to a long output.
const HALF_DIGEST: usize = MAX_DIGEST_LEN / 2;

/// Compute `H'(parts, out.len())` over the concatenation of `parts`.
///
/// The output length is prepended to the message as a 32-bit little-endian
/// prefix, so different requested lengths never share a digest stream.
///
/// # Panics
/// Panics if `out` is empty.
pub fn blake2b_long(out: &mut [u8], parts: &[&[u8]]) {
    let out_len = out.len();
    assert!(out_len > 0, "output must not be empty");
    let prefix = le32(out_len as u32);

    if out_len <= MAX_DIGEST_LEN {
        let mut state = Blake2b::new(out_len);
        state.update(&prefix);
        for part in parts {
            state.update(part);
        }
        state.finalize(out);
        return;
    }

    // V1 = H(LE32(len) || X); V_i = H(V_{i-1}); emit 32 bytes of each, then
    // a final digest sized to the remainder.
    let mut chain = [0u8; MAX_DIGEST_LEN];
    let mut state = Blake2b::new(MAX_DIGEST_LEN);
    state.update(&prefix);
    for part in parts {
        state.update(part);
    }
    state.finalize(&mut chain);
    out[..HALF_DIGEST].copy_from_slice(&chain[..HALF_DIGEST]);

    let mut pos = HALF_DIGEST;
    let mut remaining = out_len - HALF_DIGEST;
    while remaining > MAX_DIGEST_LEN {
        let prev = chain;
        blake2b(&mut chain, &[&prev]);
        out[pos..pos + HALF_DIGEST].copy_from_slice(&chain[..HALF_DIGEST]);
        pos += HALF_DIGEST;
        remaining -= HALF_DIGEST;
    }

    let prev = chain;
    blake2b(&mut out[pos..], &[&prev]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_output_is_length_prefixed_blake2b() {
        let mut via_long = [0u8; 32];
        blake2b_long(&mut via_long, &[b"input"]);

        let mut direct = [0u8; 32];
        blake2b(&mut direct, &[&le32(32), b"input"]);
        assert_eq!(via_long, direct);
    }

    #[test]
    fn long_output_prefix_matches_first_digest() {
        let mut out = [0u8; 100];
        blake2b_long(&mut out, &[b"seed material"]);

        let mut first = [0u8; 64];
        blake2b(&mut first, &[&le32(100), b"seed material"]);
        assert_eq!(&out[..32], &first[..32]);
    }

    #[test]
    fn different_lengths_diverge_immediately() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 65];
        blake2b_long(&mut a, &[b"x"]);
        blake2b_long(&mut b, &[b"x"]);
        assert_ne!(&a[..], &b[..64]);
    }

    #[test]
    fn covers_block_sized_output() {
        // 1024 bytes is the seed-block case: 31 chained half-digests plus a
        // 32-byte tail digest.
        let mut out = [0u8; 1024];
        blake2b_long(&mut out, &[b"block seed"]);
        let mut again = [0u8; 1024];
        blake2b_long(&mut again, &[b"block seed"]);
        assert_eq!(out[..], again[..]);
        assert!(out.iter().any(|&b| b != 0));
    }

    #[test]
    fn multi_part_matches_concatenation() {
        let mut split = [0u8; 96];
        blake2b_long(&mut split, &[b"ab", b"cd"]);
        let mut joined = [0u8; 96];
        blake2b_long(&mut joined, &[b"abcd"]);
        assert_eq!(split, joined);
    }
}
