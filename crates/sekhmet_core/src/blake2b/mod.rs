//! BLAKE2b (RFC 7693) with per-call digest length.
//!
//! The algorithm uses BLAKE2b in two roles: a fixed 64-byte digest for the
//! initial entropy hash H0, and digests of every length from 1 to 64 bytes
//! inside the variable-length expansion in [`long`]. Only the unkeyed form
//! is needed (no salt, no personalization, no tree hashing), so the
//! parameter block collapses to the digest length and the fanout/depth word.

pub mod long;

/// Size of one message block in bytes.
pub const BLOCK_BYTES: usize = 128;

/// Largest digest a single BLAKE2b invocation can produce.
pub const MAX_DIGEST_LEN: usize = 64;

/// Initialization vector (the SHA-512 IV).
const IV: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

/// Message word schedule. Rows 10 and 11 repeat rows 0 and 1.
const SIGMA: [[usize; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

/// G mixing function.
#[inline(always)]
fn mix(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

/// Compress one 128-byte block into the chain value.
///
/// `counter` is the total number of message bytes absorbed so far, including
/// this block; `last` marks the final block, which sets the finalization
/// word to all ones.
fn compress(h: &mut [u64; 8], block: &[u8; BLOCK_BYTES], counter: u128, last: bool) {
    let mut m = [0u64; 16];
    crate::bytes::words_from_le_bytes(block, &mut m);

    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..].copy_from_slice(&IV);
    v[12] ^= counter as u64;
    v[13] ^= (counter >> 64) as u64;
    if last {
        v[14] = !v[14];
    }

    for s in &SIGMA {
        mix(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
        mix(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
        mix(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
        mix(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
        mix(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
        mix(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
        mix(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
        mix(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
    }

    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

/// Incremental BLAKE2b state.
pub struct Blake2b {
    h: [u64; 8],
    buf: [u8; BLOCK_BYTES],
    buf_len: usize,
    counter: u128,
    digest_len: usize,
}

impl Blake2b {
    /// Start a new hash producing `digest_len` bytes.
    ///
    /// # Panics
    /// Panics unless `1 <= digest_len <= 64`.
    pub fn new(digest_len: usize) -> Self {
        assert!(
            (1..=MAX_DIGEST_LEN).contains(&digest_len),
            "digest length out of range"
        );
        let mut h = IV;
        // Parameter block: digest length, no key, fanout = depth = 1.
        h[0] ^= 0x0101_0000 ^ digest_len as u64;
        Self {
            h,
            buf: [0u8; BLOCK_BYTES],
            buf_len: 0,
            counter: 0,
            digest_len,
        }
    }

    /// Absorb message bytes.
    pub fn update(&mut self, mut data: &[u8]) {
        // The final block must be compressed with the finalization flag, so
        // a full buffer is only flushed once more input arrives.
        if self.buf_len + data.len() > BLOCK_BYTES {
            let fill = BLOCK_BYTES - self.buf_len;
            self.buf[self.buf_len..].copy_from_slice(&data[..fill]);
            self.counter += BLOCK_BYTES as u128;
            let block = self.buf;
            compress(&mut self.h, &block, self.counter, false);
            self.buf_len = 0;
            data = &data[fill..];

            while data.len() > BLOCK_BYTES {
                self.counter += BLOCK_BYTES as u128;
                let mut block = [0u8; BLOCK_BYTES];
                block.copy_from_slice(&data[..BLOCK_BYTES]);
                compress(&mut self.h, &block, self.counter, false);
                data = &data[BLOCK_BYTES..];
            }
        }
        self.buf[self.buf_len..self.buf_len + data.len()].copy_from_slice(data);
        self.buf_len += data.len();
    }

    /// Finish the hash and write the digest.
    ///
    /// # Panics
    /// Panics unless `out.len()` equals the digest length chosen at
    /// construction.
    pub fn finalize(mut self, out: &mut [u8]) {
        assert_eq!(out.len(), self.digest_len, "output length mismatch");
        self.counter += self.buf_len as u128;
        self.buf[self.buf_len..].fill(0);
        let block = self.buf;
        compress(&mut self.h, &block, self.counter, true);

        let mut chain = [0u8; MAX_DIGEST_LEN];
        crate::bytes::words_to_le_bytes(&self.h, &mut chain);
        out.copy_from_slice(&chain[..self.digest_len]);
    }
}

/// One-shot BLAKE2b over the concatenation of `parts`, with the digest
/// length given by `out.len()`.
pub fn blake2b(out: &mut [u8], parts: &[&[u8]]) {
    let mut state = Blake2b::new(out.len());
    for part in parts {
        state.update(part);
    }
    state.finalize(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn blake2b_512_empty() {
        let mut out = [0u8; 64];
        blake2b(&mut out, &[b""]);
        assert_eq!(
            hex(&out),
            "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419\
             d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce"
        );
    }

    #[test]
    fn blake2b_512_abc() {
        let mut out = [0u8; 64];
        blake2b(&mut out, &[b"abc"]);
        assert_eq!(
            hex(&out),
            "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d1\
             7d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923"
        );
    }

    #[test]
    fn blake2b_256_abc() {
        // Shorter digests change the parameter block, they are not prefixes
        // of the 512-bit digest.
        let mut out = [0u8; 32];
        blake2b(&mut out, &[b"abc"]);
        assert_eq!(
            hex(&out),
            "bddd813c634239723171ef3fee98579b94964e3bb1cb3e427262c8c068d52319"
        );
    }

    #[test]
    fn split_updates_match_one_shot() {
        let data: Vec<u8> = (0u16..517).map(|i| (i % 251) as u8).collect();
        let mut whole = [0u8; 64];
        blake2b(&mut whole, &[&data]);

        for split in [1, 63, 128, 129, 300] {
            let mut state = Blake2b::new(64);
            state.update(&data[..split]);
            state.update(&data[split..]);
            let mut pieces = [0u8; 64];
            state.finalize(&mut pieces);
            assert_eq!(pieces, whole, "split at {}", split);
        }
    }

    #[test]
    fn exact_block_boundary() {
        let data = [0xABu8; BLOCK_BYTES];
        let mut a = [0u8; 64];
        blake2b(&mut a, &[&data]);

        let mut state = Blake2b::new(64);
        state.update(&data);
        let mut b = [0u8; 64];
        state.finalize(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "digest length out of range")]
    fn zero_digest_rejected() {
        let _ = Blake2b::new(0);
    }

    #[test]
    #[should_panic(expected = "digest length out of range")]
    fn oversized_digest_rejected() {
        let _ = Blake2b::new(65);
    }
}
