//! The 1 KiB memory block and the compression function G.
//!
//! A block is 128 little-endian 64-bit words. G XORs two blocks, runs the
//! round permutation P over the result twice (first on rows of 16
//! consecutive words, then on interleaved column groups) and folds the
//! pre-permutation value back in. P is the BLAKE2b round with the message
//! additions replaced by a widening low-32-bit multiplication, which is what
//! makes the function expensive on hardware without fast 64-bit multipliers.

/// Words per block.
pub(crate) const BLOCK_WORDS: usize = 128;

/// Bytes per block.
pub(crate) const BLOCK_BYTES: usize = 1024;

/// A 1024-byte matrix cell.
#[derive(Clone)]
pub(crate) struct Block(pub(crate) [u64; BLOCK_WORDS]);

impl Block {
    pub(crate) const ZERO: Self = Self([0u64; BLOCK_WORDS]);

    /// First word, the pseudo-random source for data-dependent addressing.
    #[inline]
    pub(crate) fn first_word(&self) -> u64 {
        self.0[0]
    }

    /// XOR another block into this one.
    pub(crate) fn xor_assign(&mut self, other: &Block) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a ^= b;
        }
    }

    /// Build a block from its little-endian byte image.
    pub(crate) fn from_bytes(bytes: &[u8; BLOCK_BYTES]) -> Self {
        let mut block = Block::ZERO;
        crate::bytes::words_from_le_bytes(bytes, &mut block.0);
        block
    }

    /// Write the little-endian byte image of this block.
    pub(crate) fn write_bytes(&self, out: &mut [u8; BLOCK_BYTES]) {
        crate::bytes::words_to_le_bytes(&self.0, out);
    }
}

/// The multiply-augmented mixing step: `a + b + 2 * lo32(a) * lo32(b)`,
/// all arithmetic modulo 2^64.
#[inline(always)]
fn mul_add(a: u64, b: u64) -> u64 {
    let product = (a as u32 as u64).wrapping_mul(b as u32 as u64);
    a.wrapping_add(b).wrapping_add(product.wrapping_add(product))
}

/// Quarter-round of the permutation P.
#[inline(always)]
fn mix(a: u64, b: u64, c: u64, d: u64) -> (u64, u64, u64, u64) {
    let a = mul_add(a, b);
    let d = (d ^ a).rotate_right(32);
    let c = mul_add(c, d);
    let b = (b ^ c).rotate_right(24);
    let a = mul_add(a, b);
    let d = (d ^ a).rotate_right(16);
    let c = mul_add(c, d);
    let b = (b ^ c).rotate_right(63);
    (a, b, c, d)
}

/// Round permutation P over a 4x4 matrix of words: columns, then diagonals.
#[inline(always)]
fn permute(v: &mut [u64; 16]) {
    (v[0], v[4], v[8], v[12]) = mix(v[0], v[4], v[8], v[12]);
    (v[1], v[5], v[9], v[13]) = mix(v[1], v[5], v[9], v[13]);
    (v[2], v[6], v[10], v[14]) = mix(v[2], v[6], v[10], v[14]);
    (v[3], v[7], v[11], v[15]) = mix(v[3], v[7], v[11], v[15]);

    (v[0], v[5], v[10], v[15]) = mix(v[0], v[5], v[10], v[15]);
    (v[1], v[6], v[11], v[12]) = mix(v[1], v[6], v[11], v[12]);
    (v[2], v[7], v[8], v[13]) = mix(v[2], v[7], v[8], v[13]);
    (v[3], v[4], v[9], v[14]) = mix(v[3], v[4], v[9], v[14]);
}

/// Word offsets of the i-th column group: pairs at stride 16.
#[inline(always)]
fn column_offsets(i: usize) -> [usize; 16] {
    let base = 2 * i;
    [
        base,
        base + 1,
        base + 16,
        base + 17,
        base + 32,
        base + 33,
        base + 48,
        base + 49,
        base + 64,
        base + 65,
        base + 80,
        base + 81,
        base + 96,
        base + 97,
        base + 112,
        base + 113,
    ]
}

/// Compression function G with optional feedback XOR.
///
/// Computes `next = P2(prev ^ reference) ^ prev ^ reference`, additionally
/// XORing the previous contents of `next` into the result when `with_xor`
/// is set (used on every pass after the first, where blocks are overwritten
/// rather than first written).
pub(crate) fn fill_block(prev: &Block, reference: &Block, next: &mut Block, with_xor: bool) {
    let mut work = prev.clone();
    work.xor_assign(reference);

    // Baseline folded back in after the permutation; on later passes the
    // old block contents join it here.
    let mut base = work.clone();
    if with_xor {
        base.xor_assign(next);
    }

    for i in 0..8 {
        let mut v: [u64; 16] = work.0[16 * i..16 * i + 16].try_into().unwrap();
        permute(&mut v);
        work.0[16 * i..16 * i + 16].copy_from_slice(&v);
    }

    for i in 0..8 {
        let offsets = column_offsets(i);
        let mut v = [0u64; 16];
        for (slot, &off) in v.iter_mut().zip(offsets.iter()) {
            *slot = work.0[off];
        }
        permute(&mut v);
        for (slot, &off) in v.iter().zip(offsets.iter()) {
            work.0[off] = *slot;
        }
    }

    for i in 0..BLOCK_WORDS {
        next.0[i] = base.0[i] ^ work.0[i];
    }
}
