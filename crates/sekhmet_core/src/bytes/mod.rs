//! Byte-level utilities: little-endian codecs and secret buffers.
//!
//! Everything in the algorithm is little-endian: 32-bit length prefixes in
//! the initial hash, 64-bit words inside blocks, and the byte images of
//! blocks fed back into BLAKE2b. The word codecs here are the only place the
//! crate converts between the two representations.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Encode a 32-bit integer as 4 little-endian bytes.
#[inline]
pub fn le32(word: u32) -> [u8; 4] {
    word.to_le_bytes()
}

/// Load a 32-bit little-endian integer from the front of a slice.
///
/// # Panics
/// Panics if the slice is shorter than 4 bytes.
#[inline]
pub fn load_le32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Load a 64-bit little-endian integer from the front of a slice.
///
/// # Panics
/// Panics if the slice is shorter than 8 bytes.
#[inline]
pub fn load_le64(bytes: &[u8]) -> u64 {
    u64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}

/// Store a 64-bit integer as little-endian bytes at the front of a slice.
///
/// # Panics
/// Panics if the slice is shorter than 8 bytes.
#[inline]
pub fn store_le64(word: u64, bytes: &mut [u8]) {
    bytes[..8].copy_from_slice(&word.to_le_bytes());
}

/// Decode a byte buffer into 64-bit words, least-significant byte first.
///
/// # Panics
/// Panics unless `bytes.len() == 8 * words.len()`.
pub fn words_from_le_bytes(bytes: &[u8], words: &mut [u64]) {
    assert_eq!(bytes.len(), 8 * words.len(), "byte length must be 8x word count");
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
        *word = load_le64(chunk);
    }
}

/// Encode 64-bit words into a byte buffer, least-significant byte first.
///
/// # Panics
/// Panics unless `bytes.len() == 8 * words.len()`.
pub fn words_to_le_bytes(words: &[u64], bytes: &mut [u8]) {
    assert_eq!(bytes.len(), 8 * words.len(), "byte length must be 8x word count");
    for (word, chunk) in words.iter().zip(bytes.chunks_exact_mut(8)) {
        store_le64(*word, chunk);
    }
}

/// An owned byte buffer that is wiped on drop.
///
/// Used for the optional secret key carried by
/// [`Params`](crate::params::Params); keeping the wipe on the container means
/// cost parameters stay plain data that can be freely copied around.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretBuf(Vec<u8>);

impl SecretBuf {
    /// Wrap existing bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the underlying bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for SecretBuf {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for SecretBuf {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for SecretBuf {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuf({} bytes)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn le32_matches_manual_layout() {
        assert_eq!(le32(0x04030201), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(load_le32(&[0x01, 0x02, 0x03, 0x04]), 0x04030201);
    }

    #[test]
    fn le64_round_trip() {
        let mut buf = [0u8; 8];
        store_le64(0xDEADBEEF_CAFEBABE, &mut buf);
        assert_eq!(load_le64(&buf), 0xDEADBEEF_CAFEBABE);
    }

    #[test]
    fn word_codec_round_trip() {
        let words = [0u64, 1, u64::MAX, 0x0123_4567_89AB_CDEF];
        let mut bytes = [0u8; 32];
        words_to_le_bytes(&words, &mut bytes);
        let mut back = [0u64; 4];
        words_from_le_bytes(&bytes, &mut back);
        assert_eq!(back, words);
    }

    #[test]
    #[should_panic(expected = "8x word count")]
    fn word_decoder_rejects_ragged_input() {
        let mut words = [0u64; 2];
        words_from_le_bytes(&[0u8; 12], &mut words);
    }

    #[test]
    fn secret_buf_redacts_debug() {
        let secret = SecretBuf::new(b"hunter2".as_slice());
        assert_eq!(format!("{:?}", secret), "SecretBuf(7 bytes)");
        assert_eq!(secret.as_bytes(), b"hunter2");
    }
}
