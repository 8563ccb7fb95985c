//! Constant-time comparison.
//!
//! Tag verification must not leak where the first differing byte sits, so
//! the comparison is delegated to the audited `subtle` crate rather than
//! `==` on slices. Length is treated as public.

use subtle::ConstantTimeEq;

/// Constant-time equality for byte slices.
///
/// Returns `true` iff `a` and `b` have the same length and contents. For
/// equal lengths the running time depends only on the length.
#[inline]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
