//! Algorithm variants and cost parameters.

use core::fmt;

use crate::bytes::SecretBuf;
use crate::error::ParamError;

/// Argon2 version implemented by this crate (0x13, serialized as `v=19`).
pub const VERSION: u32 = 0x13;

/// Number of synchronization points (slices) per lane. Fixed by the
/// algorithm; every lane is filled in four barrier-separated segments.
pub(crate) const SYNC_POINTS: u32 = 4;

/// The three Argon2 flavors.
///
/// They differ only in how reference-block indices are derived during memory
/// filling: from previously written memory (`Argon2d`), from a counter
/// (`Argon2i`), or a hybrid that starts data-independent and switches to
/// data-dependent halfway through the first pass (`Argon2id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Data-dependent addressing. Strongest time-memory trade-off
    /// resistance, no side-channel protection.
    Argon2d,
    /// Data-independent addressing throughout.
    Argon2i,
    /// Data-independent for the first two slices of the first pass, then
    /// data-dependent. The recommended default.
    Argon2id,
}

impl Variant {
    /// Numeric type tag mixed into H0 and into address-block seeding.
    pub const fn as_u32(self) -> u32 {
        match self {
            Variant::Argon2d => 0,
            Variant::Argon2i => 1,
            Variant::Argon2id => 2,
        }
    }

    /// Same tag widened for direct placement in a block word.
    pub(crate) const fn as_u64(self) -> u64 {
        self.as_u32() as u64
    }

    /// Canonical lowercase name used in encoded hash strings.
    pub const fn as_name(self) -> &'static str {
        match self {
            Variant::Argon2d => "argon2d",
            Variant::Argon2i => "argon2i",
            Variant::Argon2id => "argon2id",
        }
    }

    /// Parse a canonical name. Returns `None` for anything else, including
    /// case variations.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "argon2d" => Some(Variant::Argon2d),
            "argon2i" => Some(Variant::Argon2i),
            "argon2id" => Some(Variant::Argon2id),
            _ => None,
        }
    }
}

/// Cost parameters and keyed-hashing inputs, immutable per engine.
///
/// `secret` and `ad` are engine-wide defaults mixed into every hash. The
/// secret rides in a [`SecretBuf`] and is wiped when dropped.
#[derive(Clone)]
pub struct Params {
    /// Length of the output tag in bytes. Floor: 4.
    pub hash_length: u32,
    /// Degree of parallelism (number of lanes). Floor: 1.
    pub lanes: u32,
    /// Requested memory in KiB. Floor: `8 * lanes`. The engine truncates
    /// this down to a multiple of `4 * lanes` blocks.
    pub memory_kib: u32,
    /// Number of passes over the whole matrix. Floor: 1.
    pub passes: u32,
    /// Which addressing flavor to run.
    pub variant: Variant,
    /// Optional secret key for keyed hashing.
    pub secret: Option<SecretBuf>,
    /// Optional associated data bound into the tag.
    pub ad: Option<Vec<u8>>,
}

impl Params {
    /// Check all parameter floors. Called by the engine before any memory is
    /// allocated.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.lanes < 1 {
            return Err(ParamError::TooFewLanes);
        }
        if self.passes < 1 {
            return Err(ParamError::TooFewPasses);
        }
        if self.hash_length < 4 {
            return Err(ParamError::HashTooShort);
        }
        if self.memory_kib < 8 * self.lanes {
            return Err(ParamError::MemoryTooSmall);
        }
        Ok(())
    }

    /// Number of 1 KiB blocks actually used: the request truncated down to a
    /// multiple of `4 * lanes`.
    pub(crate) fn block_count(&self) -> u32 {
        let granularity = SYNC_POINTS * self.lanes;
        (self.memory_kib / granularity) * granularity
    }
}

impl Default for Params {
    /// 64 MiB, 3 passes, 1 lane, 32-byte tag, Argon2id.
    fn default() -> Self {
        Self {
            hash_length: 32,
            lanes: 1,
            memory_kib: 64 * 1024,
            passes: 3,
            variant: Variant::Argon2id,
            secret: None,
            ad: None,
        }
    }
}

impl fmt::Debug for Params {
    // Keyed-hashing inputs never reach logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("hash_length", &self.hash_length)
            .field("lanes", &self.lanes)
            .field("memory_kib", &self.memory_kib)
            .field("passes", &self.passes)
            .field("variant", &self.variant)
            .field("secret", &self.secret)
            .field("ad", &self.ad.as_ref().map(|a| a.len()))
            .finish()
    }
}
