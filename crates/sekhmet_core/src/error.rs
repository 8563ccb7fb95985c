//! Unified error types for sekhmet_core.
//!
//! Every fallible public operation returns [`Result`]. The four variants of
//! [`Error`] are the only failure kinds consumers ever observe; a wrong
//! password during verification is *not* an error, it is `Ok(false)`.

use thiserror::Error;

/// Errors surfaced at the public API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A cost parameter or input violates an algorithm floor.
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParamError),

    /// An encoded hash string deviates from the
    /// `$type$v=19$m=..,t=..,p=..$salt$hash` grammar.
    #[error("malformed encoded hash: {0}")]
    InvalidEncoding(&'static str),

    /// The type name in an encoded hash is not `argon2d`, `argon2i` or
    /// `argon2id`.
    #[error("unknown algorithm type `{0}`")]
    UnsupportedType(String),

    /// The version number in an encoded hash is not 19 (0x13).
    #[error("unsupported version {0} (only 19 is accepted)")]
    UnsupportedVersion(u32),
}

/// The specific parameter floor that was violated.
///
/// Validation runs before any memory is allocated or any hashing work is
/// done, so a violation never leaves partial state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Tag length must be at least 4 bytes.
    #[error("hash length must be at least 4 bytes")]
    HashTooShort,
    /// Memory must be at least 8 KiB per lane.
    #[error("memory must be at least 8 KiB per lane")]
    MemoryTooSmall,
    /// At least one lane is required.
    #[error("parallelism must be at least 1")]
    TooFewLanes,
    /// At least one pass over memory is required.
    #[error("at least one pass over memory is required")]
    TooFewPasses,
    /// Salt must be at least 8 bytes.
    #[error("salt must be at least 8 bytes")]
    SaltTooShort,
}

/// Result type using the unified [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
