//! # sekhmet_core
//!
//! Memory-hard password hashing: Argon2d, Argon2i and Argon2id, version
//! 0x13, as specified by RFC 9106. Pure Rust, no algorithm code pulled in
//! from other crates; the ambient stack is limited to audited utility
//! crates (`subtle` for constant-time comparison, `zeroize` for secret
//! wiping, `crossbeam-utils` for scoped lane workers, `base64` for the
//! encoded string format).
//!
//! ## Usage
//!
//! ```
//! use sekhmet_core::{Engine, Params, Variant};
//!
//! let params = Params {
//!     memory_kib: 256,
//!     passes: 2,
//!     variant: Variant::Argon2id,
//!     ..Params::default()
//! };
//! let engine = Engine::new(params)?;
//!
//! let encoded = engine.hash_encoded(b"password", b"somesalt")?;
//! assert!(Engine::verify_encoded(&encoded, b"password")?);
//! # Ok::<(), sekhmet_core::Error>(())
//! ```
//!
//! ## Concurrency
//!
//! Lanes are filled by one worker each, four barrier-separated slices per
//! pass. The substrate running those workers is injectable: see
//! [`executor::Executor`]. The default spawns scoped threads when more than
//! one lane is configured and runs in place otherwise.

#![deny(missing_docs)]
#![warn(clippy::all)]

/// Unified error types.
pub mod error;

/// Byte-level utilities: little-endian codecs and secret buffers.
pub mod bytes;

/// Constant-time comparison, built on the audited `subtle` crate.
pub mod ct;

/// BLAKE2b and the variable-length expansion H'.
pub mod blake2b;

/// Algorithm variants and cost parameters.
pub mod params;

/// Injectable concurrency substrate for lane workers.
pub mod executor;

/// Producing and parsing `$argon2..$` encoded hash strings.
pub mod encoding;

pub(crate) mod address;
pub(crate) mod block;
pub(crate) mod memory;

mod engine;

pub use engine::Engine;
pub use error::{Error, ParamError, Result};
pub use params::{Params, Variant, VERSION};

/// Commonly used types.
pub mod prelude {
    pub use crate::encoding::{decode_string, Decoded};
    pub use crate::error::{Error, ParamError, Result};
    pub use crate::executor::{Executor, ScopedThreadExecutor, SequentialExecutor};
    pub use crate::params::{Params, Variant};
    pub use crate::Engine;
}
