//! The hashing engine: orchestration from raw inputs to tag.
//!
//! A hash runs in four phases. The entropy phase digests every parameter
//! and input into the 64-byte H0. Seeding expands H0 into the first two
//! blocks of every lane. Filling sweeps the matrix `passes` times, four
//! barrier-separated slices per pass, one worker per lane per slice.
//! Finalization XOR-folds the last column across lanes and expands it into
//! the tag.

pub(crate) mod segment;

use std::sync::Arc;

use zeroize::Zeroize;

use crate::blake2b::long::blake2b_long;
use crate::blake2b::Blake2b;
use crate::block::{Block, BLOCK_BYTES};
use crate::bytes::le32;
use crate::ct::ct_eq;
use crate::encoding;
use crate::error::{Error, ParamError, Result};
use crate::executor::{Executor, Job, ScopedThreadExecutor, SequentialExecutor};
use crate::memory::Memory;
use crate::params::{Params, SYNC_POINTS, VERSION};

use segment::{fill_segment, Dimensions};

/// A configured Argon2 instance.
///
/// Construction validates the cost parameters once; afterwards the engine
/// can hash and verify any number of `(password, salt)` pairs. All
/// operations are blocking; callers that need timeouts or cancellation wrap
/// the call on their side.
pub struct Engine {
    params: Params,
    dims: Dimensions,
    executor: Arc<dyn Executor>,
}

impl Engine {
    /// Build an engine with the default substrate: scoped threads when more
    /// than one lane exists, in-place execution otherwise.
    pub fn new(params: Params) -> Result<Self> {
        let executor: Arc<dyn Executor> = if params.lanes > 1 {
            Arc::new(ScopedThreadExecutor)
        } else {
            Arc::new(SequentialExecutor)
        };
        Self::with_executor(params, executor)
    }

    /// Build an engine running lane workers on the given substrate.
    pub fn with_executor(params: Params, executor: Arc<dyn Executor>) -> Result<Self> {
        params.validate()?;
        let block_count = params.block_count();
        let lane_length = block_count / params.lanes;
        let dims = Dimensions {
            lanes: params.lanes,
            lane_length,
            segment_length: lane_length / SYNC_POINTS,
            block_count,
            passes: params.passes,
            variant: params.variant,
        };
        Ok(Self { params, dims, executor })
    }

    /// The validated parameters this engine runs with.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Derive the raw tag for `password` under `salt`.
    pub fn hash(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        let secret = self.params.secret.as_ref().map(|s| s.as_bytes());
        let ad = self.params.ad.as_deref();
        self.run(password, salt, secret, ad)
    }

    /// Like [`Self::hash`], overriding the engine's default secret and
    /// associated data for this call only.
    pub fn hash_with(
        &self,
        password: &[u8],
        salt: &[u8],
        secret: Option<&[u8]>,
        ad: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        self.run(password, salt, secret, ad)
    }

    /// Derive the tag and format it as a `$argon2..$` string.
    pub fn hash_encoded(&self, password: &[u8], salt: &[u8]) -> Result<String> {
        let tag = self.hash(password, salt)?;
        Ok(encoding::encode_string(
            self.params.variant,
            self.params.memory_kib,
            self.params.passes,
            self.params.lanes,
            salt,
            &tag,
        ))
    }

    /// Recompute the tag for `(password, salt)` and compare it against
    /// `expected` in constant time.
    pub fn verify(&self, expected: &[u8], password: &[u8], salt: &[u8]) -> Result<bool> {
        let mut tag = self.hash(password, salt)?;
        let matches = ct_eq(&tag, expected);
        tag.zeroize();
        Ok(matches)
    }

    /// Verify a password against an encoded hash string, reconstructing
    /// every parameter from the string itself.
    ///
    /// Malformed strings are errors; a well-formed string whose tag does not
    /// match yields `Ok(false)`.
    pub fn verify_encoded(encoded: &str, password: &[u8]) -> Result<bool> {
        Self::verify_encoded_with(encoded, password, None, None)
    }

    /// Like [`Self::verify_encoded`] with a secret key and associated data.
    pub fn verify_encoded_with(
        encoded: &str,
        password: &[u8],
        secret: Option<&[u8]>,
        ad: Option<&[u8]>,
    ) -> Result<bool> {
        let decoded = encoding::decode_string(encoded)?;
        let params = Params {
            hash_length: decoded.tag.len() as u32,
            lanes: decoded.lanes,
            memory_kib: decoded.memory_kib,
            passes: decoded.passes,
            variant: decoded.variant,
            secret: None,
            ad: None,
        };
        let engine = Self::new(params)?;
        let mut tag = engine.run(password, &decoded.salt, secret, ad)?;
        let matches = ct_eq(&tag, &decoded.tag);
        tag.zeroize();
        Ok(matches)
    }

    fn run(
        &self,
        password: &[u8],
        salt: &[u8],
        secret: Option<&[u8]>,
        ad: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        if salt.len() < 8 {
            return Err(Error::InvalidParameter(ParamError::SaltTooShort));
        }

        let mut h0 = self.initial_hash(password, salt, secret, ad);
        let mut memory = Memory::new(self.dims.lanes, self.dims.lane_length);
        self.seed_first_blocks(&mut memory, &h0);
        h0.zeroize();

        self.fill(&mut memory);
        Ok(self.finalize(&memory))
    }

    /// H0: a 64-byte digest binding every parameter and input, each
    /// variable-length field prefixed with its length.
    fn initial_hash(
        &self,
        password: &[u8],
        salt: &[u8],
        secret: Option<&[u8]>,
        ad: Option<&[u8]>,
    ) -> [u8; 64] {
        let secret = secret.unwrap_or(&[]);
        let ad = ad.unwrap_or(&[]);

        let mut state = Blake2b::new(64);
        state.update(&le32(self.params.lanes));
        state.update(&le32(self.params.hash_length));
        // The truncated block count, so that a request of m KiB and one of
        // m - m % 4p KiB produce identical tags.
        state.update(&le32(self.dims.block_count));
        state.update(&le32(self.params.passes));
        state.update(&le32(VERSION));
        state.update(&le32(self.params.variant.as_u32()));
        state.update(&le32(password.len() as u32));
        state.update(password);
        state.update(&le32(salt.len() as u32));
        state.update(salt);
        state.update(&le32(secret.len() as u32));
        state.update(secret);
        state.update(&le32(ad.len() as u32));
        state.update(ad);

        let mut h0 = [0u8; 64];
        state.finalize(&mut h0);
        h0
    }

    /// Expand H0 into columns 0 and 1 of every lane:
    /// `B[l][c] = H'(H0 || LE32(c) || LE32(l))`.
    fn seed_first_blocks(&self, memory: &mut Memory, h0: &[u8; 64]) {
        let mut seed = [0u8; BLOCK_BYTES];
        for lane in 0..self.dims.lanes {
            for column in 0..2u32 {
                blake2b_long(&mut seed, &[h0, &le32(column), &le32(lane)]);
                *memory.block_mut(lane, column) = Block::from_bytes(&seed);
            }
        }
        seed.zeroize();
    }

    /// The pass/slice schedule. Each slice dispatches one job per lane and
    /// the executor's return is the barrier that publishes all writes.
    fn fill(&self, memory: &mut Memory) {
        let view = memory.view();
        let dims = self.dims;
        for pass in 0..dims.passes {
            for slice in 0..SYNC_POINTS {
                let jobs: Vec<Job<'_>> = (0..dims.lanes)
                    .map(|lane| {
                        Box::new(move || fill_segment(&view, &dims, pass, slice, lane)) as Job<'_>
                    })
                    .collect();
                self.executor.run(jobs);
            }
        }
    }

    /// XOR the last column across lanes and expand it into the tag.
    fn finalize(&self, memory: &Memory) -> Vec<u8> {
        let last = self.dims.lane_length - 1;
        let mut fold = memory.block(0, last).clone();
        for lane in 1..self.dims.lanes {
            fold.xor_assign(memory.block(lane, last));
        }

        let mut fold_bytes = [0u8; BLOCK_BYTES];
        fold.write_bytes(&mut fold_bytes);
        fold.0.zeroize();

        let mut tag = vec![0u8; self.params.hash_length as usize];
        blake2b_long(&mut tag, &[&fold_bytes]);
        fold_bytes.zeroize();
        tag
    }
}
