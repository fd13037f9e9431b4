//! Master seeds

use crate::{Error, Result};
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Minimum seed length in bytes (128 bits).
pub const MIN_SEED_LEN: usize = 16;

/// Maximum seed length in bytes (512 bits).
pub const MAX_SEED_LEN: usize = 64;

/// Recommended seed length in bytes (256 bits).
pub const RECOMMENDED_SEED_LEN: usize = 32;

/// Master seed bytes, wiped on drop.
pub struct Seed(Vec<u8>);

impl Seed {
    /// Create a new seed from the given bytes.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        check_len(bytes.len())?;
        Ok(Seed(bytes))
    }

    /// Draws `len` bytes from `rng`.
    pub fn generate_with<R>(rng: &mut R, len: usize) -> Result<Self>
    where
        R: CryptoRng + RngCore,
    {
        check_len(len)?;
        let mut bytes = vec![0u8; len];
        rng.try_fill_bytes(&mut bytes)?;
        Ok(Seed(bytes))
    }

    /// Get the inner secret byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Generates a cryptographically random seed of `len` bytes from the
/// operating system's entropy source.
///
/// `len` must lie within [`MIN_SEED_LEN`]..=[`MAX_SEED_LEN`];
/// [`RECOMMENDED_SEED_LEN`] is a sensible default.
pub fn generate_seed(len: usize) -> Result<Seed> {
    Seed::generate_with(&mut OsRng, len)
}

pub(crate) fn check_len(len: usize) -> Result<()> {
    if (MIN_SEED_LEN..=MAX_SEED_LEN).contains(&len) { Ok(()) } else { Err(Error::InvalidSeedLength(len)) }
}
