use super::SALT_LEN;
use crate::error::{CryptoError, Result};
use getrandom::fill;

/// Source of the random bytes used for salts and ivs.
///
/// Production code uses [`OsRandom`]; tests substitute a deterministic source
/// to reproduce known containers.
pub trait RandomSource {
    /// Fill `buf` entirely with random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        fill(buf).map_err(|_| CryptoError::Random)
    }
}

/// Generate salt
pub fn generate_salt(rng: &mut impl RandomSource) -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)?;
    Ok(salt)
}
