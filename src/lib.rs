//! Password-based file encryption.
//!
//! A file is encrypted into a self-contained container holding the KDF salt,
//! a digest of the derived key, the cipher iv and the ciphertext. See
//! [`format`] for the byte layout.

pub mod crypto;
mod error;
pub mod format;
pub mod job;
mod storage;

pub use crate::crypto::{OsRandom, RandomSource};
pub use crate::error::CryptoError;
pub use crate::format::Container;
pub use crate::job::{JobOptions, Operation, Summary};
pub use crate::storage::Storage;

use tracing::debug;
use zeroize::Zeroizing;

/// Encrypt `plaintext` under `password` using the OS random generator.
pub fn encrypt_file(password: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    encrypt_file_with_rng(password, plaintext, &mut OsRandom)
}

/// Encrypt `plaintext` under `password`, drawing the salt and iv from `rng`.
///
/// Returns the serialized container, `48 + plaintext.len()` bytes long.
pub fn encrypt_file_with_rng(
    password: &[u8],
    plaintext: &[u8],
    rng: &mut impl RandomSource,
) -> Result<Vec<u8>, CryptoError> {
    let salt = crypto::generate_salt(rng)?;
    let key = crypto::derive_key(password, &salt)?;
    let digest = crypto::key_digest(&key);
    let (iv, ciphertext) = crypto::encrypt(&key, plaintext, rng)?;
    drop(key);

    debug!(len = plaintext.len(), "encrypted payload");
    let container = Container::new(salt, digest, iv, ciphertext);
    Ok(format::serialize(&container))
}

/// Open a container produced by [`encrypt_file`].
///
/// # Errors
///
/// - [`CryptoError::MalformedContainer`] if `container` is shorter than the
///   fixed header.
/// - [`CryptoError::PasswordOrIntegrity`] if the password does not reproduce
///   the stored key digest. The ciphertext itself is not authenticated.
pub fn decrypt_file(password: &[u8], container: &[u8]) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let container = format::parse(container)?;
    let key = crypto::derive_key(password, container.salt())?;
    crypto::verify_key(&key, container.key_digest())?;

    debug!(len = container.ciphertext().len(), "password verified");
    Ok(crypto::decrypt(&key, container.iv(), container.ciphertext()))
}
