//! Container format for encrypted files.
//!
//! Container layout:
//! ```text
//! SALT (8) | KEY_DIGEST (32) | IV (8) | CIPHERTEXT
//! ```
//!
//! Every field before the ciphertext has a fixed size, so there are no length
//! prefixes, no magic and no version byte.

use crate::crypto::{DIGEST_LEN, IV_LEN, SALT_LEN};
use crate::error::{CryptoError, Result};

pub mod armor;

const SALT_END: usize = SALT_LEN;
const DIGEST_END: usize = SALT_END + DIGEST_LEN;
const IV_END: usize = DIGEST_END + IV_LEN;

/// Length of the fixed header in front of the ciphertext (48 bytes).
pub const HEADER_LEN: usize = IV_END;

/// A parsed encrypted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    salt: [u8; SALT_LEN],
    key_digest: [u8; DIGEST_LEN],
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
}

impl Container {
    /// Creates a new Container from its components.
    pub fn new(
        salt: [u8; SALT_LEN],
        key_digest: [u8; DIGEST_LEN],
        iv: [u8; IV_LEN],
        ciphertext: Vec<u8>,
    ) -> Self {
        Self {
            salt,
            key_digest,
            iv,
            ciphertext,
        }
    }

    /// Returns the salt used for key derivation.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Returns the SHA-256 digest of the derived key.
    pub fn key_digest(&self) -> &[u8; DIGEST_LEN] {
        &self.key_digest
    }

    /// Returns the iv prefixing every counter block.
    pub fn iv(&self) -> &[u8; IV_LEN] {
        &self.iv
    }

    /// Returns the encrypted ciphertext.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Total serialized length.
    pub fn serialized_len(&self) -> usize {
        HEADER_LEN + self.ciphertext.len()
    }
}

/// Parses container bytes.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedContainer`] if the buffer is shorter than
/// [`HEADER_LEN`].
pub fn parse(data: &[u8]) -> Result<Container> {
    if data.len() < HEADER_LEN {
        return Err(CryptoError::MalformedContainer(format!(
            "expected at least {HEADER_LEN} bytes, got {}",
            data.len()
        )));
    }

    let (salt, rest) = data.split_at(SALT_END);
    let (key_digest, rest) = rest.split_at(DIGEST_LEN);
    let (iv, ciphertext) = rest.split_at(IV_LEN);

    Ok(Container {
        salt: fixed(salt)?,
        key_digest: fixed(key_digest)?,
        iv: fixed(iv)?,
        ciphertext: ciphertext.to_vec(),
    })
}

/// Serializes a Container to bytes.
pub fn serialize(container: &Container) -> Vec<u8> {
    let mut buf = Vec::with_capacity(container.serialized_len());

    buf.extend_from_slice(&container.salt);
    buf.extend_from_slice(&container.key_digest);
    buf.extend_from_slice(&container.iv);
    buf.extend_from_slice(&container.ciphertext);

    buf
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .try_into()
        .map_err(|_| CryptoError::MalformedContainer(format!("field must be {N} bytes")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Container {
        Container::new([1u8; 8], [2u8; 32], [3u8; 8], vec![4u8; 10])
    }

    #[test]
    fn serialize_places_fields_in_order() {
        let bytes = serialize(&sample());

        assert_eq!(bytes.len(), HEADER_LEN + 10);
        assert!(bytes[..8].iter().all(|&b| b == 1));
        assert!(bytes[8..40].iter().all(|&b| b == 2));
        assert!(bytes[40..48].iter().all(|&b| b == 3));
        assert!(bytes[48..].iter().all(|&b| b == 4));
    }

    #[test]
    fn parse_splits_at_fixed_offsets() {
        let parsed = parse(&serialize(&sample())).unwrap();

        assert_eq!(parsed, sample());
    }

    #[test]
    fn header_only_container_has_empty_ciphertext() {
        let parsed = parse(&[0u8; HEADER_LEN]).unwrap();
        assert!(parsed.ciphertext().is_empty());
    }

    #[test]
    fn too_short_fails() {
        for len in [0, 1, 40, HEADER_LEN - 1] {
            let data = vec![0u8; len];
            assert!(matches!(
                parse(&data),
                Err(CryptoError::MalformedContainer(_))
            ));
        }
    }
}
