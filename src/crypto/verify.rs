use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::{DIGEST_LEN, DerivedKey};
use crate::error::{CryptoError, Result};

/// SHA-256 of the raw key bytes, stored in the container to check the password.
pub fn key_digest(key: &DerivedKey) -> [u8; DIGEST_LEN] {
    Sha256::digest(key.as_bytes()).into()
}

/// Check `key` against the digest stored at encryption time.
///
/// The comparison runs in constant time. It only tells whether the password
/// reproduced the original key; the ciphertext itself is not authenticated.
pub fn verify_key(key: &DerivedKey, expected: &[u8; DIGEST_LEN]) -> Result<()> {
    let computed = key_digest(key);
    if bool::from(computed[..].ct_eq(&expected[..])) {
        Ok(())
    } else {
        Err(CryptoError::PasswordOrIntegrity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_key;

    #[test]
    fn digest_of_known_key() {
        let key = derive_key(b"correct horse", &[0, 1, 2, 3, 4, 5, 6, 7]).unwrap();

        assert_eq!(
            hex::encode(key_digest(&key)),
            "886e2f5f8acfdc5482d9f43cce7ee36f9b78b1902a7a77bb7986879cc93f6bc4"
        );
    }

    #[test]
    fn matching_digest_verifies() {
        let key = DerivedKey::from([3u8; 16]);
        let digest = key_digest(&key);

        assert!(verify_key(&key, &digest).is_ok());
    }

    #[test]
    fn single_bit_difference_is_rejected() {
        let key = DerivedKey::from([3u8; 16]);
        let mut digest = key_digest(&key);
        digest[31] ^= 0x01;

        assert!(matches!(
            verify_key(&key, &digest),
            Err(CryptoError::PasswordOrIntegrity)
        ));
    }
}
