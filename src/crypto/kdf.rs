use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroize;

use super::{KEY_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::{CryptoError, Result};

/// A 16-byte AES key derived from a password.
///
/// Lives only for the duration of one encrypt or decrypt call and is zeroed
/// when dropped.
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

#[cfg(test)]
impl From<[u8; KEY_LEN]> for DerivedKey {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

/// Derive the file key from a password with PBKDF2-HMAC-SHA256.
///
/// Always runs [`PBKDF2_ITERATIONS`] rounds and is deterministic: decryption
/// reproduces the encryption key from the salt stored in the container.
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Result<DerivedKey> {
    let mut key = DerivedKey([0u8; KEY_LEN]);
    pbkdf2::<Hmac<Sha256>>(password, salt, PBKDF2_ITERATIONS, &mut key.0)
        .map_err(|e| CryptoError::InvalidArgument(format!("PBKDF2 failed: {e}")))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; SALT_LEN];

        let k1 = derive_key(b"password", &salt).unwrap();
        let k2 = derive_key(b"password", &salt).unwrap();

        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn different_salts_give_different_keys() {
        let k1 = derive_key(b"pw", &[7u8; SALT_LEN]).unwrap();
        let k2 = derive_key(b"pw", &[8u8; SALT_LEN]).unwrap();

        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn known_key_for_correct_horse() {
        let salt = [0, 1, 2, 3, 4, 5, 6, 7];
        let key = derive_key(b"correct horse", &salt).unwrap();

        assert_eq!(hex::encode(key.as_bytes()), "c1ca64dab804b30da79173379c744e05");
    }

    #[test]
    fn debug_does_not_leak_key() {
        let key = DerivedKey::from([0xAB; KEY_LEN]);
        assert_eq!(format!("{key:?}"), "DerivedKey([REDACTED])");
    }
}
