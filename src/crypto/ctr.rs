//! AES-128 in counter mode.
//!
//! Counter block layout:
//! ```text
//! IV (8) | BLOCK_COUNTER (8, big-endian, starts at 1)
//! ```

use aes::Aes128;
use aes::cipher::{BlockEncrypt, KeyInit, generic_array::GenericArray};
use zeroize::{Zeroize, Zeroizing};

use super::{BLOCK_LEN, DerivedKey, IV_LEN, RandomSource};
use crate::error::Result;

const FIRST_COUNTER: u64 = 1;

/// XOR `data` in place with the keystream for `(key, iv)`.
///
/// Encryption and decryption are the same operation.
pub fn apply_keystream(key: &DerivedKey, iv: &[u8; IV_LEN], data: &mut [u8]) {
    let cipher = Aes128::new(GenericArray::from_slice(key.as_bytes()));

    let mut counter_block = [0u8; BLOCK_LEN];
    counter_block[..IV_LEN].copy_from_slice(iv);
    let mut counter = FIRST_COUNTER;

    for chunk in data.chunks_mut(BLOCK_LEN) {
        counter_block[IV_LEN..].copy_from_slice(&counter.to_be_bytes());

        let mut keystream = GenericArray::clone_from_slice(&counter_block);
        cipher.encrypt_block(&mut keystream);

        for (byte, k) in chunk.iter_mut().zip(keystream.iter()) {
            *byte ^= k;
        }
        keystream.as_mut_slice().zeroize();

        counter = counter.wrapping_add(1);
    }
}

/// Encrypt plaintext under a fresh random iv.
pub fn encrypt(
    key: &DerivedKey,
    plaintext: &[u8],
    rng: &mut impl RandomSource,
) -> Result<([u8; IV_LEN], Vec<u8>)> {
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv)?;

    let mut ciphertext = plaintext.to_vec();
    apply_keystream(key, &iv, &mut ciphertext);

    Ok((iv, ciphertext))
}

/// Decrypt ciphertext
pub fn decrypt(key: &DerivedKey, iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    apply_keystream(key, iv, &mut plaintext);
    plaintext
}
