//! Fixed vectors locking the KDF parameters, the counter layout and the
//! container byte order.

use scrypto::crypto::{self, DerivedKey, PBKDF2_ITERATIONS};
use scrypto::format::{self, HEADER_LEN};
use scrypto::{CryptoError, RandomSource, decrypt_file, encrypt_file_with_rng};

const PASSWORD: &[u8] = b"correct horse";
const SALT: [u8; 8] = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
const IV: [u8; 8] = [0xa0, 0xa1, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7];

const KEY_HEX: &str = "c1ca64dab804b30da79173379c744e05";
const DIGEST_HEX: &str = "886e2f5f8acfdc5482d9f43cce7ee36f9b78b1902a7a77bb7986879cc93f6bc4";
const HELLO_CT_HEX: &str = "a6e2f2b610";
const COUNTING_40_CT_HEX: &str =
    "ce869cd97b991cde10dfb43bc10593d939bed4183894e94c55462e75745702483575b48a26e9f40a";

/// Hands out the salt, then the iv.
struct Fixed {
    queue: Vec<u8>,
}

impl Fixed {
    fn new() -> Self {
        let mut queue = SALT.to_vec();
        queue.extend_from_slice(&IV);
        Self { queue }
    }
}

impl RandomSource for Fixed {
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        assert!(buf.len() <= self.queue.len(), "fixed source exhausted");
        let rest = self.queue.split_off(buf.len());
        buf.copy_from_slice(&self.queue);
        self.queue = rest;
        Ok(())
    }
}

fn golden_key() -> DerivedKey {
    crypto::derive_key(PASSWORD, &SALT).unwrap()
}

#[test]
fn iteration_count_is_fixed() {
    assert_eq!(PBKDF2_ITERATIONS, 100_000);
}

#[test]
fn derived_key_matches_vector() {
    assert_eq!(hex::encode(golden_key().as_bytes()), KEY_HEX);
}

#[test]
fn key_digest_matches_vector() {
    assert_eq!(hex::encode(crypto::key_digest(&golden_key())), DIGEST_HEX);
}

#[test]
fn counter_starts_at_one_and_increments_per_block() {
    let mut data: Vec<u8> = (0u8..40).collect();
    crypto::apply_keystream(&golden_key(), &IV, &mut data);

    assert_eq!(hex::encode(&data), COUNTING_40_CT_HEX);
}

#[test]
fn container_matches_vector() {
    let container = encrypt_file_with_rng(PASSWORD, b"hello", &mut Fixed::new()).unwrap();

    let expected = format!(
        "{}{}{}{}",
        hex::encode(SALT),
        DIGEST_HEX,
        hex::encode(IV),
        HELLO_CT_HEX
    );
    assert_eq!(hex::encode(&container), expected);
    assert_eq!(container.len(), HEADER_LEN + 5);
}

#[test]
fn vector_container_decrypts() {
    let container = hex::decode(format!(
        "{}{}{}{}",
        hex::encode(SALT),
        DIGEST_HEX,
        hex::encode(IV),
        HELLO_CT_HEX
    ))
    .unwrap();

    let plaintext = decrypt_file(PASSWORD, &container).unwrap();
    assert_eq!(plaintext.as_slice(), b"hello");

    let parsed = format::parse(&container).unwrap();
    assert_eq!(parsed.salt(), &SALT);
    assert_eq!(parsed.iv(), &IV);
    assert_eq!(hex::encode(parsed.ciphertext()), HELLO_CT_HEX);
}
