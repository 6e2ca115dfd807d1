//! Cryptographic primitives for file containers.
//!
//! Provides password-based key derivation, key verification, the AES-CTR
//! stream cipher and the random source used for salts and ivs.

pub mod ctr;
pub mod kdf;
pub mod random;
pub mod verify;

pub use ctr::{apply_keystream, decrypt, encrypt};
pub use kdf::{DerivedKey, derive_key};
pub use random::{OsRandom, RandomSource, generate_salt};
pub use verify::{key_digest, verify_key};

/// Length of the KDF salt (8 bytes).
pub const SALT_LEN: usize = 8;
/// Length of the derived AES-128 key (16 bytes).
pub const KEY_LEN: usize = 16;
/// Length of the SHA-256 key-verification digest (32 bytes).
pub const DIGEST_LEN: usize = 32;
/// Length of the per-file iv that prefixes every counter block (8 bytes).
pub const IV_LEN: usize = 8;
/// AES block size (16 bytes).
pub const BLOCK_LEN: usize = 16;
/// PBKDF2-HMAC-SHA256 iteration count. Fixed: the container has no field for it.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
