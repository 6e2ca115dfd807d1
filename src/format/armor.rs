//! Hex text encoding of containers at rest.
//!
//! Encrypted files hold the container bytes as lowercase hex, two ASCII
//! characters per byte, with no line breaks.

use crate::error::{CryptoError, Result};

/// Encode container bytes for writing to disk.
pub fn encode(container: &[u8]) -> Vec<u8> {
    hex::encode(container).into_bytes()
}

/// Decode the text of an encrypted file back into container bytes.
///
/// Leading and trailing ASCII whitespace is ignored; digits may be either case.
pub fn decode(text: &[u8]) -> Result<Vec<u8>> {
    hex::decode(text.trim_ascii())
        .map_err(|e| CryptoError::MalformedContainer(format!("invalid hex encoding: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_lowercase_hex() {
        assert_eq!(encode(&[0x00, 0xAB, 0xff]), b"00abff");
    }

    #[test]
    fn decode_accepts_trailing_newline_and_uppercase() {
        assert_eq!(decode(b"00ABff\n").unwrap(), vec![0x00, 0xab, 0xff]);
    }

    #[test]
    fn odd_length_is_malformed() {
        assert!(matches!(
            decode(b"abc"),
            Err(CryptoError::MalformedContainer(_))
        ));
    }

    #[test]
    fn non_hex_is_malformed() {
        assert!(matches!(
            decode(b"zz"),
            Err(CryptoError::MalformedContainer(_))
        ));
    }
}
