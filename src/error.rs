use thiserror::Error;

/// Errors raised by the cryptographic core.
///
/// The file layer wraps these in [`anyhow::Error`]; callers that need to tell
/// the kinds apart can `downcast_ref::<CryptoError>()`.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The buffer is too short to hold the fixed header fields, or it is not
    /// valid hex at the storage boundary.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// The derived key does not match the stored verification digest.
    ///
    /// The digest covers only the key, so a wrong password and a damaged
    /// header are indistinguishable.
    #[error("incorrect password or file tampered with")]
    PasswordOrIntegrity,

    /// A component was handed a salt, iv or key of the wrong size.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("OS random generator unavailable")]
    Random,
}

pub type Result<T> = std::result::Result<T, CryptoError>;
