use thiserror::Error;

/// Errors surfaced by every fallible operation in this crate.
///
/// Decode paths that consume bytes from outside the process always return one
/// of these instead of panicking; panics are reserved for violated internal
/// invariants (programmer error).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Shape errors.
    #[error("invalid input")]
    InvalidInput,
    #[error("input vectors have mismatched or invalid lengths")]
    InvalidLength,
    #[error("ciphertext was produced by a newer library version")]
    InvalidLibVersion,
    #[error("ciphertext body is empty or malformed")]
    InvalidCiphertextBody,
    #[error("unknown or unsupported group parameters")]
    InvalidGroupParams,
    #[error("element belongs to a different group")]
    WrongGroup,

    // Cryptographic errors.
    #[error("key generation failed")]
    KeyGenFailed,
    #[error("signature generation failed")]
    SignatureFailed,
    #[error("verification failed")]
    VerificationFailed,
    #[error("decryption failed")]
    DecryptionFailed,
    #[error("division by zero in the scalar field")]
    DivideByZero,
    #[error("random generator yielded insufficient bytes")]
    RandInsufficient,

    // Encoding errors.
    #[error("serialization failed")]
    SerializationFailed,
    #[error("deserialization failed")]
    DeserializationFailed,
    #[error("encoding not implemented for this element or curve")]
    NotImplemented,

    // State errors.
    #[error("element was used before initialization")]
    ElementNotInitialized,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
