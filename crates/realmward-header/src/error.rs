//! Header crypto error types.

use thiserror::Error;

/// Errors from header crypto setup and use.
///
/// Normal operation has no error channel: applying the stream cipher
/// always succeeds arithmetically, and nonsensical decrypted fields are
/// a protocol error for the caller to handle, not a crypto failure.
#[derive(Debug, Error)]
pub enum HeaderCryptoError {
    /// The client's connection proof did not match, so no cipher state
    /// was created. Terminal for this connection attempt.
    #[error("client proof did not match the expected connection proof")]
    InvalidProof,

    /// A header slice of the wrong width for this epoch was passed in.
    #[error("invalid header length: expected {expected}, got {actual}")]
    InvalidHeaderLength {
        /// The epoch's header width in bytes.
        expected: usize,
        /// The width actually supplied.
        actual: usize,
    },
}
