//! Authentication error types.

use thiserror::Error;

/// Result type alias using [`AuthError`].
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors from the authentication handshake.
///
/// Every variant is terminal for the handshake attempt it occurred in.
/// Callers may start a brand-new handshake with fresh ephemeral values,
/// but must never resume a failed one.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A public key reduced to zero modulo the large safe prime.
    ///
    /// For client-supplied keys this is the classic verifier-bypass
    /// attempt and must abort the handshake before any proof is computed.
    #[error("public key is zero modulo the large safe prime")]
    InvalidPublicKey,

    /// The client proof did not match the server-calculated proof,
    /// meaning the entered password is wrong.
    #[error("client proof did not match the server-calculated proof")]
    InvalidProof,

    /// The server proof did not match the client-calculated proof,
    /// meaning the server does not actually know the password verifier.
    #[error("server proof did not match the client-calculated proof")]
    ServerAuthenticationFailed,

    /// An account string failed normalization.
    #[error("invalid account string: {0}")]
    InvalidNormalizedString(String),
}
