//! `realmward` SRP6 Authentication Library
//!
//! Implements the SRP6 mutual-authentication handshake used between a
//! game client and its realm server, including verifier generation for
//! sign-up, the mutual proof exchange, session-key agreement, and the
//! reconnect fast path.
//!
//! ## Protocol shape
//!
//! - **Verifier**: per-account `(salt, verifier)` derived from the
//!   normalized username and password; the raw password never leaves
//!   the sign-up path
//! - **Handshake**: fresh ephemeral keypairs on both sides, mutual
//!   20-byte proofs, constant-time comparison
//! - **Session**: identical 40-byte interleaved-hash session key on
//!   both sides, owned by the finalized session objects
//! - **Reconnect**: single-use keyed proof over exchanged challenge
//!   data, skipping the full exchange for an already-keyed session
//!
//! Server-side flow: [`SrpVerifier`] -> [`SrpProof`] -> [`SrpServer`].
//! Client-side flow: [`SrpClientChallenge`] -> [`SrpClient`]. Every
//! step consumes its predecessor, so state cannot be reused across
//! attempts. All wire byte arrays are little endian.

pub mod client;
pub mod error;
pub mod group;
pub mod keys;
mod math;
pub mod normalize;
pub mod server;
pub mod verifier;

pub use client::{ReconnectValues, SrpClient, SrpClientChallenge};
pub use error::{AuthError, Result};
pub use group::{
    GENERATOR, LARGE_SAFE_PRIME_LENGTH, LARGE_SAFE_PRIME_LITTLE_ENDIAN, MULTIPLIER, SrpGroup,
};
pub use keys::{
    PASSWORD_VERIFIER_LENGTH, PROOF_LENGTH, PUBLIC_KEY_LENGTH, PrivateKey, Proof, PublicKey,
    RECONNECT_DATA_LENGTH, ReconnectData, SALT_LENGTH, SESSION_KEY_LENGTH, Salt, SessionKey,
};
pub use normalize::NormalizedString;
pub use server::{SrpProof, SrpServer};
pub use verifier::{CredentialRecord, SrpVerifier};
