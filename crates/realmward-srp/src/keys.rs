//! Fixed-width byte values exchanged during the handshake.
//!
//! Every value here has a fixed wire width and a little-endian byte
//! order. Secrets (private ephemeral keys, session keys) are zeroized
//! on drop and redacted from `Debug` output; proofs compare in constant
//! time.

use rand::RngCore;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the random salt mixed into the password verifier.
pub const SALT_LENGTH: usize = 32;
/// Length of a public ephemeral key, fixed by the prime's byte length.
pub const PUBLIC_KEY_LENGTH: usize = 32;
/// Length of a private ephemeral key.
pub const PRIVATE_KEY_LENGTH: usize = 32;
/// Length of a password verifier, the remainder of a 32-byte prime.
pub const PASSWORD_VERIFIER_LENGTH: usize = 32;
/// Length of every proof value, the width of a SHA-1 digest.
pub const PROOF_LENGTH: usize = 20;
/// Length of the derived session key, two interleaved SHA-1 digests.
pub const SESSION_KEY_LENGTH: usize = 40;
/// Length of the random challenge data used for reconnects.
pub const RECONNECT_DATA_LENGTH: usize = 16;

fn random_array<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

#[cfg(any(test, feature = "test-utils"))]
fn from_be_hex<const N: usize>(s: &str) -> [u8; N] {
    #[allow(clippy::expect_used)]
    let mut bytes = hex::decode(s).expect("valid hex fixture");
    assert_eq!(bytes.len(), N, "fixture has wrong length");
    bytes.reverse();
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    out
}

/// Random salt stored next to the password verifier.
///
/// Generated once per verifier and sent to the client so it can derive
/// the same credential hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Draw a fresh salt from the system RNG.
    pub fn randomized() -> Self {
        Self(random_array())
    }

    /// Wrap stored little-endian bytes.
    pub const fn from_le_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The salt as little-endian wire bytes.
    pub const fn as_le(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }

    /// Build from big-endian hex, for test fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn from_be_hex_str(s: &str) -> Self {
        Self(from_be_hex(s))
    }
}

/// A public ephemeral key (`A` or `B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Wrap little-endian wire bytes.
    ///
    /// No reduction check happens here; degenerate values are rejected
    /// where the key is actually used, with the group at hand.
    pub const fn from_le_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The key as little-endian wire bytes.
    pub const fn as_le(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Build from big-endian hex, for test fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn from_be_hex_str(s: &str) -> Self {
        Self(from_be_hex(s))
    }
}

/// A private ephemeral key (`a` or `b`).
///
/// Drawn fresh for every handshake attempt, never persisted, and
/// zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; PRIVATE_KEY_LENGTH]);

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PrivateKey").field(&"[REDACTED]").finish()
    }
}

impl PrivateKey {
    /// Draw a fresh private key from the system RNG.
    pub fn randomized() -> Self {
        Self(random_array())
    }

    pub(crate) const fn as_le(&self) -> &[u8; PRIVATE_KEY_LENGTH] {
        &self.0
    }

    /// Build from big-endian hex, for test fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn from_be_hex_str(s: &str) -> Self {
        Self(from_be_hex(s))
    }
}

/// A 20-byte proof value (`M1`, `M2`, reconnect or world proof).
///
/// Equality is constant time so proof checks cannot leak a prefix
/// match through timing.
#[derive(Debug, Clone, Copy)]
pub struct Proof([u8; PROOF_LENGTH]);

impl PartialEq for Proof {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Proof {}

impl Proof {
    /// Wrap little-endian wire bytes.
    pub const fn from_le_bytes(bytes: [u8; PROOF_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The proof as little-endian wire bytes.
    pub const fn as_le(&self) -> &[u8; PROOF_LENGTH] {
        &self.0
    }

    /// Build from big-endian hex, for test fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn from_be_hex_str(s: &str) -> Self {
        Self(from_be_hex(s))
    }
}

/// The 40-byte shared session key.
///
/// Identical on both sides after a successful handshake. Owned by the
/// session that derived it, zeroized on drop, redacted from `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey([u8; SESSION_KEY_LENGTH]);

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SessionKey").field(&"[REDACTED]").finish()
    }
}

impl SessionKey {
    pub(crate) const fn from_le_bytes(bytes: [u8; SESSION_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The key as little-endian bytes.
    pub const fn as_le(&self) -> &[u8; SESSION_KEY_LENGTH] {
        &self.0
    }
}

/// Random challenge data for the reconnect fast path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectData([u8; RECONNECT_DATA_LENGTH]);

impl ReconnectData {
    /// Draw fresh challenge data from the system RNG.
    pub fn randomized() -> Self {
        Self(random_array())
    }

    /// Wrap little-endian wire bytes.
    pub const fn from_le_bytes(bytes: [u8; RECONNECT_DATA_LENGTH]) -> Self {
        Self(bytes)
    }

    /// The challenge data as little-endian wire bytes.
    pub const fn as_le(&self) -> &[u8; RECONNECT_DATA_LENGTH] {
        &self.0
    }

    /// Replace the data in place with fresh randomness.
    pub(crate) fn randomize(&mut self) {
        OsRng.fill_bytes(&mut self.0);
    }
}
