//! Protocol group parameters.
//!
//! The handshake runs over a fixed prime field: a large safe prime `N`,
//! a generator `g`, and the multiplier constant `k`. These are injected
//! into every verifier and challenge as an owned [`SrpGroup`] value
//! rather than read from process globals, so multiple protocol-version
//! contexts can run side by side in one process.

use num_bigint::{BigInt, Sign};
use sha1::{Digest, Sha1};

/// Length in bytes of the large safe prime, and therefore of every
/// public key, password verifier, and salt on the wire.
pub const LARGE_SAFE_PRIME_LENGTH: usize = 32;

/// The well-known 256-bit large safe prime, as little-endian bytes.
///
/// This is the byte order the prime is sent in on the wire.
pub const LARGE_SAFE_PRIME_LITTLE_ENDIAN: [u8; LARGE_SAFE_PRIME_LENGTH] = [
    0xb7, 0x9b, 0x3e, 0x2a, 0x87, 0x82, 0x3c, 0xab, 0x8f, 0x5e, 0xbf, 0xbf, 0x8e, 0xb1, 0x01,
    0x08, 0x53, 0x50, 0x06, 0x29, 0x8b, 0x5b, 0xad, 0xbd, 0x5b, 0x53, 0xe1, 0x89, 0x5e, 0x64,
    0x4b, 0x89,
];

/// The well-known generator.
pub const GENERATOR: u8 = 7;

/// The well-known multiplier constant, `k` in SRP6 literature.
pub const MULTIPLIER: u8 = 3;

/// Immutable group parameters for one protocol context.
///
/// Holds the prime both as wire bytes and in parsed form, plus the
/// precomputed `H(N) xor H(g)` prefix used in client proofs, so the
/// per-handshake hot path never re-derives constants.
#[derive(Debug, Clone)]
pub struct SrpGroup {
    prime: BigInt,
    prime_le: [u8; LARGE_SAFE_PRIME_LENGTH],
    generator: u8,
    multiplier: u8,
    proof_xor_hash: [u8; 20],
}

impl SrpGroup {
    /// Build a group from explicit parameters.
    ///
    /// The prime is given as little-endian wire bytes.
    pub fn new(prime_le: [u8; LARGE_SAFE_PRIME_LENGTH], generator: u8, multiplier: u8) -> Self {
        let prime = BigInt::from_bytes_le(Sign::Plus, &prime_le);

        let prime_hash = Sha1::digest(prime.to_bytes_le().1);
        let generator_hash = Sha1::digest([generator]);
        let mut proof_xor_hash = [0u8; 20];
        for (out, (n, g)) in proof_xor_hash
            .iter_mut()
            .zip(prime_hash.iter().zip(generator_hash.iter()))
        {
            *out = n ^ g;
        }

        Self {
            prime,
            prime_le,
            generator,
            multiplier,
            proof_xor_hash,
        }
    }

    /// The standard group used by live realms.
    pub fn well_known() -> Self {
        Self::new(LARGE_SAFE_PRIME_LITTLE_ENDIAN, GENERATOR, MULTIPLIER)
    }

    /// The prime as little-endian wire bytes, for the challenge packet.
    pub const fn prime_le(&self) -> &[u8; LARGE_SAFE_PRIME_LENGTH] {
        &self.prime_le
    }

    /// The generator, for the challenge packet.
    pub const fn generator(&self) -> u8 {
        self.generator
    }

    pub(crate) const fn prime(&self) -> &BigInt {
        &self.prime
    }

    pub(crate) const fn multiplier(&self) -> u8 {
        self.multiplier
    }

    pub(crate) const fn proof_xor_hash(&self) -> &[u8; 20] {
        &self.proof_xor_hash
    }
}

impl Default for SrpGroup {
    fn default() -> Self {
        Self::well_known()
    }
}
