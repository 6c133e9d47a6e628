//! One-shot seed exchange gating cipher setup.
//!
//! Each side generates a random 32-bit seed before any key material
//! exists. The server sends its seed in the connection challenge; the
//! client answers with its own seed plus a proof over both seeds and
//! the session key. Converting a seed into cipher state consumes it,
//! so one seed keys at most one connection.

use rand::RngCore;
use rand::rngs::OsRng;
use realmward_srp::{NormalizedString, PROOF_LENGTH, SESSION_KEY_LENGTH};
use subtle::ConstantTimeEq;

use crate::crypto::{ClientCrypto, ServerCrypto};
use crate::derive;
use crate::epoch::ProtocolEpoch;
use crate::error::HeaderCryptoError;

/// A fresh random seed for one connection attempt.
///
/// Holds no key material. The `into_*` conversions consume it exactly
/// once, yielding the side's cipher object; there is no way back.
#[derive(Debug)]
pub struct ProofSeed {
    epoch: ProtocolEpoch,
    seed: u32,
}

impl ProofSeed {
    /// Draw a fresh seed for this epoch.
    pub fn new(epoch: ProtocolEpoch) -> Self {
        Self {
            epoch,
            seed: OsRng.next_u32(),
        }
    }

    /// Build a seed with a caller-chosen value, for fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub const fn from_specific_seed(epoch: ProtocolEpoch, seed: u32) -> Self {
        Self { epoch, seed }
    }

    /// The seed value to send to the peer.
    pub const fn seed(&self) -> u32 {
        self.seed
    }

    /// Client side: derive the connection proof and cipher state.
    ///
    /// `server_seed` is the value from the server's challenge. The
    /// returned proof goes into the answer packet together with this
    /// seed's value.
    pub fn into_client_header_crypto(
        self,
        username: &NormalizedString,
        session_key: &[u8; SESSION_KEY_LENGTH],
        server_seed: u32,
    ) -> ([u8; PROOF_LENGTH], ClientCrypto) {
        let proof = derive::connection_proof(username, session_key, self.seed, server_seed);
        let crypto = ClientCrypto::new(self.epoch, session_key, self.seed, server_seed);
        (proof, crypto)
    }

    /// Server side: check the client's proof, then derive cipher state.
    ///
    /// The proof is compared in constant time. On mismatch no cipher
    /// state is created and the connection must be dropped; the client
    /// either has the wrong session key or answered a different seed.
    ///
    /// # Errors
    ///
    /// [`HeaderCryptoError::InvalidProof`] when the proof check fails.
    pub fn into_server_header_crypto(
        self,
        username: &NormalizedString,
        session_key: &[u8; SESSION_KEY_LENGTH],
        client_proof: &[u8; PROOF_LENGTH],
        client_seed: u32,
    ) -> Result<ServerCrypto, HeaderCryptoError> {
        let expected =
            derive::connection_proof(username, session_key, client_seed, self.seed);
        if !bool::from(expected.ct_eq(client_proof)) {
            tracing::debug!(username = %username, "connection proof mismatch");
            return Err(HeaderCryptoError::InvalidProof);
        }

        Ok(ServerCrypto::new(
            self.epoch,
            session_key,
            client_seed,
            self.seed,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::crypto::HeaderCrypto;

    const KEY: [u8; SESSION_KEY_LENGTH] = [0x11; SESSION_KEY_LENGTH];

    fn user() -> NormalizedString {
        NormalizedString::new("A").unwrap()
    }

    #[test]
    fn seed_exchange_yields_matching_cipher_pairs() {
        for epoch in ProtocolEpoch::ALL {
            let server_seed = ProofSeed::new(epoch);
            let client_seed = ProofSeed::new(epoch);

            let sent_server_seed = server_seed.seed();
            let sent_client_seed = client_seed.seed();

            let (proof, mut client) =
                client_seed.into_client_header_crypto(&user(), &KEY, sent_server_seed);
            let mut server = server_seed
                .into_server_header_crypto(&user(), &KEY, &proof, sent_client_seed)
                .unwrap();

            let wire = server.encrypt_server_header(0x0042, 0x0010);
            let header = client.decrypt_server_header(&wire).unwrap();
            assert_eq!((header.size, header.opcode), (0x0042, 0x0010));
        }
    }

    #[test]
    fn proof_for_wrong_session_key_is_rejected() {
        let server_seed = ProofSeed::from_specific_seed(ProtocolEpoch::Wrath, 1);
        let client_seed = ProofSeed::from_specific_seed(ProtocolEpoch::Wrath, 2);

        let mut wrong_key = KEY;
        wrong_key[0] ^= 1;
        let (proof, _client) = client_seed.into_client_header_crypto(&user(), &wrong_key, 1);

        let result = server_seed.into_server_header_crypto(&user(), &KEY, &proof, 2);
        assert!(matches!(result, Err(HeaderCryptoError::InvalidProof)));
    }

    #[test]
    fn proof_answering_a_different_server_seed_is_rejected() {
        let server_seed = ProofSeed::from_specific_seed(ProtocolEpoch::Wrath, 1);
        let client_seed = ProofSeed::from_specific_seed(ProtocolEpoch::Wrath, 2);

        // Client answered seed 99, not this server's seed 1.
        let (proof, _client) = client_seed.into_client_header_crypto(&user(), &KEY, 99);

        let result = server_seed.into_server_header_crypto(&user(), &KEY, &proof, 2);
        assert!(matches!(result, Err(HeaderCryptoError::InvalidProof)));
    }

    #[test]
    fn proof_with_misreported_client_seed_is_rejected() {
        let server_seed = ProofSeed::from_specific_seed(ProtocolEpoch::Wrath, 1);
        let client_seed = ProofSeed::from_specific_seed(ProtocolEpoch::Wrath, 2);

        let (proof, _client) = client_seed.into_client_header_crypto(&user(), &KEY, 1);

        // The seed value in the packet does not match the proof.
        let result = server_seed.into_server_header_crypto(&user(), &KEY, &proof, 3);
        assert!(matches!(result, Err(HeaderCryptoError::InvalidProof)));
    }
}
