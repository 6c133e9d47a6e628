//! Client side of the handshake.
//!
//! Mirrors the server chain with consuming conversions:
//!
//! ```text
//! SrpClientChallenge -> SrpClient
//! ```
//!
//! The challenge computes everything eagerly from the server's
//! challenge packet; the only remaining decision is whether the server
//! proof checks out in [`SrpClientChallenge::verify_server_proof`].

use crate::error::AuthError;
use crate::group::SrpGroup;
use crate::keys::{
    PROOF_LENGTH, PrivateKey, Proof, PublicKey, PUBLIC_KEY_LENGTH, RECONNECT_DATA_LENGTH,
    ReconnectData, Salt, SESSION_KEY_LENGTH, SessionKey,
};
use crate::math;
use crate::normalize::NormalizedString;

/// The client's answer to a reconnect challenge.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectValues {
    /// Fresh client challenge data, sent alongside the proof.
    pub challenge_data: [u8; RECONNECT_DATA_LENGTH],
    /// Keyed proof over both challenges and the session key.
    pub client_proof: [u8; PROOF_LENGTH],
}

/// A client handshake in flight: ephemeral keypair, session key, and
/// the proof to send.
///
/// Construction consumes the server's challenge values and does all
/// derivation up front; the public key and proof accessors feed the
/// answer packet.
#[derive(Debug, Clone)]
pub struct SrpClientChallenge {
    username: NormalizedString,
    client_public_key: PublicKey,
    client_proof: Proof,
    session_key: SessionKey,
}

impl SrpClientChallenge {
    /// Start a handshake from the server's challenge packet.
    ///
    /// Draws a fresh client ephemeral keypair and derives the session
    /// key and client proof.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidPublicKey`] if the server public key reduces
    /// to zero modulo the prime. Such a key can only come from a broken
    /// or hostile server and makes the shared secret predictable.
    pub fn new(
        group: &SrpGroup,
        username: NormalizedString,
        password: &NormalizedString,
        server_public_key: PublicKey,
        salt: Salt,
    ) -> Result<Self, AuthError> {
        if math::is_degenerate(group, &server_public_key) {
            tracing::warn!(
                username = %username,
                "rejected server public key that reduces to zero"
            );
            return Err(AuthError::InvalidPublicKey);
        }

        let client_private_key = PrivateKey::randomized();
        let client_public_key = math::calculate_client_public_key(group, &client_private_key);

        let session_key = math::client_session_key(
            group,
            &username,
            password,
            &salt,
            &client_public_key,
            &server_public_key,
            &client_private_key,
        );

        let client_proof = math::calculate_client_proof(
            group,
            &username,
            &session_key,
            &client_public_key,
            &server_public_key,
            &salt,
        );

        Ok(Self {
            username,
            client_public_key,
            client_proof,
            session_key,
        })
    }

    /// The client public key (`A`), little endian. Sent to the server.
    pub const fn client_public_key(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.client_public_key.as_le()
    }

    /// The client proof (`M1`), little endian. Sent to the server.
    pub const fn client_proof(&self) -> &[u8; PROOF_LENGTH] {
        self.client_proof.as_le()
    }

    /// Check the server's proof and finalize the session.
    ///
    /// # Errors
    ///
    /// [`AuthError::ServerAuthenticationFailed`] when the proof does
    /// not match; the handshake is abandoned with no partial trust.
    pub fn verify_server_proof(
        self,
        server_proof: [u8; PROOF_LENGTH],
    ) -> Result<SrpClient, AuthError> {
        let expected = math::calculate_server_proof(
            &self.client_public_key,
            &self.client_proof,
            &self.session_key,
        );
        if expected != Proof::from_le_bytes(server_proof) {
            tracing::debug!(username = %self.username, "server proof mismatch");
            return Err(AuthError::ServerAuthenticationFailed);
        }

        Ok(SrpClient {
            username: self.username,
            session_key: self.session_key,
        })
    }
}

/// A fully authenticated client-side session.
///
/// Holds the same 40-byte session key as the server's session and can
/// answer reconnect challenges without repeating the full handshake.
#[derive(Debug, Clone)]
pub struct SrpClient {
    username: NormalizedString,
    session_key: SessionKey,
}

impl SrpClient {
    /// The 40-byte session key, identical on the server side.
    pub const fn session_key(&self) -> &[u8; SESSION_KEY_LENGTH] {
        self.session_key.as_le()
    }

    /// Answer a reconnect challenge.
    ///
    /// Draws fresh client challenge data and proves possession of the
    /// session key over both sides' challenge values.
    pub fn calculate_reconnect_values(
        &self,
        server_challenge_data: [u8; RECONNECT_DATA_LENGTH],
    ) -> ReconnectValues {
        let client_data = ReconnectData::randomized();
        let proof = math::calculate_reconnect_proof(
            &self.username,
            &client_data,
            &ReconnectData::from_le_bytes(server_challenge_data),
            &self.session_key,
        );
        ReconnectValues {
            challenge_data: *client_data.as_le(),
            client_proof: *proof.as_le(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::verifier::SrpVerifier;

    fn name(s: &str) -> NormalizedString {
        NormalizedString::new(s).unwrap()
    }

    /// Run a full handshake and return both finalized sessions.
    fn authenticate(
        username: &str,
        password: &str,
        client_password: &str,
    ) -> Result<(crate::SrpServer, SrpClient), AuthError> {
        let verifier = SrpVerifier::from_username_and_password(
            SrpGroup::well_known(),
            name(username),
            &name(password),
        );
        let proof = verifier.into_proof();

        let challenge = SrpClientChallenge::new(
            &SrpGroup::well_known(),
            name(username),
            &name(client_password),
            PublicKey::from_le_bytes(*proof.server_public_key()),
            Salt::from_le_bytes(*proof.salt()),
        )?;

        let (server, server_proof) = proof.into_server(
            PublicKey::from_le_bytes(*challenge.client_public_key()),
            *challenge.client_proof(),
        )?;
        let client = challenge.verify_server_proof(server_proof)?;
        Ok((server, client))
    }

    #[test]
    fn matching_credentials_agree_on_session_key() {
        let (server, client) = authenticate("Alice", "password123", "password123").unwrap();
        assert_eq!(server.session_key(), client.session_key());
        assert_eq!(server.session_key().len(), SESSION_KEY_LENGTH);
    }

    #[test]
    fn wrong_password_fails_server_side_with_no_session() {
        let result = authenticate("Alice", "password123", "hunter2");
        assert!(matches!(result, Err(AuthError::InvalidProof)));
    }

    #[test]
    fn case_differences_do_not_break_agreement() {
        let (server, client) = authenticate("alice", "PASSWORD123", "password123").unwrap();
        assert_eq!(server.session_key(), client.session_key());
    }

    #[test]
    fn tampered_server_proof_is_rejected() {
        let verifier = SrpVerifier::from_username_and_password(
            SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
        );
        let proof = verifier.into_proof();
        let challenge = SrpClientChallenge::new(
            &SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
            PublicKey::from_le_bytes(*proof.server_public_key()),
            Salt::from_le_bytes(*proof.salt()),
        )
        .unwrap();

        let (_server, mut server_proof) = proof
            .into_server(
                PublicKey::from_le_bytes(*challenge.client_public_key()),
                *challenge.client_proof(),
            )
            .unwrap();
        server_proof[0] ^= 1;

        let result = challenge.verify_server_proof(server_proof);
        assert!(matches!(
            result,
            Err(AuthError::ServerAuthenticationFailed)
        ));
    }

    #[test]
    fn degenerate_server_public_key_is_rejected() {
        let result = SrpClientChallenge::new(
            &SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
            PublicKey::from_le_bytes([0u8; PUBLIC_KEY_LENGTH]),
            Salt::randomized(),
        );
        assert!(matches!(result, Err(AuthError::InvalidPublicKey)));
    }

    #[test]
    fn reconnect_proof_round_trip() {
        let (mut server, client) = authenticate("Alice", "password123", "password123").unwrap();

        let values = client.calculate_reconnect_values(*server.reconnect_challenge_data());
        assert!(server.verify_reconnection_attempt(values.challenge_data, values.client_proof));
    }

    #[test]
    fn reconnect_challenge_data_rotates_after_each_attempt() {
        let (mut server, client) = authenticate("Alice", "password123", "password123").unwrap();

        let before = *server.reconnect_challenge_data();
        let values = client.calculate_reconnect_values(before);
        assert!(server.verify_reconnection_attempt(values.challenge_data, values.client_proof));
        assert_ne!(&before, server.reconnect_challenge_data());

        // The old proof no longer verifies against the rotated data.
        assert!(!server.verify_reconnection_attempt(values.challenge_data, values.client_proof));
    }

    #[test]
    fn reconnect_proof_is_sensitive_to_every_input() {
        let (mut server, client) = authenticate("Alice", "password123", "password123").unwrap();
        let server_data = *server.reconnect_challenge_data();

        // Flipped client challenge bit.
        let mut values = client.calculate_reconnect_values(server_data);
        values.challenge_data[0] ^= 1;
        assert!(!server.verify_reconnection_attempt(values.challenge_data, values.client_proof));

        // Proof from a different session key fails against this server.
        let (mut server2, _client2) =
            authenticate("Alice", "password123", "password123").unwrap();
        let server2_data = *server2.reconnect_challenge_data();
        let foreign = client.calculate_reconnect_values(server2_data);
        assert!(!server2.verify_reconnection_attempt(foreign.challenge_data, foreign.client_proof));
    }
}
