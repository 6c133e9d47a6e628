//! Server side of the handshake.
//!
//! The state machine is a chain of consuming conversions, so a proof
//! cannot be replayed and a session cannot exist without a verified
//! proof:
//!
//! ```text
//! SrpVerifier -> SrpProof -> (SrpServer, server proof)
//! ```
//!
//! [`SrpProof::into_server`] is the single authentication decision
//! point: it rejects degenerate client public keys, checks the client
//! proof in constant time, and only then derives the session.

use crate::error::AuthError;
use crate::group::SrpGroup;
use crate::keys::{
    PASSWORD_VERIFIER_LENGTH, PROOF_LENGTH, PrivateKey, Proof, PublicKey, PUBLIC_KEY_LENGTH,
    RECONNECT_DATA_LENGTH, ReconnectData, SALT_LENGTH, Salt, SESSION_KEY_LENGTH, SessionKey,
};
use crate::math;
use crate::normalize::NormalizedString;

/// A handshake in progress: the server ephemeral keypair plus the
/// account's verifier and salt.
///
/// Created by [`crate::SrpVerifier::into_proof`]. The public key and
/// salt go out in the challenge packet; the answer comes back through
/// [`SrpProof::into_server`].
#[derive(Debug, Clone)]
pub struct SrpProof {
    group: SrpGroup,
    username: NormalizedString,
    password_verifier: [u8; PASSWORD_VERIFIER_LENGTH],
    salt: Salt,
    server_private_key: PrivateKey,
    server_public_key: PublicKey,
}

impl SrpProof {
    pub(crate) fn new(
        group: SrpGroup,
        username: NormalizedString,
        password_verifier: [u8; PASSWORD_VERIFIER_LENGTH],
        salt: Salt,
        server_private_key: PrivateKey,
        server_public_key: PublicKey,
    ) -> Self {
        Self {
            group,
            username,
            password_verifier,
            salt,
            server_private_key,
            server_public_key,
        }
    }

    /// The server public key (`B`), little endian. Sent to the client.
    pub const fn server_public_key(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.server_public_key.as_le()
    }

    /// The account salt, little endian. Sent to the client.
    pub const fn salt(&self) -> &[u8; SALT_LENGTH] {
        self.salt.as_le()
    }

    /// Verify the client's answer and finalize the session.
    ///
    /// Rejects a client public key that reduces to zero modulo the
    /// prime before touching any other computation, then checks the
    /// client proof in constant time. On success returns the session
    /// plus the server proof (`M2`) that must be sent back so the
    /// client can verify us in turn.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidPublicKey`] for a degenerate key,
    /// [`AuthError::InvalidProof`] when the password is wrong. Both are
    /// terminal; a new attempt needs a fresh [`crate::SrpVerifier`].
    pub fn into_server(
        self,
        client_public_key: PublicKey,
        client_proof: [u8; PROOF_LENGTH],
    ) -> Result<(SrpServer, [u8; PROOF_LENGTH]), AuthError> {
        if math::is_degenerate(&self.group, &client_public_key) {
            tracing::warn!(
                username = %self.username,
                "rejected client public key that reduces to zero"
            );
            return Err(AuthError::InvalidPublicKey);
        }

        let session_key = math::server_session_key(
            &self.group,
            &client_public_key,
            &self.server_public_key,
            &self.password_verifier,
            &self.server_private_key,
        );

        let expected = math::calculate_client_proof(
            &self.group,
            &self.username,
            &session_key,
            &client_public_key,
            &self.server_public_key,
            &self.salt,
        );
        if expected != Proof::from_le_bytes(client_proof) {
            tracing::debug!(username = %self.username, "client proof mismatch");
            return Err(AuthError::InvalidProof);
        }

        let server_proof =
            math::calculate_server_proof(&client_public_key, &expected, &session_key);
        tracing::debug!(username = %self.username, "client authenticated");

        Ok((
            SrpServer {
                username: self.username,
                session_key,
                reconnect_challenge_data: ReconnectData::randomized(),
            },
            *server_proof.as_le(),
        ))
    }
}

/// A fully authenticated server-side session.
///
/// Owns the session key for the life of the connection and handles
/// reconnect challenges. Keep it keyed by username in session storage;
/// replace it wholesale when the client completes a fresh handshake.
#[derive(Debug, Clone)]
pub struct SrpServer {
    username: NormalizedString,
    session_key: SessionKey,
    reconnect_challenge_data: ReconnectData,
}

impl SrpServer {
    /// The 40-byte session key, identical on the client side.
    pub const fn session_key(&self) -> &[u8; SESSION_KEY_LENGTH] {
        self.session_key.as_le()
    }

    /// Challenge data to send in the next reconnect challenge.
    ///
    /// Re-randomized after every verification attempt, so a captured
    /// proof is single use.
    pub const fn reconnect_challenge_data(&self) -> &[u8; RECONNECT_DATA_LENGTH] {
        self.reconnect_challenge_data.as_le()
    }

    /// Check a reconnect proof against the current challenge data.
    ///
    /// Fails closed: any mismatch returns `false` and the caller must
    /// fall back to a full handshake. A `true` result only proves the
    /// peer holds the session key, nothing more. The challenge data is
    /// re-randomized regardless of the outcome.
    pub fn verify_reconnection_attempt(
        &mut self,
        client_data: [u8; RECONNECT_DATA_LENGTH],
        client_proof: [u8; PROOF_LENGTH],
    ) -> bool {
        let expected = math::calculate_reconnect_proof(
            &self.username,
            &ReconnectData::from_le_bytes(client_data),
            &self.reconnect_challenge_data,
            &self.session_key,
        );

        let verified = expected == Proof::from_le_bytes(client_proof);
        if !verified {
            tracing::debug!(username = %self.username, "reconnect proof mismatch");
        }

        self.reconnect_challenge_data.randomize();
        verified
    }
}
