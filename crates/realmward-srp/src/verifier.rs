//! Password verifier generation and storage records.
//!
//! At sign-up time a username and password become a `(salt, verifier)`
//! pair via [`SrpVerifier::from_username_and_password`]; the raw
//! password is never stored. At login time the server reconstructs the
//! verifier from the stored values with
//! [`SrpVerifier::from_database_values`] and converts it into a live
//! handshake with [`SrpVerifier::into_proof`].

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::group::SrpGroup;
use crate::keys::{PASSWORD_VERIFIER_LENGTH, PrivateKey, SALT_LENGTH, Salt};
use crate::math;
use crate::normalize::NormalizedString;
use crate::server::SrpProof;

/// The stored form of an account's credentials.
///
/// This is what an external account store persists and hands back;
/// the arrays are little endian, exactly as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Normalized (uppercase) username.
    pub username: String,
    /// Password verifier, little endian.
    pub password_verifier: [u8; PASSWORD_VERIFIER_LENGTH],
    /// Salt, little endian.
    pub salt: [u8; SALT_LENGTH],
}

/// Username, password verifier, and salt for one account.
///
/// First step of the server-side state machine; consumed by
/// [`SrpVerifier::into_proof`] when a client connects.
#[derive(Debug, Clone)]
pub struct SrpVerifier {
    group: SrpGroup,
    username: NormalizedString,
    password_verifier: [u8; PASSWORD_VERIFIER_LENGTH],
    salt: Salt,
}

impl SrpVerifier {
    /// Derive fresh credentials at sign-up time.
    ///
    /// Draws a new random salt, so two calls with the same username and
    /// password produce different verifiers.
    pub fn from_username_and_password(
        group: SrpGroup,
        username: NormalizedString,
        password: &NormalizedString,
    ) -> Self {
        let salt = Salt::randomized();
        Self::with_salt(group, username, password, salt)
    }

    /// Reconstruct from stored values; no password needed.
    pub fn from_database_values(
        group: SrpGroup,
        username: NormalizedString,
        password_verifier: [u8; PASSWORD_VERIFIER_LENGTH],
        salt: [u8; SALT_LENGTH],
    ) -> Self {
        Self {
            group,
            username,
            password_verifier,
            salt: Salt::from_le_bytes(salt),
        }
    }

    /// Reconstruct from a persisted [`CredentialRecord`].
    pub fn from_record(group: SrpGroup, record: &CredentialRecord) -> Result<Self> {
        let username = NormalizedString::new(&record.username)?;
        Ok(Self::from_database_values(
            group,
            username,
            record.password_verifier,
            record.salt,
        ))
    }

    /// The stored form of these credentials.
    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            username: self.username.as_str().to_string(),
            password_verifier: self.password_verifier,
            salt: *self.salt.as_le(),
        }
    }

    /// The normalized username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// The password verifier, little endian. Only for persisting.
    pub const fn password_verifier(&self) -> &[u8; PASSWORD_VERIFIER_LENGTH] {
        &self.password_verifier
    }

    /// The salt, little endian. Sent to the client during the challenge.
    pub const fn salt(&self) -> &[u8; SALT_LENGTH] {
        self.salt.as_le()
    }

    /// Start a handshake: draw a fresh server ephemeral keypair and
    /// compute the server public key.
    ///
    /// The (about one in 2^256) degenerate private key draw whose
    /// public key reduces to zero is redrawn rather than surfaced.
    pub fn into_proof(self) -> SrpProof {
        let (server_private_key, server_public_key) = loop {
            let private = PrivateKey::randomized();
            if let Ok(public) =
                math::calculate_server_public_key(&self.group, &self.password_verifier, &private)
            {
                break (private, public);
            }
        };

        SrpProof::new(
            self.group,
            self.username,
            self.password_verifier,
            self.salt,
            server_private_key,
            server_public_key,
        )
    }

    /// Derive credentials with a caller-chosen salt, for fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn with_specific_salt(
        group: SrpGroup,
        username: NormalizedString,
        password: &NormalizedString,
        salt: Salt,
    ) -> Self {
        Self::with_salt(group, username, password, salt)
    }

    /// Start a handshake with a caller-chosen private key, for fixtures.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn with_specific_private_key(self, server_private_key: PrivateKey) -> Result<SrpProof> {
        let server_public_key = math::calculate_server_public_key(
            &self.group,
            &self.password_verifier,
            &server_private_key,
        )?;
        Ok(SrpProof::new(
            self.group,
            self.username,
            self.password_verifier,
            self.salt,
            server_private_key,
            server_public_key,
        ))
    }

    fn with_salt(
        group: SrpGroup,
        username: NormalizedString,
        password: &NormalizedString,
        salt: Salt,
    ) -> Self {
        let password_verifier =
            math::calculate_password_verifier(&group, &username, password, &salt);
        Self {
            group,
            username,
            password_verifier,
            salt,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn name(s: &str) -> NormalizedString {
        NormalizedString::new(s).unwrap()
    }

    #[test]
    fn same_salt_and_credentials_reproduce_verifier() {
        let salt = Salt::randomized();
        let a = SrpVerifier::with_specific_salt(
            SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
            salt,
        );
        let b = SrpVerifier::with_specific_salt(
            SrpGroup::well_known(),
            name("alice"),
            &name("PASSWORD123"),
            salt,
        );
        assert_eq!(a.password_verifier(), b.password_verifier());
        assert_eq!(a.salt(), b.salt());
    }

    #[test]
    fn different_salts_produce_different_verifiers() {
        let a = SrpVerifier::from_username_and_password(
            SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
        );
        let b = SrpVerifier::from_username_and_password(
            SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
        );
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.password_verifier(), b.password_verifier());
    }

    #[test]
    fn database_values_round_trip() {
        let original = SrpVerifier::from_username_and_password(
            SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
        );
        let restored = SrpVerifier::from_database_values(
            SrpGroup::well_known(),
            name("Alice"),
            *original.password_verifier(),
            *original.salt(),
        );
        assert_eq!(original.password_verifier(), restored.password_verifier());
        assert_eq!(original.salt(), restored.salt());
        assert_eq!(original.username(), restored.username());
    }

    #[test]
    fn credential_record_serde_round_trip() {
        let verifier = SrpVerifier::from_username_and_password(
            SrpGroup::well_known(),
            name("Alice"),
            &name("password123"),
        );
        let record = verifier.to_record();

        let json = serde_json::to_string(&record).unwrap();
        let parsed: CredentialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);

        let restored = SrpVerifier::from_record(SrpGroup::well_known(), &parsed).unwrap();
        assert_eq!(restored.password_verifier(), verifier.password_verifier());
    }

    #[test]
    fn record_username_is_normalized() {
        let verifier = SrpVerifier::from_username_and_password(
            SrpGroup::well_known(),
            name("alice"),
            &name("password123"),
        );
        assert_eq!(verifier.to_record().username, "ALICE");
    }
}
