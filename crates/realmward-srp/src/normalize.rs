//! Account string normalization.
//!
//! Usernames and passwords are folded to uppercase ASCII before any
//! hashing so that `"alice"` and `"ALICE"` derive identical credentials.
//! The wire protocol limits account strings to 16 visible ASCII
//! characters, and the same limit is enforced here so that stored
//! verifiers can never be produced from strings a client cannot send.

use crate::error::AuthError;

/// Maximum length of a normalized account string.
pub const MAX_NORMALIZED_LENGTH: usize = 16;

/// An uppercase-ASCII account string, validated at construction.
///
/// Used for both usernames and passwords. Hash inputs always go through
/// this type, never through raw `&str`, so credential derivation is
/// case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedString(String);

impl NormalizedString {
    /// Normalize an account string, rejecting anything the wire format
    /// cannot carry.
    pub fn new(s: impl AsRef<str>) -> Result<Self, AuthError> {
        let s = s.as_ref();
        if s.is_empty() {
            return Err(AuthError::InvalidNormalizedString(
                "string is empty".to_string(),
            ));
        }
        if s.len() > MAX_NORMALIZED_LENGTH {
            return Err(AuthError::InvalidNormalizedString(format!(
                "string is {} bytes, maximum is {MAX_NORMALIZED_LENGTH}",
                s.len()
            )));
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_graphic() && *c != ' ') {
            return Err(AuthError::InvalidNormalizedString(format!(
                "character {c:?} is not visible ASCII"
            )));
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// The normalized (uppercase) form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NormalizedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
