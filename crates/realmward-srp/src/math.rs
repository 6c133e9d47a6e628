//! The SRP6 arithmetic.
//!
//! All byte arrays entering or leaving this module are little endian,
//! and every SHA-1 digest that feeds back into the field arithmetic is
//! interpreted as a little-endian integer. Public values are always
//! hashed in their zero-padded 32-byte wire form.

use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use sha1::{Digest, Sha1};

use crate::error::AuthError;
use crate::group::SrpGroup;
use crate::keys::{
    PASSWORD_VERIFIER_LENGTH, PrivateKey, Proof, PublicKey, ReconnectData, SESSION_KEY_LENGTH,
    Salt, SessionKey,
};
use crate::normalize::NormalizedString;

fn to_bigint(le_bytes: &[u8]) -> BigInt {
    BigInt::from_bytes_le(Sign::Plus, le_bytes)
}

/// Serialize to the fixed 32-byte little-endian wire form.
fn to_padded_le_32(value: &BigInt) -> [u8; 32] {
    let (_, bytes) = value.to_bytes_le();
    debug_assert!(bytes.len() <= 32, "value does not fit the wire width");
    let mut out = [0u8; 32];
    let len = bytes.len().min(32);
    out[..len].copy_from_slice(&bytes[..len]);
    out
}

/// `x = H(salt || H(username || ":" || password))`, little endian.
fn calculate_x(username: &NormalizedString, password: &NormalizedString, salt: &Salt) -> BigInt {
    let credentials = Sha1::new()
        .chain_update(username.as_str())
        .chain_update(":")
        .chain_update(password.as_str())
        .finalize();

    let digest = Sha1::new()
        .chain_update(salt.as_le())
        .chain_update(credentials)
        .finalize();
    to_bigint(digest.as_slice())
}

/// `v = g^x mod N`.
pub(crate) fn calculate_password_verifier(
    group: &SrpGroup,
    username: &NormalizedString,
    password: &NormalizedString,
    salt: &Salt,
) -> [u8; PASSWORD_VERIFIER_LENGTH] {
    let x = calculate_x(username, password, salt);
    let v = BigInt::from(group.generator()).modpow(&x, group.prime());
    to_padded_le_32(&v)
}

/// `B = (k * v + g^b) mod N`.
///
/// The degenerate draw where `B` reduces to zero is an error so the
/// caller can retry with a fresh private key instead of sending a
/// public key the other side must reject.
pub(crate) fn calculate_server_public_key(
    group: &SrpGroup,
    password_verifier: &[u8; PASSWORD_VERIFIER_LENGTH],
    server_private_key: &PrivateKey,
) -> Result<PublicKey, AuthError> {
    let v = to_bigint(password_verifier);
    let b = to_bigint(server_private_key.as_le());
    let g_b = BigInt::from(group.generator()).modpow(&b, group.prime());
    let public = (BigInt::from(group.multiplier()) * v + g_b) % group.prime();

    if public.is_zero() {
        return Err(AuthError::InvalidPublicKey);
    }
    Ok(PublicKey::from_le_bytes(to_padded_le_32(&public)))
}

/// `A = g^a mod N`.
///
/// Never zero for a prime modulus, so this cannot fail.
pub(crate) fn calculate_client_public_key(
    group: &SrpGroup,
    client_private_key: &PrivateKey,
) -> PublicKey {
    let a = to_bigint(client_private_key.as_le());
    let public = BigInt::from(group.generator()).modpow(&a, group.prime());
    PublicKey::from_le_bytes(to_padded_le_32(&public))
}

/// True if the key reduces to zero modulo the prime.
///
/// Accepting such a key lets an attacker force the shared secret to
/// zero without knowing the password.
pub(crate) fn is_degenerate(group: &SrpGroup, key: &PublicKey) -> bool {
    (to_bigint(key.as_le()) % group.prime()).is_zero()
}

/// `u = H(A || B)`, little endian.
fn calculate_u(client_public_key: &PublicKey, server_public_key: &PublicKey) -> BigInt {
    let digest = Sha1::new()
        .chain_update(client_public_key.as_le())
        .chain_update(server_public_key.as_le())
        .finalize();
    to_bigint(digest.as_slice())
}

/// Server-side shared secret: `S = (A * v^u)^b mod N`.
fn calculate_server_shared_secret(
    group: &SrpGroup,
    client_public_key: &PublicKey,
    server_public_key: &PublicKey,
    password_verifier: &[u8; PASSWORD_VERIFIER_LENGTH],
    server_private_key: &PrivateKey,
) -> [u8; 32] {
    let u = calculate_u(client_public_key, server_public_key);
    let a_pub = to_bigint(client_public_key.as_le());
    let v = to_bigint(password_verifier);
    let b = to_bigint(server_private_key.as_le());

    let base = (a_pub * v.modpow(&u, group.prime())) % group.prime();
    to_padded_le_32(&base.modpow(&b, group.prime()))
}

/// Client-side shared secret: `S = (B - k * g^x)^(a + u * x) mod N`.
fn calculate_client_shared_secret(
    group: &SrpGroup,
    client_public_key: &PublicKey,
    server_public_key: &PublicKey,
    x: &BigInt,
    client_private_key: &PrivateKey,
) -> [u8; 32] {
    let u = calculate_u(client_public_key, server_public_key);
    let b_pub = to_bigint(server_public_key.as_le());
    let a = to_bigint(client_private_key.as_le());

    let g_x = BigInt::from(group.generator()).modpow(x, group.prime());
    let mut base = (b_pub - BigInt::from(group.multiplier()) * g_x) % group.prime();
    if base.sign() == Sign::Minus {
        base += group.prime();
    }
    to_padded_le_32(&base.modpow(&(a + u * x), group.prime()))
}

/// Derive the 40-byte session key from the raw shared secret.
///
/// The little-endian secret is stripped of leading zero byte pairs,
/// split into even- and odd-indexed halves, each half is hashed, and
/// the two digests are interleaved.
fn calculate_interleaved(shared_secret: &[u8; 32]) -> SessionKey {
    let mut secret: &[u8] = shared_secret;
    while secret.len() >= 2 && secret[0] == 0 {
        secret = &secret[2..];
    }

    let even: Vec<u8> = secret.iter().copied().step_by(2).collect();
    let odd: Vec<u8> = secret.iter().copied().skip(1).step_by(2).collect();
    let even_hash = Sha1::digest(&even);
    let odd_hash = Sha1::digest(&odd);

    let mut key = [0u8; SESSION_KEY_LENGTH];
    for (i, (e, o)) in even_hash.iter().zip(odd_hash.iter()).enumerate() {
        key[2 * i] = *e;
        key[2 * i + 1] = *o;
    }
    SessionKey::from_le_bytes(key)
}

pub(crate) fn server_session_key(
    group: &SrpGroup,
    client_public_key: &PublicKey,
    server_public_key: &PublicKey,
    password_verifier: &[u8; PASSWORD_VERIFIER_LENGTH],
    server_private_key: &PrivateKey,
) -> SessionKey {
    let secret = calculate_server_shared_secret(
        group,
        client_public_key,
        server_public_key,
        password_verifier,
        server_private_key,
    );
    calculate_interleaved(&secret)
}

pub(crate) fn client_session_key(
    group: &SrpGroup,
    username: &NormalizedString,
    password: &NormalizedString,
    salt: &Salt,
    client_public_key: &PublicKey,
    server_public_key: &PublicKey,
    client_private_key: &PrivateKey,
) -> SessionKey {
    let x = calculate_x(username, password, salt);
    let secret = calculate_client_shared_secret(
        group,
        client_public_key,
        server_public_key,
        &x,
        client_private_key,
    );
    calculate_interleaved(&secret)
}

/// `M1 = H((H(N) xor H(g)) || H(username) || salt || A || B || K)`.
pub(crate) fn calculate_client_proof(
    group: &SrpGroup,
    username: &NormalizedString,
    session_key: &SessionKey,
    client_public_key: &PublicKey,
    server_public_key: &PublicKey,
    salt: &Salt,
) -> Proof {
    let username_hash = Sha1::digest(username.as_str());
    let digest = Sha1::new()
        .chain_update(group.proof_xor_hash())
        .chain_update(username_hash)
        .chain_update(salt.as_le())
        .chain_update(client_public_key.as_le())
        .chain_update(server_public_key.as_le())
        .chain_update(session_key.as_le())
        .finalize();
    Proof::from_le_bytes(digest.into())
}

/// `M2 = H(A || M1 || K)`.
pub(crate) fn calculate_server_proof(
    client_public_key: &PublicKey,
    client_proof: &Proof,
    session_key: &SessionKey,
) -> Proof {
    let digest = Sha1::new()
        .chain_update(client_public_key.as_le())
        .chain_update(client_proof.as_le())
        .chain_update(session_key.as_le())
        .finalize();
    Proof::from_le_bytes(digest.into())
}

/// `H(username || client_data || server_data || K)`.
pub(crate) fn calculate_reconnect_proof(
    username: &NormalizedString,
    client_data: &ReconnectData,
    server_data: &ReconnectData,
    session_key: &SessionKey,
) -> Proof {
    let digest = Sha1::new()
        .chain_update(username.as_str())
        .chain_update(client_data.as_le())
        .chain_update(server_data.as_le())
        .chain_update(session_key.as_le())
        .finalize();
    Proof::from_le_bytes(digest.into())
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn x_is_deterministic_for_same_inputs() {
        let group = SrpGroup::well_known();
        let user = NormalizedString::new("Alice").unwrap();
        let pass = NormalizedString::new("password123").unwrap();
        let salt = Salt::from_le_bytes([3u8; 32]);

        let a = calculate_password_verifier(&group, &user, &pass, &salt);
        let b = calculate_password_verifier(&group, &user, &pass, &salt);
        assert_eq!(a, b);
    }

    #[test]
    fn interleaved_key_strips_leading_zero_pairs() {
        let mut secret = [5u8; 32];
        let unstripped = calculate_interleaved(&secret);

        // Zeroing the low pair must change the derivation input.
        secret[0] = 0;
        secret[1] = 0;
        let stripped = calculate_interleaved(&secret);
        assert_ne!(unstripped.as_le(), stripped.as_le());

        // And stripping is equivalent to never having had the pair.
        let tail: Vec<u8> = secret[2..].to_vec();
        let even: Vec<u8> = tail.iter().copied().step_by(2).collect();
        let odd: Vec<u8> = tail.iter().copied().skip(1).step_by(2).collect();
        assert_eq!(stripped.as_le()[0], Sha1::digest(&even)[0]);
        assert_eq!(stripped.as_le()[1], Sha1::digest(&odd)[0]);
    }

    #[test]
    fn degenerate_key_detection() {
        let group = SrpGroup::well_known();
        assert!(is_degenerate(
            &group,
            &PublicKey::from_le_bytes([0u8; 32])
        ));
        assert!(is_degenerate(
            &group,
            &PublicKey::from_le_bytes(*group.prime_le())
        ));
        assert!(!is_degenerate(
            &group,
            &PublicKey::from_le_bytes([1u8; 32])
        ));
    }
}
