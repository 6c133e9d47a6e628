//! Key derivation for the two cipher directions, plus the connection
//! proof that gates server-side cipher setup.

use hmac::{Hmac, Mac};
use realmward_srp::{NormalizedString, PROOF_LENGTH, SESSION_KEY_LENGTH};
use sha1::{Digest, Sha1};

type HmacSha1 = Hmac<Sha1>;

/// Width of a derived direction key, one SHA-1 digest.
pub(crate) const DIRECTION_KEY_LENGTH: usize = 20;

/// Fixed label keying the server-to-client direction.
const SERVER_TO_CLIENT_LABEL: [u8; 16] = [
    0xCC, 0x98, 0xAE, 0x04, 0xE8, 0x97, 0xEA, 0xCA, 0x12, 0xDD, 0xC0, 0x93, 0x42, 0x91, 0x53,
    0x57,
];

/// Fixed label keying the client-to-server direction.
const CLIENT_TO_SERVER_LABEL: [u8; 16] = [
    0xC2, 0xB3, 0x72, 0x3C, 0xC6, 0xAE, 0xD9, 0xB5, 0x34, 0x3C, 0x53, 0xEE, 0x2F, 0x43, 0x67,
    0xCE,
];

fn direction_key(
    label: &[u8; 16],
    seed: u32,
    session_key: &[u8; SESSION_KEY_LENGTH],
) -> [u8; DIRECTION_KEY_LENGTH] {
    // HMAC accepts keys of any length, so construction cannot fail.
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha1::new_from_slice(label).expect("any key length is accepted");
    mac.update(&seed.to_le_bytes());
    mac.update(session_key);
    mac.finalize().into_bytes().into()
}

/// Key for the server-to-client stream, bound to the server's seed.
pub(crate) fn server_direction_key(
    session_key: &[u8; SESSION_KEY_LENGTH],
    server_seed: u32,
) -> [u8; DIRECTION_KEY_LENGTH] {
    direction_key(&SERVER_TO_CLIENT_LABEL, server_seed, session_key)
}

/// Key for the client-to-server stream, bound to the client's seed.
pub(crate) fn client_direction_key(
    session_key: &[u8; SESSION_KEY_LENGTH],
    client_seed: u32,
) -> [u8; DIRECTION_KEY_LENGTH] {
    direction_key(&CLIENT_TO_SERVER_LABEL, client_seed, session_key)
}

/// The 20-byte proof a connecting client presents to show it holds the
/// session key for this seed pair.
pub(crate) fn connection_proof(
    username: &NormalizedString,
    session_key: &[u8; SESSION_KEY_LENGTH],
    client_seed: u32,
    server_seed: u32,
) -> [u8; PROOF_LENGTH] {
    let digest = Sha1::new()
        .chain_update(username.as_str())
        .chain_update(0u32.to_le_bytes())
        .chain_update(client_seed.to_le_bytes())
        .chain_update(server_seed.to_le_bytes())
        .chain_update(session_key)
        .finalize();
    digest.into()
}
