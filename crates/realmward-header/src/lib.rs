//! `realmward` Header Obfuscation Library
//!
//! Obscures the size and opcode fields of packet headers with a keyed
//! stream cipher derived from an authenticated session, across the
//! three supported protocol epochs.
//!
//! ## Construction
//!
//! - **Seeds**: each side draws a random 32-bit seed before any key
//!   material exists ([`ProofSeed`])
//! - **Proof**: the client proves possession of the 40-byte session key
//!   over both seeds; the server checks it in constant time before any
//!   cipher state is created
//! - **Keys**: one key per direction, an HMAC-SHA1 over the session key
//!   bound to that direction's label and seed
//! - **Cipher**: a keyed permutation stream per direction, with an
//!   epoch-specific warm-up discard, advanced strictly per header byte
//!
//! The epochs differ only in the constants tabled in [`EpochParams`];
//! the cipher construction is shared. Within one connection, header
//! calls must happen in packet order per direction: the stream state is
//! a running counter and decrypting out of order corrupts every
//! subsequent header. That ordering is the caller's contract, not
//! something a lock can fix.
//!
//! Typical setup, client side:
//!
//! ```
//! use realmward_header::{HeaderCrypto, ProofSeed, ProtocolEpoch};
//! use realmward_srp::NormalizedString;
//!
//! # fn main() -> Result<(), realmward_srp::AuthError> {
//! let session_key = [0u8; 40]; // from the finalized SRP session
//! let username = NormalizedString::new("A")?;
//! let server_seed = 0x1234_5678; // from the server's challenge
//!
//! let seed = ProofSeed::new(ProtocolEpoch::Wrath);
//! let client_seed = seed.seed(); // goes into the answer packet
//! let (proof, mut crypto) =
//!     seed.into_client_header_crypto(&username, &session_key, server_seed);
//!
//! let header = crypto.encrypt_client_header(0x0102, 0x0605_0403);
//! # let _ = (client_seed, proof, header);
//! # Ok(())
//! # }
//! ```

pub mod crypto;
mod derive;
pub mod epoch;
pub mod error;
pub mod seed;
mod stream;

pub use crypto::{
    BurningCrusadeHeaderCrypto, CLIENT_HEADER_LENGTH, ClientCrypto, ClientHeader, HeaderCrypto,
    ServerCrypto, ServerHeader, VanillaHeaderCrypto, WrathHeaderCrypto,
};
pub use epoch::{EpochParams, ProtocolEpoch, SIZE_FIELD_WIDTH};
pub use error::HeaderCryptoError;
pub use seed::ProofSeed;
