//! Header cipher objects.
//!
//! Every connection side owns exactly one cipher object holding two
//! independent directional streams: one for server headers, one for
//! client headers. The server uses the pair as (encrypt, decrypt); the
//! client uses the same pair as (decrypt, encrypt). Both sides derive
//! identical stream states from the session key and exchanged seeds,
//! and each stream advances strictly per byte processed, so calls must
//! happen in packet order per direction.

use realmward_srp::SESSION_KEY_LENGTH;

use crate::derive;
use crate::epoch::{EpochParams, ProtocolEpoch, SIZE_FIELD_WIDTH};
use crate::error::HeaderCryptoError;
use crate::stream::KeyedStream;

/// Width of a client header on the wire, in every epoch.
pub const CLIENT_HEADER_LENGTH: usize = 6;

/// A decrypted server header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerHeader {
    /// Payload size, big endian on the wire.
    pub size: u16,
    /// Opcode, little endian on the wire at the epoch's width.
    pub opcode: u32,
}

/// A decrypted client header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientHeader {
    /// Payload size, big endian on the wire.
    pub size: u16,
    /// Opcode, little endian on the wire.
    pub opcode: u32,
}

/// The capability shared by all epoch ciphers.
///
/// A server-side object uses `encrypt_server_header` and
/// `decrypt_client_header`; a client-side object uses the other pair.
/// Each call advances the affected direction's stream by exactly the
/// header width; there is no rewind and no buffering across calls.
pub trait HeaderCrypto {
    /// Encrypt a server header. Length depends on the epoch's server
    /// opcode width.
    fn encrypt_server_header(&mut self, size: u16, opcode: u32) -> Vec<u8>;

    /// Decrypt a server header of exactly the epoch's width.
    ///
    /// # Errors
    ///
    /// [`HeaderCryptoError::InvalidHeaderLength`] when the slice width
    /// is wrong; the stream is not advanced in that case.
    fn decrypt_server_header(
        &mut self,
        header: &[u8],
    ) -> Result<ServerHeader, HeaderCryptoError>;

    /// Encrypt a client header.
    fn encrypt_client_header(&mut self, size: u16, opcode: u32) -> [u8; CLIENT_HEADER_LENGTH];

    /// Decrypt a client header.
    fn decrypt_client_header(&mut self, header: [u8; CLIENT_HEADER_LENGTH]) -> ClientHeader;
}

/// The directional stream pair every epoch cipher wraps.
#[derive(Debug)]
struct HeaderStreams {
    params: EpochParams,
    server_to_client: KeyedStream,
    client_to_server: KeyedStream,
}

impl HeaderStreams {
    fn new(
        epoch: ProtocolEpoch,
        session_key: &[u8; SESSION_KEY_LENGTH],
        client_seed: u32,
        server_seed: u32,
    ) -> Self {
        let params = epoch.params();
        Self {
            params,
            server_to_client: KeyedStream::new(
                &derive::server_direction_key(session_key, server_seed),
                params.keystream_discard,
            ),
            client_to_server: KeyedStream::new(
                &derive::client_direction_key(session_key, client_seed),
                params.keystream_discard,
            ),
        }
    }

    fn encrypt_server_header(&mut self, size: u16, opcode: u32) -> Vec<u8> {
        let mut header = Vec::with_capacity(self.params.server_header_length());
        header.extend_from_slice(&size.to_be_bytes());
        header.extend_from_slice(&opcode.to_le_bytes()[..self.params.server_opcode_width]);
        self.server_to_client.apply(&mut header);
        header
    }

    fn decrypt_server_header(
        &mut self,
        header: &[u8],
    ) -> Result<ServerHeader, HeaderCryptoError> {
        let expected = self.params.server_header_length();
        if header.len() != expected {
            return Err(HeaderCryptoError::InvalidHeaderLength {
                expected,
                actual: header.len(),
            });
        }

        let mut bytes = header.to_vec();
        self.server_to_client.apply(&mut bytes);

        let size = u16::from_be_bytes([bytes[0], bytes[1]]);
        let mut opcode = [0u8; 4];
        opcode[..self.params.server_opcode_width].copy_from_slice(&bytes[SIZE_FIELD_WIDTH..]);
        Ok(ServerHeader {
            size,
            opcode: u32::from_le_bytes(opcode),
        })
    }

    fn encrypt_client_header(&mut self, size: u16, opcode: u32) -> [u8; CLIENT_HEADER_LENGTH] {
        let mut header = [0u8; CLIENT_HEADER_LENGTH];
        header[..SIZE_FIELD_WIDTH].copy_from_slice(&size.to_be_bytes());
        header[SIZE_FIELD_WIDTH..].copy_from_slice(&opcode.to_le_bytes());
        self.client_to_server.apply(&mut header);
        header
    }

    fn decrypt_client_header(&mut self, mut header: [u8; CLIENT_HEADER_LENGTH]) -> ClientHeader {
        self.client_to_server.apply(&mut header);
        ClientHeader {
            size: u16::from_be_bytes([header[0], header[1]]),
            opcode: u32::from_le_bytes([header[2], header[3], header[4], header[5]]),
        }
    }
}

macro_rules! epoch_cipher {
    ($(#[$doc:meta])* $name:ident, $epoch:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name(HeaderStreams);

        impl $name {
            pub(crate) fn new(
                session_key: &[u8; SESSION_KEY_LENGTH],
                client_seed: u32,
                server_seed: u32,
            ) -> Self {
                Self(HeaderStreams::new($epoch, session_key, client_seed, server_seed))
            }
        }

        impl HeaderCrypto for $name {
            fn encrypt_server_header(&mut self, size: u16, opcode: u32) -> Vec<u8> {
                self.0.encrypt_server_header(size, opcode)
            }

            fn decrypt_server_header(
                &mut self,
                header: &[u8],
            ) -> Result<ServerHeader, HeaderCryptoError> {
                self.0.decrypt_server_header(header)
            }

            fn encrypt_client_header(
                &mut self,
                size: u16,
                opcode: u32,
            ) -> [u8; CLIENT_HEADER_LENGTH] {
                self.0.encrypt_client_header(size, opcode)
            }

            fn decrypt_client_header(
                &mut self,
                header: [u8; CLIENT_HEADER_LENGTH],
            ) -> ClientHeader {
                self.0.decrypt_client_header(header)
            }
        }
    };
}

epoch_cipher!(
    /// Header cipher for the original protocol generation.
    VanillaHeaderCrypto,
    ProtocolEpoch::Vanilla
);
epoch_cipher!(
    /// Header cipher for the first expansion generation.
    BurningCrusadeHeaderCrypto,
    ProtocolEpoch::BurningCrusade
);
epoch_cipher!(
    /// Header cipher for the second expansion generation.
    WrathHeaderCrypto,
    ProtocolEpoch::Wrath
);

macro_rules! side_cipher {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub enum $name {
            /// Original generation cipher.
            Vanilla(VanillaHeaderCrypto),
            /// First expansion cipher.
            BurningCrusade(BurningCrusadeHeaderCrypto),
            /// Second expansion cipher.
            Wrath(WrathHeaderCrypto),
        }

        impl $name {
            pub(crate) fn new(
                epoch: ProtocolEpoch,
                session_key: &[u8; SESSION_KEY_LENGTH],
                client_seed: u32,
                server_seed: u32,
            ) -> Self {
                match epoch {
                    ProtocolEpoch::Vanilla => {
                        Self::Vanilla(VanillaHeaderCrypto::new(session_key, client_seed, server_seed))
                    }
                    ProtocolEpoch::BurningCrusade => Self::BurningCrusade(
                        BurningCrusadeHeaderCrypto::new(session_key, client_seed, server_seed),
                    ),
                    ProtocolEpoch::Wrath => {
                        Self::Wrath(WrathHeaderCrypto::new(session_key, client_seed, server_seed))
                    }
                }
            }

            /// The epoch this cipher was derived for.
            pub const fn epoch(&self) -> ProtocolEpoch {
                match self {
                    Self::Vanilla(_) => ProtocolEpoch::Vanilla,
                    Self::BurningCrusade(_) => ProtocolEpoch::BurningCrusade,
                    Self::Wrath(_) => ProtocolEpoch::Wrath,
                }
            }
        }

        impl HeaderCrypto for $name {
            fn encrypt_server_header(&mut self, size: u16, opcode: u32) -> Vec<u8> {
                match self {
                    Self::Vanilla(c) => c.encrypt_server_header(size, opcode),
                    Self::BurningCrusade(c) => c.encrypt_server_header(size, opcode),
                    Self::Wrath(c) => c.encrypt_server_header(size, opcode),
                }
            }

            fn decrypt_server_header(
                &mut self,
                header: &[u8],
            ) -> Result<ServerHeader, HeaderCryptoError> {
                match self {
                    Self::Vanilla(c) => c.decrypt_server_header(header),
                    Self::BurningCrusade(c) => c.decrypt_server_header(header),
                    Self::Wrath(c) => c.decrypt_server_header(header),
                }
            }

            fn encrypt_client_header(
                &mut self,
                size: u16,
                opcode: u32,
            ) -> [u8; CLIENT_HEADER_LENGTH] {
                match self {
                    Self::Vanilla(c) => c.encrypt_client_header(size, opcode),
                    Self::BurningCrusade(c) => c.encrypt_client_header(size, opcode),
                    Self::Wrath(c) => c.encrypt_client_header(size, opcode),
                }
            }

            fn decrypt_client_header(
                &mut self,
                header: [u8; CLIENT_HEADER_LENGTH],
            ) -> ClientHeader {
                match self {
                    Self::Vanilla(c) => c.decrypt_client_header(header),
                    Self::BurningCrusade(c) => c.decrypt_client_header(header),
                    Self::Wrath(c) => c.decrypt_client_header(header),
                }
            }
        }
    };
}

side_cipher!(
    /// The client side's cipher pair for one connection.
    ///
    /// Encrypts client headers and decrypts server headers; the other
    /// two trait operations belong to the server side and advance
    /// stream state this side relies on, so never call them here.
    ClientCrypto
);
side_cipher!(
    /// The server side's cipher pair for one connection.
    ///
    /// Encrypts server headers and decrypts client headers.
    ServerCrypto
);
