//! # Error Types
//!
//! Error handling for the query protocol core.
//!
//! Every failure here is scoped to the single message being processed. None of
//! them touch the packet registry or any other message decoded concurrently.
//!
//! ## Error Categories
//! - **Framing Errors**: missing type tag, bad datagram prefix, short buffers
//! - **Reassembly Errors**: checksum mismatch, decompression failure, fragment limits
//! - **Payload Errors**: truncated or invalid fields inside a concrete response
//! - **Setup Errors**: registry conflicts, configuration problems
//!
//! An unknown packet type is *not* an error: the dispatcher falls back to a
//! generic [`SteamPacket`](crate::core::packet::SteamPacket).
//!
//! ## Example Usage
//! ```rust
//! use bytes::Bytes;
//! use steam_query_protocol::error::ProtocolError;
//! use steam_query_protocol::protocol::dispatcher::Dispatcher;
//! use tracing::{error, info};
//!
//! match Dispatcher::global().dispatch(Bytes::new()) {
//!     Ok(packet) => info!(tag = packet.packet_type(), "Decoded packet"),
//!     Err(ProtocolError::MalformedPacket) => error!("Datagram carried no type tag"),
//!     Err(e) => error!(error = %e, "Decode failed"),
//! }
//! ```

use std::io;
use thiserror::Error;

// ProtocolError is the primary error type for all decode/encode operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed packet: buffer too short to contain a type tag")]
    MalformedPacket,

    #[error("Invalid packet header")]
    InvalidHeader,

    #[error("CRC32 checksum mismatch of uncompressed packet data: expected 0x{expected:08X}, got 0x{actual:08X}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("Compression failed")]
    CompressionFailure,

    #[error("Decompression failed")]
    DecompressionFailure,

    #[error("Unexpected end of payload: need {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("Packet too large: {0} bytes")]
    OversizedPacket(usize),

    #[error("Too many fragments: {0}")]
    TooManyFragments(usize),

    #[error("Duplicate fragment index: {0}")]
    DuplicateFragment(u16),

    #[error("Missing fragment index: {0}")]
    MissingFragment(u16),

    #[error("Packet type 0x{0:02X} is already registered")]
    DuplicateRegistration(u8),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
