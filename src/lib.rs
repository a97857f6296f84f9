//! # steam-query-protocol
//!
//! Binary decode/encode core of the Steam game-server query protocol.
//!
//! This crate turns UDP datagrams into typed replies and outbound queries into
//! datagrams. It owns packet framing, split-packet reassembly (including bzip2
//! compressed messages with CRC32 verification) and dispatch on the one-byte
//! type tag. Sockets, timeouts and retries belong to the caller.
//!
//! ## Layers
//! - [`core`]: envelope, byte cursor, reassembly, datagram codec
//! - [`protocol`]: type tags, dispatcher, built-in replies, request builders
//! - [`utils`]: compression/checksum helpers and logging setup
//! - [`config`]: wire constants and tunable limits
//!
//! ## Example
//! ```rust
//! use bytes::Bytes;
//! use steam_query_protocol::protocol::dispatcher::Dispatcher;
//! use steam_query_protocol::protocol::response::ChallengeResponse;
//!
//! let body = Bytes::from_static(&[0x41, 0x2A, 0x00, 0x00, 0x00]);
//! let packet = Dispatcher::global().dispatch(body).unwrap();
//! let reply = packet.downcast_ref::<ChallengeResponse>().unwrap();
//! assert_eq!(reply.challenge(), 42);
//! ```
//!
//! Unknown type tags are not an error: they decode to a plain [`SteamPacket`].

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::packet::{FromPayload, QueryPacket, SteamPacket};
pub use crate::core::reassembly::{order_fragments, reassemble_packet, Reassembler};
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::dispatcher::{Dispatcher, DispatcherBuilder};
pub use crate::utils::compression::CompressionInfo;
