//! # Core Protocol Components
//!
//! Low-level packet handling: framing, payload reading and split-packet reassembly.
//!
//! ## Components
//! - **Packet**: the [`SteamPacket`](packet::SteamPacket) envelope and the traits shared by all decoded packets
//! - **Cursor**: bounds-checked sequential reader used by response decoders
//! - **Reassembly**: fragment concatenation, bzip2 recovery and CRC32 verification
//! - **Codec**: Tokio codec for datagram framing with `UdpFramed`
//!
//! ## Wire Format
//! ```text
//! [Prefix(4)] [Type(1)] [Payload(N)]
//! ```
//! `FF FF FF FF` prefixes a complete message, `FE FF FF FF` one fragment of a
//! split message.

pub mod codec;
pub mod cursor;
pub mod packet;
pub mod reassembly;
