//! Outbound query builders.
//!
//! Each builder returns a plain [`SteamPacket`] ready for
//! [`to_bytes`](SteamPacket::to_bytes) or the datagram codec.

use crate::core::packet::SteamPacket;
use crate::protocol::packet_type::*;
use bytes::{BufMut, BytesMut};
use std::net::SocketAddrV4;

/// Challenge value that asks the server to reply with a fresh challenge
pub const CHALLENGE_REQUEST: i32 = -1;

const INFO_QUERY: &[u8] = b"Source Engine Query\0";

/// Master server regions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Region {
    UsEast = 0x00,
    UsWest = 0x01,
    SouthAmerica = 0x02,
    Europe = 0x03,
    Asia = 0x04,
    Australia = 0x05,
    MiddleEast = 0x06,
    Africa = 0x07,
    All = 0xFF,
}

pub fn info_request() -> SteamPacket {
    SteamPacket::new(A2S_INFO, INFO_QUERY)
}

pub fn challenge_request() -> SteamPacket {
    SteamPacket::empty(A2S_SERVERQUERY_GETCHALLENGE)
}

/// Player query; pass [`CHALLENGE_REQUEST`] to obtain a challenge first
pub fn player_request(challenge: i32) -> SteamPacket {
    SteamPacket::new(A2S_PLAYER, challenge.to_le_bytes().to_vec())
}

/// Rules query; pass [`CHALLENGE_REQUEST`] to obtain a challenge first
pub fn rules_request(challenge: i32) -> SteamPacket {
    SteamPacket::new(A2S_RULES, challenge.to_le_bytes().to_vec())
}

/// Request one page of servers from a master server.
///
/// `seed` is the last address of the previous page, or `0.0.0.0:0` for the
/// first one. `filter` uses the master server filter syntax, e.g. `\gamedir\tf`.
pub fn master_server_request(region: Region, seed: SocketAddrV4, filter: &str) -> SteamPacket {
    let seed = seed.to_string();
    let mut payload = BytesMut::with_capacity(1 + seed.len() + filter.len() + 2);
    payload.put_u8(region as u8);
    payload.put_slice(seed.as_bytes());
    payload.put_u8(0);
    payload.put_slice(filter.as_bytes());
    payload.put_u8(0);
    SteamPacket::new(A2M_GET_SERVERS_BATCH2, payload.freeze())
}
