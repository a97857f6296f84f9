use crate::core::cursor::ByteCursor;
use crate::core::packet::FromPayload;
use crate::error::Result;
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub index: u8,
    pub name: String,
    pub score: i32,
    /// Seconds connected
    pub connect_time: f32,
}

/// `S2A_PLAYER`: players currently on the server
#[derive(Debug, Clone, PartialEq)]
pub struct PlayersResponse {
    packet_type: u8,
    payload: Bytes,
    players: Vec<Player>,
}

impl PlayersResponse {
    pub fn players(&self) -> &[Player] {
        &self.players
    }
}

impl FromPayload for PlayersResponse {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let mut cursor = ByteCursor::new(payload.clone());
        let count = cursor.read_u8()?;

        let mut players = Vec::with_capacity(count as usize);
        for _ in 0..count {
            players.push(Player {
                index: cursor.read_u8()?,
                name: cursor.read_cstring()?,
                score: cursor.read_i32()?,
                connect_time: cursor.read_f32()?,
            });
        }

        Ok(Self {
            packet_type,
            payload,
            players,
        })
    }
}

impl_query_packet!(PlayersResponse);
