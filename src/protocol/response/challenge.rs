use crate::core::cursor::ByteCursor;
use crate::core::packet::FromPayload;
use crate::error::Result;
use bytes::Bytes;

/// `S2C_CHALLENGE`: challenge number to echo back in player and rules queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeResponse {
    packet_type: u8,
    payload: Bytes,
    challenge: i32,
}

impl ChallengeResponse {
    pub fn challenge(&self) -> i32 {
        self.challenge
    }
}

impl FromPayload for ChallengeResponse {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let challenge = ByteCursor::new(payload.clone()).read_i32()?;
        Ok(Self {
            packet_type,
            payload,
            challenge,
        })
    }
}

impl_query_packet!(ChallengeResponse);
