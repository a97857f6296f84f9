use crate::core::packet::FromPayload;
use crate::error::Result;
use crate::protocol::packet_type::RCON_GOLDSRC_CHALLENGE_HEADER;
use bytes::Bytes;

/// Reply to a GoldSrc RCON request.
///
/// Three tags share this decoder: the challenge reply, the reply sent when no
/// challenge was requested first, and regular command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RconGoldSrcResponse {
    packet_type: u8,
    payload: Bytes,
    response: String,
}

impl RconGoldSrcResponse {
    /// Reply text with trailing NULs and line breaks removed
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Challenge number carried by a `challenge rcon <n>` reply
    pub fn challenge(&self) -> Option<i64> {
        if self.packet_type != RCON_GOLDSRC_CHALLENGE_HEADER {
            return None;
        }
        self.response.split_whitespace().last()?.parse().ok()
    }
}

impl FromPayload for RconGoldSrcResponse {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let response = String::from_utf8_lossy(&payload)
            .trim_end_matches(['\0', '\n', '\r'])
            .to_string();
        Ok(Self {
            packet_type,
            payload,
            response,
        })
    }
}

impl_query_packet!(RconGoldSrcResponse);
