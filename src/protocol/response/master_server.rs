use crate::core::cursor::ByteCursor;
use crate::core::packet::FromPayload;
use crate::error::{ProtocolError, Result};
use bytes::Bytes;
use std::net::{Ipv4Addr, SocketAddrV4};

const BATCH_MARKER: u8 = 0x0A;
const ENTRY_SIZE: usize = 6;

/// `M2A_SERVER_BATCH`: one page of server addresses from a master server.
///
/// A `0.0.0.0:0` entry marks the end of the list; it is kept so callers can
/// tell the final page apart from the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterServerBatch {
    packet_type: u8,
    payload: Bytes,
    servers: Vec<SocketAddrV4>,
}

impl MasterServerBatch {
    pub fn servers(&self) -> &[SocketAddrV4] {
        &self.servers
    }

    /// Whether this page ends with the terminating `0.0.0.0:0` entry
    pub fn is_last_page(&self) -> bool {
        self.servers
            .last()
            .is_some_and(|addr| addr.ip().is_unspecified() && addr.port() == 0)
    }

    /// Seed address for requesting the next page
    pub fn last_server(&self) -> Option<SocketAddrV4> {
        self.servers.last().copied()
    }
}

impl FromPayload for MasterServerBatch {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let mut cursor = ByteCursor::new(payload.clone());

        if cursor.read_u8()? != BATCH_MARKER {
            return Err(ProtocolError::InvalidPayload(
                "Master query response is missing additional 0x0A byte".to_string(),
            ));
        }
        if cursor.remaining() % ENTRY_SIZE != 0 {
            return Err(ProtocolError::InvalidPayload(format!(
                "Master query response has a partial address entry ({} trailing bytes)",
                cursor.remaining() % ENTRY_SIZE
            )));
        }

        let mut servers = Vec::with_capacity(cursor.remaining() / ENTRY_SIZE);
        while !cursor.is_empty() {
            let ip = cursor.read_bytes(4)?;
            let port = cursor.read_u16_be()?;
            servers.push(SocketAddrV4::new(
                Ipv4Addr::new(ip[0], ip[1], ip[2], ip[3]),
                port,
            ));
        }

        Ok(Self {
            packet_type,
            payload,
            servers,
        })
    }
}

impl_query_packet!(MasterServerBatch);
