use crate::core::cursor::ByteCursor;
use crate::core::packet::FromPayload;
use crate::error::Result;
use bytes::Bytes;
use std::collections::HashMap;

/// `S2A_RULES`: server console variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRulesResponse {
    packet_type: u8,
    payload: Bytes,
    rules: HashMap<String, String>,
}

impl ServerRulesResponse {
    pub fn rules(&self) -> &HashMap<String, String> {
        &self.rules
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.rules.get(name).map(String::as_str)
    }
}

impl FromPayload for ServerRulesResponse {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let mut cursor = ByteCursor::new(payload.clone());
        let count = cursor.read_u16()?;

        let mut rules = HashMap::with_capacity(count as usize);
        for _ in 0..count {
            let name = cursor.read_cstring()?;
            let value = cursor.read_cstring()?;
            rules.insert(name, value);
        }

        Ok(Self {
            packet_type,
            payload,
            rules,
        })
    }
}

impl_query_packet!(ServerRulesResponse);
