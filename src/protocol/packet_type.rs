//! Type tags of the query protocol.
//!
//! Requests are `A2S_*`/`A2M_*`, server replies `S2A_*`/`S2C_*`, master
//! server replies `M2A_*`. Tags are plain `u8` values so that the dispatcher
//! can carry tags it has never heard of.

/// Server info request
pub const A2S_INFO: u8 = 0x54;
/// Player list request
pub const A2S_PLAYER: u8 = 0x55;
/// Server rules request
pub const A2S_RULES: u8 = 0x56;
/// Challenge number request
pub const A2S_SERVERQUERY_GETCHALLENGE: u8 = 0x57;
/// Master server batch request
pub const A2M_GET_SERVERS_BATCH2: u8 = 0x31;

/// Challenge number reply
pub const S2C_CHALLENGE: u8 = 0x41;
/// Legacy GoldSrc server info
pub const S2A_INFO: u8 = 0x43;
/// Source engine server info
pub const S2A_INFO2: u8 = 0x49;
/// GoldSrc server info
pub const S2A_INFO_DETAILED: u8 = 0x6D;
/// Server rules reply
pub const S2A_RULES: u8 = 0x45;
/// Player list reply
pub const S2A_PLAYER: u8 = 0x44;
/// Master server address batch
pub const M2A_SERVER_BATCH: u8 = 0x66;

/// GoldSrc RCON challenge reply
pub const RCON_GOLDSRC_CHALLENGE_HEADER: u8 = 0x63;
/// GoldSrc RCON reply when no challenge was issued
pub const RCON_GOLDSRC_NO_CHALLENGE_HEADER: u8 = 0x39;
/// GoldSrc RCON command output
pub const RCON_GOLDSRC_RESPONSE_HEADER: u8 = 0x6C;

/// Human-readable name of a known tag
pub fn name(packet_type: u8) -> Option<&'static str> {
    let name = match packet_type {
        A2S_INFO => "A2S_INFO",
        A2S_PLAYER => "A2S_PLAYER",
        A2S_RULES => "A2S_RULES",
        A2S_SERVERQUERY_GETCHALLENGE => "A2S_SERVERQUERY_GETCHALLENGE",
        A2M_GET_SERVERS_BATCH2 => "A2M_GET_SERVERS_BATCH2",
        S2C_CHALLENGE => "S2C_CHALLENGE",
        S2A_INFO => "S2A_INFO",
        S2A_INFO2 => "S2A_INFO2",
        S2A_INFO_DETAILED => "S2A_INFO_DETAILED",
        S2A_RULES => "S2A_RULES",
        S2A_PLAYER => "S2A_PLAYER",
        M2A_SERVER_BATCH => "M2A_SERVER_BATCH",
        RCON_GOLDSRC_CHALLENGE_HEADER => "RCON_GOLDSRC_CHALLENGE_HEADER",
        RCON_GOLDSRC_NO_CHALLENGE_HEADER => "RCON_GOLDSRC_NO_CHALLENGE_HEADER",
        RCON_GOLDSRC_RESPONSE_HEADER => "RCON_GOLDSRC_RESPONSE_HEADER",
        _ => return None,
    };
    Some(name)
}
