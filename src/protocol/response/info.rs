use crate::core::cursor::ByteCursor;
use crate::core::packet::FromPayload;
use crate::error::Result;
use bytes::Bytes;

const EDF_PORT: u8 = 0x80;
const EDF_STEAM_ID: u8 = 0x10;
const EDF_SOURCE_TV: u8 = 0x40;
const EDF_KEYWORDS: u8 = 0x20;
const EDF_GAME_ID: u8 = 0x01;

/// Optional trailer of a Source info reply, selected by the extra data flag byte
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraData {
    pub port: Option<u16>,
    pub steam_id: Option<u64>,
    pub source_tv_port: Option<u16>,
    pub source_tv_name: Option<String>,
    pub keywords: Option<String>,
    pub game_id: Option<u64>,
}

impl ExtraData {
    fn read(cursor: &mut ByteCursor) -> Result<Self> {
        let flags = cursor.read_u8()?;
        let mut extra = Self::default();

        if flags & EDF_PORT != 0 {
            extra.port = Some(cursor.read_u16()?);
        }
        if flags & EDF_STEAM_ID != 0 {
            extra.steam_id = Some(cursor.read_u64()?);
        }
        if flags & EDF_SOURCE_TV != 0 {
            extra.source_tv_port = Some(cursor.read_u16()?);
            extra.source_tv_name = Some(cursor.read_cstring()?);
        }
        if flags & EDF_KEYWORDS != 0 {
            extra.keywords = Some(cursor.read_cstring()?);
        }
        if flags & EDF_GAME_ID != 0 {
            extra.game_id = Some(cursor.read_u64()?);
        }

        Ok(extra)
    }
}

/// `S2A_INFO2`: server info from a Source engine server
#[derive(Debug, Clone, PartialEq)]
pub struct SourceServerInfo {
    packet_type: u8,
    payload: Bytes,
    pub protocol: u8,
    pub server_name: String,
    pub map_name: String,
    pub game_directory: String,
    pub game_description: String,
    pub app_id: u16,
    pub player_count: u8,
    pub max_players: u8,
    pub bot_count: u8,
    /// `d` dedicated, `l` listen, `p` SourceTV relay
    pub server_type: char,
    /// `l` Linux, `w` Windows, `m`/`o` macOS
    pub environment: char,
    pub password_protected: bool,
    pub secure: bool,
    pub game_version: String,
    /// Only present on servers that send the extra data flag
    pub extra: Option<ExtraData>,
}

impl FromPayload for SourceServerInfo {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let mut cursor = ByteCursor::new(payload.clone());

        let protocol = cursor.read_u8()?;
        let server_name = cursor.read_cstring()?;
        let map_name = cursor.read_cstring()?;
        let game_directory = cursor.read_cstring()?;
        let game_description = cursor.read_cstring()?;
        let app_id = cursor.read_u16()?;
        let player_count = cursor.read_u8()?;
        let max_players = cursor.read_u8()?;
        let bot_count = cursor.read_u8()?;
        let server_type = cursor.read_char()?;
        let environment = cursor.read_char()?;
        let password_protected = cursor.read_bool()?;
        let secure = cursor.read_bool()?;
        let game_version = cursor.read_cstring()?;
        let extra = if cursor.is_empty() {
            None
        } else {
            Some(ExtraData::read(&mut cursor)?)
        };

        Ok(Self {
            packet_type,
            payload,
            protocol,
            server_name,
            map_name,
            game_directory,
            game_description,
            app_id,
            player_count,
            max_players,
            bot_count,
            server_type,
            environment,
            password_protected,
            secure,
            game_version,
            extra,
        })
    }
}

impl_query_packet!(SourceServerInfo);

/// Mod section of a GoldSrc info reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModInfo {
    pub info_url: String,
    pub download_url: String,
    pub version: i32,
    pub size: i32,
    pub server_side_only: bool,
    pub custom_dll: bool,
}

/// `S2A_INFO_DETAILED`: server info from a GoldSrc server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldSrcServerInfo {
    packet_type: u8,
    payload: Bytes,
    pub server_address: String,
    pub server_name: String,
    pub map_name: String,
    pub game_directory: String,
    pub game_description: String,
    pub player_count: u8,
    pub max_players: u8,
    pub protocol: u8,
    pub server_type: char,
    pub environment: char,
    pub password_protected: bool,
    pub mod_info: Option<ModInfo>,
    pub secure: bool,
    pub bot_count: u8,
}

impl FromPayload for GoldSrcServerInfo {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let mut cursor = ByteCursor::new(payload.clone());

        let server_address = cursor.read_cstring()?;
        let server_name = cursor.read_cstring()?;
        let map_name = cursor.read_cstring()?;
        let game_directory = cursor.read_cstring()?;
        let game_description = cursor.read_cstring()?;
        let player_count = cursor.read_u8()?;
        let max_players = cursor.read_u8()?;
        let protocol = cursor.read_u8()?;
        let server_type = cursor.read_char()?;
        let environment = cursor.read_char()?;
        let password_protected = cursor.read_bool()?;
        let mod_info = if cursor.read_bool()? {
            let info_url = cursor.read_cstring()?;
            let download_url = cursor.read_cstring()?;
            // unused NUL
            cursor.read_u8()?;
            Some(ModInfo {
                info_url,
                download_url,
                version: cursor.read_i32()?,
                size: cursor.read_i32()?,
                server_side_only: cursor.read_bool()?,
                custom_dll: cursor.read_bool()?,
            })
        } else {
            None
        };
        let secure = cursor.read_bool()?;
        let bot_count = cursor.read_u8()?;

        Ok(Self {
            packet_type,
            payload,
            server_address,
            server_name,
            map_name,
            game_directory,
            game_description,
            player_count,
            max_players,
            protocol,
            server_type,
            environment,
            password_protected,
            mod_info,
            secure,
            bot_count,
        })
    }
}

impl_query_packet!(GoldSrcServerInfo);

/// `S2A_INFO`: legacy GoldSrc info reply, sent by servers that predate the
/// detailed format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyServerInfo {
    packet_type: u8,
    payload: Bytes,
    pub server_address: String,
    pub server_name: String,
    pub map_name: String,
    pub game_directory: String,
    pub game_description: String,
    pub player_count: u8,
    pub max_players: u8,
    pub protocol: u8,
}

impl FromPayload for LegacyServerInfo {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        let mut cursor = ByteCursor::new(payload.clone());

        Ok(Self {
            server_address: cursor.read_cstring()?,
            server_name: cursor.read_cstring()?,
            map_name: cursor.read_cstring()?,
            game_directory: cursor.read_cstring()?,
            game_description: cursor.read_cstring()?,
            player_count: cursor.read_u8()?,
            max_players: cursor.read_u8()?,
            protocol: cursor.read_u8()?,
            packet_type,
            payload,
        })
    }
}

impl_query_packet!(LegacyServerInfo);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::packet_type::{S2A_INFO, S2A_INFO2, S2A_INFO_DETAILED};

    fn source_info_body() -> Vec<u8> {
        let mut body = vec![17];
        body.extend_from_slice(b"My Server\0ctf_2fort\0tf\0Team Fortress\0");
        body.extend_from_slice(&440u16.to_le_bytes());
        body.extend_from_slice(&[12, 24, 2, b'd', b'l', 0, 1]);
        body.extend_from_slice(b"8622567\0");
        body
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_source_info_without_extra_data() {
        let info =
            SourceServerInfo::from_payload(S2A_INFO2, Bytes::from(source_info_body())).unwrap();
        assert_eq!(info.server_name, "My Server");
        assert_eq!(info.map_name, "ctf_2fort");
        assert_eq!(info.app_id, 440);
        assert_eq!(info.player_count, 12);
        assert_eq!(info.max_players, 24);
        assert_eq!(info.server_type, 'd');
        assert!(!info.password_protected);
        assert!(info.secure);
        assert_eq!(info.game_version, "8622567");
        assert!(info.extra.is_none());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_source_info_with_extra_data() {
        let mut body = source_info_body();
        body.push(EDF_PORT | EDF_KEYWORDS | EDF_GAME_ID);
        body.extend_from_slice(&27015u16.to_le_bytes());
        body.extend_from_slice(b"alltalk,cp\0");
        body.extend_from_slice(&440u64.to_le_bytes());

        let info = SourceServerInfo::from_payload(S2A_INFO2, Bytes::from(body)).unwrap();
        let extra = info.extra.unwrap();
        assert_eq!(extra.port, Some(27015));
        assert_eq!(extra.keywords.as_deref(), Some("alltalk,cp"));
        assert_eq!(extra.game_id, Some(440));
        assert_eq!(extra.steam_id, None);
    }

    #[test]
    fn test_truncated_source_info() {
        let body = source_info_body();
        let result = SourceServerInfo::from_payload(S2A_INFO2, Bytes::from(body[..20].to_vec()));
        assert!(matches!(result, Err(ProtocolError::UnexpectedEof { .. })));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_goldsrc_info_with_mod() {
        let mut body = Vec::new();
        body.extend_from_slice(b"10.0.0.1:27015\0HL Server\0crossfire\0valve\0Half-Life\0");
        body.extend_from_slice(&[3, 16, 47, b'd', b'w', 1, 1]);
        body.extend_from_slice(b"http://example.com\0http://example.com/dl\0\0");
        body.extend_from_slice(&1i32.to_le_bytes());
        body.extend_from_slice(&4096i32.to_le_bytes());
        body.extend_from_slice(&[0, 1, 1, 0]);

        let info = GoldSrcServerInfo::from_payload(S2A_INFO_DETAILED, Bytes::from(body)).unwrap();
        assert_eq!(info.server_address, "10.0.0.1:27015");
        assert_eq!(info.protocol, 47);
        assert!(info.password_protected);
        let mod_info = info.mod_info.unwrap();
        assert_eq!(mod_info.download_url, "http://example.com/dl");
        assert_eq!(mod_info.size, 4096);
        assert!(mod_info.custom_dll);
        assert!(info.secure);
        assert_eq!(info.bot_count, 0);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_legacy_info() {
        let mut body = Vec::new();
        body.extend_from_slice(b"10.0.0.2:27015\0Old Server\0de_dust\0cstrike\0Counter-Strike\0");
        body.extend_from_slice(&[5, 20, 46]);

        let info = LegacyServerInfo::from_payload(S2A_INFO, Bytes::from(body)).unwrap();
        assert_eq!(info.server_address, "10.0.0.2:27015");
        assert_eq!(info.server_name, "Old Server");
        assert_eq!(info.map_name, "de_dust");
        assert_eq!(info.game_directory, "cstrike");
        assert_eq!(info.game_description, "Counter-Strike");
        assert_eq!(info.player_count, 5);
        assert_eq!(info.max_players, 20);
        assert_eq!(info.protocol, 46);
    }

    #[test]
    fn test_truncated_legacy_info() {
        let result = LegacyServerInfo::from_payload(
            S2A_INFO,
            Bytes::from_static(b"10.0.0.2:27015\0Old Server\0de_dust\0cstrike\0Counter-Strike\0\x05"),
        );
        assert!(matches!(result, Err(ProtocolError::UnexpectedEof { .. })));
    }
}
