use crate::core::packet::{FromPayload, QueryPacket, SteamPacket};
use crate::error::{ProtocolError, Result};
use crate::protocol::packet_type::{self, *};
use crate::protocol::response::{
    ChallengeResponse, GoldSrcServerInfo, LegacyServerInfo, MasterServerBatch, PlayersResponse,
    RconGoldSrcResponse, ServerRulesResponse, SourceServerInfo,
};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{debug, trace};

type DecoderFn = dyn Fn(u8, Bytes) -> Result<Box<dyn QueryPacket>> + Send + Sync + 'static;

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// Collects decoder registrations before the table is frozen into a [`Dispatcher`].
///
/// Registration is append-only: a tag can be bound once.
#[derive(Default)]
pub struct DispatcherBuilder {
    decoders: HashMap<u8, Box<DecoderFn>>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-populated with every built-in response decoder
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        builder.insert_type::<ChallengeResponse>(S2C_CHALLENGE);
        builder.insert_type::<LegacyServerInfo>(S2A_INFO);
        builder.insert_type::<SourceServerInfo>(S2A_INFO2);
        builder.insert_type::<GoldSrcServerInfo>(S2A_INFO_DETAILED);
        builder.insert_type::<ServerRulesResponse>(S2A_RULES);
        builder.insert_type::<PlayersResponse>(S2A_PLAYER);
        builder.insert_type::<RconGoldSrcResponse>(RCON_GOLDSRC_CHALLENGE_HEADER);
        builder.insert_type::<RconGoldSrcResponse>(RCON_GOLDSRC_NO_CHALLENGE_HEADER);
        builder.insert_type::<RconGoldSrcResponse>(RCON_GOLDSRC_RESPONSE_HEADER);
        builder.insert_type::<MasterServerBatch>(M2A_SERVER_BATCH);
        builder
    }

    /// Bind a decoder closure to `packet_type`
    pub fn register<F>(&mut self, packet_type: u8, decoder: F) -> Result<&mut Self>
    where
        F: Fn(u8, Bytes) -> Result<Box<dyn QueryPacket>> + Send + Sync + 'static,
    {
        if self.decoders.contains_key(&packet_type) {
            return Err(ProtocolError::DuplicateRegistration(packet_type));
        }
        self.decoders.insert(packet_type, Box::new(decoder));
        Ok(self)
    }

    /// Bind a [`FromPayload`] type to `packet_type`
    pub fn register_type<T: FromPayload>(&mut self, packet_type: u8) -> Result<&mut Self> {
        self.register(packet_type, decode_boxed::<T>)
    }

    fn insert_type<T: FromPayload>(&mut self, packet_type: u8) {
        self.decoders
            .insert(packet_type, Box::new(decode_boxed::<T>));
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher {
            decoders: self.decoders,
        }
    }
}

fn decode_boxed<T: FromPayload>(packet_type: u8, payload: Bytes) -> Result<Box<dyn QueryPacket>> {
    Ok(Box::new(T::from_payload(packet_type, payload)?))
}

/// Frozen mapping from type tag to decoder.
///
/// Dispatching never mutates the table, so one instance can be shared freely
/// between threads without locking.
pub struct Dispatcher {
    decoders: HashMap<u8, Box<DecoderFn>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        DispatcherBuilder::with_defaults().build()
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Process-wide dispatcher with the built-in decoders, created on first use
    pub fn global() -> &'static Dispatcher {
        GLOBAL.get_or_init(Dispatcher::default)
    }

    pub fn is_registered(&self, packet_type: u8) -> bool {
        self.decoders.contains_key(&packet_type)
    }

    /// Registered tags in ascending order
    pub fn registered_types(&self) -> Vec<u8> {
        let mut types: Vec<u8> = self.decoders.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Decode a message body: type tag followed by payload, prefix already removed.
    ///
    /// Tags without a registered decoder come back as a plain [`SteamPacket`]
    /// carrying the untouched payload.
    ///
    /// # Errors
    /// `ProtocolError::MalformedPacket` for an empty buffer, otherwise whatever
    /// the registered decoder reports.
    pub fn dispatch(&self, raw: Bytes) -> Result<Box<dyn QueryPacket>> {
        let Some(&packet_type) = raw.first() else {
            return Err(ProtocolError::MalformedPacket);
        };
        let payload = raw.slice(1..);

        match self.decoders.get(&packet_type) {
            Some(decoder) => {
                trace!(
                    packet_type,
                    name = packet_type::name(packet_type),
                    len = payload.len(),
                    "Dispatching packet"
                );
                decoder(packet_type, payload)
            }
            None => {
                debug!(
                    packet_type,
                    len = payload.len(),
                    "No decoder registered, returning generic packet"
                );
                Ok(Box::new(SteamPacket::new(packet_type, payload)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_malformed() {
        let dispatcher = Dispatcher::builder().build();
        assert!(matches!(
            dispatcher.dispatch(Bytes::new()),
            Err(ProtocolError::MalformedPacket)
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_unknown_tag_falls_back_to_envelope() {
        let dispatcher = Dispatcher::builder().build();
        let packet = dispatcher
            .dispatch(Bytes::from_static(&[0x41, 0x42, 0x43]))
            .unwrap();
        let envelope = packet.downcast_ref::<SteamPacket>().unwrap();
        assert_eq!(envelope.packet_type(), 0x41);
        assert_eq!(envelope.payload().as_ref(), &[0x42, 0x43]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_tag_only_buffer_has_empty_payload() {
        let dispatcher = Dispatcher::builder().build();
        let packet = dispatcher.dispatch(Bytes::from_static(&[0x99])).unwrap();
        assert_eq!(packet.packet_type(), 0x99);
        assert!(packet.payload().is_empty());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_registered_closure_is_invoked() {
        let mut builder = Dispatcher::builder();
        builder
            .register(0x10, |tag, payload| {
                let mut reversed = payload.to_vec();
                reversed.reverse();
                Ok(Box::new(SteamPacket::new(tag, reversed)))
            })
            .unwrap();
        let dispatcher = builder.build();

        let packet = dispatcher.dispatch(Bytes::from_static(&[0x10, 1, 2, 3])).unwrap();
        assert_eq!(packet.payload().as_ref(), &[3, 2, 1]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_duplicate_registration_is_rejected() {
        let mut builder = DispatcherBuilder::with_defaults();
        let err = builder.register_type::<SteamPacket>(S2A_INFO2).err().unwrap();
        assert!(matches!(err, ProtocolError::DuplicateRegistration(S2A_INFO2)));

        builder.register_type::<SteamPacket>(0x99).unwrap();
        assert!(builder.build().is_registered(0x99));
    }

    #[test]
    fn test_decoder_errors_propagate() {
        let mut builder = Dispatcher::builder();
        assert!(builder
            .register(0x20, |_, _| Err(ProtocolError::InvalidPayload("nope".into())))
            .is_ok());
        let dispatcher = builder.build();
        assert!(matches!(
            dispatcher.dispatch(Bytes::from_static(&[0x20])),
            Err(ProtocolError::InvalidPayload(_))
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_legacy_info_is_typed() {
        let mut body = vec![S2A_INFO];
        body.extend_from_slice(b"1.2.3.4:27015\0hl\0crossfire\0valve\0Half-Life\0");
        body.extend_from_slice(&[1, 8, 46]);

        let packet = Dispatcher::global().dispatch(Bytes::from(body)).unwrap();
        let info = packet.downcast_ref::<LegacyServerInfo>().unwrap();
        assert_eq!(info.map_name, "crossfire");
        assert_eq!(info.max_players, 8);
    }

    #[test]
    fn test_defaults_cover_all_replies() {
        let dispatcher = Dispatcher::global();
        assert_eq!(
            dispatcher.registered_types(),
            vec![
                RCON_GOLDSRC_NO_CHALLENGE_HEADER,
                S2C_CHALLENGE,
                S2A_INFO,
                S2A_PLAYER,
                S2A_RULES,
                S2A_INFO2,
                RCON_GOLDSRC_CHALLENGE_HEADER,
                M2A_SERVER_BATCH,
                RCON_GOLDSRC_RESPONSE_HEADER,
                S2A_INFO_DETAILED,
            ]
        );
        assert!(!dispatcher.is_registered(A2S_INFO));
    }
}
