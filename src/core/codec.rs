//! Datagram codec for use with `tokio_util::udp::UdpFramed`.
//!
//! Each `decode` call consumes one whole datagram. Single-packet datagrams are
//! dispatched straight away; split datagrams are surfaced as raw fragment
//! bodies, since sequencing them is up to the transport.

use crate::config::{CodecConfig, PACKET_PREFIX, SPLIT_PACKET_PREFIX};
use crate::core::packet::{QueryPacket, SteamPacket};
use crate::error::{ProtocolError, Result};
use crate::protocol::dispatcher::Dispatcher;
use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

/// A datagram with its 4-byte prefix removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datagram {
    /// Complete message: type tag followed by payload
    Single(Bytes),
    /// One fragment of a split message, split header included
    Split(Bytes),
}

/// Sort a raw datagram by its prefix
pub fn classify(datagram: Bytes) -> Result<Datagram> {
    if datagram.len() < PACKET_PREFIX.len() {
        return Err(ProtocolError::MalformedPacket);
    }
    let prefix = &datagram[..PACKET_PREFIX.len()];
    if prefix == PACKET_PREFIX {
        Ok(Datagram::Single(datagram.slice(PACKET_PREFIX.len()..)))
    } else if prefix == SPLIT_PACKET_PREFIX {
        Ok(Datagram::Split(datagram.slice(SPLIT_PACKET_PREFIX.len()..)))
    } else {
        Err(ProtocolError::InvalidHeader)
    }
}

/// Decoded datagram
#[derive(Debug)]
pub enum Frame {
    Packet(Box<dyn QueryPacket>),
    Fragment(Bytes),
}

pub struct PacketCodec<'a> {
    max_datagram_size: usize,
    dispatcher: &'a Dispatcher,
}

impl Default for PacketCodec<'static> {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

impl PacketCodec<'static> {
    /// Codec backed by the global dispatcher
    pub fn new(config: &CodecConfig) -> Self {
        Self::with_dispatcher(config, Dispatcher::global())
    }
}

impl<'a> PacketCodec<'a> {
    pub fn with_dispatcher(config: &CodecConfig, dispatcher: &'a Dispatcher) -> Self {
        Self {
            max_datagram_size: config.max_datagram_size,
            dispatcher,
        }
    }
}

impl Decoder for PacketCodec<'_> {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        if src.is_empty() {
            return Ok(None);
        }

        let datagram = src.split().freeze();
        if datagram.len() > self.max_datagram_size {
            return Err(ProtocolError::OversizedPacket(datagram.len()));
        }
        trace!(len = datagram.len(), "Decoding datagram");

        match classify(datagram)? {
            Datagram::Single(body) => Ok(Some(Frame::Packet(self.dispatcher.dispatch(body)?))),
            Datagram::Split(body) => Ok(Some(Frame::Fragment(body))),
        }
    }
}

impl Encoder<SteamPacket> for PacketCodec<'_> {
    type Error = ProtocolError;

    fn encode(&mut self, item: SteamPacket, dst: &mut BytesMut) -> Result<()> {
        if item.len() > self.max_datagram_size {
            return Err(ProtocolError::OversizedPacket(item.len()));
        }
        item.encode_into(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::response::ChallengeResponse;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_classify_prefixes() {
        assert_eq!(
            classify(Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 0x41])).unwrap(),
            Datagram::Single(Bytes::from_static(&[0x41]))
        );
        assert_eq!(
            classify(Bytes::from_static(&[0xFE, 0xFF, 0xFF, 0xFF, 0x01, 0x02])).unwrap(),
            Datagram::Split(Bytes::from_static(&[0x01, 0x02]))
        );
        assert!(matches!(
            classify(Bytes::from_static(&[0x00, 0xFF, 0xFF, 0xFF])),
            Err(ProtocolError::InvalidHeader)
        ));
        assert!(matches!(
            classify(Bytes::from_static(&[0xFF])),
            Err(ProtocolError::MalformedPacket)
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_decode_consumes_whole_datagram() {
        let mut codec = PacketCodec::default();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF, 0x41, 0x2A, 0, 0, 0]);

        let frame = codec.decode(&mut buf).unwrap().unwrap();
        assert!(buf.is_empty());
        match frame {
            Frame::Packet(packet) => {
                let reply = packet.downcast_ref::<ChallengeResponse>().unwrap();
                assert_eq!(reply.challenge(), 42);
            }
            Frame::Fragment(_) => panic!("Expected a packet"),
        }
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_split_datagram_is_passed_through() {
        let mut codec = PacketCodec::default();
        let mut buf = BytesMut::from(&[0xFE, 0xFF, 0xFF, 0xFF, 9, 9, 9][..]);
        match codec.decode(&mut buf).unwrap() {
            Some(Frame::Fragment(body)) => assert_eq!(&body[..], &[9, 9, 9]),
            other => panic!("Unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn test_oversized_datagram_rejected() {
        let mut codec = PacketCodec::new(&CodecConfig {
            max_datagram_size: 8,
        });
        let mut buf = BytesMut::from(&[0xFF; 9][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::OversizedPacket(9))
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_encode_appends_envelope() {
        let mut codec = PacketCodec::default();
        let mut buf = BytesMut::new();
        codec
            .encode(SteamPacket::new(0x57, Bytes::new()), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], &[0xFF, 0xFF, 0xFF, 0xFF, 0x57]);

        let too_big = SteamPacket::new(0x54, vec![0u8; 1400]);
        assert!(matches!(
            codec.encode(too_big, &mut buf),
            Err(ProtocolError::OversizedPacket(1405))
        ));
    }
}
