//! # Packet Envelope
//!
//! [`SteamPacket`] is the unit every message decodes to or is built from: a
//! single-byte type tag plus payload bytes. It is also the fallback result for
//! tags the dispatcher has no decoder for.
//!
//! ## Wire Format
//! ```text
//! [Prefix(4) = FF FF FF FF] [Type(1)] [Payload(N)]
//! ```

use crate::config::{HEADER_SIZE, PACKET_PREFIX};
use crate::error::{ProtocolError, Result};
use crate::protocol::dispatcher::Dispatcher;
use bytes::{BufMut, Bytes, BytesMut};
use std::any::Any;
use std::fmt;

/// Common interface of every decoded packet.
///
/// The dispatcher hands out `Box<dyn QueryPacket>`; callers that know which
/// response they expect recover the concrete type with
/// [`downcast_ref`](trait.QueryPacket.html#method.downcast_ref).
pub trait QueryPacket: fmt::Debug + Send + Sync + 'static {
    /// Type tag the packet was decoded from
    fn packet_type(&self) -> u8;

    /// Raw payload bytes following the type tag
    fn payload(&self) -> &Bytes;

    fn as_any(&self) -> &dyn Any;

    /// Re-wrap the packet as a plain envelope
    fn to_envelope(&self) -> SteamPacket {
        SteamPacket::new(self.packet_type(), self.payload().clone())
    }
}

impl dyn QueryPacket {
    pub fn downcast_ref<T: QueryPacket>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: QueryPacket>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// Construction of a typed packet from its tag and payload.
///
/// Implemented by every concrete response; this is what gets registered with
/// the [`Dispatcher`].
pub trait FromPayload: QueryPacket + Sized {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self>;
}

/// Generic packet envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SteamPacket {
    packet_type: u8,
    payload: Bytes,
}

#[allow(clippy::len_without_is_empty)]
impl SteamPacket {
    pub fn new(packet_type: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            packet_type,
            payload: payload.into(),
        }
    }

    /// Envelope without payload
    pub fn empty(packet_type: u8) -> Self {
        Self::new(packet_type, Bytes::new())
    }

    /// Serialized length: prefix, type tag and payload
    #[inline]
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode the envelope into a fresh buffer
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.len());
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Append the encoded envelope to `dst`, growing it as needed
    pub fn encode_into(&self, dst: &mut BytesMut) {
        dst.reserve(self.len());
        dst.put_slice(&PACKET_PREFIX);
        dst.put_u8(self.packet_type);
        dst.put_slice(&self.payload);
    }

    /// Encode in place into a caller-provided buffer.
    ///
    /// Returns the number of bytes written. A destination shorter than
    /// [`len`](Self::len) is rejected; nothing is written in that case.
    pub fn copy_to(&self, dst: &mut [u8]) -> Result<usize> {
        let needed = self.len();
        if dst.len() < needed {
            return Err(ProtocolError::BufferTooSmall {
                needed,
                available: dst.len(),
            });
        }

        let (prefix, rest) = dst.split_at_mut(PACKET_PREFIX.len());
        prefix.copy_from_slice(&PACKET_PREFIX);
        rest[0] = self.packet_type;
        rest[1..1 + self.payload.len()].copy_from_slice(&self.payload);
        Ok(needed)
    }

    /// Decode a complete single-packet datagram with the global dispatcher.
    ///
    /// The datagram must start with the `FF FF FF FF` prefix.
    pub fn from_bytes(datagram: &[u8]) -> Result<Box<dyn QueryPacket>> {
        let body = strip_prefix(datagram)?;
        Dispatcher::global().dispatch(Bytes::copy_from_slice(body))
    }

    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn into_parts(self) -> (u8, Bytes) {
        (self.packet_type, self.payload)
    }
}

impl QueryPacket for SteamPacket {
    fn packet_type(&self) -> u8 {
        self.packet_type
    }

    fn payload(&self) -> &Bytes {
        &self.payload
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn to_envelope(&self) -> SteamPacket {
        self.clone()
    }
}

impl FromPayload for SteamPacket {
    fn from_payload(packet_type: u8, payload: Bytes) -> Result<Self> {
        Ok(Self::new(packet_type, payload))
    }
}

/// Remove the single-packet prefix from a datagram
pub(crate) fn strip_prefix(datagram: &[u8]) -> Result<&[u8]> {
    if datagram.len() < PACKET_PREFIX.len() {
        return Err(ProtocolError::MalformedPacket);
    }
    let (prefix, body) = datagram.split_at(PACKET_PREFIX.len());
    if prefix != PACKET_PREFIX {
        return Err(ProtocolError::InvalidHeader);
    }
    Ok(body)
}
