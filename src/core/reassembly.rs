//! # Split-Packet Reassembly
//!
//! Turns the fragments of a split message back into one decoded packet.
//!
//! ## Pipeline
//! 1. Concatenate fragments in the order given
//! 2. If the message was compressed, bzip2-decompress the concatenated bytes to
//!    exactly the declared size and verify their CRC32
//! 3. Dispatch the resulting body on its type tag
//!
//! Fragments must already be in sequence. [`order_fragments`] sorts indexed
//! fragments for callers that receive them out of order; the reassembler
//! itself never reorders.

use crate::config::ReassemblyConfig;
use crate::core::packet::QueryPacket;
use crate::error::{ProtocolError, Result};
use crate::protocol::dispatcher::Dispatcher;
use crate::utils::compression::{decompress_verified, CompressionInfo};
use bytes::{Bytes, BytesMut};
use tracing::{instrument, trace, warn};

pub struct Reassembler<'a> {
    config: ReassemblyConfig,
    dispatcher: &'a Dispatcher,
}

impl Default for Reassembler<'static> {
    fn default() -> Self {
        Self::new(ReassemblyConfig::default())
    }
}

impl Reassembler<'static> {
    /// Reassembler backed by the global dispatcher
    pub fn new(config: ReassemblyConfig) -> Self {
        Self::with_dispatcher(config, Dispatcher::global())
    }
}

impl<'a> Reassembler<'a> {
    pub fn with_dispatcher(config: ReassemblyConfig, dispatcher: &'a Dispatcher) -> Self {
        Self { config, dispatcher }
    }

    /// Reassemble and decode a split message.
    ///
    /// `compression` is `Some` only when the sender compressed the message.
    ///
    /// # Errors
    /// - `TooManyFragments` / `OversizedPacket` when the configured limits are exceeded
    /// - `DecompressionFailure` / `ChecksumMismatch` for a bad compressed message
    /// - `MalformedPacket` when the reassembled body is empty
    #[instrument(
        level = "debug",
        skip(self, fragments),
        fields(fragments = fragments.len(), compressed = compression.is_some())
    )]
    pub fn reassemble<B: AsRef<[u8]>>(
        &self,
        fragments: &[B],
        compression: Option<CompressionInfo>,
    ) -> Result<Box<dyn QueryPacket>> {
        let body = self.reassemble_body(fragments, compression)?;
        self.dispatcher.dispatch(body)
    }

    /// Concatenate and, if needed, decompress without dispatching
    pub fn reassemble_body<B: AsRef<[u8]>>(
        &self,
        fragments: &[B],
        compression: Option<CompressionInfo>,
    ) -> Result<Bytes> {
        if fragments.len() > self.config.max_fragments {
            return Err(ProtocolError::TooManyFragments(fragments.len()));
        }

        let total: usize = fragments.iter().map(|f| f.as_ref().len()).sum();
        if total > self.config.max_message_size {
            return Err(ProtocolError::OversizedPacket(total));
        }

        let mut buf = BytesMut::with_capacity(total);
        for fragment in fragments {
            buf.extend_from_slice(fragment.as_ref());
        }
        trace!(len = total, "Concatenated fragments");

        let Some(info) = compression else {
            return Ok(buf.freeze());
        };

        match decompress_verified(&buf, &info) {
            Ok(body) => {
                trace!(
                    compressed = total,
                    uncompressed = body.len(),
                    "Decompressed message"
                );
                Ok(Bytes::from(body))
            }
            Err(e) => {
                warn!(
                    error = %e,
                    uncompressed_size = info.uncompressed_size,
                    checksum = info.checksum,
                    "Discarding compressed message"
                );
                Err(e)
            }
        }
    }
}

/// Reassemble with default limits and the global dispatcher
pub fn reassemble_packet<B: AsRef<[u8]>>(
    fragments: &[B],
    compression: Option<CompressionInfo>,
) -> Result<Box<dyn QueryPacket>> {
    Reassembler::default().reassemble(fragments, compression)
}

/// Put indexed fragments in sequence.
///
/// Indices must form exactly `0..n`.
///
/// # Errors
/// `DuplicateFragment` when an index repeats, `MissingFragment` for the first gap.
pub fn order_fragments(mut indexed: Vec<(u16, Bytes)>) -> Result<Vec<Bytes>> {
    indexed.sort_by_key(|(index, _)| *index);

    let mut ordered = Vec::with_capacity(indexed.len());
    for (expected, (index, fragment)) in indexed.into_iter().enumerate() {
        let position = usize::from(index);
        if position < expected {
            return Err(ProtocolError::DuplicateFragment(index));
        }
        if position > expected {
            // expected < index, so it fits in a u16
            return Err(ProtocolError::MissingFragment(expected as u16));
        }
        ordered.push(fragment);
    }
    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::packet::SteamPacket;
    use crate::utils::compression::{checksum, compress};

    fn bare() -> Dispatcher {
        Dispatcher::builder().build()
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_concatenates_in_order() {
        let dispatcher = bare();
        let reassembler = Reassembler::with_dispatcher(ReassemblyConfig::default(), &dispatcher);
        let fragments = [vec![0x41u8, 0x42], vec![0x43]];

        let body = reassembler.reassemble_body(&fragments, None).unwrap();
        assert_eq!(&body[..], &[0x41, 0x42, 0x43]);

        let packet = reassembler.reassemble(&fragments, None).unwrap();
        let envelope = packet.downcast_ref::<SteamPacket>().unwrap();
        assert_eq!(envelope.packet_type(), 0x41);
        assert_eq!(envelope.payload().as_ref(), &[0x42, 0x43]);
    }

    #[test]
    fn test_empty_fragment_list_is_malformed() {
        let dispatcher = bare();
        let reassembler = Reassembler::with_dispatcher(ReassemblyConfig::default(), &dispatcher);
        let fragments: [Bytes; 0] = [];
        assert!(matches!(
            reassembler.reassemble(&fragments, None),
            Err(ProtocolError::MalformedPacket)
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_compressed_message_decompresses_concatenated_bytes() {
        let dispatcher = bare();
        let reassembler = Reassembler::with_dispatcher(ReassemblyConfig::default(), &dispatcher);

        let message = b"\x45compressed rules payload".repeat(20);
        let compressed = compress(&message).unwrap();
        let (head, tail) = compressed.split_at(compressed.len() / 2);
        let info = CompressionInfo::new(message.len() as u16, checksum(&message));

        let body = reassembler
            .reassemble_body(&[head, tail], Some(info))
            .unwrap();
        assert_eq!(&body[..], &message[..]);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_checksum_mismatch_is_fatal() {
        let dispatcher = bare();
        let reassembler = Reassembler::with_dispatcher(ReassemblyConfig::default(), &dispatcher);

        let message = b"\x44player data";
        let compressed = compress(message).unwrap();
        let info = CompressionInfo::new(message.len() as u16, checksum(message).wrapping_add(1));

        assert!(matches!(
            reassembler.reassemble(&[compressed], Some(info)),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_limits_enforced() {
        let dispatcher = bare();
        let config = ReassemblyConfig {
            max_fragments: 2,
            max_message_size: 4,
        };
        let reassembler = Reassembler::with_dispatcher(config, &dispatcher);

        assert!(matches!(
            reassembler.reassemble_body(&[[1u8], [2], [3]], None),
            Err(ProtocolError::TooManyFragments(3))
        ));
        assert!(matches!(
            reassembler.reassemble_body(&[[1u8, 2, 3], [4, 5, 6]], None),
            Err(ProtocolError::OversizedPacket(6))
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_order_fragments_sorts() {
        let ordered = order_fragments(vec![
            (2, Bytes::from_static(b"c")),
            (0, Bytes::from_static(b"a")),
            (1, Bytes::from_static(b"b")),
        ])
        .unwrap();
        assert_eq!(ordered, vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
    }

    #[test]
    fn test_order_fragments_rejects_gaps_and_duplicates() {
        assert!(matches!(
            order_fragments(vec![(0, Bytes::new()), (2, Bytes::new())]),
            Err(ProtocolError::MissingFragment(1))
        ));
        assert!(matches!(
            order_fragments(vec![(1, Bytes::new()), (0, Bytes::new()), (1, Bytes::new())]),
            Err(ProtocolError::DuplicateFragment(1))
        ));
        assert!(matches!(
            order_fragments(vec![(1, Bytes::new())]),
            Err(ProtocolError::MissingFragment(0))
        ));
    }
}
