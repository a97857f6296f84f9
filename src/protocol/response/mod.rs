//! # Built-in Response Decoders
//!
//! Typed decoders for the replies the default [`Dispatcher`](crate::protocol::dispatcher::Dispatcher)
//! knows about. Every decoder keeps the raw payload next to the parsed fields,
//! so `payload()` on a decoded reply returns exactly the bytes it was built from.

/// Implements [`QueryPacket`](crate::core::packet::QueryPacket) for a reply
/// struct with `packet_type` and `payload` fields.
macro_rules! impl_query_packet {
    ($ty:ty) => {
        impl $crate::core::packet::QueryPacket for $ty {
            fn packet_type(&self) -> u8 {
                self.packet_type
            }

            fn payload(&self) -> &::bytes::Bytes {
                &self.payload
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };
}

mod challenge;
mod info;
mod master_server;
mod players;
mod rcon;
mod rules;

pub use challenge::ChallengeResponse;
pub use info::{ExtraData, GoldSrcServerInfo, LegacyServerInfo, ModInfo, SourceServerInfo};
pub use master_server::MasterServerBatch;
pub use players::{Player, PlayersResponse};
pub use rcon::RconGoldSrcResponse;
pub use rules::ServerRulesResponse;
