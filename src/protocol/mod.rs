//! # Protocol Layer
//!
//! Type tags, tag-based dispatch and the typed replies of the query protocol.
//!
//! ## Components
//! - **Packet types**: tag constants for every known request and reply
//! - **Dispatcher**: frozen tag-to-decoder table with generic fallback
//! - **Responses**: built-in decoders registered by default
//! - **Requests**: builders for outbound queries
//!
//! New message kinds are added by registering a decoder on a
//! [`DispatcherBuilder`](dispatcher::DispatcherBuilder); dispatch itself never changes.

pub mod dispatcher;
pub mod packet_type;
pub mod request;
pub mod response;
