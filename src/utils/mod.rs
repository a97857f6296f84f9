//! # Utility Modules
//!
//! Supporting utilities used by the core and protocol layers.
//!
//! ## Components
//! - **Compression**: bzip2 with exact-size enforcement, CRC32 checksums
//! - **Logging**: `tracing-subscriber` setup driven by [`LoggingConfig`](crate::config::LoggingConfig)
//!
//! ## Security
//! - Decompressed output is capped at the declared size (at most 64 KB)

pub mod compression;
pub mod logging;
