use crate::config::MAX_UNCOMPRESSED_SIZE;
use crate::error::{ProtocolError, Result};
use bzip2::read::{BzDecoder, BzEncoder};
use bzip2::Compression;
use std::io::Read;

/// Out-of-band metadata for a compressed split message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionInfo {
    /// Exact size of the decompressed message
    pub uncompressed_size: u16,
    /// CRC32 of the decompressed message
    pub checksum: u32,
}

impl CompressionInfo {
    pub fn new(uncompressed_size: u16, checksum: u32) -> Self {
        Self {
            uncompressed_size,
            checksum,
        }
    }

    /// Describe `data` as it looks before compression
    pub fn describe(data: &[u8]) -> Result<Self> {
        let uncompressed_size = u16::try_from(data.len())
            .map_err(|_| ProtocolError::OversizedPacket(data.len()))?;
        Ok(Self::new(uncompressed_size, checksum(data)))
    }
}

/// Standard CRC32 (IEEE) of `data`
pub fn checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Compresses data as a bzip2 stream
///
/// # Errors
/// Returns `ProtocolError::CompressionFailure` if compression fails
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    BzEncoder::new(data, Compression::best())
        .read_to_end(&mut out)
        .map_err(|_| ProtocolError::CompressionFailure)?;
    Ok(out)
}

/// Decompresses a bzip2 stream that must expand to exactly `expected_size` bytes.
///
/// At most `expected_size + 1` bytes are ever pulled from the decoder, so a
/// stream claiming less than it really holds cannot balloon memory.
///
/// # Errors
/// Returns `ProtocolError::DecompressionFailure` if:
/// - The stream is not valid bzip2
/// - The output is shorter or longer than `expected_size`
/// - Bytes follow the end of the bzip2 stream
/// - `expected_size` exceeds MAX_UNCOMPRESSED_SIZE
pub fn decompress(data: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    if expected_size > MAX_UNCOMPRESSED_SIZE {
        return Err(ProtocolError::DecompressionFailure);
    }

    let mut decoder = BzDecoder::new(data);
    let mut out = Vec::with_capacity(expected_size);
    (&mut decoder)
        .take(expected_size as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|_| ProtocolError::DecompressionFailure)?;

    if out.len() != expected_size {
        return Err(ProtocolError::DecompressionFailure);
    }
    // the stream must account for every input byte
    if decoder.total_in() != data.len() as u64 {
        return Err(ProtocolError::DecompressionFailure);
    }
    Ok(out)
}

/// Decompress and verify the CRC32 of the result.
///
/// # Errors
/// `ProtocolError::DecompressionFailure` as for [`decompress`], or
/// `ProtocolError::ChecksumMismatch` when the output does not hash to
/// `info.checksum`.
pub fn decompress_verified(data: &[u8], info: &CompressionInfo) -> Result<Vec<u8>> {
    let out = decompress(data, info.uncompressed_size as usize)?;
    let actual = checksum(&out);
    if actual != info.checksum {
        return Err(ProtocolError::ChecksumMismatch {
            expected: info.checksum,
            actual,
        });
    }
    Ok(out)
}
