//! Sequential, bounds-checked reader over a packet payload.
//!
//! All multi-byte integers on the query protocol are little-endian, with the
//! single exception of the port in master-server address entries.

use crate::error::{ProtocolError, Result};
use bytes::{Buf, Bytes};

/// Reader that consumes a payload front to back.
///
/// Every read checks the remaining length first and fails with
/// [`ProtocolError::UnexpectedEof`] instead of panicking.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    data: Bytes,
}

impl ByteCursor {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Bytes left to read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.remaining()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.data.has_remaining()
    }

    #[inline]
    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(ProtocolError::UnexpectedEof { needed, remaining });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data.get_u8())
    }

    /// Reads one byte and treats any non-zero value as `true`
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads one byte as an ASCII character
    pub fn read_char(&mut self) -> Result<char> {
        Ok(char::from(self.read_u8()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.data.get_u16_le())
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.data.get_u16())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.data.get_i16_le())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.data.get_i32_le())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.data.get_u32_le())
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.data.get_u64_le())
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.ensure(4)?;
        Ok(self.data.get_f32_le())
    }

    /// Reads `len` raw bytes without copying
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        Ok(self.data.split_to(len))
    }

    /// Reads a NUL-terminated string and consumes the terminator.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; servers routinely send
    /// Latin-1 names.
    pub fn read_cstring(&mut self) -> Result<String> {
        let end = self
            .data
            .iter()
            .position(|&b| b == 0)
            .ok_or(ProtocolError::UnexpectedEof {
                needed: self.remaining() + 1,
                remaining: self.remaining(),
            })?;
        let raw = self.data.split_to(end);
        self.data.advance(1);
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }

    /// Consumes and returns everything that is left
    pub fn rest(&mut self) -> Bytes {
        self.data.split_to(self.data.len())
    }
}

impl From<Bytes> for ByteCursor {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}
