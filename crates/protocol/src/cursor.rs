//! Forward-only reader over a captured datagram
//!
//! Every read checks the remaining length first and fails with
//! [`DecodeError::TruncatedInput`] instead of panicking. Once a read has
//! failed the caller is expected to abandon the whole decode.

use bytes::Buf;
use photon_core::{DecodeError, Result};

/// Cursor over a borrowed byte buffer
///
/// Fixed-width reads are big-endian unless the method name ends in `_le`.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Set once any read asked for more than was left
    overrun: bool,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            overrun: false,
        }
    }

    /// Bytes left to read
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Offset of the next unread byte from the start of the buffer
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// True once a read on this cursor ran past its end
    ///
    /// Cursors split off with [`split_to`](Self::split_to) track this on
    /// their own, so a failure inside one does not mark the other.
    #[inline]
    pub fn overran(&self) -> bool {
        self.overrun
    }

    /// Fail unless at least `n` more bytes are available
    #[inline]
    pub fn ensure(&mut self, n: usize) -> Result<()> {
        if self.remaining() < n {
            self.overrun = true;
            return Err(DecodeError::truncated(n, self.remaining()));
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and advance past them
    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let chunk = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(chunk)
    }

    /// Advance past `n` bytes without interpreting them
    #[inline]
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Read `n` raw bytes
    #[inline]
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Split off the next `n` bytes as an independent cursor
    ///
    /// The outer cursor moves past the split region immediately, so it ends
    /// up at the region's end no matter how much of it the inner cursor reads.
    pub fn split_to(&mut self, n: usize) -> Result<ByteCursor<'a>> {
        self.take(n).map(ByteCursor::new)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?.get_u8())
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.take(2)?.get_u16())
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.take(4)?.get_u32())
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(self.take(8)?.get_u64())
    }

    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.take(2)?.get_i16())
    }

    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.take(4)?.get_i32())
    }

    #[inline]
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(self.take(8)?.get_i64())
    }

    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(self.take(4)?.get_f32())
    }

    #[inline]
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(self.take(8)?.get_f64())
    }

    #[inline]
    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(self.take(2)?.get_u16_le())
    }

    #[inline]
    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(self.take(4)?.get_u32_le())
    }

    #[inline]
    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(self.take(8)?.get_u64_le())
    }

    #[inline]
    pub fn read_f32_le(&mut self) -> Result<f32> {
        Ok(self.take(4)?.get_f32_le())
    }

    #[inline]
    pub fn read_f64_le(&mut self) -> Result<f64> {
        Ok(self.take(8)?.get_f64_le())
    }
}
