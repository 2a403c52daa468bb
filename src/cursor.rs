use rootcause::Report;

use crate::error::{DecodeError, DecodeResult};

/// Positioned reader over an immutable byte buffer.
///
/// Every read advances the position by the width read. Reads that would run
/// past the end of the buffer fail with [`DecodeError::TruncatedData`]; seeks
/// to a position outside the buffer fail with
/// [`DecodeError::OffsetOutOfRange`]. The buffer itself is never mutated.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Seek to an absolute offset. Seeking *to* the end of the buffer is
    /// allowed; seeking past it is not.
    pub fn seek(&mut self, pos: usize) -> DecodeResult<()> {
        if pos > self.data.len() {
            return Err(Report::new(DecodeError::OffsetOutOfRange {
                offset: pos,
                buffer_len: self.data.len(),
            }));
        }
        self.pos = pos;
        Ok(())
    }

    /// Advance the position by `n` bytes without reading them.
    pub fn skip(&mut self, n: usize) -> DecodeResult<()> {
        let target = self.pos.checked_add(n).ok_or_else(|| {
            Report::new(DecodeError::OffsetOutOfRange {
                offset: usize::MAX,
                buffer_len: self.data.len(),
            })
        })?;
        self.seek(target)
    }

    /// The bytes from the current position to the end of the buffer. Does not
    /// advance.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn take(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                Report::new(DecodeError::TruncatedData {
                    offset: self.pos,
                    len,
                    buffer_len: self.data.len(),
                })
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u16_be(&mut self) -> DecodeResult<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u32_be(&mut self) -> DecodeResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u32_le(&mut self) -> DecodeResult<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    /// Read `count` consecutive big-endian f32 values.
    pub fn read_f32_be(&mut self, count: usize) -> DecodeResult<Vec<f32>> {
        let bytes = self.take(count * 4)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_be_bytes(chunk.try_into().unwrap()))
            .collect())
    }
}
