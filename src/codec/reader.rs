//! Big-endian cursor reads over a byte slice.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

// -----------------------------------------------------------------------------
// Decode Error
// -----------------------------------------------------------------------------

/// Error produced by a failed decode.
///
/// Carries a human-readable reason and the byte offset at which decoding
/// failed. Decoding is all-or-nothing: a failed decode constructs no term
/// and the caller's cursor is not advanced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
  reason: &'static str,
  offset: usize,
}

impl DecodeError {
  #[inline]
  pub(crate) const fn new(reason: &'static str, offset: usize) -> Self {
    Self { reason, offset }
  }

  /// Returns the failure description.
  #[inline]
  pub const fn reason(&self) -> &'static str {
    self.reason
  }

  /// Returns the byte offset of the failure.
  #[inline]
  pub const fn offset(&self) -> usize {
    self.offset
  }
}

impl Display for DecodeError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "decode failed at offset {}: {}", self.offset, self.reason)
  }
}

impl Error for DecodeError {}

// -----------------------------------------------------------------------------
// Reader
// -----------------------------------------------------------------------------

/// A cursor over a byte slice with big-endian fixed-width reads.
///
/// Every read advances the cursor past the consumed bytes on success and
/// leaves it in place on a short read.
#[derive(Debug)]
pub(crate) struct Reader<'a> {
  buf: &'a [u8],
  pos: usize,
}

impl<'a> Reader<'a> {
  #[inline]
  pub(crate) const fn new(buf: &'a [u8], pos: usize) -> Self {
    Self { buf, pos }
  }

  /// Returns the current cursor offset.
  #[inline]
  pub(crate) const fn pos(&self) -> usize {
    self.pos
  }

  /// Fails with `reason` at the current offset.
  #[inline]
  pub(crate) const fn fail(&self, reason: &'static str) -> DecodeError {
    DecodeError::new(reason, self.pos)
  }

  /// Consumes `len` raw bytes.
  pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
    match self.buf.get(self.pos..self.pos + len) {
      Some(data) => {
        self.pos += len;
        Ok(data)
      }
      None => Err(self.fail("unexpected end of input")),
    }
  }

  pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
    self.take(1).map(|data| data[0])
  }

  pub(crate) fn u16(&mut self) -> Result<u16, DecodeError> {
    self.take(2).map(|data| u16::from_be_bytes([data[0], data[1]]))
  }

  pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
    self
      .take(4)
      .map(|data| u32::from_be_bytes([data[0], data[1], data[2], data[3]]))
  }

  pub(crate) fn i32(&mut self) -> Result<i32, DecodeError> {
    self.u32().map(|data| data as i32)
  }

  pub(crate) fn u64(&mut self) -> Result<u64, DecodeError> {
    self.take(8).map(|data| {
      u64::from_be_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
      ])
    })
  }

  pub(crate) fn f64(&mut self) -> Result<f64, DecodeError> {
    self.u64().map(f64::from_bits)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::codec::reader::Reader;

  #[test]
  fn test_widths() {
    let buf: [u8; 15] = [1, 0, 2, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 4];
    let mut reader: Reader<'_> = Reader::new(&buf, 0);

    assert_eq!(reader.u8().unwrap(), 1);
    assert_eq!(reader.u16().unwrap(), 2);
    assert_eq!(reader.u32().unwrap(), 3);
    assert_eq!(reader.u64().unwrap(), 4);
    assert_eq!(reader.pos(), 15);
  }

  #[test]
  fn test_signed() {
    let buf: [u8; 4] = (-5_i32).to_be_bytes();
    let mut reader: Reader<'_> = Reader::new(&buf, 0);

    assert_eq!(reader.i32().unwrap(), -5);
  }

  #[test]
  fn test_short_read() {
    let buf: [u8; 2] = [0, 1];
    let mut reader: Reader<'_> = Reader::new(&buf, 0);

    let error: _ = reader.u32().unwrap_err();

    assert_eq!(error.offset(), 0);
    assert_eq!(reader.pos(), 0);
  }
}
