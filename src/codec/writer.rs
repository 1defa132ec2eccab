//! Big-endian cursor writes into a byte slice.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

// -----------------------------------------------------------------------------
// Encode Error
// -----------------------------------------------------------------------------

/// Error produced by a failed encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeError {
  reason: &'static str,
}

impl EncodeError {
  #[inline]
  pub(crate) const fn new(reason: &'static str) -> Self {
    Self { reason }
  }

  /// Returns the failure description.
  #[inline]
  pub const fn reason(&self) -> &'static str {
    self.reason
  }
}

impl Display for EncodeError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "encode failed: {}", self.reason)
  }
}

impl Error for EncodeError {}

// -----------------------------------------------------------------------------
// Writer
// -----------------------------------------------------------------------------

/// A cursor over a mutable byte slice with big-endian fixed-width writes.
///
/// Writes fail with [`EncodeError`] when the destination has no room for
/// the full width; the cursor only advances on success.
#[derive(Debug)]
pub(crate) struct Writer<'a> {
  buf: &'a mut [u8],
  pos: usize,
}

impl<'a> Writer<'a> {
  #[inline]
  pub(crate) fn new(buf: &'a mut [u8], pos: usize) -> Self {
    Self { buf, pos }
  }

  /// Returns the current cursor offset.
  #[inline]
  pub(crate) const fn pos(&self) -> usize {
    self.pos
  }

  /// Writes `data` verbatim.
  pub(crate) fn put(&mut self, data: &[u8]) -> Result<(), EncodeError> {
    match self.buf.get_mut(self.pos..self.pos + data.len()) {
      Some(dest) => {
        dest.copy_from_slice(data);
        self.pos += data.len();
        Ok(())
      }
      None => Err(EncodeError::new("output buffer too small")),
    }
  }

  pub(crate) fn u8(&mut self, data: u8) -> Result<(), EncodeError> {
    self.put(&[data])
  }

  pub(crate) fn u16(&mut self, data: u16) -> Result<(), EncodeError> {
    self.put(&data.to_be_bytes())
  }

  pub(crate) fn u32(&mut self, data: u32) -> Result<(), EncodeError> {
    self.put(&data.to_be_bytes())
  }

  pub(crate) fn i32(&mut self, data: i32) -> Result<(), EncodeError> {
    self.put(&data.to_be_bytes())
  }

  pub(crate) fn f64(&mut self, data: f64) -> Result<(), EncodeError> {
    self.put(&data.to_bits().to_be_bytes())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::codec::writer::Writer;

  #[test]
  fn test_widths() {
    let mut buf: [u8; 7] = [0; 7];
    let mut writer: Writer<'_> = Writer::new(&mut buf, 0);

    writer.u8(1).unwrap();
    writer.u16(2).unwrap();
    writer.u32(3).unwrap();

    assert_eq!(writer.pos(), 7);
    assert_eq!(buf, [1, 0, 2, 0, 0, 0, 3]);
  }

  #[test]
  fn test_overflow() {
    let mut buf: [u8; 2] = [0; 2];
    let mut writer: Writer<'_> = Writer::new(&mut buf, 0);

    assert!(writer.u32(1).is_err());
    assert_eq!(writer.pos(), 0);
  }
}
