//! Term decoding from the external format.

use crate::codec::reader::DecodeError;
use crate::codec::reader::Reader;
use crate::codec::tags;
use crate::consts::MAX_ATOM_BYTES;
use crate::consts::MAX_REF_IDS;
use crate::core::Atom;
use crate::term::Binary;
use crate::term::EString;
use crate::term::List;
use crate::term::ListBuilder;
use crate::term::Map;
use crate::term::Pid;
use crate::term::Port;
use crate::term::Reference;
use crate::term::Term;
use crate::term::Tuple;

// -----------------------------------------------------------------------------
// Term - Decode
// -----------------------------------------------------------------------------

impl Term {
  /// Decodes a top-level term at `*pos`, consuming the version byte.
  ///
  /// On success the cursor is advanced past the consumed bytes; on failure
  /// it is left untouched and no term is constructed.
  ///
  /// # Errors
  ///
  /// Returns [`DecodeError`] on a short read, an unknown tag, an
  /// out-of-range length, malformed UTF-8 in text positions, or an
  /// unrepresentable integer.
  pub fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
    let mut reader: Reader<'_> = Reader::new(buf, *pos);

    if reader.u8()? != tags::VERSION_MAGIC {
      return Err(DecodeError::new("bad version byte", *pos));
    }

    let term: Term = decode_term(&mut reader)?;

    *pos = reader.pos();

    Ok(term)
  }

  /// Decodes a nested term at `*pos`; nested terms carry no version byte.
  pub fn decode_naked(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
    let mut reader: Reader<'_> = Reader::new(buf, *pos);
    let term: Term = decode_term(&mut reader)?;

    *pos = reader.pos();

    Ok(term)
  }

  /// Decodes a whole buffer as one version-prefixed term.
  pub fn from_bytes(buf: &[u8]) -> Result<Self, DecodeError> {
    let mut pos: usize = 0;

    Self::decode(buf, &mut pos)
  }
}

/// Decodes a string that may arrive as either of its wire forms.
///
/// Strings up to 65535 bytes travel as [`STRING_EXT`]; longer ones (and
/// strings from some peers regardless of size) travel as a [`LIST_EXT`] of
/// integers in `0..=255`. This entry point accepts both, plus the empty
/// [`NIL_EXT`].
///
/// [`STRING_EXT`]: tags::STRING_EXT
/// [`LIST_EXT`]: tags::LIST_EXT
/// [`NIL_EXT`]: tags::NIL_EXT
pub fn decode_string(buf: &[u8], pos: &mut usize) -> Result<EString, DecodeError> {
  let mut reader: Reader<'_> = Reader::new(buf, *pos);

  let data: EString = match reader.u8()? {
    tags::STRING_EXT => {
      let len: usize = reader.u16()? as usize;
      utf8(&mut reader, len)?
    }
    tags::NIL_EXT => EString::new(""),
    tags::LIST_EXT => {
      let len: u32 = reader.u32()?;
      let mut data: Vec<u8> = Vec::with_capacity(len as usize);

      for _ in 0..len {
        match decode_term(&mut reader)? {
          Term::Long(byte @ 0..=255) => data.push(byte as u8),
          _ => return Err(reader.fail("string element out of byte range")),
        }
      }

      if !decode_term(&mut reader)?.is_nil() {
        return Err(reader.fail("string list has a non-nil tail"));
      }

      match String::from_utf8(data) {
        Ok(data) => EString::new(data),
        Err(_) => return Err(reader.fail("malformed utf-8 in string")),
      }
    }
    _ => return Err(DecodeError::new("not a string term", *pos)),
  };

  *pos = reader.pos();

  Ok(data)
}

// -----------------------------------------------------------------------------
// Decoder
// -----------------------------------------------------------------------------

fn decode_term(r: &mut Reader<'_>) -> Result<Term, DecodeError> {
  match r.u8()? {
    tags::SMALL_INTEGER_EXT => Ok(Term::Long(i64::from(r.u8()?))),
    tags::INTEGER_EXT => Ok(Term::Long(i64::from(r.i32()?))),
    tags::SMALL_BIG_EXT => {
      let len: usize = r.u8()? as usize;
      decode_big(r, len)
    }
    tags::LARGE_BIG_EXT => {
      let len: usize = r.u32()? as usize;
      decode_big(r, len)
    }
    tags::FLOAT_EXT => decode_old_float(r),
    tags::NEW_FLOAT_EXT => Ok(Term::Double(r.f64()?)),
    tags::ATOM_EXT => {
      let len: usize = r.u16()? as usize;
      decode_atom_data(r, len)
    }
    tags::SMALL_ATOM_EXT => {
      let len: usize = r.u8()? as usize;
      decode_atom_data(r, len)
    }
    tags::STRING_EXT => {
      let len: usize = r.u16()? as usize;
      Ok(Term::Str(utf8(r, len)?))
    }
    tags::BINARY_EXT => {
      let len: usize = r.u32()? as usize;
      Ok(Term::Binary(Binary::new(r.take(len)?.to_vec())))
    }
    tags::NIL_EXT => Ok(Term::nil()),
    tags::LIST_EXT => {
      let len: u32 = r.u32()?;
      let mut items: Vec<Term> = Vec::with_capacity(len.min(4096) as usize);

      for _ in 0..len {
        items.push(decode_term(r)?);
      }

      decode_list_tail(r, items)
    }
    tags::SMALL_TUPLE_EXT => {
      let arity: usize = r.u8()? as usize;
      decode_tuple(r, arity)
    }
    tags::LARGE_TUPLE_EXT => {
      let arity: usize = r.u32()? as usize;
      decode_tuple(r, arity)
    }
    tags::MAP_EXT => {
      let arity: u32 = r.u32()?;
      let mut pairs: Vec<(Term, Term)> = Vec::with_capacity(arity.min(4096) as usize);

      for _ in 0..arity {
        let key: Term = decode_term(r)?;
        let value: Term = decode_term(r)?;

        pairs.push((key, value));
      }

      // Input order is not trusted: sort on insert, duplicates collapse
      // to the last pair.
      Ok(Term::Map(Map::from_pairs(pairs)))
    }
    tags::PID_EXT => {
      let node: Atom = decode_atom(r)?;
      let id: u32 = r.u32()?;
      let serial: u32 = r.u32()?;
      let creation: u32 = u32::from(r.u8()? & 0x03);

      Ok(Term::Pid(Pid::from_parts(node, id, serial, creation)))
    }
    tags::NEW_PID_EXT => {
      let node: Atom = decode_atom(r)?;
      let id: u32 = r.u32()?;
      let serial: u32 = r.u32()?;
      let creation: u32 = r.u32()?;

      Ok(Term::Pid(Pid::from_parts(node, id, serial, creation)))
    }
    tags::PORT_EXT => {
      let node: Atom = decode_atom(r)?;
      let id: u32 = r.u32()?;
      let creation: u32 = u32::from(r.u8()? & 0x03);

      Ok(Term::Port(Port::from_parts(node, id, creation)))
    }
    tags::NEW_PORT_EXT => {
      let node: Atom = decode_atom(r)?;
      let id: u32 = r.u32()?;
      let creation: u32 = r.u32()?;

      Ok(Term::Port(Port::from_parts(node, id, creation)))
    }
    tags::REFERENCE_EXT => {
      let node: Atom = decode_atom(r)?;
      let id: u32 = r.u32()?;
      let creation: u32 = u32::from(r.u8()? & 0x03);

      decode_ref_parts(r, node, &[id], creation)
    }
    tags::NEW_REFERENCE_EXT => {
      let len: usize = r.u16()? as usize;
      let node: Atom = decode_atom(r)?;
      let creation: u32 = u32::from(r.u8()? & 0x03);
      let ids: Vec<u32> = decode_ref_ids(r, len)?;

      decode_ref_parts(r, node, &ids, creation)
    }
    tags::NEWER_REFERENCE_EXT => {
      let len: usize = r.u16()? as usize;
      let node: Atom = decode_atom(r)?;
      let creation: u32 = r.u32()?;
      let ids: Vec<u32> = decode_ref_ids(r, len)?;

      decode_ref_parts(r, node, &ids, creation)
    }
    _ => Err(r.fail("unknown term tag")),
  }
}

/// Reads `len` bytes as UTF-8 text.
fn utf8(r: &mut Reader<'_>, len: usize) -> Result<EString, DecodeError> {
  match std::str::from_utf8(r.take(len)?) {
    Ok(data) => Ok(EString::new(data)),
    Err(_) => Err(r.fail("malformed utf-8 in string")),
  }
}

/// Interns a length-delimited atom name, mapping the boolean text forms
/// onto the boolean variant.
fn decode_atom_data(r: &mut Reader<'_>, len: usize) -> Result<Term, DecodeError> {
  let atom: Atom = intern(r, len)?;

  if atom == Atom::TRUE {
    Ok(Term::Bool(true))
  } else if atom == Atom::FALSE {
    Ok(Term::Bool(false))
  } else {
    Ok(Term::Atom(atom))
  }
}

/// Decodes an atom in a position where only an atom is admissible (the
/// node field of pids, ports, and references).
fn decode_atom(r: &mut Reader<'_>) -> Result<Atom, DecodeError> {
  let len: usize = match r.u8()? {
    tags::ATOM_EXT => r.u16()? as usize,
    tags::SMALL_ATOM_EXT => r.u8()? as usize,
    _ => return Err(r.fail("expected an atom")),
  };

  intern(r, len)
}

fn intern(r: &mut Reader<'_>, len: usize) -> Result<Atom, DecodeError> {
  if len > MAX_ATOM_BYTES {
    return Err(r.fail("atom too long"));
  }

  match std::str::from_utf8(r.take(len)?) {
    Ok(data) => match Atom::try_new(data) {
      Ok(atom) => Ok(atom),
      Err(_) => Err(r.fail("atom table full")),
    },
    Err(_) => Err(r.fail("malformed utf-8 in atom")),
  }
}

/// Folds little-endian magnitude bytes into a signed 64-bit value.
fn decode_big(r: &mut Reader<'_>, len: usize) -> Result<Term, DecodeError> {
  let sign: u8 = r.u8()?;
  let bytes: &[u8] = r.take(len)?;
  let mut value: u64 = 0;

  for (index, byte) in bytes.iter().enumerate() {
    if index >= 8 {
      if *byte != 0 {
        return Err(r.fail("integer overflow"));
      }

      continue;
    }

    value |= u64::from(*byte) << (8 * index);
  }

  if sign == 0 {
    if value > i64::MAX as u64 {
      return Err(r.fail("integer overflow"));
    }

    Ok(Term::Long(value as i64))
  } else {
    // The magnitude 2^63 is still representable as i64::MIN.
    if value > (i64::MAX as u64) + 1 {
      return Err(r.fail("integer overflow"));
    }

    Ok(Term::Long(value.wrapping_neg() as i64))
  }
}

/// Parses the legacy 31-byte ASCII float payload.
fn decode_old_float(r: &mut Reader<'_>) -> Result<Term, DecodeError> {
  let bytes: &[u8] = r.take(31)?;
  let end: usize = bytes.iter().position(|byte| *byte == 0).unwrap_or(31);

  let text: &str = match std::str::from_utf8(&bytes[..end]) {
    Ok(text) => text.trim(),
    Err(_) => return Err(r.fail("malformed float literal")),
  };

  match text.parse::<f64>() {
    Ok(value) => Ok(Term::Double(value)),
    Err(_) => Err(r.fail("malformed float literal")),
  }
}

fn decode_tuple(r: &mut Reader<'_>, arity: usize) -> Result<Term, DecodeError> {
  let mut items: Vec<Term> = Vec::with_capacity(arity.min(4096));

  for _ in 0..arity {
    items.push(decode_term(r)?);
  }

  Ok(Term::Tuple(Tuple::new(items)))
}

/// Attaches the decoded tail to the element run.
///
/// A nil tail closes a proper list. A list tail splices: `[a | [b, c]]`
/// is the same value as `[a, b, c]`. Anything else makes the list
/// improper; the tail is kept, never dropped.
fn decode_list_tail(r: &mut Reader<'_>, items: Vec<Term>) -> Result<Term, DecodeError> {
  match decode_term(r)? {
    tail if tail.is_nil() => Ok(Term::List(List::new(items))),
    Term::List(rest) => {
      let mut builder: ListBuilder = List::builder();

      for item in items {
        builder.push(item);
      }

      for item in rest.iter() {
        builder.push(item.clone());
      }

      if let Some(tail) = rest.tail_term() {
        builder.tail(tail.clone());
      }

      Ok(Term::List(builder.close()))
    }
    tail => match List::improper(items, tail) {
      Ok(list) => Ok(Term::List(list)),
      Err(_) => Err(r.fail("malformed list tail")),
    },
  }
}

fn decode_ref_ids(r: &mut Reader<'_>, len: usize) -> Result<Vec<u32>, DecodeError> {
  if len == 0 || len > MAX_REF_IDS {
    return Err(r.fail("reference id count out of range"));
  }

  let mut ids: Vec<u32> = Vec::with_capacity(len);

  for _ in 0..len {
    ids.push(r.u32()?);
  }

  Ok(ids)
}

fn decode_ref_parts(
  r: &mut Reader<'_>,
  node: Atom,
  ids: &[u32],
  creation: u32,
) -> Result<Term, DecodeError> {
  match Reference::from_parts(node, ids, creation) {
    Ok(eref) => Ok(Term::Ref(eref)),
    Err(_) => Err(r.fail("reference id count out of range")),
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::codec::decode_string;
  use crate::term::Term;
  use crate::term::TermKind;

  #[test]
  fn test_atom() {
    let buf: [u8; 7] = [131, 100, 0, 3, b'a', b'b', b'c'];
    let mut pos: usize = 0;
    let term: Term = Term::decode(&buf, &mut pos).unwrap();

    assert_eq!(pos, 7);
    assert_eq!(term.to_atom().unwrap(), "abc");
    assert_eq!(term.to_string(), "abc");
  }

  #[test]
  fn test_small_atom() {
    let buf: [u8; 6] = [131, 115, 3, b'a', b'b', b'c'];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term.to_atom().unwrap(), "abc");
  }

  #[test]
  fn test_bool_atoms() {
    let yes: [u8; 8] = [131, 100, 0, 4, b't', b'r', b'u', b'e'];
    let no: [u8; 9] = [131, 100, 0, 5, b'f', b'a', b'l', b's', b'e'];

    let yes: Term = Term::from_bytes(&yes).unwrap();
    let no: Term = Term::from_bytes(&no).unwrap();

    assert!(yes.to_bool().unwrap());
    assert_eq!(yes.to_string(), "true");
    assert!(!no.to_bool().unwrap());
    assert_eq!(no.to_string(), "false");
  }

  #[test]
  fn test_small_integer() {
    let buf: [u8; 3] = [131, 97, 255];
    assert_eq!(Term::from_bytes(&buf).unwrap().to_long().unwrap(), 255);
  }

  #[test]
  fn test_integer() {
    let buf: [u8; 6] = [131, 98, 7, 91, 205, 21];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term.to_long().unwrap(), 123456789);
    assert_eq!(term.to_string(), "123456789");
  }

  #[test]
  fn test_small_big() {
    let buf: [u8; 8] = [131, 110, 4, 1, 210, 2, 150, 73];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term.to_long().unwrap(), -1234567890);
  }

  #[test]
  fn test_big_overflow() {
    // 2^64 - 1 is out of i64 range.
    let buf: [u8; 12] = [131, 110, 8, 0, 255, 255, 255, 255, 255, 255, 255, 255];
    let error: _ = Term::from_bytes(&buf).unwrap_err();

    assert_eq!(error.reason(), "integer overflow");
  }

  #[test]
  fn test_big_negative_min() {
    // Magnitude 2^63 with the sign byte set is exactly i64::MIN.
    let buf: [u8; 12] = [131, 110, 8, 1, 0, 0, 0, 0, 0, 0, 0, 128];
    assert_eq!(Term::from_bytes(&buf).unwrap().to_long().unwrap(), i64::MIN);
  }

  #[test]
  fn test_old_float() {
    let mut buf: Vec<u8> = vec![131, 99];
    buf.extend_from_slice(b"1.00000000000000000000e+00");
    buf.extend_from_slice(&[0, 0, 0, 0, 0]);

    let mut pos: usize = 0;
    let term: Term = Term::decode(&buf, &mut pos).unwrap();

    assert_eq!(pos, 33);
    assert_eq!(term.to_double().unwrap(), 1.0);
  }

  #[test]
  fn test_new_float() {
    let buf: [u8; 10] = [131, 70, 63, 240, 0, 0, 0, 0, 0, 0];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term.to_double().unwrap(), 1.0);
    assert_eq!(term.to_string(), "1.0");
  }

  #[test]
  fn test_string() {
    let buf: [u8; 7] = [131, 107, 0, 3, b'a', b'b', b'c'];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term.to_str().unwrap().as_str(), "abc");
    assert_eq!(term.to_string(), "\"abc\"");
  }

  #[test]
  fn test_string_from_integer_list() {
    let buf: Vec<u8> = vec![131, 108, 0, 0, 0, 2, 97, 104, 97, 105, 106];
    let mut pos: usize = 1;
    let data: _ = decode_string(&buf, &mut pos).unwrap();

    assert_eq!(data.as_str(), "hi");
    assert_eq!(pos, buf.len());
  }

  #[test]
  fn test_binary() {
    let buf: [u8; 9] = [131, 109, 0, 0, 0, 3, b'a', b'b', b'c'];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term.to_binary().unwrap().len(), 3);
    assert_eq!(term.to_string(), "<<\"abc\">>");
  }

  #[test]
  fn test_tuple() {
    let buf: Vec<u8> = vec![
      131, 104, 2, 100, 0, 3, b'a', b'b', b'c', 100, 0, 3, b'e', b'f', b'g',
    ];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term.to_tuple().unwrap().len(), 2);
    assert_eq!(term.to_string(), "{abc,efg}");
  }

  #[test]
  fn test_map() {
    let buf: Vec<u8> = vec![131, 116, 0, 0, 0, 2, 97, 1, 97, 2, 100, 0, 1, b'a', 97, 3];
    let term: Term = Term::from_bytes(&buf).unwrap();

    let map: _ = term.to_map().unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Term::from(1)).unwrap().to_long().unwrap(), 2);
    assert_eq!(map.get(&Term::atom("a")).unwrap().to_long().unwrap(), 3);
    assert_eq!(term.to_string(), "#{1 => 2, a => 3}");
  }

  #[test]
  fn test_list() {
    let buf: Vec<u8> = vec![131, 108, 0, 0, 0, 2, 97, 1, 97, 2, 106];
    let term: Term = Term::from_bytes(&buf).unwrap();

    let list: _ = term.to_list().unwrap();

    assert_eq!(list.len(), 2);
    assert!(list.is_proper());
  }

  #[test]
  fn test_improper_list() {
    let buf: Vec<u8> = vec![131, 108, 0, 0, 0, 1, 97, 1, 97, 2];
    let term: Term = Term::from_bytes(&buf).unwrap();

    let list: _ = term.to_list().unwrap();

    assert!(!list.is_proper());
    assert_eq!(list.tail_term().unwrap().to_long().unwrap(), 2);
    assert_eq!(term.to_string(), "[1|2]");
  }

  #[test]
  fn test_list_tail_splices() {
    // [1 | [2]] is the same value as [1, 2].
    let buf: Vec<u8> = vec![131, 108, 0, 0, 0, 1, 97, 1, 108, 0, 0, 0, 1, 97, 2, 106];
    let term: Term = Term::from_bytes(&buf).unwrap();

    assert_eq!(term, Term::list(vec![Term::from(1), Term::from(2)]));
  }

  #[test]
  fn test_nil() {
    let buf: [u8; 2] = [131, 106];
    assert!(Term::from_bytes(&buf).unwrap().is_nil());
  }

  #[test]
  fn test_legacy_pid() {
    let mut buf: Vec<u8> = vec![131, 103, 100, 0, 3, b'a', b'@', b'h'];
    buf.extend_from_slice(&1_u32.to_be_bytes());
    buf.extend_from_slice(&2_u32.to_be_bytes());
    buf.push(7);

    let term: Term = Term::from_bytes(&buf).unwrap();
    let pid: _ = term.to_pid().unwrap();

    assert_eq!(pid.id(), 1);
    assert_eq!(pid.serial(), 2);
    // Legacy creation bytes only carry two bits.
    assert_eq!(pid.creation(), 3);
  }

  #[test]
  fn test_reference_id_arity() {
    // NEWER_REFERENCE_EXT with four id words.
    let mut buf: Vec<u8> = vec![131, 90, 0, 4, 100, 0, 3, b'a', b'@', b'h'];
    buf.extend_from_slice(&0_u32.to_be_bytes());
    buf.extend_from_slice(&[0; 16]);

    let error: _ = Term::from_bytes(&buf).unwrap_err();

    assert_eq!(error.reason(), "reference id count out of range");
  }

  #[test]
  fn test_unknown_tag() {
    let buf: [u8; 2] = [131, 200];
    let error: _ = Term::from_bytes(&buf).unwrap_err();

    assert_eq!(error.reason(), "unknown term tag");
    assert_eq!(error.offset(), 1);
  }

  #[test]
  fn test_missing_version() {
    let buf: [u8; 2] = [97, 1];
    assert!(Term::from_bytes(&buf).is_err());
  }

  #[test]
  fn test_naked_skips_version() {
    let buf: [u8; 2] = [97, 1];
    let mut pos: usize = 0;
    let term: Term = Term::decode_naked(&buf, &mut pos).unwrap();

    assert_eq!(term.kind(), TermKind::Long);
    assert_eq!(pos, 2);
  }

  #[test]
  fn test_short_input_keeps_cursor() {
    let buf: [u8; 3] = [131, 100, 0];
    let mut pos: usize = 0;

    assert!(Term::decode(&buf, &mut pos).is_err());
    assert_eq!(pos, 0);
  }
}
