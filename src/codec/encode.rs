//! Term encoding to the external format.

use crate::codec::tags;
use crate::codec::writer::EncodeError;
use crate::codec::writer::Writer;
use crate::core::Atom;
use crate::term::List;
use crate::term::Map;
use crate::term::Pid;
use crate::term::Port;
use crate::term::Reference;
use crate::term::Term;
use crate::term::Trace;
use crate::term::Tuple;

// -----------------------------------------------------------------------------
// Term - Encode
// -----------------------------------------------------------------------------

impl Term {
  /// Returns the exact byte length of the naked encoding.
  ///
  /// Always agrees with what [`encode_naked()`] emits; the version byte of
  /// the top-level form adds one.
  ///
  /// # Errors
  ///
  /// Returns [`EncodeError`] for the unencodable kinds (`Undefined` and
  /// pattern variables).
  ///
  /// [`encode_naked()`]: Self::encode_naked
  pub fn encode_size(&self) -> Result<usize, EncodeError> {
    term_size(self)
  }

  /// Encodes a top-level term at `*pos`, emitting the version byte.
  ///
  /// The cursor is advanced past the written bytes on success.
  ///
  /// # Errors
  ///
  /// Returns [`EncodeError`] when the destination is too small or the term
  /// contains an unencodable kind.
  pub fn encode(&self, buf: &mut [u8], pos: &mut usize) -> Result<(), EncodeError> {
    let mut writer: Writer<'_> = Writer::new(buf, *pos);

    writer.u8(tags::VERSION_MAGIC)?;
    encode_term(self, &mut writer)?;

    *pos = writer.pos();

    Ok(())
  }

  /// Encodes a nested term at `*pos`; nested terms carry no version byte.
  pub fn encode_naked(&self, buf: &mut [u8], pos: &mut usize) -> Result<(), EncodeError> {
    let mut writer: Writer<'_> = Writer::new(buf, *pos);

    encode_term(self, &mut writer)?;

    *pos = writer.pos();

    Ok(())
  }

  /// Encodes the term into a fresh version-prefixed buffer.
  pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
    let mut buf: Vec<u8> = vec![0; 1 + self.encode_size()?];
    let mut pos: usize = 0;

    self.encode(&mut buf, &mut pos)?;

    debug_assert_eq!(pos, buf.len());

    Ok(buf)
  }
}

// -----------------------------------------------------------------------------
// Sizes
// -----------------------------------------------------------------------------

fn term_size(term: &Term) -> Result<usize, EncodeError> {
  match term {
    Term::Undefined => Err(EncodeError::new("cannot encode an uninitialized term")),
    Term::Var(_) => Err(EncodeError::new("cannot encode a pattern variable")),
    Term::Long(value) => Ok(long_size(*value)),
    Term::Double(_) => Ok(9),
    Term::Bool(value) => Ok(atom_size(bool_atom(*value))),
    Term::Atom(value) => Ok(atom_size(*value)),
    Term::Str(value) => {
      if value.len() <= u16::MAX as usize {
        Ok(3 + value.len())
      } else {
        // Long strings travel as a list of byte integers with a nil tail.
        let bytes: usize = value
          .as_str()
          .bytes()
          .map(|byte| long_size(i64::from(byte)))
          .sum();

        Ok(5 + bytes + 1)
      }
    }
    Term::Binary(value) => Ok(5 + value.len()),
    Term::Pid(value) => Ok(pid_size(value)),
    Term::Port(value) => Ok(1 + atom_size(value.node()) + 8),
    Term::Ref(value) => Ok(3 + atom_size(value.node()) + 4 + 4 * value.ids().len()),
    Term::Tuple(value) => tuple_size(value.as_slice()),
    Term::List(value) => list_size(value),
    Term::Map(value) => map_size(value),
    Term::Trace(value) => trace_size(value),
  }
}

fn long_size(value: i64) -> usize {
  if (0..=255).contains(&value) {
    2
  } else if i32::try_from(value).is_ok() {
    5
  } else {
    3 + big_len(value)
  }
}

/// Number of magnitude bytes in the big-integer encoding.
fn big_len(value: i64) -> usize {
  let mag: u64 = value.unsigned_abs();

  (((64 - mag.leading_zeros()) as usize) + 7) / 8
}

fn atom_size(atom: Atom) -> usize {
  2 + atom.as_str().len()
}

fn pid_size(pid: &Pid) -> usize {
  1 + atom_size(pid.node()) + 12
}

fn tuple_size(items: &[Term]) -> Result<usize, EncodeError> {
  let header: usize = if items.len() <= u8::MAX as usize { 2 } else { 5 };
  let mut total: usize = header;

  for item in items {
    total += term_size(item)?;
  }

  Ok(total)
}

fn list_size(list: &List) -> Result<usize, EncodeError> {
  if list.is_nil() {
    return Ok(1);
  }

  let mut total: usize = 5;

  for item in list.iter() {
    total += term_size(item)?;
  }

  match list.tail_term() {
    Some(tail) => Ok(total + term_size(tail)?),
    None => Ok(total + 1),
  }
}

fn map_size(map: &Map) -> Result<usize, EncodeError> {
  let mut total: usize = 5;

  for (key, value) in map.iter() {
    total += term_size(key)?;
    total += term_size(value)?;
  }

  Ok(total)
}

fn trace_size(trace: &Trace) -> Result<usize, EncodeError> {
  Ok(
    2 + long_size(trace.serial())
      + long_size(trace.prev())
      + long_size(trace.label())
      + pid_size(trace.from())
      + long_size(trace.flags()),
  )
}

// -----------------------------------------------------------------------------
// Encoder
// -----------------------------------------------------------------------------

fn encode_term(term: &Term, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  match term {
    Term::Undefined => Err(EncodeError::new("cannot encode an uninitialized term")),
    Term::Var(_) => Err(EncodeError::new("cannot encode a pattern variable")),
    Term::Long(value) => encode_long(*value, w),
    Term::Double(value) => {
      w.u8(tags::NEW_FLOAT_EXT)?;
      w.f64(*value)
    }
    Term::Bool(value) => encode_atom(bool_atom(*value), w),
    Term::Atom(value) => encode_atom(*value, w),
    Term::Str(value) => {
      if value.len() <= u16::MAX as usize {
        w.u8(tags::STRING_EXT)?;
        w.u16(value.len() as u16)?;
        w.put(value.as_str().as_bytes())
      } else {
        w.u8(tags::LIST_EXT)?;
        w.u32(value.len() as u32)?;

        for byte in value.as_str().bytes() {
          encode_long(i64::from(byte), w)?;
        }

        w.u8(tags::NIL_EXT)
      }
    }
    Term::Binary(value) => {
      w.u8(tags::BINARY_EXT)?;
      w.u32(value.len() as u32)?;
      w.put(value.as_slice())
    }
    Term::Pid(value) => encode_pid(value, w),
    Term::Port(value) => encode_port(value, w),
    Term::Ref(value) => encode_ref(value, w),
    Term::Tuple(value) => encode_tuple(value, w),
    Term::List(value) => encode_list(value, w),
    Term::Map(value) => encode_map(value, w),
    Term::Trace(value) => encode_trace(value, w),
  }
}

/// Emits the narrowest integer opcode that fits.
fn encode_long(value: i64, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  if (0..=255).contains(&value) {
    w.u8(tags::SMALL_INTEGER_EXT)?;
    w.u8(value as u8)
  } else if let Ok(value) = i32::try_from(value) {
    w.u8(tags::INTEGER_EXT)?;
    w.i32(value)
  } else {
    let len: usize = big_len(value);
    let mag: u64 = value.unsigned_abs();

    w.u8(tags::SMALL_BIG_EXT)?;
    w.u8(len as u8)?;
    w.u8(u8::from(value < 0))?;
    w.put(&mag.to_le_bytes()[..len])
  }
}

fn encode_atom(atom: Atom, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  let data: &str = atom.as_str();

  // Interned names never exceed 255 bytes, so the small form always fits.
  w.u8(tags::SMALL_ATOM_EXT)?;
  w.u8(data.len() as u8)?;
  w.put(data.as_bytes())
}

fn encode_pid(pid: &Pid, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  w.u8(tags::NEW_PID_EXT)?;
  encode_atom(pid.node(), w)?;
  w.u32(pid.id())?;
  w.u32(pid.serial())?;
  w.u32(pid.creation())
}

fn encode_port(port: &Port, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  w.u8(tags::NEW_PORT_EXT)?;
  encode_atom(port.node(), w)?;
  w.u32(port.id())?;
  w.u32(port.creation())
}

fn encode_ref(eref: &Reference, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  w.u8(tags::NEWER_REFERENCE_EXT)?;
  w.u16(eref.ids().len() as u16)?;
  encode_atom(eref.node(), w)?;
  w.u32(eref.creation())?;

  for id in eref.ids() {
    w.u32(*id)?;
  }

  Ok(())
}

fn encode_tuple(tuple: &Tuple, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  if tuple.len() <= u8::MAX as usize {
    w.u8(tags::SMALL_TUPLE_EXT)?;
    w.u8(tuple.len() as u8)?;
  } else {
    w.u8(tags::LARGE_TUPLE_EXT)?;
    w.u32(tuple.len() as u32)?;
  }

  for item in tuple.iter() {
    encode_term(item, w)?;
  }

  Ok(())
}

fn encode_list(list: &List, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  if list.is_nil() {
    return w.u8(tags::NIL_EXT);
  }

  w.u8(tags::LIST_EXT)?;
  w.u32(list.len() as u32)?;

  for item in list.iter() {
    encode_term(item, w)?;
  }

  match list.tail_term() {
    Some(tail) => encode_term(tail, w),
    None => w.u8(tags::NIL_EXT),
  }
}

fn encode_map(map: &Map, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  w.u8(tags::MAP_EXT)?;
  w.u32(map.len() as u32)?;

  for (key, value) in map.iter() {
    encode_term(key, w)?;
    encode_term(value, w)?;
  }

  Ok(())
}

/// Trace tokens travel as plain 5-tuples.
fn encode_trace(trace: &Trace, w: &mut Writer<'_>) -> Result<(), EncodeError> {
  w.u8(tags::SMALL_TUPLE_EXT)?;
  w.u8(5)?;
  encode_long(trace.serial(), w)?;
  encode_long(trace.prev(), w)?;
  encode_long(trace.label(), w)?;
  encode_pid(trace.from(), w)?;
  encode_long(trace.flags(), w)
}

fn bool_atom(value: bool) -> Atom {
  if value {
    Atom::TRUE
  } else {
    Atom::FALSE
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
