//! Textual pattern parsing.
//!
//! The pattern language is the runtime's literal syntax plus variables:
//!
//! ```text
//! {ok, A::int(), B}
//! [H | T]
//! #{key => V::float()}
//! ```
//!
//! Variables start with an uppercase letter or `_`, and may carry a kind
//! hint written `::type()`. `_` alone is the anonymous variable.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::Atom;
use crate::term::List;
use crate::term::ListBuilder;
use crate::term::Map;
use crate::term::Term;
use crate::term::TermKind;
use crate::term::Tuple;
use crate::term::Var;

// -----------------------------------------------------------------------------
// Format Error
// -----------------------------------------------------------------------------

/// Error produced by a failed pattern parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatError {
  reason: &'static str,
  offset: usize,
}

impl FormatError {
  #[inline]
  const fn new(reason: &'static str, offset: usize) -> Self {
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

impl Display for FormatError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "pattern parse failed at offset {}: {}", self.offset, self.reason)
  }
}

impl Error for FormatError {}

// -----------------------------------------------------------------------------
// Entry Points
// -----------------------------------------------------------------------------

/// Parses a textual pattern into a pattern term.
///
/// # Errors
///
/// Returns [`FormatError`] on any syntax error, unknown type hint, or
/// trailing input.
pub fn parse_pattern(input: &str) -> Result<Term, FormatError> {
  let mut parser: Parser<'_> = Parser::new(input);
  let term: Term = parser.term()?;

  parser.skip_ws();

  if parser.pos < parser.buf.len() {
    return Err(parser.fail("trailing input after pattern"));
  }

  Ok(term)
}

impl Term {
  /// Parses a textual pattern; see [`parse_pattern`].
  #[inline]
  pub fn format(input: &str) -> Result<Term, FormatError> {
    parse_pattern(input)
  }
}

// -----------------------------------------------------------------------------
// Parser
// -----------------------------------------------------------------------------

struct Parser<'a> {
  buf: &'a [u8],
  pos: usize,
}

impl<'a> Parser<'a> {
  fn new(input: &'a str) -> Self {
    Self {
      buf: input.as_bytes(),
      pos: 0,
    }
  }

  const fn fail(&self, reason: &'static str) -> FormatError {
    FormatError::new(reason, self.pos)
  }

  fn skip_ws(&mut self) {
    while self.buf.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
      self.pos += 1;
    }
  }

  fn peek(&self) -> Option<u8> {
    self.buf.get(self.pos).copied()
  }

  fn eat(&mut self, expected: u8) -> bool {
    if self.peek() == Some(expected) {
      self.pos += 1;
      true
    } else {
      false
    }
  }

  fn expect(&mut self, expected: u8, reason: &'static str) -> Result<(), FormatError> {
    if self.eat(expected) {
      Ok(())
    } else {
      Err(self.fail(reason))
    }
  }

  fn term(&mut self) -> Result<Term, FormatError> {
    self.skip_ws();

    match self.peek() {
      Some(b'{') => self.tuple(),
      Some(b'[') => self.list(),
      Some(b'#') => self.map(),
      Some(b'"') => self.string(),
      Some(b'\'') => self.quoted_atom(),
      Some(byte) if byte.is_ascii_digit() || byte == b'-' => self.number(),
      Some(byte) if byte.is_ascii_lowercase() => self.bare_atom(),
      Some(byte) if byte.is_ascii_uppercase() || byte == b'_' => self.variable(),
      _ => Err(self.fail("expected a term")),
    }
  }

  fn tuple(&mut self) -> Result<Term, FormatError> {
    self.expect(b'{', "expected '{'")?;
    self.skip_ws();

    let mut items: Vec<Term> = Vec::new();

    if !self.eat(b'}') {
      loop {
        items.push(self.term()?);
        self.skip_ws();

        if self.eat(b',') {
          continue;
        }

        self.expect(b'}', "expected ',' or '}' in tuple")?;
        break;
      }
    }

    Ok(Term::Tuple(Tuple::new(items)))
  }

  fn list(&mut self) -> Result<Term, FormatError> {
    self.expect(b'[', "expected '['")?;
    self.skip_ws();

    let mut builder: ListBuilder = List::builder();

    if !self.eat(b']') {
      loop {
        builder.push(self.term()?);
        self.skip_ws();

        if self.eat(b',') {
          continue;
        }

        if self.eat(b'|') {
          let tail: Term = self.term()?;

          if tail.is_list() {
            return Err(self.fail("list tail must not be a list literal"));
          }

          builder.tail(tail);
          self.skip_ws();
        }

        self.expect(b']', "expected ',' or ']' in list")?;
        break;
      }
    }

    Ok(Term::List(builder.close()))
  }

  fn map(&mut self) -> Result<Term, FormatError> {
    self.expect(b'#', "expected '#'")?;
    self.expect(b'{', "expected '{' after '#'")?;
    self.skip_ws();

    let mut pairs: Vec<(Term, Term)> = Vec::new();

    if !self.eat(b'}') {
      loop {
        let key: Term = self.term()?;

        self.skip_ws();
        self.expect(b'=', "expected '=>' in map entry")?;
        self.expect(b'>', "expected '=>' in map entry")?;

        let value: Term = self.term()?;

        pairs.push((key, value));
        self.skip_ws();

        if self.eat(b',') {
          continue;
        }

        self.expect(b'}', "expected ',' or '}' in map")?;
        break;
      }
    }

    Ok(Term::Map(Map::from_pairs(pairs)))
  }

  fn string(&mut self) -> Result<Term, FormatError> {
    self.expect(b'"', "expected '\"'")?;

    let mut data: Vec<u8> = Vec::new();

    loop {
      match self.peek() {
        Some(b'"') => {
          self.pos += 1;
          break;
        }
        Some(b'\\') => {
          self.pos += 1;

          let escaped: u8 = match self.peek() {
            Some(b'"') => b'"',
            Some(b'\\') => b'\\',
            Some(b'n') => b'\n',
            Some(b't') => b'\t',
            _ => return Err(self.fail("unknown string escape")),
          };

          data.push(escaped);
          self.pos += 1;
        }
        Some(byte) => {
          data.push(byte);
          self.pos += 1;
        }
        None => return Err(self.fail("unterminated string literal")),
      }
    }

    match String::from_utf8(data) {
      Ok(data) => Ok(Term::from(data)),
      Err(_) => Err(self.fail("malformed utf-8 in string literal")),
    }
  }

  fn quoted_atom(&mut self) -> Result<Term, FormatError> {
    self.expect(b'\'', "expected '''")?;

    let start: usize = self.pos;

    loop {
      match self.peek() {
        Some(b'\'') => break,
        Some(_) => self.pos += 1,
        None => return Err(self.fail("unterminated quoted atom")),
      }
    }

    let buf: &'a [u8] = self.buf;

    let name: &'a str = match std::str::from_utf8(&buf[start..self.pos]) {
      Ok(name) => name,
      Err(_) => return Err(self.fail("malformed utf-8 in atom literal")),
    };

    self.pos += 1;

    match Atom::try_new(name) {
      Ok(atom) => Ok(Term::Atom(atom)),
      Err(_) => Err(self.fail("atom literal out of range")),
    }
  }

  fn bare_atom(&mut self) -> Result<Term, FormatError> {
    let name: &str = self.identifier(|byte: u8| {
      byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'@'
    })?;

    match name {
      "true" => Ok(Term::Bool(true)),
      "false" => Ok(Term::Bool(false)),
      _ => match Atom::try_new(name) {
        Ok(atom) => Ok(Term::Atom(atom)),
        Err(_) => Err(self.fail("atom literal out of range")),
      },
    }
  }

  fn variable(&mut self) -> Result<Term, FormatError> {
    let name: &str = self.identifier(|byte: u8| byte.is_ascii_alphanumeric() || byte == b'_')?;
    let name: Atom = match Atom::try_new(name) {
      Ok(atom) => atom,
      Err(_) => return Err(self.fail("variable name out of range")),
    };

    if self.peek() == Some(b':') && self.buf.get(self.pos + 1) == Some(&b':') {
      self.pos += 2;

      let hint: TermKind = self.type_hint()?;

      return Ok(Term::Var(Var::with_hint(name, hint)));
    }

    Ok(Term::Var(Var::new(name)))
  }

  fn type_hint(&mut self) -> Result<TermKind, FormatError> {
    let start: usize = self.pos;
    let name: &str = self.identifier(|byte: u8| byte.is_ascii_alphanumeric() || byte == b'_')?;

    let hint: TermKind = match name {
      "int" | "integer" | "long" => TermKind::Long,
      "float" | "double" => TermKind::Double,
      "bool" | "boolean" => TermKind::Bool,
      "atom" => TermKind::Atom,
      "string" => TermKind::String,
      "binary" => TermKind::Binary,
      "pid" => TermKind::Pid,
      "port" => TermKind::Port,
      "ref" | "reference" => TermKind::Ref,
      "tuple" => TermKind::Tuple,
      "list" => TermKind::List,
      "map" => TermKind::Map,
      _ => {
        self.pos = start;
        return Err(self.fail("unknown type hint"));
      }
    };

    self.expect(b'(', "expected '()' after type hint")?;
    self.expect(b')', "expected '()' after type hint")?;

    Ok(hint)
  }

  fn number(&mut self) -> Result<Term, FormatError> {
    let start: usize = self.pos;

    if self.peek() == Some(b'-') {
      self.pos += 1;
    }

    let mut float: bool = false;

    while let Some(byte) = self.peek() {
      match byte {
        b'0'..=b'9' => self.pos += 1,
        b'.' | b'e' | b'E' => {
          float = true;
          self.pos += 1;
        }
        b'+' | b'-' if float => self.pos += 1,
        _ => break,
      }
    }

    // The scanned range is ASCII digits and sign/exponent punctuation.
    let text: &str = std::str::from_utf8(&self.buf[start..self.pos]).unwrap_or("");

    if float {
      match text.parse::<f64>() {
        Ok(value) => Ok(Term::Double(value)),
        Err(_) => Err(self.fail("malformed float literal")),
      }
    } else {
      match text.parse::<i64>() {
        Ok(value) => Ok(Term::Long(value)),
        Err(_) => Err(self.fail("malformed integer literal")),
      }
    }
  }

  fn identifier<F>(&mut self, admit: F) -> Result<&'a str, FormatError>
  where
    F: Fn(u8) -> bool,
  {
    let start: usize = self.pos;

    while self.peek().is_some_and(&admit) {
      self.pos += 1;
    }

    if self.pos == start {
      return Err(self.fail("expected an identifier"));
    }

    let buf: &'a [u8] = self.buf;

    std::str::from_utf8(&buf[start..self.pos])
      .map_err(|_| self.fail("malformed utf-8 in identifier"))
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
