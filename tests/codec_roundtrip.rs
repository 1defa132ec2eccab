//! Wire-level codec properties: concrete fixtures, round trips, and size
//! agreement over a representative term zoo.

use exterm::core::Atom;
use exterm::pattern::Binding;
use exterm::term::Binary;
use exterm::term::List;
use exterm::term::Map;
use exterm::term::Pid;
use exterm::term::Port;
use exterm::term::Reference;
use exterm::term::Term;
use exterm::term::Trace;

fn round_trip(term: &Term) -> Term {
  let bytes: Vec<u8> = term.to_bytes().unwrap();

  // The emitted length is exactly what encode_size promised, plus the
  // version byte.
  assert_eq!(bytes.len(), 1 + term.encode_size().unwrap(), "size mismatch for {term}");

  let mut pos: usize = 0;
  let decoded: Term = Term::decode(&bytes, &mut pos).unwrap();

  // The decoder consumed exactly what the encoder emitted.
  assert_eq!(pos, bytes.len(), "cursor mismatch for {term}");

  decoded
}

fn zoo() -> Vec<Term> {
  vec![
    Term::from(0),
    Term::from(255),
    Term::from(256),
    Term::from(-1),
    Term::from(123456789),
    Term::from(i64::MAX),
    Term::from(i64::MIN),
    Term::from(1.0),
    Term::from(-2.5),
    Term::from(f64::MIN_POSITIVE),
    Term::from(true),
    Term::from(false),
    Term::atom("abc"),
    Term::atom("Quoted Atom"),
    Term::atom(""),
    Term::from("hello world"),
    Term::from(""),
    Term::binary(*b"abc"),
    Term::binary(vec![0, 1, 2, 255]),
    Term::from(Pid::new("node@host", 1, 2, 3).unwrap()),
    Term::from(Pid::new("node@host", 0x0FFF_FFFF, u32::MAX, u32::MAX).unwrap()),
    Term::from(Port::new("node@host", 17, 9).unwrap()),
    Term::from(Reference::new("node@host", &[5], 1).unwrap()),
    Term::from(Reference::new("node@host", &[5, 6, 7], 0x0001_0000).unwrap()),
    Term::tuple(Vec::new()),
    Term::tuple(vec![Term::atom("ok"), Term::from(10), Term::from("x")]),
    Term::nil(),
    Term::list(vec![Term::from(1), Term::from(2), Term::from(3)]),
    Term::List(List::improper(vec![Term::from(1)], Term::from(2)).unwrap()),
    Term::from(Map::new()),
    Term::from(Map::from_pairs(vec![
      (Term::from(1), Term::from(2)),
      (Term::atom("a"), Term::from(3)),
    ])),
    Term::tuple(vec![
      Term::list(vec![Term::tuple(vec![Term::atom("nested"), Term::from(1.5)])]),
      Term::binary(*b"deep"),
    ]),
  ]
}

#[test]
fn decode_encode_round_trips() {
  for term in zoo() {
    assert_eq!(round_trip(&term), term, "round trip changed {term}");
  }
}

#[test]
fn trace_token_round_trips_as_tuple() {
  let from: Pid = Pid::new("a@host", 5, 1, 0).unwrap();
  let trace: Trace = Trace::new(1, 2, 3, from, 4);

  let decoded: Term = round_trip(&Term::from(trace.clone()));

  // Trace tokens have no opcode; they come back as their 5-tuple form.
  assert_eq!(decoded, trace.to_term());
  assert_eq!(Trace::from_term(&decoded).unwrap(), trace);
}

#[test]
fn atom_fixture() {
  let buf: [u8; 7] = [131, 100, 0, 3, b'a', b'b', b'c'];
  let term: Term = Term::from_bytes(&buf).unwrap();

  assert_eq!(term, Term::atom("abc"));

  // Re-encoding uses the small atom form with identical content.
  assert_eq!(
    term.to_bytes().unwrap(),
    vec![131, 115, 3, b'a', b'b', b'c'],
  );
}

#[test]
fn bool_fixture() {
  let buf: [u8; 8] = [131, 100, 0, 4, b't', b'r', b'u', b'e'];
  let term: Term = Term::from_bytes(&buf).unwrap();

  assert!(term.to_bool().unwrap());
  assert_eq!(term.to_string(), "true");
}

#[test]
fn binary_fixture() {
  let buf: [u8; 9] = [131, 109, 0, 0, 0, 3, b'a', b'b', b'c'];
  let term: Term = Term::from_bytes(&buf).unwrap();

  assert_eq!(term.to_binary().unwrap(), &Binary::new(*b"abc"));
  assert_eq!(term.to_string(), "<<\"abc\">>");
}

#[test]
fn tuple_fixture() {
  let buf: Vec<u8> = vec![
    131, 104, 2, 100, 0, 3, b'a', b'b', b'c', 100, 0, 3, b'e', b'f', b'g',
  ];
  let term: Term = Term::from_bytes(&buf).unwrap();

  assert_eq!(
    term,
    Term::tuple(vec![Term::atom("abc"), Term::atom("efg")]),
  );
  assert_eq!(term.to_string(), "{abc,efg}");
}

#[test]
fn map_fixture() {
  let buf: Vec<u8> = vec![131, 116, 0, 0, 0, 2, 97, 1, 97, 2, 100, 0, 1, b'a', 97, 3];
  let term: Term = Term::from_bytes(&buf).unwrap();

  assert_eq!(
    term,
    Term::from(Map::from_pairs(vec![
      (Term::from(1), Term::from(2)),
      (Term::atom("a"), Term::from(3)),
    ])),
  );
}

#[test]
fn pid_masking_fixture() {
  let pid: Pid = Pid::new("a@h", 1, 2, 3).unwrap();
  let decoded: Term = round_trip(&Term::from(pid));
  let decoded: &Pid = decoded.to_pid().unwrap();

  assert_eq!(decoded.creation(), 3);
  assert_eq!(decoded.id(), 1 & 0x0FFF_FFFF);
  assert_eq!(decoded.serial(), 2);
}

#[test]
fn list_length_survives() {
  let list: Term = Term::list((0..100).map(Term::from).collect());
  let decoded: Term = round_trip(&list);

  assert_eq!(decoded.to_list().unwrap().len(), 100);
}

#[test]
fn atom_interning_is_stable() {
  assert_eq!(Atom::new("stable"), Atom::new("stable"));
  assert_eq!(Atom::new(""), Atom::EMPTY);
}

#[test]
fn ordering_is_total_over_the_zoo() {
  let zoo: Vec<Term> = zoo();

  for lhs in &zoo {
    for rhs in &zoo {
      let forward: std::cmp::Ordering = lhs.cmp(rhs);
      let reverse: std::cmp::Ordering = rhs.cmp(lhs);

      assert_eq!(forward, reverse.reverse(), "asymmetric: {lhs} vs {rhs}");

      if lhs == rhs {
        assert_eq!(forward, std::cmp::Ordering::Equal, "eq but cmp != 0: {lhs}");
      }
    }
  }
}

#[test]
fn match_apply_round_trip() {
  let pattern: Term = Term::format("{ok, A::int(), B}").unwrap();
  let subject: Term = Term::tuple(vec![Term::atom("ok"), Term::from(10), Term::from("x")]);

  let mut binding: Binding = Binding::new();

  assert!(pattern.matches(&subject, &mut binding));
  assert_eq!(binding.get(Atom::new("A")), Some(&Term::from(10)));
  assert_eq!(binding.get(Atom::new("B")), Some(&Term::from("x")));
  assert_eq!(pattern.apply(&binding).unwrap(), subject);
}

#[test]
fn failed_decode_is_all_or_nothing() {
  // Truncated tuple: arity promises two elements, input holds one.
  let buf: Vec<u8> = vec![131, 104, 2, 97, 1];
  let mut pos: usize = 0;

  assert!(Term::decode(&buf, &mut pos).is_err());
  assert_eq!(pos, 0);
}
