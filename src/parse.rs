//! Surface-syntax parser.
//!
//! The grammar is the classic prefix one: `@f x` (or `(f x)`; `)` is
//! skipped as noise) applies f to x, single characters name combinators
//! from the configured repertoire, `#N` expands to the Church numeral N,
//! `$name` expands a macro from the library, `'c` is the character code
//! of c, a run of digits is a datum, and lowercase `a..z` are inert
//! placeholders.
//!
//! Terms are built exclusively through the heap's `alloc` / `retain`;
//! on error every partially built subterm is released, so a failed
//! parse never leaks pool nodes.
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::atom::{self, Atom, Comb};
use crate::builtins::MacroLib;
use crate::heap::AppHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
  /// input ended in the middle of a term
  UnexpectedEof,
  /// a character with no reading in the grammar
  BadChar(char),
  /// `$name` not present in the macro library
  UnknownMacro(String) }

impl fmt::Display for ParseError {
  fn fmt(&self, f:&mut fmt::Formatter)->fmt::Result {
    match self {
      ParseError::UnexpectedEof => write!(f, "unexpected end of input"),
      ParseError::BadChar(c) => write!(f, "unrecognized char '{}'", c),
      ParseError::UnknownMacro(s) => write!(f, "unknown macro: ${}", s) }}}

impl std::error::Error for ParseError {}

fn is_blank(c:char)->bool { c==' ' || c=='\t' || c=='\r' || c=='\n' || c==')' }

/// Parse one term from `src`. `Ok(None)` when the input is all blanks;
/// anything after the first complete term is ignored.
pub fn parse(heap:&mut AppHeap, lib:&MacroLib, src:&str)->Result<Option<Atom>, ParseError> {
  let mut it = src.chars().peekable();
  while let Some(&c) = it.peek() {
    if is_blank(c) { it.next(); } else { break }}
  if it.peek().is_none() { return Ok(None) }
  term(heap, lib, &mut it).map(Some) }

fn term(heap:&mut AppHeap, lib:&MacroLib, it:&mut Peekable<Chars>)->Result<Atom, ParseError> {
  loop {
    let c = it.next().ok_or(ParseError::UnexpectedEof)?;
    if is_blank(c) { continue }
    return match c {
      '@' | '(' => {
        let f = term(heap, lib, it)?;
        match term(heap, lib, it) {
          Ok(x) => Ok(heap.alloc(f, x)),
          Err(e) => { heap.release(f); Err(e) }}}
      '#' => Ok(church(heap, it)),
      '$' => {
        let mut name = String::new();
        while let Some(&d) = it.peek() {
          if d.is_ascii_alphanumeric() { name.push(d); it.next(); } else { break }}
        match lib.get(&name) {
          Some(src) => term(heap, lib, &mut src.chars().peekable()),
          None => Err(ParseError::UnknownMacro(name)) }}
      '\'' => {
        let q = it.next().ok_or(ParseError::UnexpectedEof)?;
        Ok(Atom::num((q as u32 & atom::VAL_MASK) as u16)) }
      '0'..='9' => {
        let mut v = c as u32 - '0' as u32;
        while let Some(&d) = it.peek() {
          if let Some(dv) = d.to_digit(10) { v = (v*10 + dv) & atom::VAL_MASK; it.next(); }
          else { break }}
        Ok(Atom::num(v as u16)) }
      'a'..='z' => Ok(Atom::var(c as u8 - b'a')),
      _ => match Comb::from_token(c) {
        Some(k) => Ok(Atom::comb(k)),
        None => Err(ParseError::BadChar(c)) }}}}

/// `#N`: N applications of the successor `(S B)` to zero `(K I)`.
/// The successor node is allocated once and shared by all N uses.
fn church(heap:&mut AppHeap, it:&mut Peekable<Chars>)->Atom {
  let mut n:u32 = 0;
  while let Some(&d) = it.peek() {
    if let Some(dv) = d.to_digit(10) { n = (n*10 + dv) & atom::VAL_MASK; it.next(); }
    else { break }}
  let succ = heap.alloc(atom::S, atom::B);
  let mut val = heap.alloc(atom::K, atom::I);
  for _ in 0..n {
    let s = heap.retain(succ);
    val = heap.alloc(s, val); }
  heap.release(succ);
  val }

/// Single-literal parsing, for reloading dumped graphs.
impl std::str::FromStr for Atom {
  type Err = ParseError;
  fn from_str(s:&str)->Result<Atom, ParseError> {
    let mut cs = s.chars();
    let c = cs.next().ok_or(ParseError::UnexpectedEof)?;
    if c.is_ascii_digit() {
      return match s.parse::<u32>() {
        Ok(v) => Ok(Atom::num((v & atom::VAL_MASK) as u16)),
        Err(_) => Err(ParseError::BadChar(c)) }}
    if cs.next().is_some() { return Err(ParseError::BadChar(c)) }
    if c.is_ascii_lowercase() { return Ok(Atom::var(c as u8 - b'a')) }
    match Comb::from_token(c) {
      Some(k) => Ok(Atom::comb(k)),
      None => Err(ParseError::BadChar(c)) }}}


#[cfg(test)] mod test {
  use super::*;

  fn p(h:&mut AppHeap, src:&str)->Atom {
    let lib = MacroLib::standard();
    parse(h, &lib, src).expect("parse error").expect("empty input") }

  #[test] fn test_prefix_and_paren_forms() {
    let mut h = AppHeap::new(64);
    let a = p(&mut h, "@@SKK");
    assert_eq!(h.show(a), "((S K) K)");
    let b = p(&mut h, "((S K) K)");
    assert_eq!(h.show(b), "((S K) K)");
    h.release(a); h.release(b);
    assert_eq!(h.live(), 0)}

  #[test] fn test_literals() {
    let mut h = AppHeap::new(64);
    assert_eq!(p(&mut h, "300"), Atom::num(300));
    assert_eq!(p(&mut h, "'A"), Atom::num(65));
    assert_eq!(p(&mut h, "z"), Atom::var(25));
    assert_eq!(p(&mut h, "  S "), atom::S);
    assert_eq!(h.live(), 0)}

  #[test] fn test_church_zero_and_two() {
    let mut h = AppHeap::new(64);
    let z = p(&mut h, "#0");
    assert_eq!(h.show(z), "(K I)");
    let two = p(&mut h, "#2");
    assert_eq!(h.show(two), "((S B) ((S B) (K I)))");
    // the successor node is shared, not copied
    let outer = two.app_idx().unwrap();
    let inner = h.arg(outer).app_idx().unwrap();
    assert_eq!(h.func(outer), h.func(inner));
    h.release(z); h.release(two);
    h.check_sound(&[]);
    assert_eq!(h.live(), 0)}

  #[test] fn test_empty_input() {
    let mut h = AppHeap::new(64);
    let lib = MacroLib::empty();
    assert_eq!(parse(&mut h, &lib, "  \n "), Ok(None));
    assert_eq!(parse(&mut h, &lib, ""), Ok(None))}

  #[test] fn test_errors_release_partial_terms() {
    let mut h = AppHeap::new(64);
    let lib = MacroLib::empty();
    assert_eq!(parse(&mut h, &lib, "@@SK"), Err(ParseError::UnexpectedEof));
    assert_eq!(parse(&mut h, &lib, "@S%"), Err(ParseError::BadChar('%')));
    assert_eq!(parse(&mut h, &lib, "@S$nope"),
               Err(ParseError::UnknownMacro("nope".to_string())));
    assert_eq!(h.live(), 0, "failed parses must not leak pool nodes")}

  #[cfg(feature="builtins")]
  #[test] fn test_macro_expansion() {
    let mut h = AppHeap::new(256);
    let t = p(&mut h, "$t");
    assert_eq!(t, atom::K);
    let f = p(&mut h, "$f");
    assert_eq!(h.show(f), "(K I)");
    h.release(f);
    assert_eq!(h.live(), 0)}

  #[test] fn test_atom_from_str() {
    assert_eq!("S".parse::<Atom>(), Ok(atom::S));
    assert_eq!("42".parse::<Atom>(), Ok(Atom::num(42)));
    assert_eq!("q".parse::<Atom>(), Ok(Atom::var(16)));
    assert!("SK".parse::<Atom>().is_err());
    assert!("".parse::<Atom>().is_err())}}
