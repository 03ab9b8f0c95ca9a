//! Reduction throughput benchmarks.
#[cfg(feature="extended")] use skex::atom::{self, Atom};
use skex::builtins::MacroLib;
use skex::heap::AppHeap;
use skex::parse::parse;

fn main() { divan::main() }

/// one fusion plus one constant rewrite
#[divan::bench]
fn skks()->usize {
  let mut h = AppHeap::new(64);
  let lib = MacroLib::empty();
  let t = parse(&mut h, &lib, "@@@SKKS").unwrap().unwrap();
  let r = h.reduce(t);
  h.release(r);
  h.reductions() }

/// unchurch #64 through the arithmetic successor (C (C + 1) I)
#[cfg(feature="extended")]
#[divan::bench]
fn church_to_int()->usize {
  let mut h = AppHeap::new(4096);
  let lib = MacroLib::empty();
  let n = parse(&mut h, &lib, "#64").unwrap().unwrap();
  let succ = { let a = h.alloc(atom::C, atom::ADD);
               let a = h.alloc(a, Atom::num(1));
               let a = h.alloc(atom::C, a);
               h.alloc(a, atom::I) };
  let t = h.alloc(n, succ);
  let t = h.alloc(t, Atom::num(0));
  let r = h.reduce(t);
  assert_eq!(r, Atom::num(64));
  h.release(r);
  h.reductions() }

/// the macro library's pure-combinator factorial on a Church numeral
#[cfg(feature="builtins")]
#[divan::bench]
fn fact_church()->usize {
  let mut h = AppHeap::new(8192);
  let lib = MacroLib::standard();
  let t = parse(&mut h, &lib, "@$fact#4").unwrap().unwrap();
  let r = h.reduce(t);
  h.release(r);
  h.reductions() }
