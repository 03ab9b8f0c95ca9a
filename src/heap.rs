//! The application-node heap: a fixed-capacity pool of `(func, arg)`
//! records threaded through a free-list, with reference counting.
//!
//! The heap also owns the byte streams used by the input/output
//! primitives, and the spine stack and counters used by the reducer,
//! so one `AppHeap` value is the whole engine.
use std::io::{Read, Write};
use crate::atom::{self, Atom};

/// default pool capacity (number of application nodes)
pub const DEFAULT_POOL:usize = 3072;
/// default spine-stack capacity
pub const DEFAULT_SPINE:usize = 512;

/// refcount stamp for nodes on the free-list; sanity assertions
/// trip on it to catch use-after-free
const FREE_RC:u32 = 0x8888;
/// refcount stamp for the pool-end sentinel record
const END_RC:u32 = 0x9e37;

/// One application cell. While free, `func` holds the next free-list
/// link and `arg` is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct App { pub func:Atom, pub arg:Atom, pub rc:u32 }

pub struct AppHeap {
  /// capacity+1 records; the last is the end sentinel
  pub(crate) apps: Vec<App>,
  /// head of the free-list; == capacity when the pool is exhausted
  free_head: usize,
  live: usize,
  high_water: usize,
  pub(crate) reductions: usize,
  /// transient spine stack: node indices only, never owning references
  pub(crate) spine: Vec<usize>,
  pub(crate) spine_cap: usize,
  pub(crate) inp: Box<dyn Read>,
  pub(crate) out: Box<dyn Write>,
}

impl Default for AppHeap {
  fn default()->Self { AppHeap::new(DEFAULT_POOL) }}

impl AppHeap {
  pub fn new(n:usize)->Self { AppHeap::with_caps(n, DEFAULT_SPINE) }

  pub fn with_caps(n:usize, s:usize)->Self {
    let mut apps = vec![App::default(); n+1];
    for (i, app) in apps.iter_mut().take(n).enumerate() {
      app.func = Atom::app(i+1);
      app.rc = FREE_RC; }
    apps[n].rc = END_RC;
    AppHeap {
      apps, free_head:0, live:0, high_water:0, reductions:0,
      spine: Vec::with_capacity(s), spine_cap: s,
      inp: Box::new(std::io::stdin()),
      out: Box::new(std::io::stdout()) }}

  /// swap in the byte streams used by the P and G primitives
  pub fn set_io(&mut self, inp:Box<dyn Read>, out:Box<dyn Write>) {
    self.inp = inp; self.out = out; }

  pub fn capacity(&self)->usize { self.apps.len()-1 }
  pub fn live(&self)->usize { self.live }
  pub fn high_water(&self)->usize { self.high_water }
  pub fn reductions(&self)->usize { self.reductions }

  /// zero the reduction counter and restart the high-water mark from
  /// the current live count (the shell does this once per term)
  pub fn reset_stats(&mut self) {
    self.reductions = 0;
    self.high_water = self.live; }

  fn sanity(&self) {
    debug_assert_eq!(self.apps[self.capacity()].rc, END_RC, "pool end sentinel clobbered");
    debug_assert!(self.free_head <= self.capacity()); }

  // -- cell accessors (indices come from Atom::app_idx) --

  #[inline] pub(crate) fn func(&self, n:usize)->Atom {
    debug_assert_ne!(self.apps[n].rc, FREE_RC, "func() on a free node");
    self.apps[n].func }

  #[inline] pub(crate) fn arg(&self, n:usize)->Atom {
    debug_assert_ne!(self.apps[n].rc, FREE_RC, "arg() on a free node");
    self.apps[n].arg }

  #[inline] pub(crate) fn rc(&self, n:usize)->u32 { self.apps[n].rc }

  #[inline] pub(crate) fn set_func(&mut self, n:usize, a:Atom) { self.apps[n].func = a }
  #[inline] pub(crate) fn set_arg(&mut self, n:usize, a:Atom) { self.apps[n].arg = a }

  /// Claim a node off the free-list and initialize it with the given
  /// children (whose references the new node takes over). Exhaustion
  /// is fatal: there is no way to recover mid-rewrite.
  pub fn alloc(&mut self, func:Atom, arg:Atom)->Atom {
    self.sanity();
    let n = self.free_head;
    if n == self.capacity() {
      error!("out of app space ({} nodes)", self.capacity());
      panic!("out of app space"); }
    debug_assert_eq!(self.apps[n].rc, FREE_RC, "free-list reached a live node");
    self.free_head = self.apps[n].func.app_idx().expect("corrupt free-list link");
    self.apps[n] = App{ func, arg, rc:1 };
    self.live += 1;
    if self.live > self.high_water { self.high_water = self.live }
    trace!("alloc @{} = ({} {})", n, func, arg);
    Atom::app(n) }

  /// Thread a dead node back onto the free-list. Children are released
  /// by `release`, never here.
  fn free(&mut self, n:usize) {
    trace!("free @{} = ({} {})", n, self.apps[n].func, self.apps[n].arg);
    self.apps[n].func = Atom::app(self.free_head);
    self.apps[n].rc = FREE_RC;
    self.free_head = n;
    self.live -= 1; }

  /// Bump the refcount of a node reference; a no-op on literals.
  /// Returns the atom unchanged so calls can be chained into stores.
  pub fn retain(&mut self, a:Atom)->Atom {
    if let Some(n) = a.app_idx() {
      debug_assert_ne!(self.apps[n].rc, FREE_RC, "retain of a free node");
      debug_assert_ne!(self.apps[n].rc, END_RC, "retain of the end sentinel");
      self.apps[n].rc += 1; }
    a }

  /// Drop one reference. On reaching zero the node's children are
  /// released in turn (iteratively, so deep spines cannot blow the call
  /// stack) and the dead nodes go back to the free-list. Returns true
  /// iff the node itself was reclaimed.
  pub fn release(&mut self, a:Atom)->bool {
    let n = match a.app_idx() { Some(n)=>n, None=>return false };
    debug_assert_ne!(self.apps[n].rc, FREE_RC, "release of a free node");
    self.apps[n].rc -= 1;
    if self.apps[n].rc > 0 { return false }
    let mut dead = vec![n];
    while let Some(d) = dead.pop() {
      let App{ func, arg, .. } = self.apps[d];
      for child in [arg, func] {
        if let Some(c) = child.app_idx() {
          debug_assert_ne!(self.apps[c].rc, FREE_RC, "double release");
          self.apps[c].rc -= 1;
          if self.apps[c].rc == 0 { dead.push(c) }}}
      self.free(d); }
    self.sanity();
    true }

  /// Rewrite a redex in place, preserving sharing. Consumes the
  /// caller's reference to `orig` and returns (ownership of) `reduced`.
  ///
  /// If `orig` had no other referents it is reclaimed outright.
  /// Otherwise the other referents must observe the rewrite, so `orig`
  /// becomes an indirection `(I reduced)`; the reducer collapses those
  /// on its next pass through. `reduced` must not reach `orig`: rules
  /// build it from retained copies of the children, and the one rule
  /// that shares its own redex (Y) never calls replace.
  pub fn replace(&mut self, orig:usize, reduced:Atom)->Atom {
    if !self.release(Atom::app(orig)) {
      trace!("replace @{} -> indirection to {}", orig, reduced);
      self.retain(reduced);
      let App{ func, arg, .. } = self.apps[orig];
      self.release(func);
      self.release(arg);
      self.apps[orig].func = atom::I;
      self.apps[orig].arg = reduced; }
    reduced }

  // -- byte streams for the P/G primitives --

  #[cfg(feature="extended")]
  pub(crate) fn getc(&mut self)->Option<u8> {
    let mut b = [0u8];
    match self.inp.read(&mut b) { Ok(1) => Some(b[0]), _ => None }}

  #[cfg(feature="extended")]
  pub(crate) fn putc(&mut self, c:u8) {
    let _ = self.out.write_all(&[c]);
    let _ = self.out.flush(); }

  // -- test support --

  /// walk the free-list; used by the partition check below
  #[cfg(test)]
  pub(crate) fn free_list_len(&self)->usize {
    let mut n = self.free_head; let mut len = 0;
    while n != self.capacity() {
      assert_eq!(self.apps[n].rc, FREE_RC, "live node on the free-list");
      len += 1;
      assert!(len <= self.capacity(), "free-list does not terminate");
      n = self.apps[n].func.app_idx().expect("corrupt free-list link"); }
    len }

  /// Assert the §invariants every reachable state must satisfy: each
  /// reachable node's refcount equals its incoming reference count, the
  /// reachable graph is acyclic, and free + live nodes partition the
  /// pool. `roots` are the externally owned atoms (one count each).
  #[cfg(test)]
  pub(crate) fn check_sound(&self, roots:&[Atom]) {
    use std::collections::HashMap;
    let mut counts:HashMap<usize,u32> = HashMap::new();
    let mut stack:Vec<usize> = vec![];
    for &r in roots {
      if let Some(n) = r.app_idx() {
        *counts.entry(n).or_insert(0) += 1;
        stack.push(n); }}
    let mut seen:Vec<usize> = vec![];
    while let Some(n) = stack.pop() {
      if seen.contains(&n) { continue }
      seen.push(n);
      for child in [self.func(n), self.arg(n)] {
        if let Some(c) = child.app_idx() {
          *counts.entry(c).or_insert(0) += 1;
          stack.push(c); }}}
    for &n in &seen {
      assert_eq!(self.rc(n), counts[&n], "refcount mismatch at @{}", n) }
    for &n in &seen { self.check_acyclic(n, &mut vec![]) }
    assert_eq!(self.free_list_len() + self.live(), self.capacity(),
               "free + live nodes must partition the pool") }

  #[cfg(test)]
  fn check_acyclic(&self, n:usize, path:&mut Vec<usize>) {
    assert!(!path.contains(&n), "cycle through @{}", n);
    path.push(n);
    for child in [self.func(n), self.arg(n)] {
      if let Some(c) = child.app_idx() { self.check_acyclic(c, path) }}
    path.pop(); }}


#[cfg(test)] mod test {
  use super::*;

  #[test] fn test_alloc_free() {
    let mut h = AppHeap::new(8);
    assert_eq!(h.live(), 0);
    assert_eq!(h.free_list_len(), 8);
    let a = h.alloc(atom::K, atom::I);
    assert_eq!(h.live(), 1);
    assert_eq!(h.high_water(), 1);
    let n = a.app_idx().unwrap();
    assert_eq!(h.func(n), atom::K);
    assert_eq!(h.arg(n), atom::I);
    assert_eq!(h.rc(n), 1);
    assert!(h.release(a));
    assert_eq!(h.live(), 0);
    assert_eq!(h.free_list_len(), 8)}

  #[test] fn test_release_children() {
    let mut h = AppHeap::new(8);
    let inner = h.alloc(atom::S, atom::K);
    let outer = h.alloc(inner, atom::I);
    assert_eq!(h.live(), 2);
    h.check_sound(&[outer]);
    assert!(h.release(outer), "sole reference should reclaim the node");
    assert_eq!(h.live(), 0, "children must be reclaimed too")}

  #[test] fn test_retain_defers_release() {
    let mut h = AppHeap::new(8);
    let a = h.alloc(atom::S, atom::K);
    h.retain(a);
    assert!(!h.release(a));
    assert_eq!(h.live(), 1);
    assert!(h.release(a));
    assert_eq!(h.live(), 0)}

  #[test] fn test_replace_unshared() {
    let mut h = AppHeap::new(8);
    let r = h.alloc(atom::K, atom::S);
    let n = r.app_idx().unwrap();
    let out = h.replace(n, atom::B);
    assert_eq!(out, atom::B);
    assert_eq!(h.live(), 0, "unshared redex is reclaimed outright")}

  #[test] fn test_replace_shared_becomes_indirection() {
    let mut h = AppHeap::new(8);
    let r = h.alloc(atom::K, atom::S);
    h.retain(r);                      // a second referent
    let n = r.app_idx().unwrap();
    let out = h.replace(n, atom::B);  // consumes one of the two refs
    assert_eq!(out, atom::B);
    assert_eq!(h.live(), 1);
    assert_eq!(h.func(n), atom::I, "shared redex must become an indirection");
    assert_eq!(h.arg(n), atom::B);
    assert_eq!(h.rc(n), 1);
    assert!(h.release(r));
    assert_eq!(h.live(), 0)}

  #[test] fn test_replace_preserves_shared_reduct() {
    let mut h = AppHeap::new(8);
    let v = h.alloc(atom::S, atom::K);
    let r = h.alloc(atom::I, atom::I);
    h.retain(r);
    let rv = h.retain(v);
    let n = r.app_idx().unwrap();
    let out = h.replace(n, rv);     // consumes one ref to r, returns rv's
    assert_eq!(out, v);
    h.check_sound(&[r, v, out]);    // we hold r once and v twice
    h.release(r);
    h.release(v); h.release(out);
    assert_eq!(h.live(), 0)}

  #[test] #[should_panic(expected="out of app space")]
  fn test_pool_exhaustion() {
    let mut h = AppHeap::new(2);
    h.alloc(atom::I, atom::I);
    h.alloc(atom::I, atom::I);
    h.alloc(atom::I, atom::I); }}
