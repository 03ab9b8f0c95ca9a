//! Pretty-printing of application graphs.
use crate::atom::Atom;
use crate::heap::AppHeap;

impl AppHeap {

  /// Render an atom: literals by their surface token, applications as
  /// `(func arg)`. Shared nodes print once per occurrence.
  pub fn show(&self, a:Atom)->String {
    let mut s = String::new();
    self.fmt_atom(&mut s, a);
    s }

  fn fmt_atom(&self, s:&mut String, a:Atom) {
    match a.app_idx() {
      None => s.push_str(&a.to_string()),
      Some(n) => {
        debug_assert!(self.rc(n) >= 1, "printing a dead node");
        s.push('(');
        let f = self.func(n);
        self.fmt_atom(s, f);
        s.push(' ');
        let x = self.arg(n);
        self.fmt_atom(s, x);
        s.push(')'); }}}

  /// Like [AppHeap::show], but whenever a node's func is an arity-0
  /// literal, its arg is first reduced in place. This forces just
  /// enough evaluation to display structures whose spines are built
  /// from literal constructors.
  pub fn show_reduced(&mut self, a:Atom)->String {
    let mut s = String::new();
    self.fmt_reduced(&mut s, a);
    s }

  fn fmt_reduced(&mut self, s:&mut String, a:Atom) {
    match a.app_idx() {
      None => s.push_str(&a.to_string()),
      Some(n) => {
        s.push('(');
        let f = self.func(n);
        self.fmt_reduced(s, f);
        s.push(' ');
        if f.is_lit() && f.arity() == 0 {
          let x = self.arg(n);
          let x = self.reduce(x);
          self.set_arg(n, x); }
        let x = self.arg(n);
        self.fmt_reduced(s, x);
        s.push(')'); }}}}


#[cfg(test)] mod test {
  use crate::atom::{self, Atom};
  use crate::heap::AppHeap;

  #[test] fn test_show() {
    let mut h = AppHeap::new(16);
    let sk = h.alloc(atom::S, atom::K);
    let skk = h.alloc(sk, atom::K);
    assert_eq!(h.show(skk), "((S K) K)");
    assert_eq!(h.show(atom::I), "I");
    assert_eq!(h.show(Atom::num(42)), "42");
    h.release(skk);
    assert_eq!(h.live(), 0)}

  #[test] fn test_show_reduced_forces_under_data() {
    let mut h = AppHeap::new(16);
    let ka = h.alloc(atom::K, Atom::var(0));
    let kab = h.alloc(ka, Atom::var(1));
    let t = h.alloc(Atom::num(1), kab);
    assert_eq!(h.show(t), "(1 ((K a) b))");
    assert_eq!(h.show_reduced(t), "(1 a)");
    assert_eq!(h.show(t), "(1 a)", "the forced arg is written back");
    h.release(t);
    assert_eq!(h.live(), 0)}

  #[test] fn test_show_reduced_leaves_combinator_heads() {
    let mut h = AppHeap::new(16);
    let ka = h.alloc(atom::K, Atom::var(0));
    let kab = h.alloc(ka, Atom::var(1));
    let t = h.alloc(atom::K, kab);          // under-applied K head
    assert_eq!(h.show_reduced(t), "(K ((K a) b))");
    h.release(t);
    assert_eq!(h.live(), 0)}}
