//! Normal-order reduction to weak head normal form.
//!
//! The reducer walks down the left spine of the graph, pushing the
//! application nodes it passes onto an explicit stack, until it reaches
//! a literal head. A combinator head with enough arguments on the spine
//! fires its rewrite rule; the rule consumes the caller's reference to
//! the redex root and returns an owned reference to the reduct. Data
//! and under-applied heads stop the walk.
//!
//! Indirection nodes (`func == I`, left behind by `replace` on shared
//! redexes) are spliced out as they are encountered, so repeated
//! rewrites of a shared node cannot pile up unbounded I-chains.
use crate::atom::{self, Atom, Comb};
use crate::heap::AppHeap;

impl AppHeap {

  /// Reduce `curr` to weak head normal form. Consumes the caller's
  /// reference and returns an owned reference to the result (the same
  /// atom when nothing fires). Reentrant over one shared spine buffer:
  /// the strict primitives call back in for their operands, and every
  /// exit path restores the spine to its entry depth.
  pub fn reduce(&mut self, mut curr:Atom)->Atom {
    let base = self.spine.len();
    loop {
      if let Some(n) = curr.app_idx() {
        let next = self.func(n);
        if next == atom::I {
          curr = self.splice(n);
          if self.spine.len() > base {
            let p = *self.spine.last().unwrap();
            self.set_func(p, curr); }
          continue; }
        if self.spine.len() >= self.spine_cap {
          error!("spine stack overflow ({} entries)", self.spine_cap);
          panic!("spine stack overflow"); }
        self.spine.push(n);
        curr = next;
        continue; }
      let r = curr.arity() as usize;
      if r == 0 || r > self.spine.len() - base { break }
      self.reductions += 1;
      let comb = Comb::from_subtype(curr.subtype()).expect("literal with arity but no rule");
      let redex = self.spine[self.spine.len() - r];
      curr = self.fire(comb, redex);
      self.spine.truncate(self.spine.len() - r);
      if self.spine.len() > base {
        let p = *self.spine.last().unwrap();
        self.set_func(p, curr); }}
    // either a raw datum / placeholder head, or an under-applied
    // combinator: both are valid WHNF results
    if self.spine.len() == base { curr }
    else {
      let root = self.spine[base];
      self.spine.truncate(base);
      Atom::app(root) }}

  /// Splice out a chain of indirections starting at `head`. Walks down
  /// `arg` links to the first atom that is not an indirection, then
  /// walks the chain again repointing every surviving link at that
  /// target, transferring one reference per hop. Returns (ownership
  /// of) the target.
  fn splice(&mut self, head:usize)->Atom {
    let mut target = self.arg(head);
    while let Some(m) = target.app_idx() {
      if self.func(m) == atom::I { target = self.arg(m) } else { break }}
    let mut curr = head;
    loop {
      self.reductions += 1;
      self.retain(target);
      if self.release(Atom::app(curr)) { break }
      let t = self.arg(curr);
      self.set_arg(curr, target);
      match t.app_idx() {
        Some(m) if self.func(m) == atom::I => curr = m,
        _ => { debug_assert_eq!(t, target); break }}}
    target }

  fn fire(&mut self, comb:Comb, redex:usize)->Atom {
    trace!("fire {:?} at @{}", comb, redex);
    match comb {
      Comb::I => self.red_ident(redex),
      Comb::K => self.red_const(redex),
      Comb::S => self.red_fusion(redex),
      Comb::B => self.red_compose(redex),
      Comb::C => self.red_flip(redex),
      #[cfg(feature="extended")] Comb::Y => self.red_fix(redex),
      #[cfg(feature="extended")] Comb::F => self.red_false(redex),
      #[cfg(feature="extended")] Comb::J => self.red_inter(redex),
      #[cfg(feature="extended")] Comb::P => self.red_put(redex),
      #[cfg(feature="extended")] Comb::G => self.red_get(redex),
      #[cfg(feature="extended")]
      Comb::Add | Comb::Sub | Comb::Mul | Comb::Div => self.red_arith(comb, redex),
      #[cfg(feature="extended")]
      Comb::Eql | Comb::Lss => self.red_cmp(comb, redex) }}

  /// argument k positions in from the top of the spine: 0 is the
  /// nearest enclosing application, i.e. the combinator's first
  /// argument; the redex root carries the last
  fn spine_arg(&self, k:usize)->Atom {
    let n = self.spine[self.spine.len()-1-k];
    self.arg(n) }

  // -- the rewrite rules --
  // every atom stored into a new node is retained first; the redex and
  // its old children are torn down by replace

  /// I x → x
  fn red_ident(&mut self, curr:usize)->Atom {
    let x = self.arg(curr);
    let x = self.retain(x);
    self.replace(curr, x) }

  /// K x y → x
  fn red_const(&mut self, curr:usize)->Atom {
    let x = self.spine_arg(0);
    let x = self.retain(x);
    self.replace(curr, x) }

  /// S f g x → ((f x) (g x))
  fn red_fusion(&mut self, curr:usize)->Atom {
    let f = self.spine_arg(0); let f = self.retain(f);
    let g = self.spine_arg(1); let g = self.retain(g);
    let x = self.arg(curr);
    self.retain(x); self.retain(x);
    let fx = self.alloc(f, x);
    let gx = self.alloc(g, x);
    let fxgx = self.alloc(fx, gx);
    self.replace(curr, fxgx) }

  /// B f g x → (f (g x))
  fn red_compose(&mut self, curr:usize)->Atom {
    let f = self.spine_arg(0); let f = self.retain(f);
    let g = self.spine_arg(1); let g = self.retain(g);
    let x = self.arg(curr);    let x = self.retain(x);
    let gx = self.alloc(g, x);
    let fgx = self.alloc(f, gx);
    self.replace(curr, fgx) }

  /// C f y x → ((f x) y)
  fn red_flip(&mut self, curr:usize)->Atom {
    let f = self.spine_arg(0); let f = self.retain(f);
    let y = self.spine_arg(1); let y = self.retain(y);
    let x = self.arg(curr);    let x = self.retain(x);
    let fx = self.alloc(f, x);
    let fxy = self.alloc(fx, y);
    self.replace(curr, fxy) }

  /// Y f → (f (Y f)), sharing the redex itself as the recurrence.
  /// No replace here: the fresh node's arg slot takes over the caller's
  /// reference to the redex (retaining would strand one count on it
  /// whenever it has a spine parent, and a replace would tie the node
  /// to itself).
  #[cfg(feature="extended")]
  fn red_fix(&mut self, curr:usize)->Atom {
    let f = self.arg(curr);
    let f = self.retain(f);
    self.alloc(f, Atom::app(curr)) }

  /// F x y → y  (constant-false, the `K I` combinator)
  #[cfg(feature="extended")]
  fn red_false(&mut self, curr:usize)->Atom {
    let y = self.arg(curr);
    let y = self.retain(y);
    self.replace(curr, y) }

  /// J x y → (y x)  (the `C I` combinator)
  #[cfg(feature="extended")]
  fn red_inter(&mut self, curr:usize)->Atom {
    let x = self.spine_arg(0); let x = self.retain(x);
    let y = self.arg(curr);    let y = self.retain(y);
    let yx = self.alloc(y, x);
    self.replace(curr, yx) }

  /// P x y → y, writing x's low byte to the output stream first
  #[cfg(feature="extended")]
  fn red_put(&mut self, curr:usize)->Atom {
    let n = self.spine[self.spine.len()-1];
    let x = self.arg(n);
    let x = self.reduce(x);
    self.set_arg(n, x);
    if x.is_lit() { self.putc(x.lit_byte()) }
    else { warn!("P: output operand did not reduce to a literal: {}", x) }
    let y = self.arg(curr);
    let y = self.retain(y);
    self.replace(curr, y) }

  /// G k → (k c) for one byte c from the input stream; end of input
  /// delivers 0x7fff (15-bit -1)
  #[cfg(feature="extended")]
  fn red_get(&mut self, curr:usize)->Atom {
    let c = match self.getc() { Some(b) => b as u16, None => 0x7fff };
    let k = self.arg(curr);
    let k = self.retain(k);
    let kc = self.alloc(k, Atom::num(c));
    self.replace(curr, kc) }

  /// Force the k'th spine argument to WHNF in place and read it as a
  /// datum. A head that is not a datum counts as 0 (loudly).
  #[cfg(feature="extended")]
  fn operand(&mut self, k:usize)->u16 {
    let n = self.spine[self.spine.len()-1-k];
    let x = self.arg(n);
    let x = self.reduce(x);
    self.set_arg(n, x);
    match x.dat_val() {
      Some(v) => v,
      None => { warn!("numeric primitive: operand {} is not a datum; using 0", x); 0 }}}

  /// Deliver a primitive's result through the third argument: straight
  /// into the redex when the continuation is I, else as (k result).
  #[cfg(feature="extended")]
  fn deliver(&mut self, curr:usize, result:Atom)->Atom {
    let k = self.arg(curr);
    if k == atom::I { self.replace(curr, result) }
    else {
      let k = self.retain(k);
      let kr = self.alloc(k, result);
      self.replace(curr, kr) }}

  /// + - * / : both operands forced to data, result modulo 2^15
  #[cfg(feature="extended")]
  fn red_arith(&mut self, comb:Comb, curr:usize)->Atom {
    let x = self.operand(0);
    let y = self.operand(1);
    let v = match comb {
      Comb::Add => x.wrapping_add(y),
      Comb::Sub => x.wrapping_sub(y),
      Comb::Mul => x.wrapping_mul(y),
      Comb::Div =>
        if y == 0 { warn!("divide by zero: {} / 0; using 0", x); 0 }
        else { x / y },
      _ => unreachable!("not an arithmetic rule: {:?}", comb) };
    self.deliver(curr, Atom::num(v)) }

  /// = < : deliver K for true, F for false
  #[cfg(feature="extended")]
  fn red_cmp(&mut self, comb:Comb, curr:usize)->Atom {
    let x = self.operand(0);
    let y = self.operand(1);
    let t = match comb {
      Comb::Eql => x == y,
      Comb::Lss => x < y,
      _ => unreachable!("not a comparison rule: {:?}", comb) };
    self.deliver(curr, if t { atom::K } else { atom::F }) }}

#[cfg(test)] include!("test-reduce.rs");
