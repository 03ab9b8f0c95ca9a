// reducer test suite (included from reduce.rs)

#[cfg(feature="extended")] use std::cell::RefCell;
#[cfg(feature="extended")] use std::rc::Rc;
use crate::builtins::MacroLib;
use crate::parse::parse;

/// a cloneable Write that collects everything the P primitive emits
#[cfg(feature="extended")]
#[derive(Clone, Default)]
struct Sink(Rc<RefCell<Vec<u8>>>);
#[cfg(feature="extended")]
impl std::io::Write for Sink {
  fn write(&mut self, buf:&[u8])->std::io::Result<usize> {
    self.0.borrow_mut().extend_from_slice(buf); Ok(buf.len()) }
  fn flush(&mut self)->std::io::Result<()> { Ok(()) }}

fn eval_str(h:&mut AppHeap, src:&str)->Atom {
  let lib = MacroLib::standard();
  let t = parse(h, &lib, src).expect("parse error").expect("empty input");
  h.reduce(t) }

/// parse, reduce, render; asserts the whole graph is reclaimed after
fn whnf(src:&str)->String {
  let mut h = AppHeap::new(1024);
  let r = eval_str(&mut h, src);
  let s = h.show(r);
  h.check_sound(&[r]);
  h.release(r);
  assert_eq!(h.live(), 0, "graph fully reclaimed after release of {:?}", src);
  s }

// -- the S/K/I/B/C core --

#[test] fn test_skks() {
  assert_eq!(whnf("@@@SKKS"), "S")}

#[test] fn test_const_discards() {
  assert_eq!(whnf("@@KIa"), "I")}

#[test] fn test_compose() {
  // B (K I) I a → ((K I) (I a)) → I
  assert_eq!(whnf("@@@B@KIIa"), "I")}

#[test] fn test_flip() {
  // C K a b → ((K b) a) → b
  assert_eq!(whnf("@@@CKab"), "b")}

#[test] fn test_under_applied_is_a_result() {
  assert_eq!(whnf("@Ka"), "(K a)");
  assert_eq!(whnf("S"), "S")}

#[test] fn test_datum_head_stops() {
  assert_eq!(whnf("@5a"), "(5 a)")}

#[test] fn test_counts_reductions() {
  let mut h = AppHeap::new(256);
  let r = eval_str(&mut h, "@@@SKKS");
  assert_eq!(r, atom::S);
  assert_eq!(h.reductions(), 2, "one fusion + one constant");
  assert!(h.high_water() > 0)}

#[test] fn test_whnf_idempotent() {
  let mut h = AppHeap::new(256);
  let r = eval_str(&mut h, "@Ka");
  let before = h.show(r);
  let r2 = h.reduce(r);
  assert_eq!(h.show(r2), before);
  h.release(r2);
  assert_eq!(h.live(), 0)}

#[test] fn test_normal_order_ignores_diverging_arg() {
  // omega = (S I I) (S I I) diverges; K discards it unevaluated
  assert_eq!(whnf("@@Ka@@@SII@@SII"), "a")}

// -- indirections --

#[test] fn test_shared_redex_leaves_indirection() {
  let mut h = AppHeap::new(64);
  let ka = h.alloc(atom::K, Atom::var(0));
  let r = h.alloc(ka, Atom::var(1));     // ((K a) b)
  h.retain(r);                           // second handle forces sharing
  let out = h.reduce(r);
  assert_eq!(out, Atom::var(0));
  let n = r.app_idx().unwrap();
  assert_eq!(h.func(n), atom::I, "shared redex rewrites to an indirection");
  h.check_sound(&[r]);
  let out2 = h.reduce(r);                // collapses the indirection
  assert_eq!(out2, Atom::var(0));
  assert_eq!(h.live(), 0)}

#[test] fn test_splice_chain() {
  let mut h = AppHeap::new(64);
  let c2 = h.alloc(atom::I, Atom::var(0));
  let c1 = h.alloc(atom::I, c2);
  let c0 = h.alloc(atom::I, c1);
  assert_eq!(h.reduce(c0), Atom::var(0));
  assert_eq!(h.live(), 0)}

#[test] fn test_splice_repoints_surviving_links() {
  let mut h = AppHeap::new(64);
  let c1 = h.alloc(atom::I, Atom::var(0));
  let c0 = h.alloc(atom::I, c1);
  h.retain(c0);                          // keep the chain head alive
  assert_eq!(h.reduce(c0), Atom::var(0));
  let n = c0.app_idx().unwrap();
  assert_eq!(h.arg(n), Atom::var(0), "surviving link points straight at the target");
  h.check_sound(&[c0]);
  assert_eq!(h.reduce(c0), Atom::var(0));
  assert_eq!(h.live(), 0)}

// -- the fixpoint combinator --

#[cfg(feature="extended")]
#[test] fn test_fix_terminates_when_discarded() {
  // Y (K a) → (K a) (Y (K a)) → a
  let mut h = AppHeap::new(64);
  let ka = h.alloc(atom::K, Atom::var(0));
  let t = h.alloc(atom::Y, ka);
  let r = h.reduce(t);
  assert_eq!(r, Atom::var(0));
  h.check_sound(&[r]);
  h.release(r);
  assert_eq!(h.live(), 0, "the fixpoint path must not leak")}

#[cfg(feature="extended")]
#[test] fn test_fix_under_a_spine_parent() {
  // ((Y (K a)) b) → ((K a (Y (K a))) b) → (a b)
  let mut h = AppHeap::new(64);
  let ka = h.alloc(atom::K, Atom::var(0));
  let yka = h.alloc(atom::Y, ka);
  let t = h.alloc(yka, Atom::var(1));
  let r = h.reduce(t);
  assert_eq!(h.show(r), "(a b)");
  h.check_sound(&[r]);
  h.release(r);
  assert_eq!(h.live(), 0, "the fixpoint path must not leak under a parent")}

#[cfg(feature="extended")]
#[test] fn test_fix_factorial() {
  //use simplelog::*;  TermLogger::init(LevelFilter::Trace, Config::default()).unwrap();
  // fact = Y g with
  //   g = B (S (C eq0 1)) (C (B C (B (S *) (C B sub1))) I)
  //   eq0 n = (= n 0 I),  sub1 n = (- n 1 I)
  // so that g f n = ((= n 0 I) 1) ((* n (f (- n 1 I))) I)
  let mut h = AppHeap::new(4096);
  let eq0 = { let a = h.alloc(atom::C, atom::EQL);
              let a = h.alloc(a, Atom::num(0));
              let a = h.alloc(atom::C, a);
              h.alloc(a, atom::I) };
  let sub1 = { let a = h.alloc(atom::C, atom::SUB);
               let a = h.alloc(a, Atom::num(1));
               let a = h.alloc(atom::C, a);
               h.alloc(a, atom::I) };
  let test0 = { let a = h.alloc(atom::C, eq0);
                h.alloc(a, Atom::num(1)) };
  let mulrec = { let sm = h.alloc(atom::S, atom::MUL);
                 let bsm = h.alloc(atom::B, sm);
                 let cb = h.alloc(atom::C, atom::B);
                 let cbs = h.alloc(cb, sub1);
                 h.alloc(bsm, cbs) };
  let zf = { let bc = h.alloc(atom::B, atom::C);
             let bcm = h.alloc(bc, mulrec);
             let a = h.alloc(atom::C, bcm);
             h.alloc(a, atom::I) };
  let g = { let st = h.alloc(atom::S, test0);
            let bst = h.alloc(atom::B, st);
            h.alloc(bst, zf) };
  let fact = h.alloc(atom::Y, g);
  let t = h.alloc(fact, Atom::num(5));
  let r = h.reduce(t);
  assert_eq!(r, Atom::num(120));
  assert_eq!(h.live(), 0, "full factorial run must reclaim everything")}

// -- the extended combinators --

#[cfg(feature="extended")]
#[test] fn test_false_keeps_second() {
  assert_eq!(whnf("@@Fab"), "b")}

#[cfg(feature="extended")]
#[test] fn test_inter_swaps() {
  assert_eq!(whnf("@@Jab"), "(b a)")}

// -- arithmetic and comparisons --

#[cfg(feature="extended")]
#[test] fn test_add_nested_continuations() {
  // + 3 (+ 4 5 I) I = 12
  assert_eq!(whnf("@@@+3@@@+4 5II"), "12")}

#[cfg(feature="extended")]
#[test] fn test_sub_wraps_mod_2_15() {
  assert_eq!(whnf("@@@-3 5I"), "32766")}

#[cfg(feature="extended")]
#[test] fn test_mul_wraps_mod_2_15() {
  assert_eq!(whnf("@@@*30000 30000I"), "26880")}

#[cfg(feature="extended")]
#[test] fn test_div_truncates() {
  assert_eq!(whnf("@@@/7 2I"), "3")}

#[cfg(feature="extended")]
#[test] fn test_div_by_zero_is_zero() {
  assert_eq!(whnf("@@@/5 0I"), "0")}

#[cfg(feature="extended")]
#[test] fn test_eql_delivers_booleans() {
  assert_eq!(whnf("@@@=4 4I"), "K");
  assert_eq!(whnf("@@@=4 5I"), "F")}

#[cfg(feature="extended")]
#[test] fn test_lss_is_unsigned() {
  assert_eq!(whnf("@@@<1 2I"), "K");
  assert_eq!(whnf("@@@<2 2I"), "F")}

#[cfg(feature="extended")]
#[test] fn test_primitive_continuation() {
  // a continuation other than I receives the result as an argument
  assert_eq!(whnf("@@@+1 2K"), "(K 3)")}

#[cfg(feature="extended")]
#[test] fn test_non_datum_operand_counts_as_zero() {
  // a Church numeral is an application graph, not a datum
  assert_eq!(whnf("@@@+#3 1I"), "1")}

// -- the I/O primitives --

#[cfg(feature="extended")]
#[test] fn test_put_chain() {
  let mut h = AppHeap::new(256);
  let out = Sink::default();
  h.set_io(Box::new(std::io::empty()), Box::new(out.clone()));
  let r = eval_str(&mut h, "@@P'H@@P'i0");
  assert_eq!(r, Atom::num(0));
  assert_eq!(*out.0.borrow(), b"Hi");
  assert_eq!(h.live(), 0)}

#[cfg(feature="extended")]
#[test] fn test_put_forces_its_operand() {
  let mut h = AppHeap::new(256);
  let out = Sink::default();
  h.set_io(Box::new(std::io::empty()), Box::new(out.clone()));
  let r = eval_str(&mut h, "@@P@@@+60 12I0");
  assert_eq!(r, Atom::num(0));
  assert_eq!(*out.0.borrow(), b"H");
  assert_eq!(h.live(), 0)}

#[cfg(feature="extended")]
#[test] fn test_get_delivers_byte() {
  let mut h = AppHeap::new(64);
  h.set_io(Box::new(std::io::Cursor::new(b"A".to_vec())),
           Box::new(std::io::sink()));
  let r = eval_str(&mut h, "@GI");
  assert_eq!(r, Atom::num(65));
  assert_eq!(h.live(), 0)}

#[cfg(feature="extended")]
#[test] fn test_get_end_of_input() {
  let mut h = AppHeap::new(64);
  h.set_io(Box::new(std::io::empty()), Box::new(std::io::sink()));
  let r = eval_str(&mut h, "@GI");
  assert_eq!(r, Atom::num(0x7fff));
  assert_eq!(h.live(), 0)}

#[cfg(feature="extended")]
#[test] fn test_echo() {
  // G (C P 0): read a byte, write it back, finish as 0
  let mut h = AppHeap::new(256);
  let out = Sink::default();
  h.set_io(Box::new(std::io::Cursor::new(b"x".to_vec())),
           Box::new(out.clone()));
  let r = eval_str(&mut h, "@G@@CP0");
  assert_eq!(r, Atom::num(0));
  assert_eq!(*out.0.borrow(), b"x");
  assert_eq!(h.live(), 0)}

// -- resource limits --

#[test] #[should_panic(expected="spine stack overflow")]
fn test_spine_overflow() {
  let mut h = AppHeap::with_caps(512, 64);
  let mut t = Atom::var(0);
  for _ in 0..100 { t = h.alloc(t, Atom::var(1)) }
  h.reduce(t); }
