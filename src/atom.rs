/* Bitmask diagram:

   ATOM
   ----+----------------------
   31  : APP (node reference; index in bits 0..31)
   30  : DAT (raw datum; 15-bit value in bits 0..15)
   8-9 : combinator arity, when APP and DAT are both clear
   0-7 : combinator subtype / placeholder index

*/
use std::fmt;

/// An Atom is either a literal or a reference to an application node in
/// an [crate::heap::AppHeap]. Semantically a tagged union, but packed into
/// a u32 so a node is three machine words. See the helper functions below
/// for the packed-bit manipulation.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Atom { a: u32 }

/// Single-bit mask indicating that the atom references an application node.
const APP:u32 = 1<<31;

/// Single-bit mask indicating a raw datum (an integer or character code).
/// Data live in their own encoding space so that a value computed by the
/// arithmetic primitives can never collide with a combinator code.
const DAT:u32 = 1<<30;

/// All arithmetic is modulo 2^15; data are 15-bit unsigned values.
pub const VAL_MASK:u32 = (1<<15)-1;

const IDX_MASK:u32 = !APP;

/// The closed set of combinator rewrite rules. The discriminant is the
/// subtype index stored in the low byte of a combinator literal; the
/// arity is recomputed from the variant, never stored. The extended
/// variants (Y through Lss) only exist when the `extended` feature is
/// compiled in; without it the engine is plain S/K/I/B/C.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Comb {
  I = 0, K = 1, S = 2, B = 3, C = 4,
  #[cfg(feature="extended")] Y = 5,
  #[cfg(feature="extended")] F = 6,
  #[cfg(feature="extended")] J = 7,
  #[cfg(feature="extended")] P = 8,
  #[cfg(feature="extended")] G = 9,
  #[cfg(feature="extended")] Add = 10,
  #[cfg(feature="extended")] Sub = 11,
  #[cfg(feature="extended")] Mul = 12,
  #[cfg(feature="extended")] Div = 13,
  #[cfg(feature="extended")] Eql = 14,
  #[cfg(feature="extended")] Lss = 15 }

impl Comb {
  /// number of arguments the rule consumes from the spine
  pub const fn arity(self)->u8 {
    match self {
      Comb::I => 1,
      Comb::K => 2,
      Comb::S | Comb::B | Comb::C => 3,
      #[cfg(feature="extended")]
      Comb::Y | Comb::G => 1,
      #[cfg(feature="extended")]
      Comb::F | Comb::J | Comb::P => 2,
      #[cfg(feature="extended")]
      Comb::Add | Comb::Sub | Comb::Mul | Comb::Div | Comb::Eql | Comb::Lss => 3 }}

  pub const fn subtype(self)->u8 { self as u8 }

  pub fn from_subtype(x:u8)->Option<Comb> {
    match x {
      0 => Some(Comb::I),    1 => Some(Comb::K),   2 => Some(Comb::S),
      3 => Some(Comb::B),    4 => Some(Comb::C),
      #[cfg(feature="extended")]  5 => Some(Comb::Y),
      #[cfg(feature="extended")]  6 => Some(Comb::F),
      #[cfg(feature="extended")]  7 => Some(Comb::J),
      #[cfg(feature="extended")]  8 => Some(Comb::P),
      #[cfg(feature="extended")]  9 => Some(Comb::G),
      #[cfg(feature="extended")] 10 => Some(Comb::Add),
      #[cfg(feature="extended")] 11 => Some(Comb::Sub),
      #[cfg(feature="extended")] 12 => Some(Comb::Mul),
      #[cfg(feature="extended")] 13 => Some(Comb::Div),
      #[cfg(feature="extended")] 14 => Some(Comb::Eql),
      #[cfg(feature="extended")] 15 => Some(Comb::Lss),
      _ => None }}

  /// the single-character surface token for this combinator
  pub fn token(self)->char {
    match self {
      Comb::I=>'I', Comb::K=>'K', Comb::S=>'S', Comb::B=>'B', Comb::C=>'C',
      #[cfg(feature="extended")] Comb::Y=>'Y',
      #[cfg(feature="extended")] Comb::F=>'F',
      #[cfg(feature="extended")] Comb::J=>'J',
      #[cfg(feature="extended")] Comb::P=>'P',
      #[cfg(feature="extended")] Comb::G=>'G',
      #[cfg(feature="extended")] Comb::Add=>'+',
      #[cfg(feature="extended")] Comb::Sub=>'-',
      #[cfg(feature="extended")] Comb::Mul=>'*',
      #[cfg(feature="extended")] Comb::Div=>'/',
      #[cfg(feature="extended")] Comb::Eql=>'=',
      #[cfg(feature="extended")] Comb::Lss=>'<' }}

  /// map a surface token back to a combinator. The extended repertoire
  /// is only recognised with the `extended` feature.
  pub fn from_token(c:char)->Option<Comb> {
    match c {
      'I'=>Some(Comb::I), 'K'=>Some(Comb::K), 'S'=>Some(Comb::S),
      'B'=>Some(Comb::B), 'C'=>Some(Comb::C),
      #[cfg(feature="extended")] 'Y'=>Some(Comb::Y),
      #[cfg(feature="extended")] 'F'=>Some(Comb::F),
      #[cfg(feature="extended")] 'J'=>Some(Comb::J),
      #[cfg(feature="extended")] 'P'=>Some(Comb::P),
      #[cfg(feature="extended")] 'G'=>Some(Comb::G),
      #[cfg(feature="extended")] '+'=>Some(Comb::Add),
      #[cfg(feature="extended")] '-'=>Some(Comb::Sub),
      #[cfg(feature="extended")] '*'=>Some(Comb::Mul),
      #[cfg(feature="extended")] '/'=>Some(Comb::Div),
      #[cfg(feature="extended")] '='=>Some(Comb::Eql),
      #[cfg(feature="extended")] '<'=>Some(Comb::Lss),
      _=>None }}}

/// identity: `I x → x`. Also the head of every indirection node.
pub const I:Atom = Atom::comb(Comb::I);
/// constant: `K x y → x`
pub const K:Atom = Atom::comb(Comb::K);
/// fusion: `S f g x → ((f x) (g x))`
pub const S:Atom = Atom::comb(Comb::S);
/// composition: `B f g x → (f (g x))`
pub const B:Atom = Atom::comb(Comb::B);
/// interchange: `C f y x → ((f x) y)`
pub const C:Atom = Atom::comb(Comb::C);
/// fixpoint: `Y f → (f (Y f))`, with the recurrence shared, not copied
#[cfg(feature="extended")]
pub const Y:Atom = Atom::comb(Comb::Y);
/// constant-false (`K I`): `F x y → y`
#[cfg(feature="extended")]
pub const F:Atom = Atom::comb(Comb::F);
/// interchange-identity (`C I`): `J x y → (y x)`
#[cfg(feature="extended")]
pub const J:Atom = Atom::comb(Comb::J);
/// output: `P x y` writes x's low byte, continues as y
#[cfg(feature="extended")]
pub const P:Atom = Atom::comb(Comb::P);
/// input: `G k` reads one byte c, continues as `(k c)`
#[cfg(feature="extended")]
pub const G:Atom = Atom::comb(Comb::G);
#[cfg(feature="extended")]
pub const ADD:Atom = Atom::comb(Comb::Add);
#[cfg(feature="extended")]
pub const SUB:Atom = Atom::comb(Comb::Sub);
#[cfg(feature="extended")]
pub const MUL:Atom = Atom::comb(Comb::Mul);
#[cfg(feature="extended")]
pub const DIV:Atom = Atom::comb(Comb::Div);
#[cfg(feature="extended")]
pub const EQL:Atom = Atom::comb(Comb::Eql);
#[cfg(feature="extended")]
pub const LSS:Atom = Atom::comb(Comb::Lss);

impl Atom {
  /// the literal code for a combinator
  pub const fn comb(c:Comb)->Atom { Atom{ a: ((c.arity() as u32) << 8) | c.subtype() as u32 }}

  /// a raw datum (masked to 15 bits)
  pub const fn num(v:u16)->Atom { Atom{ a: DAT | (v as u32 & VAL_MASK) }}

  /// placeholder variable `a..z` (index 0..25): an arity-0 code that
  /// reduction treats as inert data
  pub const fn var(i:u8)->Atom { Atom{ a: i as u32 }}

  /// a reference to the application node at index i
  pub fn app(i:usize)->Atom {
    debug_assert!((i as u32) & APP == 0);
    Atom{ a: APP | i as u32 }}

  #[inline(always)] pub fn is_app(self)->bool { (self.a & APP) != 0 }
  #[inline(always)] pub fn is_lit(self)->bool { (self.a & APP) == 0 }
  #[inline(always)] pub fn is_dat(self)->bool { (self.a & (APP|DAT)) == DAT }
  #[inline(always)] pub fn is_comb(self)->bool { (self.a & (APP|DAT)) == 0 && self.arity() > 0 }
  #[inline(always)] pub fn is_var(self)->bool { (self.a & (APP|DAT)) == 0 && self.arity() == 0 && self.subtype() < 26 }

  /// the node index, if this atom is a node reference
  #[inline(always)] pub fn app_idx(self)->Option<usize> {
    if self.is_app() { Some((self.a & IDX_MASK) as usize) } else { None }}

  /// the value of a raw datum
  #[inline(always)] pub fn dat_val(self)->Option<u16> {
    if self.is_dat() { Some((self.a & VAL_MASK) as u16) } else { None }}

  /// required argument count: 0 for data and placeholders
  #[inline(always)] pub fn arity(self)->u8 {
    if self.a & (APP|DAT) == 0 { ((self.a >> 8) & 0xff) as u8 } else { 0 }}

  /// rule-table index (low byte) of a combinator literal
  #[inline(always)] pub fn subtype(self)->u8 { (self.a & 0xff) as u8 }

  /// low byte of a literal, as written by the output primitive
  #[inline(always)] pub fn lit_byte(self)->u8 {
    debug_assert!(self.is_lit());
    (self.a & 0xff) as u8 }

  /// the combinator a literal encodes, if any
  pub fn to_comb(self)->Option<Comb> {
    if self.is_comb() { Comb::from_subtype(self.subtype()) } else { None }}}

/// Literals print as their surface token (combinators), their placeholder
/// letter, or decimal; node references print as `@idx`.
impl fmt::Display for Atom {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if let Some(i) = self.app_idx() { write!(f, "@{}", i) }
    else if let Some(v) = self.dat_val() { write!(f, "{}", v) }
    else if self.is_var() { write!(f, "{}", (b'a' + self.subtype()) as char) }
    else if let Some(c) = self.to_comb() { write!(f, "{}", c.token()) }
    else { write!(f, "?{:08x}", self.a) }}}

/// Same as fmt::Display. Mostly so it's easier to see the problem when an
/// assertion fails.
impl fmt::Debug for Atom {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self) }}


#[test] fn test_atoms() {
  assert_eq!(I, Atom{ a: 0x0100 });
  assert_eq!(K, Atom{ a: 0x0201 });
  assert_eq!(S, Atom{ a: 0x0302 });
  assert_eq!(B, Atom{ a: 0x0303 });
  assert_eq!(C, Atom{ a: 0x0304 });
  assert!(S.is_lit() && !S.is_app() && !S.is_dat());
  assert_eq!(S.arity(), 3);
  assert_eq!(S.subtype(), 2);
  assert_eq!(Atom::app(7).app_idx(), Some(7));
  assert!(Atom::app(7).is_app());
  assert_eq!(Atom::app(7).arity(), 0)}

#[test] fn test_data() {
  let n = Atom::num(12345);
  assert!(n.is_dat() && n.is_lit() && !n.is_comb());
  assert_eq!(n.dat_val(), Some(12345));
  assert_eq!(n.arity(), 0);
  // data wrap at 2^15 and never collide with combinator codes
  assert_eq!(Atom::num(0x8000 + 770).dat_val(), Some(770));
  assert_ne!(Atom::num(S.subtype() as u16 | 0x0300), S);
  assert_eq!(Atom::num(0).dat_val(), Some(0))}

#[test] fn test_vars() {
  let a = Atom::var(0); let z = Atom::var(25);
  assert!(a.is_var() && z.is_var());
  assert_eq!(a.arity(), 0);
  assert!(!Atom::num(0).is_var(), "datum 0 is not the placeholder 'a'");
  assert_eq!(format!("{} {}", a, z), "a z")}

#[cfg(feature="extended")]
#[test] fn test_tokens() {
  for st in 0u8..16 {
    let c = Comb::from_subtype(st).unwrap();
    assert_eq!(c.subtype(), st);
    assert_eq!(Comb::from_token(c.token()), Some(c), "token roundtrip for {:?}", c);
    assert_eq!(Atom::comb(c).arity(), c.arity()) }
  assert_eq!(format!("{}", ADD), "+");
  assert_eq!(Comb::from_subtype(16), None);
  assert_eq!(Comb::from_token('x'), None)}

#[test] fn test_display() {
  assert_eq!(format!("{}", S), "S");
  assert_eq!(format!("{}", Atom::num(42)), "42");
  assert_eq!(format!("{}", Atom::app(3)), "@3")}
