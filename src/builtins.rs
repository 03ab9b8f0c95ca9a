//! The named macro library: a dictionary from `$name` to surface
//! syntax, expanded recursively by the parser. The definitions are
//! data, not logic; they are the classic pure S/K/I/B/C renderings of
//! booleans, pairs, Church arithmetic and lists.
use fxhash::FxHashMap;

/// the predefined definitions (loaded by the `builtins` feature)
pub const BUILTINS: &[(&str, &str)] = &[
  ("y",       "@@B@@SII@@CB@@SII"),
  ("t",       "K"),
  ("f",       "@KI"),
  ("and",     "@@CC@KI"),
  ("or",      "@@CIK"),
  ("not",     "@@C@@CI@KIK"),
  ("pair",    "@@BC@CI"),
  ("fst",     "@@CIK"),
  ("snd",     "@@CI@KI"),
  ("succ",    "@SB"),
  ("pred",    "@@C@@BC@@B@BC@@C@@BC@@B@BB@@CB@@B@B@CI@CIKI"),
  ("iszero",  "@@C@@CI@K@KIK"),
  ("plus",    "@@BS@BB"),
  ("times",   "B"),
  ("eq",      "@@C@@BC@@C@@BC@@C@@BB@@CI@@C@@CI@@@SII@@BK@@B@CI@@SIII@@C@@CI@@BK@CIKK@K@KI"),
  ("cons",    "$pair"),
  ("nil",     "@KK"),
  ("hd",      "$fst"),
  ("tl",      "$snd"),
  ("case",    "@@C@@BC@@B@BC@@BC@@CB@@B@B@BK@B@BKI"),
  ("isempty", "@@CI@K@K@KI"),
  ("length",  "@@$foldr@K$succ#0"),
  ("foldl",   "@@B$y@@B@B@S@@BC@C$case@C@@BBB"),
  ("foldr",   "@@B@B$y@@B@C@@BB@@BC@C$case@@BC@BB"),
  ("map",     "@@B$y@@B@B@C@@C$case$nil@@BC@@B@BB@B$cons"),
  ("filter",  "@@B$y@@B@B@C@@C$case$nil@@BC@@B@BB@@C@@BC@@CS$cons I"),
  ("append",  "@$y@@B@C@@BS$case@@B@B@C@@BB$cons C"),
  ("rev",     "@@$foldl@C$cons$nil"),
  ("sum",     "@@$foldr$plus#0"),
  ("fact",    "@@C@@C@@CI@@B@SB@@CB@SB@KII"),
  ("fib",     "@@C@@C@@CI@@S@@BC@@B@CI@@CI@KI@@S@@BS@@B@BB@@CIK@@CI@KI@@C@@CI@KIIK"),
  ("exlist1", "@@$cons#0@@$cons#1@@$cons#2$nil"),
];

pub struct MacroLib { defs: FxHashMap<String, String> }

impl MacroLib {
  pub fn empty()->Self { MacroLib{ defs: FxHashMap::default() }}

  pub fn standard()->Self {
    let mut lib = MacroLib::empty();
    if cfg!(feature = "builtins") {
      for &(name, src) in BUILTINS { lib.define(name, src) }}
    lib }

  pub fn define(&mut self, name:&str, src:&str) {
    self.defs.insert(name.to_string(), src.to_string()); }

  pub fn get(&self, name:&str)->Option<&str> {
    self.defs.get(name).map(|s| s.as_str()) }

  /// all defined names, sorted (for the shell banner)
  pub fn names(&self)->Vec<&str> {
    let mut ns:Vec<&str> = self.defs.keys().map(|s| s.as_str()).collect();
    ns.sort_unstable();
    ns }}

impl Default for MacroLib {
  fn default()->Self { MacroLib::standard() }}


#[cfg(test)] mod test {
  use super::*;

  #[test] fn test_define_and_get() {
    let mut lib = MacroLib::empty();
    assert_eq!(lib.get("two"), None);
    lib.define("two", "#2");
    assert_eq!(lib.get("two"), Some("#2"));
    lib.define("two", "@@SB#1");
    assert_eq!(lib.get("two"), Some("@@SB#1"), "redefinition wins")}

  #[cfg(feature="builtins")]
  #[test] fn test_standard_library() {
    let lib = MacroLib::standard();
    assert_eq!(lib.get("t"), Some("K"));
    assert!(lib.get("fact").is_some());
    let names = lib.names();
    assert_eq!(names.len(), BUILTINS.len());
    assert!(names.windows(2).all(|w| w[0] < w[1]), "names are sorted")}}
