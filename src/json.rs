//! JSON import/export of application graphs.
//!
//! The document is flat and versioned: `apps` lists `[func, arg]`
//! pairs bottom-up, with literals as their display strings and node
//! references as indices into `apps` (indices start at 1; slot 0 is a
//! stub object), and `keep` lists the root atoms. Sharing survives the
//! round trip because every node is emitted exactly once.
use std::collections::{HashMap, HashSet};

use crate::atom::Atom;
use crate::heap::AppHeap;

const FORMAT:&str = "skex-app-0.01";

fn json_atom(a:Atom, mapping:&HashMap<usize,usize>)->json::JsonValue {
  if let Some(n) = a.app_idx() { json::JsonValue::Number((mapping[&n] as i32).into()) }
  else { json::JsonValue::String(a.to_string()) }}

impl AppHeap {
  pub fn to_json(&self, roots:&[Atom])->String {
    let mut apps = json::array![json::object!{}];
    let mut mapping:HashMap<usize,usize> = HashMap::new();
    for &r in roots { self.json_step(r, &mut apps, &mut mapping) }
    let keep:Vec<json::JsonValue> =
      roots.iter().map(|&r| json_atom(r, &mapping)).collect();
    let out = json::object!{
      "format": FORMAT,
      "apps": apps,
      "keep": keep };
    out.dump() }

  fn json_step(&self, a:Atom, apps:&mut json::JsonValue,
               mapping:&mut HashMap<usize,usize>) {
    if let Some(n) = a.app_idx() {
      if mapping.contains_key(&n) { return }
      let (f, x) = (self.func(n), self.arg(n));
      self.json_step(f, apps, mapping);
      self.json_step(x, apps, mapping);
      let idx = apps.len();
      apps.push(json::array![json_atom(f, mapping), json_atom(x, mapping)])
          .expect("failed to push app");
      mapping.insert(n, idx); }}

  /// Rebuild a dumped graph in this heap, returning owned references
  /// to the kept roots. Panics on documents this crate didn't dump.
  pub fn load_json(&mut self, s:&str)->Vec<Atom> {
    let data = json::parse(s).expect("malformed json");
    assert_eq!(data["format"].as_str().expect("missing format"), FORMAT,
               "unknown dump format");
    let entries:Vec<&json::JsonValue> = data["apps"].members().collect();
    let mut mapping:HashMap<usize,Atom> = HashMap::new();
    let mut used:HashSet<usize> = HashSet::new();
    for (i, entry) in entries.iter().enumerate().skip(1) {
      let f = self.load_child(&entry[0], &mapping, &mut used);
      let x = self.load_child(&entry[1], &mapping, &mut used);
      let a = self.alloc(f, x);
      mapping.insert(i, a); }
    let mut keep = vec![];
    for k in data["keep"].members() {
      keep.push(self.load_child(k, &mapping, &mut used)) }
    // a node nothing ended up referencing was an unkept root; drop it
    for (i, &a) in mapping.iter() {
      if !used.contains(i) { self.release(a); }}
    keep }

  fn load_child(&mut self, v:&json::JsonValue, mapping:&HashMap<usize,Atom>,
                used:&mut HashSet<usize>)->Atom {
    if let Some(s) = v.as_str() {
      s.parse::<Atom>().expect("bad literal in dump") }
    else {
      let i = v.as_i32().expect("bad node index in dump") as usize;
      let a = mapping[&i];
      // the first reference takes over the node's birth count
      if !used.insert(i) { self.retain(a); }
      a }}}


#[cfg(test)] mod test {
  use crate::atom::{self, Atom};
  use crate::builtins::MacroLib;
  use crate::heap::AppHeap;
  use crate::parse::parse;

  fn p(h:&mut AppHeap, src:&str)->Atom {
    let lib = MacroLib::empty();
    parse(h, &lib, src).unwrap().unwrap() }

  #[test] fn test_roundtrip() {
    let mut h = AppHeap::new(64);
    let t = p(&mut h, "@@@SK'A@@K1b");
    let dump = h.to_json(&[t]);
    let mut h2 = AppHeap::new(64);
    let keep = h2.load_json(&dump);
    assert_eq!(keep.len(), 1);
    assert_eq!(h2.show(keep[0]), h.show(t));
    h2.check_sound(&keep);
    h2.release(keep[0]);
    assert_eq!(h2.live(), 0)}

  #[test] fn test_roundtrip_preserves_sharing() {
    let mut h = AppHeap::new(64);
    let two = p(&mut h, "#2");            // shares one (S B) node
    let dump = h.to_json(&[two]);
    let mut h2 = AppHeap::new(64);
    let keep = h2.load_json(&dump);
    let outer = keep[0].app_idx().unwrap();
    let inner = h2.arg(outer).app_idx().unwrap();
    assert_eq!(h2.func(outer), h2.func(inner), "sharing survives the round trip");
    h2.check_sound(&keep);
    h2.release(keep[0]);
    assert_eq!(h2.live(), 0)}

  #[test] fn test_literal_root() {
    let mut h = AppHeap::new(16);
    let dump = h.to_json(&[atom::S, Atom::num(7)]);
    let mut h2 = AppHeap::new(16);
    let keep = h2.load_json(&dump);
    assert_eq!(keep, vec![atom::S, Atom::num(7)]);
    assert_eq!(h2.live(), 0)}

  #[test] fn test_shared_root_refcounts() {
    let mut h = AppHeap::new(16);
    let t = p(&mut h, "@SK");
    let r = h.retain(t);
    let dump = h.to_json(&[t, r]);        // same root kept twice
    let mut h2 = AppHeap::new(16);
    let keep = h2.load_json(&dump);
    assert_eq!(keep[0], keep[1]);
    h2.check_sound(&keep);
    h2.release(keep[0]); h2.release(keep[1]);
    assert_eq!(h2.live(), 0)}}
