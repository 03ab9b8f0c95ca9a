//! Interactive shell for the skex reduction engine.
//!
//! Reads one term per prompt, echoes it, reduces it to weak head
//! normal form, prints the result in reduced-print mode, and reports
//! the work done. Command-line arguments are evaluated the same way,
//! non-interactively.
use std::io;
use std::io::Write;

use simplelog::{Config, LevelFilter, SimpleLogger};

use skex::builtins::MacroLib;
use skex::heap::AppHeap;
use skex::parse::parse;

include!(concat!(env!("OUT_DIR"), "/skex-build-info.rs"));

fn readln()->Option<String> {
  let mut buf = String::new();
  print!("\nTerm> ");
  io::stdout().flush()                 .expect("couldn't flush stdout.");
  match io::stdin().read_line(&mut buf) {
    Ok(0) => None,
    Ok(_) => Some(buf),
    Err(_) => None }}

fn eval(heap:&mut AppHeap, lib:&MacroLib, line:&str) {
  heap.reset_stats();
  match parse(heap, lib, line) {
    Err(e) => println!("{}", e),
    Ok(None) => {}
    Ok(Some(term)) => {
      println!("{}", heap.show(term));
      println!("--->");
      let result = heap.reduce(term);
      println!("{}", heap.show_reduced(result));
      println!("{} reductions, {} max appnodes", heap.reductions(), heap.high_water());
      heap.release(result); }}}

fn main() {
  let _ = SimpleLogger::init(LevelFilter::Warn, Config::default());
  let mut heap = AppHeap::default();
  let lib = MacroLib::standard();

  let args:Vec<String> = std::env::args().skip(1).collect();
  if !args.is_empty() {
    for arg in args { eval(&mut heap, &lib, &arg) }
    return }

  println!("skex {} (opt {}, features {}) -- S/K/I/B/C combinator reduction engine",
           SKEX_VERSION, SKEX_OPT_LEVEL, SKEX_FEATURES);
  let names = lib.names();
  if !names.is_empty() {
    print!("predefined macros:");
    for n in names { print!(" ${}", n) }
    println!(); }
  while let Some(line) = readln() { eval(&mut heap, &lib, &line) }}
