//! build script for skex.
//! Bakes the engine's compile-time configuration into constants so the
//! shell banner can report exactly what this binary was built with:
//! crate version, optimization level, and which cargo features shaped
//! the combinator repertoire.
use std::env;
use std::fs;
use std::path::Path;

const FEATURES: &[&str] = &["extended", "builtins"];

fn main() {
    let active: Vec<&str> = FEATURES.iter().copied()
        .filter(|f| env::var_os(format!("CARGO_FEATURE_{}", f.to_uppercase())).is_some())
        .collect();
    let features = if active.is_empty() { "none".to_string() } else { active.join("+") };
    let version = env!("CARGO_PKG_VERSION");
    let opt_level = env::var("OPT_LEVEL").unwrap_or_else(|_| "?".to_string());
    let info = format!(
        "const SKEX_VERSION: &str = {version:?};\n\
         const SKEX_OPT_LEVEL: &str = {opt_level:?};\n\
         const SKEX_FEATURES: &str = {features:?};\n");
    let dest = Path::new(&env::var_os("OUT_DIR").unwrap()).join("skex-build-info.rs");
    fs::write(&dest, info).unwrap();
    println!("cargo:rerun-if-changed=build.rs");
}
