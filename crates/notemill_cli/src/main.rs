//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `notemill_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring without
    // standing up a vault on disk.
    println!("notemill_core ping={}", notemill_core::ping());
    println!("notemill_core version={}", notemill_core::core_version());
}
