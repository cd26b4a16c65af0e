//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `shadowtree_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use shadowtree_core::MirrorConfig;

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring
    // independently from any host editor integration.
    let config = MirrorConfig::default();
    println!("shadowtree_core version={}", shadowtree_core::core_version());
    println!(
        "defaults symlinks_dir={} data_link={}",
        config.symlinks_dir, config.data_link
    );
}
