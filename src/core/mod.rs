// SoakGate - core/mod.rs
//
// Core analysis layer.
// Dependencies: standard library, serde, csv, tracing.
// Must NOT depend on: platform, app, or touch the filesystem directly.

pub mod export;
pub mod loader;
pub mod log_scan;
pub mod model;
pub mod stats;
pub mod trend;
pub mod verdict;
