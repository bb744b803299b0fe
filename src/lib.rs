// SoakGate - lib.rs
//
// Library entry point, exposing the analysis layers for integration testing
// and programmatic use by other pipeline tools.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
