// SoakGate - app/mod.rs
//
// Application layer: orchestration of an analysis run.
// Dependencies: core, platform.

pub mod analysis;
