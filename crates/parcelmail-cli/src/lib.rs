//! Pipeline wiring for the `parcelmail` binary.
//!
//! The orchestrator lives here rather than in `main.rs` so scenario
//! tests can drive it against scripted browser sessions.

pub mod orchestrator;
