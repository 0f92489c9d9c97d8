//! Talent nine-box rating engine.
//!
//! Aggregates heterogeneous talent signals into normalized performance and
//! potential axis scores, converts them to the discrete 1-3 grid, and keeps
//! an immutable evidence trail for every saved assessment.

pub mod config;
pub mod error;
pub mod ninebox;
pub mod telemetry;
