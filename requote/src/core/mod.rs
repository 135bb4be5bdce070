//! Deterministic, pure logic for candidate selection.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! state and injected sources of randomness so tests can pin every outcome.

pub mod caption;
pub mod exhaustion;
pub mod filter;
pub mod sampler;
pub mod types;
