//! # Fleet Test Utilities
//!
//! Shared testing utilities for the simulation core:
//! - Determinism test harness
//! - Battle fixtures and spawn helpers
//! - Property-based testing strategies
//! - Test tracing setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
