//! Nullable infrastructure for deterministic testing.
//!
//! The governance core takes time and action dispatch from its caller.
//! This crate provides test-friendly stand-ins that return deterministic
//! values, can be steered programmatically, and never touch the outside
//! world.

pub mod clock;
pub mod executor;

pub use clock::NullClock;
pub use executor::NullExecutor;
