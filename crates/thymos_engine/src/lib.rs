//! # Thymos Engine
//!
//! The periodic driver for the `thymos_core` simulation: a background
//! task that ticks hormone decay at a fixed cadence while running, and
//! serializes all state mutation (ticks, injections, parameter edits,
//! reset) through one mailbox so there is exactly one writer per session.
//!
//! External consumers read snapshots via the watch channel or the async
//! accessors; they never touch core state directly.

mod clock;
mod engine;

pub use clock::ClockConfig;
pub use engine::{ClockState, SimulationEngine, Snapshot};
