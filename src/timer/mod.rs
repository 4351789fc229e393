//! Timer module
//!
//! The clock driver turns frame samples into one-second ticks and the engine
//! counts those ticks down through alternating work and break phases.

pub mod clock;
pub mod engine;

pub use clock::ClockDriver;
pub use engine::{CompletionHandler, PhaseCompletion, TimerEngine};
