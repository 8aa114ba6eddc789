//! Check-in correlation engine.
//!
//! Turns scheduler lifecycle signals into check-ins on a monitoring backend
//! and remembers which check-in belongs to which execution until it closes.

pub mod engine;
pub mod signal;

pub use engine::CorrelationEngine;
pub use signal::LifecycleSignal;
