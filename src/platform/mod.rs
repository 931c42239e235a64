//! Platform abstraction layer
//!
//! Host-side pieces the simulation stays independent of. Currently the
//! fixed-timestep clock that converts wall time into ticks.

pub mod clock;

pub use clock::FixedClock;
