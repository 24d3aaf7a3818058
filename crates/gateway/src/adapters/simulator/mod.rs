//! Simulator venue adapter
//!
//! Scripted in-memory venue for tests and local runs.

mod venue;

pub use venue::SimulatedVenue;
