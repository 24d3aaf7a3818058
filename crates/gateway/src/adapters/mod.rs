//! Venue adapters
//!
//! Adapters implement the `Venue` port and push normalized events through a
//! transport publisher.

pub mod simulator;

pub use simulator::SimulatedVenue;
