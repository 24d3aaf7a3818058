//! Dola Ports
//!
//! Port definitions (traits) for the Dola strategy orchestrator.
//! These define the boundary between the orchestration core and venue clients.

mod error;
mod venue;

pub use error::{VenueError, VenueResult};
pub use venue::Venue;
