//! Dola Gateway
//!
//! Gateway layer for the Dola strategy orchestrator. Provides:
//! - Event transport (tokio channels, with a trait for future transports)
//! - Venue adapters (simulator)
//!
//! ## Architecture
//!
//! ```text
//! Venue clients (websocket, REST, simulator)
//!         │
//!    ┌────▼──────────┐
//!    │ EventPublisher│  one clone per event source
//!    └────┬──────────┘
//!         │ VenueEvent { venue, payload }
//!    ┌────▼──────────┐
//!    │EventSubscriber│  drained by the Keep relay loop
//!    └───────────────┘
//! ```

pub mod adapters;
pub mod error;
pub mod transport;

// Re-export commonly used types
pub use adapters::SimulatedVenue;
pub use error::{GatewayError, TransportError};
pub use transport::{EventPublisher, EventSubscriber, Publisher, channel};
