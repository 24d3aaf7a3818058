//! Transport abstraction layer
//!
//! Venue event sources push events through a [`Publisher`]. The in-process
//! implementation is a tokio channel; the trait lets other transports be
//! plugged in later without touching event sources.

pub mod channel;

pub use channel::{EventPublisher, EventSubscriber, channel};

use crate::error::TransportError;
use async_trait::async_trait;
use dola_core::VenueEvent;

/// Publisher - sends venue events towards the orchestrator
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish an event, waiting for queue space if needed
    async fn publish(&self, event: VenueEvent) -> Result<(), TransportError>;
}
