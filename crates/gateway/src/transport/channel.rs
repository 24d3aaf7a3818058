//! Tokio channel-based event transport for single-process mode
//!
//! Venue event sources hold an [`EventPublisher`]; the orchestrator drains the
//! matching [`EventSubscriber`]. A single mpsc queue keeps events from one
//! publisher in the order they were sent.

use crate::error::TransportError;
use crate::transport::Publisher;
use async_trait::async_trait;
use dola_core::VenueEvent;
use tokio::sync::mpsc;

/// Create a publisher/subscriber pair with the given capacity
pub fn channel(capacity: usize) -> (EventPublisher, EventSubscriber) {
    // mpsc panics on a zero capacity
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (EventPublisher { tx }, EventSubscriber { rx })
}

/// Channel-based publisher; cheap to clone, one per event source
#[derive(Clone, Debug)]
pub struct EventPublisher {
    tx: mpsc::Sender<VenueEvent>,
}

impl EventPublisher {
    /// Publish without waiting for queue space
    pub fn try_publish(&self, event: VenueEvent) -> Result<(), TransportError> {
        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TransportError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => TransportError::ChannelClosed,
        })
    }

    /// True once the subscriber has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl Publisher for EventPublisher {
    async fn publish(&self, event: VenueEvent) -> Result<(), TransportError> {
        self.tx
            .send(event)
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }
}

/// Channel-based subscriber, drained by exactly one consumer
#[derive(Debug)]
pub struct EventSubscriber {
    rx: mpsc::Receiver<VenueEvent>,
}

impl EventSubscriber {
    /// Wait for the next event; `None` once every publisher is gone
    pub async fn next(&mut self) -> Option<VenueEvent> {
        self.rx.recv().await
    }

    /// Try to receive without blocking (returns None if no event available)
    pub fn try_next(&mut self) -> Result<Option<VenueEvent>, TransportError> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(TransportError::ChannelClosed),
        }
    }
}
