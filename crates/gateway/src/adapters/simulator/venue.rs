//! Simulated venue
//!
//! In-memory stand-in for a venue client. Holdings are scripted, fetch
//! failures can be queued, and events are pushed through an attached
//! publisher exactly like a live websocket adapter would.

use crate::error::GatewayError;
use crate::transport::{EventPublisher, Publisher};
use async_trait::async_trait;
use dola_core::{EventPayload, Holdings, VenueEvent};
use dola_ports::{Venue, VenueError, VenueResult};
use log::debug;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Scripted venue used by tests and demos
pub struct SimulatedVenue {
    name: String,
    /// Snapshot returned by successful fetches
    holdings: Mutex<Holdings>,
    /// Errors returned by the next fetches, oldest first
    failures: Mutex<VecDeque<VenueError>>,
    fetch_count: AtomicU64,
    /// Publisher events are pushed through
    publisher: Option<EventPublisher>,
}

impl SimulatedVenue {
    /// Create a venue with empty holdings named after the venue
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            holdings: Mutex::new(Holdings::new(name.clone(), Vec::new())),
            name,
            failures: Mutex::new(VecDeque::new()),
            fetch_count: AtomicU64::new(0),
            publisher: None,
        }
    }

    /// Set the snapshot returned by fetches
    pub fn with_holdings(self, holdings: Holdings) -> Self {
        self.set_holdings(holdings);
        self
    }

    /// Attach the publisher events are pushed through
    pub fn attach(mut self, publisher: EventPublisher) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Replace the snapshot returned by fetches
    pub fn set_holdings(&self, holdings: Holdings) {
        *self.holdings.lock().unwrap_or_else(|e| e.into_inner()) = holdings;
    }

    /// Make the next fetch fail with `error`; calls queue up
    pub fn fail_next_fetch(&self, error: VenueError) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(error);
    }

    /// Number of fetches served so far, failed ones included
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Wrap a payload as an event from this venue
    pub fn event(&self, payload: EventPayload) -> VenueEvent {
        VenueEvent::new(self.name.clone(), payload)
    }

    /// Push an event through the attached publisher
    pub async fn publish(&self, payload: EventPayload) -> Result<(), GatewayError> {
        let publisher = self.publisher.as_ref().ok_or(GatewayError::NotAttached)?;
        let event = self.event(payload);

        debug!("[{}] Publishing {} event", self.name, event.kind());

        publisher.publish(event).await?;
        Ok(())
    }
}

#[async_trait]
impl Venue for SimulatedVenue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_account_holdings(&self) -> VenueResult<Holdings> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let failure = self
            .failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        if let Some(error) = failure {
            debug!("[{}] Simulated fetch failure: {}", self.name, error);
            return Err(error);
        }

        Ok(self
            .holdings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
