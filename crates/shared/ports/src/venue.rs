use async_trait::async_trait;
use dola_core::Holdings;

use crate::error::VenueResult;

/// Port for a trading venue connection
///
/// The orchestrator never talks to an exchange directly. Venue clients
/// (REST/websocket adapters, simulators) implement this trait and are shared
/// as `Arc<dyn Venue>` between the orchestrator and strategy timers.
#[async_trait]
pub trait Venue: Send + Sync {
    /// Venue name. Compared case-insensitively everywhere.
    fn name(&self) -> &str;

    /// Fetch the current account holdings from the venue
    async fn fetch_account_holdings(&self) -> VenueResult<Holdings>;
}
