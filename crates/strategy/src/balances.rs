//! Balances Strategy
//!
//! Keeps the latest account holdings of every venue in a shared cache,
//! refreshed periodically by an embedded [`TickerStrategy`]. Other strategies
//! read it through `Keep::root().get_as::<BalancesStrategy>(..)`.

use crate::ticker::{TickHandler, TickerStrategy};
use async_trait::async_trait;
use dashmap::DashMap;
use dola_core::{Balance, Holdings, SubAccount, venue_key};
use dola_keep::{Keep, Strategy, StrategyResult};
use dola_ports::Venue;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BalancesError {
    #[error("Holdings not found for venue {0}")]
    HoldingsNotFound(String),

    #[error("Currency {currency} not found in account {account} on {venue}")]
    CurrencyNotFound {
        venue: String,
        account: String,
        currency: String,
    },

    #[error("No account with index {index} on {venue} ({len} accounts)")]
    AccountIndexOutOfRange {
        venue: String,
        index: usize,
        len: usize,
    },
}

/// Venue key -> latest good snapshot
type HoldingsCache = Arc<DashMap<String, Holdings>>;

/// Tick handler that refreshes the cache from the venue
struct Refresher {
    cache: HoldingsCache,
}

impl Refresher {
    async fn refresh(&self, venue: &dyn Venue) -> StrategyResult<Holdings> {
        let mut holdings = venue.fetch_account_holdings().await?;

        // Keyed by the venue, not by whatever label the snapshot carries
        holdings.venue = venue.name().to_string();

        debug!(
            "[{}] Holdings refreshed: {} accounts",
            venue.name(),
            holdings.accounts.len()
        );

        self.cache.insert(venue_key(venue.name()), holdings.clone());
        Ok(holdings)
    }
}

#[async_trait]
impl TickHandler for Refresher {
    async fn tick(&self, _keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        self.refresh(venue.as_ref()).await.map(|_| ())
    }
}

/// Concurrent cache of account holdings per venue
pub struct BalancesStrategy {
    cache: HoldingsCache,
    refresher: Arc<Refresher>,
    ticker: TickerStrategy,
}

impl BalancesStrategy {
    /// Create a balances cache refreshed every `refresh_rate`
    pub fn new(refresh_rate: Duration) -> StrategyResult<Self> {
        let cache = HoldingsCache::default();
        let refresher = Arc::new(Refresher {
            cache: cache.clone(),
        });
        let ticker = TickerStrategy::new(refresh_rate, refresher.clone())?;

        Ok(Self {
            cache,
            refresher,
            ticker,
        })
    }

    /// Override how long `deinit` waits for an in-flight refresh
    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.ticker = self.ticker.with_stop_timeout(stop_timeout);
        self
    }

    pub fn refresh_rate(&self) -> Duration {
        self.ticker.interval()
    }

    /// Upsert a snapshot under its venue name, case-insensitive
    pub fn store(&self, holdings: Holdings) {
        self.cache.insert(venue_key(&holdings.venue), holdings);
    }

    /// Latest snapshot for `venue`, case-insensitive
    pub fn load(&self, venue: &str) -> Option<Holdings> {
        self.cache.get(&venue_key(venue)).map(|h| h.clone())
    }

    /// Balance of `code` in sub-account `account_id`. Both match exactly;
    /// the first matching entry wins.
    pub fn currency(
        &self,
        venue: &str,
        code: &str,
        account_id: &str,
    ) -> Result<Balance, BalancesError> {
        let holdings = self
            .cache
            .get(&venue_key(venue))
            .ok_or_else(|| BalancesError::HoldingsNotFound(venue.to_string()))?;

        holdings
            .accounts
            .iter()
            .filter(|account| account.id == account_id)
            .find_map(|account| account.balance(code))
            .cloned()
            .ok_or_else(|| BalancesError::CurrencyNotFound {
                venue: venue.to_string(),
                account: account_id.to_string(),
                currency: code.to_string(),
            })
    }

    /// Sub-account at `index` in the snapshot for `venue`
    pub fn account(&self, venue: &str, index: usize) -> Result<SubAccount, BalancesError> {
        let holdings = self
            .cache
            .get(&venue_key(venue))
            .ok_or_else(|| BalancesError::HoldingsNotFound(venue.to_string()))?;

        holdings
            .accounts
            .get(index)
            .cloned()
            .ok_or_else(|| BalancesError::AccountIndexOutOfRange {
                venue: venue.to_string(),
                index,
                len: holdings.accounts.len(),
            })
    }

    /// Fetch holdings from `venue` now and cache them. A failed fetch leaves
    /// the previous snapshot in place.
    pub async fn refresh(&self, venue: &dyn Venue) -> StrategyResult<Holdings> {
        self.refresher.refresh(venue).await
    }

    /// Venues with a running refresh timer
    pub fn refreshing_venues(&self) -> Vec<String> {
        self.ticker.running_venues()
    }
}

#[async_trait]
impl Strategy for BalancesStrategy {
    async fn init(&self, keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        self.ticker.init(keep, venue).await
    }

    async fn deinit(&self, keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        self.ticker.deinit(keep, venue).await
    }
}
