//! Ticker Strategy
//!
//! Turns a pull-based venue API into periodic callbacks. Each venue the
//! strategy is initialized on gets its own timer task:
//! - first tick one full interval after `init`, never immediately
//! - missed ticks are skipped, not bunched
//! - `init` on a running venue is a no-op, so there is never a second loop
//! - a failing or panicking tick is logged and the timer keeps firing
//! - once `deinit` returns, no further tick runs for that venue

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dola_core::venue_key;
use dola_keep::{Keep, Strategy, StrategyError, StrategyResult};
use dola_ports::Venue;
use futures::FutureExt;
use log::{debug, error, info, warn};
use serde::Deserialize;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// How long `deinit` waits for an in-flight tick by default
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Work done on every tick
#[async_trait]
pub trait TickHandler: Send + Sync {
    async fn tick(&self, keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()>;
}

#[async_trait]
impl<H: TickHandler + ?Sized> TickHandler for Arc<H> {
    async fn tick(&self, keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        (**self).tick(keep, venue).await
    }
}

/// [`TickHandler`] backed by an async closure
pub struct FnTick<F>(F);

#[async_trait]
impl<F, Fut> TickHandler for FnTick<F>
where
    F: Fn(Arc<Keep>, Arc<dyn Venue>) -> Fut + Send + Sync,
    Fut: Future<Output = StrategyResult<()>> + Send + 'static,
{
    async fn tick(&self, keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        (self.0)(keep.clone(), venue.clone()).await
    }
}

/// Ticker settings as found in JSON configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerConfig {
    /// Tick interval in milliseconds
    pub interval_ms: u64,

    /// Upper bound on waiting for an in-flight tick during `deinit`
    #[serde(default = "default_stop_timeout_ms")]
    pub stop_timeout_ms: u64,
}

fn default_stop_timeout_ms() -> u64 {
    DEFAULT_STOP_TIMEOUT.as_millis() as u64
}

impl TickerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    pub fn validate(&self) -> StrategyResult<()> {
        if self.interval_ms == 0 {
            return Err(StrategyError::InvalidInterval);
        }
        Ok(())
    }
}

/// Running timer for one venue
struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Strategy that calls a [`TickHandler`] periodically on every venue
pub struct TickerStrategy {
    interval: Duration,
    stop_timeout: Duration,
    handler: Arc<dyn TickHandler>,
    /// Venue key -> running timer
    tickers: DashMap<String, Ticker>,
}

impl TickerStrategy {
    /// Create a ticker; a zero interval is rejected
    pub fn new<H: TickHandler + 'static>(interval: Duration, handler: H) -> StrategyResult<Self> {
        if interval.is_zero() {
            return Err(StrategyError::InvalidInterval);
        }

        Ok(Self {
            interval,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            handler: Arc::new(handler),
            tickers: DashMap::new(),
        })
    }

    /// Create a ticker from an async closure
    pub fn from_fn<F, Fut>(interval: Duration, f: F) -> StrategyResult<Self>
    where
        F: Fn(Arc<Keep>, Arc<dyn Venue>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = StrategyResult<()>> + Send + 'static,
    {
        Self::new(interval, FnTick(f))
    }

    /// Create a ticker from configuration
    pub fn from_config<H: TickHandler + 'static>(
        config: &TickerConfig,
        handler: H,
    ) -> StrategyResult<Self> {
        config.validate()?;
        Ok(Self::new(config.interval(), handler)?.with_stop_timeout(config.stop_timeout()))
    }

    pub fn with_stop_timeout(mut self, stop_timeout: Duration) -> Self {
        self.stop_timeout = stop_timeout;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    /// True while a timer task is alive for `venue`
    pub fn is_running(&self, venue: &str) -> bool {
        self.tickers
            .get(&venue_key(venue))
            .is_some_and(|ticker| !ticker.handle.is_finished())
    }

    /// Keys of every venue with a live timer task, sorted
    pub fn running_venues(&self) -> Vec<String> {
        let mut venues: Vec<String> = self
            .tickers
            .iter()
            .filter(|t| !t.handle.is_finished())
            .map(|t| t.key().clone())
            .collect();
        venues.sort();
        venues
    }

    /// Start the timer for `venue` unless a live one is already registered.
    /// A timer whose task has exited (its keep was dropped) is replaced.
    /// Returns whether a new timer was started.
    pub fn start(&self, keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> bool {
        let entry = self.tickers.entry(venue_key(venue.name()));
        if let Entry::Occupied(slot) = &entry {
            if !slot.get().handle.is_finished() {
                debug!("[{}] Ticker already running", venue.name());
                return false;
            }
            debug!("[{}] Replacing exited ticker", venue.name());
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_ticker(
            self.interval,
            self.handler.clone(),
            Arc::downgrade(keep),
            venue.clone(),
            cancel.clone(),
        ));
        entry.insert(Ticker { cancel, handle });

        info!(
            "[{}] Ticker started, interval {:?}",
            venue.name(),
            self.interval
        );
        true
    }

    /// Stop the timer for `venue` and wait for it to finish, aborting it
    /// after `stop_timeout`. Returns whether a timer was registered.
    pub async fn stop(&self, venue: &str) -> bool {
        let Some((_, ticker)) = self.tickers.remove(&venue_key(venue)) else {
            return false;
        };

        ticker.cancel.cancel();

        let mut handle = ticker.handle;
        if tokio::time::timeout(self.stop_timeout, &mut handle)
            .await
            .is_err()
        {
            warn!(
                "[{}] Tick still running after {:?}, aborting",
                venue, self.stop_timeout
            );
            handle.abort();
            let _ = handle.await;
        }

        info!("[{}] Ticker stopped", venue);
        true
    }
}

async fn run_ticker(
    period: Duration,
    handler: Arc<dyn TickHandler>,
    keep: Weak<Keep>,
    venue: Arc<dyn Venue>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            _ = interval.tick() => {
                let Some(keep) = keep.upgrade() else {
                    debug!("[{}] Keep dropped, ticker exiting", venue.name());
                    break;
                };

                match AssertUnwindSafe(handler.tick(&keep, &venue)).catch_unwind().await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => error!("[{}] Tick failed: {}", venue.name(), e),
                    Err(panic) => error!(
                        "[{}] Tick panicked: {}",
                        venue.name(),
                        panic_message(panic.as_ref())
                    ),
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        *msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

impl Drop for TickerStrategy {
    fn drop(&mut self) {
        for ticker in self.tickers.iter() {
            ticker.cancel.cancel();
        }
    }
}

#[async_trait]
impl Strategy for TickerStrategy {
    async fn init(&self, keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        self.start(keep, venue);
        Ok(())
    }

    async fn deinit(&self, _keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        self.stop(venue.name()).await;
        Ok(())
    }
}
