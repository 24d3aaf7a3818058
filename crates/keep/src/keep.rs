//! Keep - strategy orchestrator
//!
//! Owns the venues and the strategy tree, attaches every strategy to every
//! venue and relays venue events until cancelled:
//! - `init` for each (strategy, venue) pair, failures isolated to that pair
//! - events delivered in arrival order to every initialized pair of the venue
//! - `deinit` for each initialized pair, in reverse init order

use crate::config::KeepConfig;
use crate::error::{KeepError, Result, StrategyError, StrategyResult};
use crate::node::Node;
use crate::strategy::Strategy;
use dashmap::DashMap;
use dola_core::{EventPayload, VenueEvent, venue_key};
use dola_gateway::{EventPublisher, EventSubscriber, channel};
use dola_ports::Venue;
use log::{debug, error, info, warn};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Lifecycle of one (strategy, venue) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairState {
    /// `init` not called yet, or it failed
    #[default]
    Uninitialized,
    /// Receiving events
    Initialized,
    /// `deinit` called, no further events
    Deinitialized,
}

/// An `init` call that failed; the pair stays detached
#[derive(Debug)]
pub struct InitFailure {
    /// Strategy path in the tree
    pub strategy: String,
    /// Venue name
    pub venue: String,
    /// Error returned by `init`
    pub error: StrategyError,
}

/// What happened during one `run`
#[derive(Debug, Default)]
pub struct RunSummary {
    pub init_failures: Vec<InitFailure>,
    /// Events from attached venues taken off the queue
    pub events_relayed: u64,
    /// Event callbacks that returned an error
    pub callback_errors: u64,
}

/// Builder for [`Keep`]
#[derive(Default)]
pub struct KeepBuilder {
    config: KeepConfig,
    venues: Vec<Arc<dyn Venue>>,
    root: Node,
    /// First tree error, reported by `build`
    error: Option<KeepError>,
}

impl KeepBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: KeepConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a venue; strategies are initialized against venues in this order
    pub fn venue<V: Venue + 'static>(mut self, venue: Arc<V>) -> Self {
        self.venues.push(venue);
        self
    }

    /// Register a strategy at the root
    pub fn strategy<S: Strategy + 'static>(mut self, name: impl Into<String>, strategy: S) -> Self {
        let result = self.root.add(name, strategy);
        self.record(result);
        self
    }

    /// Register a strategy at the root, keeping a handle to it
    pub fn strategy_shared<S: Strategy + 'static>(
        mut self,
        name: impl Into<String>,
        strategy: Arc<S>,
    ) -> Self {
        let result = self.root.add_shared(name, strategy);
        self.record(result);
        self
    }

    /// Register a group of strategies at the root
    pub fn group(mut self, name: impl Into<String>, node: Node) -> Self {
        let result = self.root.add_group(name, node);
        self.record(result);
        self
    }

    /// Root of the strategy tree, for composing it in place
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    /// Validate and build the orchestrator
    pub fn build(self) -> Result<Arc<Keep>> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.config.validate()?;

        let mut venue_index = HashMap::with_capacity(self.venues.len());
        for (i, venue) in self.venues.iter().enumerate() {
            let key = venue_key(venue.name());
            if venue_index.insert(key, i).is_some() {
                return Err(KeepError::DuplicateVenue(venue.name().to_string()));
            }
        }

        let (publisher, subscriber) = channel(self.config.event_buffer);

        Ok(Arc::new(Keep {
            config: self.config,
            root: self.root,
            venues: self.venues,
            venue_index,
            publisher,
            subscriber: Mutex::new(Some(subscriber)),
            pair_states: DashMap::new(),
        }))
    }
}

/// Strategy orchestrator
pub struct Keep {
    config: KeepConfig,
    root: Node,
    venues: Vec<Arc<dyn Venue>>,
    /// Venue key -> position in `venues`
    venue_index: HashMap<String, usize>,
    publisher: EventPublisher,
    /// Taken by the first `run`
    subscriber: Mutex<Option<EventSubscriber>>,
    /// (strategy path, venue key) -> state
    pair_states: DashMap<(String, String), PairState>,
}

/// An initialized pair, remembered for shutdown
struct Attached {
    /// Index into the leaves of this run
    leaf: usize,
    /// Index into `Keep::venues`
    venue: usize,
    path: String,
    strategy: Arc<dyn Strategy>,
}

/// (leaf index, venue index) pairs that receive events
type LivePairs = HashSet<(usize, usize)>;

impl Keep {
    pub fn builder() -> KeepBuilder {
        KeepBuilder::new()
    }

    pub fn config(&self) -> &KeepConfig {
        &self.config
    }

    /// Root of the strategy tree
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Attached venues, in registration order
    pub fn venues(&self) -> &[Arc<dyn Venue>] {
        &self.venues
    }

    /// Venue by name, case-insensitive
    pub fn venue(&self, name: &str) -> Option<Arc<dyn Venue>> {
        self.venue_index
            .get(&venue_key(name))
            .map(|&i| self.venues[i].clone())
    }

    /// Handle for pushing venue events into this keep
    pub fn publisher(&self) -> EventPublisher {
        self.publisher.clone()
    }

    /// Current state of the pair (strategy at `path`, `venue`)
    pub fn pair_state(&self, path: &str, venue: &str) -> PairState {
        self.pair_states
            .get(&(path.to_string(), venue_key(venue)))
            .map(|state| *state)
            .unwrap_or_default()
    }

    fn set_state(&self, path: &str, venue: &Arc<dyn Venue>, state: PairState) {
        self.pair_states
            .insert((path.to_string(), venue_key(venue.name())), state);
    }

    /// Initialize every strategy on every venue, relay events until `cancel`
    /// fires, then deinitialize. Can only be called once.
    pub async fn run(self: &Arc<Self>, cancel: CancellationToken) -> Result<RunSummary> {
        let mut subscriber = self
            .subscriber
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or(KeepError::AlreadyRunning)?;

        let leaves = self.root.leaves();
        let mut summary = RunSummary::default();

        info!(
            "Keep starting: {} strategies on {} venues",
            leaves.len(),
            self.venues.len()
        );

        let attached = self.init_all(&leaves, &mut summary).await;
        let live: LivePairs = attached.iter().map(|pair| (pair.leaf, pair.venue)).collect();

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Keep cancelled, shutting down");
                    break;
                }

                event = subscriber.next() => match event {
                    Some(event) => self.relay(&leaves, &live, event, &mut summary).await,
                    None => {
                        // Unreachable while `self.publisher` is alive
                        warn!("Event channel closed, waiting for cancellation");
                        cancel.cancelled().await;
                        break;
                    }
                }
            }
        }

        self.deinit_all(attached).await;

        info!(
            "Keep stopped: {} events relayed, {} callback errors, {} init failures",
            summary.events_relayed,
            summary.callback_errors,
            summary.init_failures.len()
        );

        Ok(summary)
    }

    async fn init_all(
        self: &Arc<Self>,
        leaves: &[(String, Arc<dyn Strategy>)],
        summary: &mut RunSummary,
    ) -> Vec<Attached> {
        let mut attached = Vec::with_capacity(leaves.len() * self.venues.len());

        for (leaf, (path, strategy)) in leaves.iter().enumerate() {
            for (index, venue) in self.venues.iter().enumerate() {
                match strategy.init(self, venue).await {
                    Ok(()) => {
                        debug!("[{}@{}] Initialized", path, venue.name());
                        self.set_state(path, venue, PairState::Initialized);
                        attached.push(Attached {
                            leaf,
                            venue: index,
                            path: path.clone(),
                            strategy: strategy.clone(),
                        });
                    }
                    Err(e) => {
                        error!("[{}@{}] Init failed: {}", path, venue.name(), e);
                        summary.init_failures.push(InitFailure {
                            strategy: path.clone(),
                            venue: venue.name().to_string(),
                            error: e,
                        });
                    }
                }
            }
        }

        attached
    }

    async fn deinit_all(self: &Arc<Self>, attached: Vec<Attached>) {
        for pair in attached.into_iter().rev() {
            let venue = &self.venues[pair.venue];
            if let Err(e) = pair.strategy.deinit(self, venue).await {
                error!("[{}@{}] Deinit failed: {}", pair.path, venue.name(), e);
            }
            self.set_state(&pair.path, venue, PairState::Deinitialized);
            debug!("[{}@{}] Deinitialized", pair.path, venue.name());
        }
    }

    async fn relay(
        self: &Arc<Self>,
        leaves: &[(String, Arc<dyn Strategy>)],
        live: &LivePairs,
        event: VenueEvent,
        summary: &mut RunSummary,
    ) {
        let Some(&index) = self.venue_index.get(&venue_key(&event.venue)) else {
            if self.config.log_unknown_venues {
                warn!(
                    "Dropping {} event from unknown venue {}",
                    event.kind(),
                    event.venue
                );
            }
            return;
        };

        let venue = &self.venues[index];
        summary.events_relayed += 1;

        for (leaf, (path, strategy)) in leaves.iter().enumerate() {
            if !live.contains(&(leaf, index)) {
                continue;
            }

            if let Err(e) = deliver(self, strategy.as_ref(), venue, &event.payload).await {
                summary.callback_errors += 1;
                error!(
                    "[{}@{}] {} callback failed: {}",
                    path,
                    venue.name(),
                    event.kind(),
                    e
                );
            }
        }
    }
}

/// Route a payload to the matching callback
async fn deliver(
    keep: &Arc<Keep>,
    strategy: &dyn Strategy,
    venue: &Arc<dyn Venue>,
    payload: &EventPayload,
) -> StrategyResult<()> {
    match payload {
        EventPayload::Funding(funding) => strategy.on_funding(keep, venue, funding).await,
        EventPayload::Price(price) => strategy.on_price(keep, venue, price).await,
        EventPayload::Kline(kline) => strategy.on_kline(keep, venue, kline).await,
        EventPayload::OrderBook(book) => strategy.on_order_book(keep, venue, book).await,
        EventPayload::Order(order) => strategy.on_order(keep, venue, order).await,
        EventPayload::Modify(modify) => strategy.on_modify(keep, venue, modify).await,
        EventPayload::BalanceChange(change) => {
            strategy.on_balance_change(keep, venue, change).await
        }
        EventPayload::Unrecognized(raw) => strategy.on_unrecognized(keep, venue, raw).await,
    }
}

impl fmt::Debug for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let venues: Vec<&str> = self.venues.iter().map(|v| v.name()).collect();
        f.debug_struct("Keep")
            .field("config", &self.config)
            .field("venues", &venues)
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::NoopStrategy;
    use async_trait::async_trait;
    use dola_gateway::SimulatedVenue;

    /// Records calls as "init:venue", "event:venue" or "deinit:venue"
    #[derive(Default)]
    struct Lifecycle {
        calls: Mutex<Vec<String>>,
        fail_init_on: Option<&'static str>,
    }

    impl Lifecycle {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Strategy for Lifecycle {
        async fn init(&self, _keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("init:{}", venue.name()));
            if self.fail_init_on == Some(venue.name()) {
                return Err(StrategyError::failed("refused"));
            }
            Ok(())
        }

        async fn on_unrecognized(
            &self,
            _keep: &Arc<Keep>,
            venue: &Arc<dyn Venue>,
            _raw: &serde_json::Value,
        ) -> StrategyResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("event:{}", venue.name()));
            Ok(())
        }

        async fn deinit(&self, _keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("deinit:{}", venue.name()));
            Ok(())
        }
    }

    #[test]
    fn test_build_rejects_duplicate_venues() {
        let result = KeepBuilder::new()
            .venue(Arc::new(SimulatedVenue::new("Binance")))
            .venue(Arc::new(SimulatedVenue::new("binance")))
            .build();

        assert!(matches!(result, Err(KeepError::DuplicateVenue(name)) if name == "binance"));
    }

    #[test]
    fn test_build_reports_tree_errors() {
        let result = KeepBuilder::new()
            .strategy("noop", NoopStrategy)
            .strategy("noop", NoopStrategy)
            .build();

        assert!(matches!(result, Err(KeepError::DuplicateName(_))));
    }

    #[test]
    fn test_build_validates_config() {
        let config = KeepConfig {
            event_buffer: 0,
            ..Default::default()
        };
        let result = KeepBuilder::new().config(config).build();

        assert!(matches!(result, Err(KeepError::Config(_))));
    }

    #[test]
    fn test_root_mut_composition() {
        let mut builder = KeepBuilder::new();
        builder.root_mut().add("verbose", NoopStrategy).unwrap();
        let keep = builder.build().unwrap();

        assert!(keep.root().get("verbose").is_some());
        assert_eq!(keep.pair_state("verbose", "binance"), PairState::Uninitialized);
    }

    #[test]
    fn test_venue_lookup_is_case_insensitive() {
        let keep = KeepBuilder::new()
            .venue(Arc::new(SimulatedVenue::new("Kraken")))
            .build()
            .unwrap();

        assert_eq!(keep.venue("KRAKEN").unwrap().name(), "Kraken");
        assert!(keep.venue("binance").is_none());
        assert_eq!(keep.venues().len(), 1);
    }

    #[tokio::test]
    async fn test_run_cancelled_inits_then_deinits() {
        let strategy = Arc::new(Lifecycle::default());
        let keep = KeepBuilder::new()
            .venue(Arc::new(SimulatedVenue::new("a")))
            .venue(Arc::new(SimulatedVenue::new("b")))
            .strategy_shared("lifecycle", strategy.clone())
            .build()
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = keep.run(cancel).await.unwrap();

        assert!(summary.init_failures.is_empty());
        assert_eq!(
            strategy.calls(),
            vec!["init:a", "init:b", "deinit:b", "deinit:a"]
        );
        assert_eq!(keep.pair_state("lifecycle", "a"), PairState::Deinitialized);
        assert_eq!(keep.pair_state("lifecycle", "B"), PairState::Deinitialized);
    }

    #[tokio::test]
    async fn test_failed_init_is_never_deinitialized() {
        let strategy = Arc::new(Lifecycle {
            fail_init_on: Some("b"),
            ..Default::default()
        });
        let keep = KeepBuilder::new()
            .venue(Arc::new(SimulatedVenue::new("a")))
            .venue(Arc::new(SimulatedVenue::new("b")))
            .strategy_shared("lifecycle", strategy.clone())
            .build()
            .unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = keep.run(cancel).await.unwrap();

        assert_eq!(summary.init_failures.len(), 1);
        assert_eq!(summary.init_failures[0].strategy, "lifecycle");
        assert_eq!(summary.init_failures[0].venue, "b");
        assert!(matches!(
            &summary.init_failures[0].error,
            StrategyError::Failed(msg) if msg == "refused"
        ));
        assert_eq!(strategy.calls(), vec!["init:a", "init:b", "deinit:a"]);
        assert_eq!(keep.pair_state("lifecycle", "b"), PairState::Uninitialized);
    }

    #[tokio::test]
    async fn test_second_run_fails() {
        let keep = KeepBuilder::new().build().unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        keep.run(cancel.clone()).await.unwrap();

        assert!(matches!(
            keep.run(cancel).await,
            Err(KeepError::AlreadyRunning)
        ));
    }

    #[tokio::test]
    async fn test_relay_reaches_only_live_pairs() {
        let first = Arc::new(Lifecycle::default());
        let second = Arc::new(Lifecycle::default());
        let keep = KeepBuilder::new()
            .venue(Arc::new(SimulatedVenue::new("a")))
            .venue(Arc::new(SimulatedVenue::new("b")))
            .strategy_shared("first", first.clone())
            .strategy_shared("second", second.clone())
            .build()
            .unwrap();

        let leaves = keep.root().leaves();
        // first@b and second@a only
        let live: LivePairs = [(0, 1), (1, 0)].into_iter().collect();
        let mut summary = RunSummary::default();

        for venue in ["A", "b", "c"] {
            let event = VenueEvent::unrecognized(venue, serde_json::Value::Null);
            keep.relay(&leaves, &live, event, &mut summary).await;
        }

        assert_eq!(first.calls(), vec!["event:b"]);
        assert_eq!(second.calls(), vec!["event:a"]);
        assert_eq!(summary.events_relayed, 2);
        assert_eq!(summary.callback_errors, 0);
    }
}
