//! Verbose Strategy
//!
//! Logs every callback it receives. Handy as the first strategy in a new
//! deployment to see what a venue actually sends.

use async_trait::async_trait;
use dola_core::{
    BalanceChange, FundingData, KlineData, OrderBook, OrderDetail, OrderModify, PriceTick,
};
use dola_keep::{Keep, Strategy, StrategyResult};
use dola_ports::Venue;
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Strategy that logs everything and does nothing else
#[derive(Debug, Default)]
pub struct VerboseStrategy {
    calls: AtomicU64,
}

impl VerboseStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callbacks received so far, lifecycle included
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn seen(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl Strategy for VerboseStrategy {
    async fn init(&self, _keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        self.seen();
        info!("[{}] init", venue.name());
        Ok(())
    }

    async fn on_funding(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        funding: &FundingData,
    ) -> StrategyResult<()> {
        self.seen();
        info!(
            "[{}] funding {} rate={} predicted={:?}",
            venue.name(),
            funding.pair,
            funding.rate,
            funding.predicted_rate
        );
        Ok(())
    }

    async fn on_price(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        price: &PriceTick,
    ) -> StrategyResult<()> {
        self.seen();
        info!(
            "[{}] price {} last={} bid={} ask={}",
            venue.name(),
            price.pair,
            price.last,
            price.bid,
            price.ask
        );
        Ok(())
    }

    async fn on_kline(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        kline: &KlineData,
    ) -> StrategyResult<()> {
        self.seen();
        info!(
            "[{}] kline {} {} o={} h={} l={} c={}",
            venue.name(),
            kline.pair,
            kline.interval,
            kline.open,
            kline.high,
            kline.low,
            kline.close
        );
        Ok(())
    }

    async fn on_order_book(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        book: &OrderBook,
    ) -> StrategyResult<()> {
        self.seen();
        info!(
            "[{}] orderbook {} seq={} bid={:?} ask={:?}",
            venue.name(),
            book.pair,
            book.sequence,
            book.best_bid().map(|level| level.price),
            book.best_ask().map(|level| level.price)
        );
        Ok(())
    }

    async fn on_order(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        order: &OrderDetail,
    ) -> StrategyResult<()> {
        self.seen();
        info!(
            "[{}] order {} {} {:?} {}/{}",
            venue.name(),
            order.id,
            order.side.as_str(),
            order.status,
            order.filled,
            order.amount
        );
        Ok(())
    }

    async fn on_modify(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        modify: &OrderModify,
    ) -> StrategyResult<()> {
        self.seen();
        info!(
            "[{}] modify {} price={:?} amount={:?}",
            venue.name(),
            modify.id,
            modify.price,
            modify.amount
        );
        Ok(())
    }

    async fn on_balance_change(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        change: &BalanceChange,
    ) -> StrategyResult<()> {
        self.seen();
        info!(
            "[{}] balance {} {} {}",
            venue.name(),
            change.account,
            change.currency,
            change.amount
        );
        Ok(())
    }

    async fn on_unrecognized(
        &self,
        _keep: &Arc<Keep>,
        venue: &Arc<dyn Venue>,
        raw: &serde_json::Value,
    ) -> StrategyResult<()> {
        self.seen();
        info!("[{}] unrecognized {}", venue.name(), raw);
        Ok(())
    }

    async fn deinit(&self, _keep: &Arc<Keep>, venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        self.seen();
        info!("[{}] deinit", venue.name());
        Ok(())
    }
}
