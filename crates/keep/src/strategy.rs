//! Strategy Trait
//!
//! Defines the capability set every strategy implements. The keep calls
//! `init` once per (strategy, venue) pair, relays venue events to the
//! matching `on_*` method and calls `deinit` once per pair on shutdown.
//!
//! Every method has a no-op default, so a strategy only overrides the
//! callbacks it cares about. Callbacks take `&self`: the same strategy is
//! attached to several venues and may be called from timer tasks, so any
//! state it keeps needs interior mutability.

use crate::error::StrategyResult;
use crate::keep::Keep;
use async_trait::async_trait;
use dola_core::{
    BalanceChange, FundingData, KlineData, OrderBook, OrderDetail, OrderModify, PriceTick,
};
use dola_ports::Venue;
use std::sync::Arc;

/// Strategy trait - implement this for your strategy
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Called once per venue before any event for that venue is delivered.
    /// An error leaves this (strategy, venue) pair detached.
    async fn init(&self, _keep: &Arc<Keep>, _venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        Ok(())
    }

    /// Funding rate update
    async fn on_funding(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _funding: &FundingData,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Price tick
    async fn on_price(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _price: &PriceTick,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Candle update
    async fn on_kline(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _kline: &KlineData,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Order book snapshot
    async fn on_order_book(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _book: &OrderBook,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Order state change
    async fn on_order(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _order: &OrderDetail,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Order amended
    async fn on_modify(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _modify: &OrderModify,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Balance changed on the venue
    async fn on_balance_change(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _change: &BalanceChange,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Catch-all for payloads the venue client could not classify
    async fn on_unrecognized(
        &self,
        _keep: &Arc<Keep>,
        _venue: &Arc<dyn Venue>,
        _raw: &serde_json::Value,
    ) -> StrategyResult<()> {
        Ok(())
    }

    /// Called once per initialized venue on shutdown. Errors are logged only.
    async fn deinit(&self, _keep: &Arc<Keep>, _venue: &Arc<dyn Venue>) -> StrategyResult<()> {
        Ok(())
    }
}

/// Strategy that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStrategy;

impl Strategy for NoopStrategy {}
