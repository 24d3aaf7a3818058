//! Market data events

use crate::values::{Amount, Pair, Price, Timestamp};
use serde::{Deserialize, Serialize};

/// Funding rate update for a perpetual contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingData {
    pub pair: Pair,
    /// Rate applied at the current funding interval
    pub rate: Price,
    /// Venue estimate for the next interval, if published
    pub predicted_rate: Option<Price>,
    pub next_funding: Option<Timestamp>,
    pub timestamp: Timestamp,
}

/// Top-of-book price tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub pair: Pair,
    pub last: Price,
    pub bid: Price,
    pub ask: Price,
    /// Rolling volume as reported by the venue
    pub volume: Amount,
    pub timestamp: Timestamp,
}

impl PriceTick {
    /// Mid price between best bid and best ask
    pub fn mid(&self) -> Price {
        (self.bid + self.ask) / Price::TWO
    }
}

/// Candle (kline) update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineData {
    pub pair: Pair,
    /// Candle width as the venue names it, e.g. `1m`
    pub interval: String,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Amount,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Order book level (price + amount)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Price,
    pub amount: Amount,
}

impl BookLevel {
    pub fn new(price: Price, amount: Amount) -> Self {
        Self { price, amount }
    }
}

/// Order book snapshot as pushed by a venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub pair: Pair,
    /// Bids, best (highest) first
    pub bids: Vec<BookLevel>,
    /// Asks, best (lowest) first
    pub asks: Vec<BookLevel>,
    pub sequence: u64,
    pub timestamp: Timestamp,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&BookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&BookLevel> {
        self.asks.first()
    }

    /// Best ask minus best bid, if both sides are present
    pub fn spread(&self) -> Option<Price> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }
}
