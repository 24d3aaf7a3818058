//! Venue events
//!
//! Every event a venue can push is one of the payloads below, tagged with the
//! name of the venue that produced it. Payloads the venue client could not
//! classify are carried as raw JSON in [`EventPayload::Unrecognized`].

mod market;
mod order;

pub use market::{BookLevel, FundingData, KlineData, OrderBook, PriceTick};
pub use order::{BalanceChange, OrderDetail, OrderModify};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of an [`EventPayload`], handy for logging and counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Funding,
    Price,
    Kline,
    OrderBook,
    Order,
    Modify,
    BalanceChange,
    Unrecognized,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Funding => "funding",
            Self::Price => "price",
            Self::Kline => "kline",
            Self::OrderBook => "orderbook",
            Self::Order => "order",
            Self::Modify => "modify",
            Self::BalanceChange => "balance_change",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventPayload {
    Funding(FundingData),
    Price(PriceTick),
    Kline(KlineData),
    OrderBook(OrderBook),
    Order(OrderDetail),
    Modify(OrderModify),
    BalanceChange(BalanceChange),
    /// Anything the venue client could not map onto a known kind
    Unrecognized(serde_json::Value),
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Funding(_) => EventKind::Funding,
            Self::Price(_) => EventKind::Price,
            Self::Kline(_) => EventKind::Kline,
            Self::OrderBook(_) => EventKind::OrderBook,
            Self::Order(_) => EventKind::Order,
            Self::Modify(_) => EventKind::Modify,
            Self::BalanceChange(_) => EventKind::BalanceChange,
            Self::Unrecognized(_) => EventKind::Unrecognized,
        }
    }
}

/// An event together with the venue it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueEvent {
    /// Venue name, matched case-insensitively
    pub venue: String,
    pub payload: EventPayload,
}

impl VenueEvent {
    pub fn new(venue: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            venue: venue.into(),
            payload,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.payload.kind()
    }

    /// Wrap an unclassified payload
    pub fn unrecognized(venue: impl Into<String>, raw: serde_json::Value) -> Self {
        Self::new(venue, EventPayload::Unrecognized(raw))
    }
}
