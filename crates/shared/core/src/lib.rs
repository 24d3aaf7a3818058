//! Dola Core Domain
//!
//! Pure domain types for the Dola strategy orchestrator.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod events;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{Balance, Holdings, OrderStatus, Side, SubAccount};
pub use events::{
    BalanceChange, BookLevel, EventKind, EventPayload, FundingData, KlineData, OrderBook,
    OrderDetail, OrderModify, PriceTick, VenueEvent,
};
pub use values::{Amount, Pair, Price, Timestamp, venue_key};
