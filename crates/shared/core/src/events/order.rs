//! Order lifecycle and account events

use crate::entities::{OrderStatus, Side};
use crate::values::{Amount, Pair, Price, Timestamp};
use serde::{Deserialize, Serialize};

/// State of an order as pushed by the venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Venue-assigned order ID
    pub id: String,
    pub pair: Pair,
    pub side: Side,
    pub status: OrderStatus,
    /// Limit price, `None` for market orders
    pub price: Option<Price>,
    pub amount: Amount,
    pub filled: Amount,
    pub timestamp: Timestamp,
}

/// Acknowledgement that an order was amended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderModify {
    pub id: String,
    pub pair: Pair,
    pub price: Option<Price>,
    pub amount: Option<Amount>,
    pub timestamp: Timestamp,
}

/// Push notification that a balance changed on the venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// Sub-account the change applies to
    pub account: String,
    pub currency: String,
    /// New total for the currency
    pub amount: Amount,
    pub timestamp: Timestamp,
}
