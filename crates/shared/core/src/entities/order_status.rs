use serde::{Deserialize, Serialize};

/// Order lifecycle status as reported by a venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order accepted by the venue, nothing filled yet
    New,
    /// Order has been partially filled
    PartiallyFilled,
    /// Order has been completely filled
    Filled,
    /// Order has been cancelled
    Cancelled,
    /// Order was rejected by the venue
    Rejected,
    /// Order has expired
    Expired,
    /// Venue reported a status we do not model
    Unknown,
}

