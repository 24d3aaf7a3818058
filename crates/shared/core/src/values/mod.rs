use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Amount of a currency or contract - uses Decimal for precision
pub type Amount = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Currency pair as reported by the venue, e.g. `BTC-USDT`
pub type Pair = String;

/// Normalize a venue name into the key used by every registry and cache.
///
/// Venue names are case-insensitive throughout the system, so `"Binance"`,
/// `"BINANCE"` and `"binance"` all map to the same key.
pub fn venue_key(name: &str) -> String {
    name.trim().to_lowercase()
}
