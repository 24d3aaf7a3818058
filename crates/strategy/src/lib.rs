//! Dola Strategies
//!
//! Built-in strategies for the Dola keep:
//! - [`TickerStrategy`]: periodic callbacks per venue, for pull-based APIs
//! - [`BalancesStrategy`]: holdings cache refreshed by a ticker
//! - [`VerboseStrategy`]: logs every callback
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dola_keep::{CancellationToken, KeepBuilder};
//! use dola_strategy::{BalancesStrategy, VerboseStrategy};
//!
//! let keep = KeepBuilder::new()
//!     .venue(venue)
//!     .strategy("verbose", VerboseStrategy::new())
//!     .strategy("balances", BalancesStrategy::new(Duration::from_secs(30))?)
//!     .build()?;
//!
//! keep.run(CancellationToken::new()).await?;
//! ```

pub mod balances;
pub mod ticker;
pub mod verbose;

// Re-export main types
pub use balances::{BalancesError, BalancesStrategy};
pub use ticker::{DEFAULT_STOP_TIMEOUT, FnTick, TickHandler, TickerConfig, TickerStrategy};
pub use verbose::VerboseStrategy;
