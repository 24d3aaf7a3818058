//! Dola Keep
//!
//! Strategy orchestration for the Dola workspace:
//! - [`Strategy`]: the callback contract every strategy implements
//! - [`Node`]: named tree strategies are registered in
//! - [`Keep`]: attaches strategies to venues and relays venue events
//!
//! ## Lifecycle
//!
//! ```text
//! KeepBuilder ──build──► Keep ──run(cancel)──►
//!     init   every (strategy, venue) pair, pre-order × venue order
//!     relay  events from the publisher to initialized pairs
//!     deinit initialized pairs in reverse order once cancelled
//! ```

pub mod config;
pub mod error;
pub mod keep;
pub mod node;
pub mod strategy;

// Re-export commonly used types
pub use config::{ConfigError, KeepConfig, load_config, load_config_from_str};
pub use error::{KeepError, Result, StrategyError, StrategyResult};
pub use keep::{InitFailure, Keep, KeepBuilder, PairState, RunSummary};
pub use node::{Node, PATH_SEPARATOR};
pub use strategy::{NoopStrategy, Strategy};

pub use tokio_util::sync::CancellationToken;
