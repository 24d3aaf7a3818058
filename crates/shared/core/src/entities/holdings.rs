//! Account holdings snapshots

use crate::values::Amount;
use serde::{Deserialize, Serialize};

/// Balance of a single currency inside a sub-account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Currency code, e.g. `BTC`
    pub currency: String,
    /// Total amount held, including amounts locked in orders
    pub total: Amount,
    /// Amount locked (open orders, pending withdrawals)
    pub hold: Amount,
}

impl Balance {
    pub fn new(currency: impl Into<String>, total: Amount, hold: Amount) -> Self {
        Self {
            currency: currency.into(),
            total,
            hold,
        }
    }

    /// Amount available for trading
    pub fn free(&self) -> Amount {
        self.total - self.hold
    }
}

/// One sub-account on a venue (spot wallet, margin wallet, ...)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubAccount {
    pub id: String,
    pub currencies: Vec<Balance>,
}

impl SubAccount {
    pub fn new(id: impl Into<String>, currencies: Vec<Balance>) -> Self {
        Self {
            id: id.into(),
            currencies,
        }
    }

    /// First balance whose currency code matches exactly
    pub fn balance(&self, code: &str) -> Option<&Balance> {
        self.currencies.iter().find(|b| b.currency == code)
    }
}

/// Snapshot of every sub-account held on one venue
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Holdings {
    /// Name of the venue the snapshot was taken from
    pub venue: String,
    pub accounts: Vec<SubAccount>,
}

impl Holdings {
    pub fn new(venue: impl Into<String>, accounts: Vec<SubAccount>) -> Self {
        Self {
            venue: venue.into(),
            accounts,
        }
    }
}
