use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::supplier::TotalFare;

// String form is "<amount> <CCC>": one space followed by a three letter code.
const CURRENCY_SUFFIX_LEN: usize = 4;

#[derive(Error, Debug, PartialEq)]
pub enum PriceParseError {
    #[error("Price too short: {0:?}")]
    TooShort(String),

    #[error("Invalid amount in price: {0:?}")]
    InvalidAmount(String),

    #[error("Invalid currency in price: {0:?}")]
    InvalidCurrency(String),
}

/// Offer total kept as a structured pair; the string form exists only on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }

    /// Value used for ordering. Non-finite amounts degrade to zero.
    pub fn sort_key(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount
        } else {
            0.0
        }
    }

    pub fn cmp_amount(&self, other: &Self) -> Ordering {
        self.sort_key()
            .partial_cmp(&other.sort_key())
            .unwrap_or(Ordering::Equal)
    }
}

// Falls back to the equivalent, then base fare currency when the total omits it.
impl From<&TotalFare> for Price {
    fn from(fare: &TotalFare) -> Self {
        let currency = [
            &fare.currency,
            &fare.equivalent_currency,
            &fare.base_fare_currency,
        ]
        .into_iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty())
        .unwrap_or_default();

        Price::new(fare.total_price, currency)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.currency.is_empty() {
            write!(f, "{:.2}", self.amount)
        } else {
            write!(f, "{:.2} {}", self.amount, self.currency)
        }
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() <= CURRENCY_SUFFIX_LEN || !s.is_char_boundary(s.len() - CURRENCY_SUFFIX_LEN) {
            return Err(PriceParseError::TooShort(s.to_string()));
        }
        let (amount, suffix) = s.split_at(s.len() - CURRENCY_SUFFIX_LEN);
        let currency = suffix
            .strip_prefix(' ')
            .filter(|code| code.bytes().all(|b| b.is_ascii_alphabetic()))
            .ok_or_else(|| PriceParseError::InvalidCurrency(s.to_string()))?;
        let amount = amount
            .parse::<f64>()
            .map_err(|_| PriceParseError::InvalidAmount(s.to_string()))?;

        Ok(Price::new(amount, currency))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
