use std::fmt;

use serde::{Deserialize, Serialize};

/// Price threshold of a watch, in ETH. Always finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TargetPrice(f64);

impl TargetPrice {
    pub fn parse(s: &str) -> Result<Self, TargetPriceError> {
        let trimmed = s.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| TargetPriceError::NotANumber(s.to_string()))?;
        Self::new(value)
    }

    pub fn new(value: f64) -> Result<Self, TargetPriceError> {
        if !value.is_finite() {
            return Err(TargetPriceError::NotFinite(value.to_string()));
        }
        if value < 0.0 {
            return Err(TargetPriceError::Negative(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for TargetPrice {
    type Error = TargetPriceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetPrice> for f64 {
    fn from(p: TargetPrice) -> Self {
        p.0
    }
}

impl fmt::Display for TargetPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_price(self.0))
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum TargetPriceError {
    #[error("invalid price: {0} (expected a number such as 2.5)")]
    NotANumber(String),
    #[error("invalid price: {0} (must be finite)")]
    NotFinite(String),
    #[error("invalid price: {0} (must not be negative)")]
    Negative(String),
}

/// Render a price the way users typed it: integral values keep one decimal.
pub fn format_price(value: f64) -> String {
    format!("{:?}", value)
}
