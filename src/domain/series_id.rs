use serde::{Deserialize, Serialize};

use crate::domain::Period;
use crate::error::ConfigError;

/// Identity of one append-only series: (exchange, pair, period).
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct SeriesId {
    exchange: String,
    pair: String,
    period: Period,
}

impl SeriesId {
    pub fn new(exchange: &str, pair: &str, period: Period) -> Result<Self, ConfigError> {
        Ok(Self {
            exchange: validate_field("exchange", exchange)?,
            pair: validate_field("pair", pair)?,
            period,
        })
    }

    /// Build an id from raw user input. The period is checked first so an
    /// unknown code is reported even when other fields are also bad.
    pub fn parse(exchange: &str, pair: &str, period_code: &str) -> Result<Self, ConfigError> {
        let period = Period::from_code(period_code)?;
        Self::new(exchange, pair, period)
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn period(&self) -> Period {
        self.period
    }
}

// Both fields end up as URL path segments and directory names, so keep them to a
// conservative character set (lowercased, as the market API expects).
fn validate_field(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(ConfigError::InvalidField {
            field,
            value: value.to_string(),
            bad,
        });
    }
    Ok(value.to_ascii_lowercase())
}

// Same addressing as the dataset path in the store: /exchange/pair/period
impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "/{}/{}/{}", self.exchange, self.pair, self.period)
    }
}
