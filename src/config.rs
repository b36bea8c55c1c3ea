use std::path::Path;

use anyhow::Context;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

const MAX_MONEY_SCALE: u32 = 10;

/// How money amounts are rounded to `money_scale` decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Half away from zero, the way currency is usually displayed.
    #[default]
    HalfUp,
    /// Banker's rounding.
    HalfEven,
    Truncate,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Rounding::HalfEven => RoundingStrategy::MidpointNearestEven,
            Rounding::Truncate => RoundingStrategy::ToZero,
        }
    }
}

/// Pricing engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Decimal places kept on every money amount of a result.
    pub money_scale: u32,
    pub rounding: Rounding,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            money_scale: 2,
            rounding: Rounding::HalfUp,
        }
    }
}

impl PricingConfig {
    pub fn from_json(json: &str) -> Result<Self, PricingError> {
        let config: PricingConfig =
            serde_json::from_str(json).map_err(|e| PricingError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading pricing config {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("parsing pricing config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        if self.money_scale > MAX_MONEY_SCALE {
            return Err(PricingError::InvalidConfig(format!(
                "money_scale must be at most {MAX_MONEY_SCALE}, got {}",
                self.money_scale
            )));
        }
        Ok(())
    }

    /// Rounds a money amount according to this config.
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.money_scale, self.rounding.strategy())
    }
}
