use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// Formula used to turn a principal into monthly installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    /// Interest charged once on the original principal for the whole tenure.
    FlatRate,
    /// Interest charged on the outstanding balance (annuity).
    #[default]
    ReducingBalance,
    CompoundInterest,
    IslamicProfitBased,
}

impl InterestMethod {
    pub const ALL: [InterestMethod; 4] = [
        InterestMethod::FlatRate,
        InterestMethod::ReducingBalance,
        InterestMethod::CompoundInterest,
        InterestMethod::IslamicProfitBased,
    ];

    /// Label shown in the dashboard's method selector.
    pub fn label(self) -> &'static str {
        match self {
            InterestMethod::FlatRate => "Flat Rate",
            InterestMethod::ReducingBalance => "Reducing Balance",
            InterestMethod::CompoundInterest => "Compound Interest",
            InterestMethod::IslamicProfitBased => "Islamic Profit-Based",
        }
    }
}

impl fmt::Display for InterestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InterestMethod {
    type Err = PricingError;

    /// Accepts both the snake_case wire names and the display labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match key.as_str() {
            "flat_rate" | "flat" => Ok(InterestMethod::FlatRate),
            "reducing_balance" => Ok(InterestMethod::ReducingBalance),
            "compound_interest" => Ok(InterestMethod::CompoundInterest),
            "islamic_profit_based" => Ok(InterestMethod::IslamicProfitBased),
            _ => Err(PricingError::UnknownInterestMethod(s.to_string())),
        }
    }
}

/// Pricing parameters of a single installment plan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    /// Base price of the item being financed.
    pub product_price: Decimal,
    /// Amount paid upfront.
    #[serde(default)]
    pub down_payment: Decimal,
    /// Fixed surcharge added to the principal before any interest.
    #[serde(default)]
    pub markup: Decimal,
    /// Number of monthly installments.
    pub tenure_months: i64,
    /// Nominal annual rate as a percentage (12.5 means 12.5%).
    pub annual_rate_percent: Decimal,
    #[serde(default)]
    pub interest_method: InterestMethod,
}

/// Why a plan produced no figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotComputable {
    ZeroTenure,
    NegativeTenure,
    NegativeRate,
    NegativeAmount { field: &'static str },
    /// A form field was missing, malformed or non-finite.
    InvalidField { field: &'static str },
    /// An intermediate value left the `Decimal` range.
    Overflow,
}

impl fmt::Display for NotComputable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotComputable::ZeroTenure => f.write_str("tenure is zero"),
            NotComputable::NegativeTenure => f.write_str("tenure is negative"),
            NotComputable::NegativeRate => f.write_str("annual rate is negative"),
            NotComputable::NegativeAmount { field } => write!(f, "`{field}` is negative"),
            NotComputable::InvalidField { field } => write!(f, "`{field}` is missing or invalid"),
            NotComputable::Overflow => f.write_str("amounts out of range"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    Computed,
    NotComputable(NotComputable),
}

/// Consistency check of the inputs, reported next to the figures so the
/// dashboard can warn without blocking the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanValidation {
    #[default]
    Valid,
    /// The down payment is larger than price plus markup; the principal was
    /// clamped to zero.
    DownPaymentExceedsPrice,
}

impl PlanValidation {
    pub fn of(input: &PlanInput) -> Self {
        if input.down_payment > input.product_price.saturating_add(input.markup) {
            PlanValidation::DownPaymentExceedsPrice
        } else {
            PlanValidation::Valid
        }
    }
}

/// Figures derived from a [`PlanInput`]. Always rebuilt from scratch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub principal: Decimal,
    pub down_payment: Decimal,
    pub monthly_installment: Decimal,
    pub total_payable: Decimal,
    pub total_interest: Decimal,
    pub outcome: PlanOutcome,
    pub validation: PlanValidation,
}

impl PlanResult {
    /// A result with every derived amount at zero.
    pub fn zeroed(outcome: PlanOutcome, validation: PlanValidation, down_payment: Decimal) -> Self {
        Self {
            principal: Decimal::ZERO,
            down_payment,
            monthly_installment: Decimal::ZERO,
            total_payable: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            outcome,
            validation,
        }
    }

    pub fn is_computed(&self) -> bool {
        self.outcome == PlanOutcome::Computed
    }
}
