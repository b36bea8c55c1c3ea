//! Pricing tiers of a product listing.
//!
//! A product carries one base price and any number of installment tiers.
//! Each tier owns its own terms and is recomputed in full whenever its terms
//! or the product price change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::PricingEngine;
use crate::error::PricingError;
use crate::plan::{InterestMethod, PlanInput, PlanResult, PlanValidation};

/// The fields an admin edits on a single tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierTerms {
    #[serde(default)]
    pub down_payment: Decimal,
    #[serde(default)]
    pub markup: Decimal,
    pub tenure_months: i64,
    pub annual_rate_percent: Decimal,
    #[serde(default)]
    pub interest_method: InterestMethod,
}

impl TierTerms {
    fn to_input(&self, product_price: Decimal) -> PlanInput {
        PlanInput {
            product_price,
            down_payment: self.down_payment,
            markup: self.markup,
            tenure_months: self.tenure_months,
            annual_rate_percent: self.annual_rate_percent,
            interest_method: self.interest_method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTier {
    pub terms: TierTerms,
    pub input: PlanInput,
    pub result: PlanResult,
}

impl PlanTier {
    fn price(engine: &PricingEngine, product_price: Decimal, terms: TierTerms) -> Self {
        let input = terms.to_input(product_price);
        let result = engine.recalculate(&input);
        Self { terms, input, result }
    }
}

#[derive(Debug, Clone)]
pub struct ProductPricing {
    product_price: Decimal,
    tiers: Vec<PlanTier>,
    engine: PricingEngine,
}

impl ProductPricing {
    pub fn new(product_price: Decimal) -> Self {
        Self::with_engine(product_price, PricingEngine::default())
    }

    pub fn with_engine(product_price: Decimal, engine: PricingEngine) -> Self {
        Self {
            product_price,
            tiers: Vec::new(),
            engine,
        }
    }

    pub fn product_price(&self) -> Decimal {
        self.product_price
    }

    pub fn tiers(&self) -> &[PlanTier] {
        &self.tiers
    }

    pub fn tier(&self, index: usize) -> Option<&PlanTier> {
        self.tiers.get(index)
    }

    /// Adds a tier and returns its index.
    pub fn add_tier(&mut self, terms: TierTerms) -> usize {
        let tier = PlanTier::price(&self.engine, self.product_price, terms);
        let index = self.tiers.len();
        warn_if_invalid(index, &tier);
        self.tiers.push(tier);
        index
    }

    /// Replaces the terms of a tier and recomputes it.
    pub fn update_tier(&mut self, index: usize, terms: TierTerms) -> Result<&PlanTier, PricingError> {
        let len = self.tiers.len();
        let slot = self
            .tiers
            .get_mut(index)
            .ok_or(PricingError::TierNotFound { index, len })?;

        *slot = PlanTier::price(&self.engine, self.product_price, terms);
        warn_if_invalid(index, slot);
        Ok(&*slot)
    }

    pub fn remove_tier(&mut self, index: usize) -> Result<PlanTier, PricingError> {
        if index >= self.tiers.len() {
            return Err(PricingError::TierNotFound {
                index,
                len: self.tiers.len(),
            });
        }
        Ok(self.tiers.remove(index))
    }

    /// Changes the base price and recomputes every tier.
    pub fn set_product_price(&mut self, product_price: Decimal) {
        self.product_price = product_price;
        for tier in &mut self.tiers {
            *tier = PlanTier::price(&self.engine, product_price, tier.terms.clone());
        }
        debug!(%product_price, tiers = self.tiers.len(), "product price changed, tiers recomputed");
    }

    /// Tiers whose inputs need the admin's attention.
    pub fn warnings(&self) -> impl Iterator<Item = (usize, PlanValidation)> + '_ {
        self.tiers
            .iter()
            .enumerate()
            .filter(|(_, tier)| tier.result.validation != PlanValidation::Valid)
            .map(|(index, tier)| (index, tier.result.validation))
    }
}

fn warn_if_invalid(index: usize, tier: &PlanTier) {
    if tier.result.validation == PlanValidation::DownPaymentExceedsPrice {
        warn!(
            tier = index,
            down_payment = %tier.input.down_payment,
            product_price = %tier.input.product_price,
            markup = %tier.input.markup,
            "down payment exceeds price plus markup"
        );
    }
}
