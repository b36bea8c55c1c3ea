use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use tracing::{debug, trace};

use crate::config::PricingConfig;
use crate::form::{parse_amount, PlanForm};
use crate::plan::{InterestMethod, NotComputable, PlanInput, PlanOutcome, PlanResult, PlanValidation};

/// Amount actually financed: `max(0, product_price - down_payment + markup)`.
///
/// A down payment larger than price plus markup is clamped to a zero
/// principal; see [`PlanValidation`] for surfacing that state.
pub fn compute_principal(product_price: Decimal, down_payment: Decimal, markup: Decimal) -> Decimal {
    product_price
        .saturating_sub(down_payment)
        .saturating_add(markup)
        .max(Decimal::ZERO)
}

/// Converts an annual percentage into the periodic rate of one month.
///
/// 12 (%) becomes 0.01.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Monthly installment under flat-rate interest.
///
/// Interest is charged once on the original principal for the whole tenure:
/// `(principal + principal * rate/100 * months/12) / months`.
///
/// Returns zero when `months <= 0` or when the amounts overflow.
pub fn flat_rate_monthly_payment(principal: Decimal, annual_rate_percent: Decimal, months: i64) -> Decimal {
    checked_flat_rate_monthly_payment(principal, annual_rate_percent, months).unwrap_or(Decimal::ZERO)
}

/// Like [`flat_rate_monthly_payment`] but reports overflow as `None`.
pub fn checked_flat_rate_monthly_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: i64,
) -> Option<Decimal> {
    if months <= 0 {
        return Some(Decimal::ZERO);
    }
    let n = Decimal::from(months);

    // rate/100 * months/12 folded into a single division to stay exact
    let interest = principal
        .checked_mul(annual_rate_percent)?
        .checked_mul(n)?
        .checked_div(dec!(1200))?;

    principal.checked_add(interest)?.checked_div(n)
}

/// Monthly installment of a reducing-balance (annuity) loan.
///
/// PMT = P * r / (1 - (1 + r)^-n), with r the monthly rate. A zero rate
/// degrades to straight division of the principal. For tenures long enough
/// that `(1 + r)^-n` vanishes the payment converges to `P * r`.
///
/// Returns zero when `months <= 0` or when the amounts overflow.
pub fn amortized_monthly_payment(principal: Decimal, annual_rate_percent: Decimal, months: i64) -> Decimal {
    checked_amortized_monthly_payment(principal, annual_rate_percent, months).unwrap_or(Decimal::ZERO)
}

/// Like [`amortized_monthly_payment`] but reports overflow as `None`.
pub fn checked_amortized_monthly_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: i64,
) -> Option<Decimal> {
    if months <= 0 {
        return Some(Decimal::ZERO);
    }
    let n = Decimal::from(months);
    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return principal.checked_div(n);
    }

    let per_period = principal.checked_mul(r)?;
    let discount = match Decimal::ONE.checked_add(r)?.checked_powu(months as u64) {
        Some(factor) => Decimal::ONE.checked_div(factor)?,
        // (1+r)^n out of range: (1+r)^-n is below Decimal precision
        None => Decimal::ZERO,
    };
    let annuity = Decimal::ONE - discount;
    if annuity.is_zero() {
        // r is below Decimal precision
        return principal.checked_div(n);
    }

    per_period.checked_div(annuity)
}

/// Rejects inputs the formulas must not see.
fn check_input(input: &PlanInput) -> Result<(), NotComputable> {
    if input.tenure_months < 0 {
        return Err(NotComputable::NegativeTenure);
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(NotComputable::NegativeRate);
    }
    for (field, value) in [
        ("productPrice", input.product_price),
        ("downPayment", input.down_payment),
        ("markup", input.markup),
    ] {
        if value < Decimal::ZERO {
            return Err(NotComputable::NegativeAmount { field });
        }
    }
    if input.tenure_months == 0 {
        return Err(NotComputable::ZeroTenure);
    }
    Ok(())
}

/// Prices installment plans.
///
/// The engine holds only its [`PricingConfig`]; every call is a pure
/// function of the input, so one engine can serve any number of tiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Computes the full [`PlanResult`] of `input`.
    ///
    /// Never fails: inputs that cannot be priced give a zeroed result whose
    /// outcome says why.
    pub fn recalculate(&self, input: &PlanInput) -> PlanResult {
        let validation = PlanValidation::of(input);

        if let Err(reason) = check_input(input) {
            return self.not_computable(input.down_payment, reason, validation);
        }

        let principal = compute_principal(input.product_price, input.down_payment, input.markup);
        let rate = input.annual_rate_percent;
        let months = input.tenure_months;

        let monthly = match input.interest_method {
            InterestMethod::FlatRate => checked_flat_rate_monthly_payment(principal, rate, months),
            InterestMethod::ReducingBalance => checked_amortized_monthly_payment(principal, rate, months),
            // No dedicated formula yet: priced as reducing balance.
            InterestMethod::CompoundInterest => checked_amortized_monthly_payment(principal, rate, months),
            // No dedicated formula yet: priced as reducing balance.
            InterestMethod::IslamicProfitBased => {
                checked_amortized_monthly_payment(principal, rate, months)
            }
        };

        // The total comes from the unrounded installment, rounded once.
        let Some((monthly, total)) =
            monthly.and_then(|m| m.checked_mul(Decimal::from(months)).map(|total| (m, total)))
        else {
            return self.not_computable(input.down_payment, NotComputable::Overflow, validation);
        };

        let total_payable = self.config.round(total);
        let total_interest = self.config.round(total_payable - principal);
        let monthly_installment = self.config.round(monthly);

        trace!(
            method = %input.interest_method,
            %principal,
            %monthly_installment,
            %total_payable,
            "plan recalculated"
        );

        PlanResult {
            principal,
            down_payment: input.down_payment,
            monthly_installment,
            total_payable,
            total_interest,
            outcome: PlanOutcome::Computed,
            validation,
        }
    }

    /// Parses raw form values and prices them.
    ///
    /// A missing or malformed field gives a result that is
    /// `NotComputable::InvalidField` instead of an error.
    pub fn recalculate_form(&self, form: &PlanForm) -> PlanResult {
        match form.to_input() {
            Ok(input) => self.recalculate(&input),
            Err(err) => {
                let field = err.field().unwrap_or("form");
                debug!(%err, field, "plan form not computable");
                let amount = |name, raw: &Option<String>| {
                    parse_amount(name, raw.as_deref()).ok().flatten()
                };
                let down_payment = amount("downPayment", &form.down_payment).unwrap_or(Decimal::ZERO);

                // Warn from whatever did parse; without a price there is nothing to compare.
                let validation = match amount("productPrice", &form.product_price) {
                    Some(product_price) => PlanValidation::of(&PlanInput {
                        product_price,
                        down_payment,
                        markup: amount("markup", &form.markup).unwrap_or(Decimal::ZERO),
                        ..Default::default()
                    }),
                    None => PlanValidation::Valid,
                };

                PlanResult::zeroed(
                    PlanOutcome::NotComputable(NotComputable::InvalidField { field }),
                    validation,
                    down_payment,
                )
            }
        }
    }

    fn not_computable(
        &self,
        down_payment: Decimal,
        reason: NotComputable,
        validation: PlanValidation,
    ) -> PlanResult {
        debug!(%reason, "plan not computable");
        PlanResult::zeroed(PlanOutcome::NotComputable(reason), validation, down_payment)
    }
}

/// Prices `input` with the default [`PricingConfig`] (cents, half-up).
pub fn recalculate(input: &PlanInput) -> PlanResult {
    PricingEngine::default().recalculate(input)
}
