//! `installment_pricing` prices installment plans for a financing marketplace.
//!
//! Given a product price, a down payment, an optional markup, a tenure and an
//! annual rate, it derives the principal financed, the monthly installment,
//! the total payable and the total interest. Two formulas are supported:
//! - **Flat rate**: interest is charged once on the original principal for
//!   the whole tenure, then spread evenly over the installments.
//! - **Reducing balance**: the standard annuity formula, where interest is
//!   charged on the outstanding balance and every installment is equal.
//!
//! The engine never fails. Plans that cannot be priced (zero tenure, negative
//! or missing fields, amounts out of range) produce a zeroed [`PlanResult`]
//! whose [`PlanOutcome`] says why.
//!
//! ## Usage
//!
//! Add `installment_pricing` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! installment_pricing = "0.1.0"
//! rust_decimal = "1.39.0"
//! rust_decimal_macros = "1.39.0"
//! ```
//!
//! Then price a plan with [`recalculate`]:
//!
//! ```rust
//! use installment_pricing::{recalculate, InterestMethod, PlanInput};
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let input = PlanInput {
//!         product_price: dec!(120_000),
//!         down_payment: dec!(20_000),
//!         markup: dec!(0),
//!         tenure_months: 12,
//!         annual_rate_percent: dec!(12),
//!         interest_method: InterestMethod::FlatRate,
//!     };
//!
//!     let result = recalculate(&input);
//!     println!("Principal:   {}", result.principal);
//!     println!("Installment: {}", result.monthly_installment);
//!     println!("Total:       {}", result.total_payable);
//!     assert_eq!(result.monthly_installment, dec!(9333.33));
//! }
//! ```
//!
//! Raw text from form inputs goes through [`PlanForm`], and a product's list
//! of tiers through [`ProductPricing`].

pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod plan;
pub mod schedule;
pub mod tiers;

pub use config::{PricingConfig, Rounding};
pub use engine::{
    amortized_monthly_payment, checked_amortized_monthly_payment, checked_flat_rate_monthly_payment,
    compute_principal, flat_rate_monthly_payment, monthly_rate, recalculate, PricingEngine,
};
pub use error::PricingError;
pub use form::PlanForm;
pub use plan::{InterestMethod, NotComputable, PlanInput, PlanOutcome, PlanResult, PlanValidation};
pub use schedule::{
    amortization_schedule, residual_balance, summarize, MonthPayment, ScheduleSummary, MAX_SCHEDULE_MONTHS,
};
pub use tiers::{PlanTier, ProductPricing, TierTerms};
