use installment_pricing::{
    amortized_monthly_payment, compute_principal, flat_rate_monthly_payment, recalculate,
    residual_balance, InterestMethod, PlanInput, ProductPricing, TierTerms,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Money amounts up to 10 million, in cents.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Annual rates from 0% to 36%, in basis points.
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0i64..=3600).prop_map(|bps| Decimal::new(bps, 2))
}

fn arb_method() -> impl Strategy<Value = InterestMethod> {
    prop::sample::select(InterestMethod::ALL.to_vec())
}

fn arb_input() -> impl Strategy<Value = PlanInput> {
    (arb_amount(), arb_amount(), arb_amount(), -12i64..=360, arb_rate(), arb_method()).prop_map(
        |(product_price, down_payment, markup, tenure_months, annual_rate_percent, interest_method)| {
            PlanInput {
                product_price,
                down_payment,
                markup,
                tenure_months,
                annual_rate_percent,
                interest_method,
            }
        },
    )
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn principal_is_never_negative(price in arb_amount(), down in arb_amount(), markup in arb_amount()) {
        prop_assert!(compute_principal(price, down, markup) >= Decimal::ZERO);
    }

    #[test]
    fn non_positive_months_price_to_zero(principal in arb_amount(), rate in arb_rate(), months in -360i64..=0) {
        prop_assert_eq!(flat_rate_monthly_payment(principal, rate, months), Decimal::ZERO);
        prop_assert_eq!(amortized_monthly_payment(principal, rate, months), Decimal::ZERO);
    }

    #[test]
    fn flat_rate_total_matches_closed_form(principal in arb_amount(), rate in arb_rate(), months in 1i64..=360) {
        let n = Decimal::from(months);
        let total = flat_rate_monthly_payment(principal, rate, months) * n;
        let expected = principal * (Decimal::ONE + rate / dec!(100) * n / dec!(12));
        prop_assert!((total - expected).abs() <= dec!(0.0000000001), "{} != {}", total, expected);
    }

    #[test]
    fn zero_rate_amortization_is_straight_division(principal in arb_amount(), months in 1i64..=360) {
        prop_assert_eq!(
            amortized_monthly_payment(principal, Decimal::ZERO, months),
            principal / Decimal::from(months)
        );
    }

    #[test]
    fn annuity_retires_principal(principal in arb_amount(), rate in arb_rate(), months in 1i64..=360) {
        let residual = residual_balance(principal, rate, months, InterestMethod::ReducingBalance);
        prop_assert!(residual.abs() <= dec!(0.000001), "residual {}", residual);
    }

    #[test]
    fn total_interest_is_payable_minus_principal(input in arb_input()) {
        let result = recalculate(&input);
        prop_assert_eq!(result.total_interest, result.total_payable - result.principal);
    }

    #[test]
    fn recalculate_is_idempotent(input in arb_input()) {
        prop_assert_eq!(recalculate(&input), recalculate(&input));
    }

    #[test]
    fn price_change_matches_fresh_recalculation(
        price in arb_amount(),
        new_price in arb_amount(),
        down in arb_amount(),
        months in 1i64..=120,
        rate in arb_rate(),
        method in arb_method(),
    ) {
        let mut product = ProductPricing::new(price);
        product.add_tier(TierTerms {
            down_payment: down,
            markup: Decimal::ZERO,
            tenure_months: months,
            annual_rate_percent: rate,
            interest_method: method,
        });
        product.set_product_price(new_price);

        let tier = product.tier(0).unwrap();
        prop_assert_eq!(tier.input.product_price, new_price);
        prop_assert_eq!(&tier.result, &recalculate(&tier.input));
    }
}
