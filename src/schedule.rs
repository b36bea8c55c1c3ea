//! Month-by-month breakdown of an installment plan.
//!
//! - **Reducing balance**: every installment is the same; the interest share is
//!   charged on the outstanding balance and shrinks as the balance is repaid.
//! - **Flat rate**: interest is fixed up front, so every month carries the same
//!   interest share and the same principal share.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{checked_amortized_monthly_payment, checked_flat_rate_monthly_payment, monthly_rate};
use crate::plan::InterestMethod;

/// Longest tenure a schedule is built for: 100 years of monthly installments.
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

/// One installment of a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPayment {
    /// 1-based installment number.
    pub month: u32,
    pub payment: Decimal,
    /// The portion of the payment that covers interest.
    pub interest: Decimal,
    /// The portion of the payment that reduces the principal.
    pub principal_portion: Decimal,
    /// Outstanding principal after this payment.
    pub balance: Decimal,
}

/// Totals of a schedule, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub total_paid: Decimal,
    pub total_interest: Decimal,
    pub total_principal: Decimal,
}

/// Builds the installment schedule of a plan.
///
/// Empty when `months <= 0`, when `months` exceeds [`MAX_SCHEDULE_MONTHS`] or
/// when the installment cannot be computed.
/// Values are unrounded; `balance` is floored at zero.
pub fn amortization_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: i64,
    method: InterestMethod,
) -> Vec<MonthPayment> {
    build(principal, annual_rate_percent, months, method)
        .map(|(curve, _)| curve)
        .unwrap_or_default()
}

/// Principal left after the last installment, without the zero floor.
///
/// For a correct schedule this is zero up to `Decimal` precision. Without a
/// schedule (see [`amortization_schedule`]) the whole principal is left.
pub fn residual_balance(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: i64,
    method: InterestMethod,
) -> Decimal {
    build(principal, annual_rate_percent, months, method)
        .map(|(_, residual)| residual)
        .unwrap_or(principal)
}

pub fn summarize(schedule: &[MonthPayment]) -> ScheduleSummary {
    let mut total_paid = dec!(0);
    let mut total_interest = dec!(0);
    let mut total_principal = dec!(0);

    for month in schedule {
        total_paid += month.payment;
        total_interest += month.interest;
        total_principal += month.principal_portion;
    }

    ScheduleSummary {
        total_paid: total_paid.round_dp(2),
        total_interest: total_interest.round_dp(2),
        total_principal: total_principal.round_dp(2),
    }
}

fn build(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: i64,
    method: InterestMethod,
) -> Option<(Vec<MonthPayment>, Decimal)> {
    let periods = u32::try_from(months).ok().filter(|n| *n > 0)?;
    if periods > MAX_SCHEDULE_MONTHS {
        debug!(months, max = MAX_SCHEDULE_MONTHS, "tenure too long for a schedule");
        return None;
    }

    match method {
        InterestMethod::FlatRate => flat_rate(principal, annual_rate_percent, months, periods),
        InterestMethod::ReducingBalance
        | InterestMethod::CompoundInterest
        | InterestMethod::IslamicProfitBased => {
            reducing_balance(principal, annual_rate_percent, months, periods)
        }
    }
}

fn reducing_balance(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: i64,
    periods: u32,
) -> Option<(Vec<MonthPayment>, Decimal)> {
    let payment = checked_amortized_monthly_payment(principal, annual_rate_percent, months)?;
    let rate = monthly_rate(annual_rate_percent);

    let mut balance = principal;
    let mut curve = Vec::with_capacity(periods as usize);

    for month in 1..=periods {
        let interest = balance.checked_mul(rate)?;
        let principal_portion = payment - interest;
        balance -= principal_portion;
        curve.push(MonthPayment {
            month,
            payment,
            interest,
            principal_portion,
            balance: balance.max(dec!(0)),
        });
    }

    Some((curve, balance))
}

fn flat_rate(
    principal: Decimal,
    annual_rate_percent: Decimal,
    months: i64,
    periods: u32,
) -> Option<(Vec<MonthPayment>, Decimal)> {
    let payment = checked_flat_rate_monthly_payment(principal, annual_rate_percent, months)?;
    let principal_portion = principal.checked_div(Decimal::from(periods))?;
    let interest = payment - principal_portion;

    let mut balance = principal;
    let mut curve = Vec::with_capacity(periods as usize);

    for month in 1..=periods {
        balance -= principal_portion;
        curve.push(MonthPayment {
            month,
            payment,
            interest,
            principal_portion,
            balance: balance.max(dec!(0)),
        });
    }

    Some((curve, balance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reducing_balance_schedule() {
        let schedule = amortization_schedule(dec!(100000), dec!(12), 12, InterestMethod::ReducingBalance);

        assert_eq!(schedule.len(), 12);
        let first = &schedule[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.interest, dec!(1000));
        assert_eq!(first.payment.round_dp(2), dec!(8884.88));
        assert_eq!(first.principal_portion.round_dp(2), dec!(7884.88));

        // interest share shrinks as the balance is repaid
        assert!(schedule[11].interest < schedule[0].interest);
        assert_eq!(schedule[11].balance.round_dp(6), dec!(0));

        let summary = summarize(&schedule);
        assert_eq!(summary.total_paid, dec!(106618.55));
        assert_eq!(summary.total_principal, dec!(100000.00));
        assert_eq!(summary.total_interest, dec!(6618.55));
    }

    #[test]
    fn test_flat_rate_schedule() {
        let schedule = amortization_schedule(dec!(60000), dec!(10), 24, InterestMethod::FlatRate);

        assert_eq!(schedule.len(), 24);
        assert!(schedule.iter().all(|m| m.payment == dec!(3000)));
        assert!(schedule.iter().all(|m| m.interest == dec!(500)));
        assert!(schedule.iter().all(|m| m.principal_portion == dec!(2500)));
        assert_eq!(schedule[23].balance, dec!(0));

        let summary = summarize(&schedule);
        assert_eq!(summary.total_paid, dec!(72000));
        assert_eq!(summary.total_interest, dec!(12000));
    }

    #[test]
    fn test_zero_rate_schedule_retires_principal() {
        assert_eq!(
            residual_balance(dec!(120000), dec!(0), 24, InterestMethod::ReducingBalance),
            dec!(0)
        );
    }

    #[test]
    fn test_non_positive_months_give_empty_schedule() {
        assert!(amortization_schedule(dec!(1000), dec!(5), 0, InterestMethod::FlatRate).is_empty());
        assert!(amortization_schedule(dec!(1000), dec!(5), -6, InterestMethod::ReducingBalance).is_empty());
    }

    #[test]
    fn test_schedule_at_tenure_cap() {
        let months = i64::from(MAX_SCHEDULE_MONTHS);
        let schedule = amortization_schedule(dec!(120000), dec!(0), months, InterestMethod::FlatRate);

        assert_eq!(schedule.len(), MAX_SCHEDULE_MONTHS as usize);
        assert_eq!(schedule[0].payment, dec!(100));
        assert_eq!(schedule.last().unwrap().balance, dec!(0));
    }

    #[test]
    fn test_schedule_above_tenure_cap_is_empty() {
        let months = i64::from(MAX_SCHEDULE_MONTHS) + 1;
        assert!(amortization_schedule(dec!(1000), dec!(0), months, InterestMethod::FlatRate).is_empty());
        assert!(amortization_schedule(dec!(1000), dec!(0), 4_000_000_000, InterestMethod::FlatRate).is_empty());
        assert!(
            amortization_schedule(dec!(1000), dec!(0), 4_000_000_000, InterestMethod::ReducingBalance).is_empty()
        );
        assert_eq!(
            residual_balance(dec!(1000), dec!(5), months, InterestMethod::ReducingBalance),
            dec!(1000)
        );
    }

    #[test]
    fn test_residual_balance_of_annuity_is_negligible() {
        let residual = residual_balance(dec!(250000), dec!(10), 36, InterestMethod::ReducingBalance);
        assert!(residual.abs() <= dec!(0.000001));
    }
}
