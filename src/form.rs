//! Raw form values as the dashboard's controlled inputs hold them.
//!
//! Every field arrives as text that may be empty or half-typed. Parsing is
//! explicit: a field is either a number, absent, or an error naming the
//! field. Nothing is coerced into a NaN-like value.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::PricingError;
use crate::plan::{InterestMethod, PlanInput};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanForm {
    pub product_price: Option<String>,
    pub down_payment: Option<String>,
    pub markup: Option<String>,
    pub tenure_months: Option<String>,
    pub annual_rate: Option<String>,
    pub interest_method: Option<String>,
}

fn trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

/// Drops thousand separators, provided they group the integer part by three
/// ("1,250,000.50"). Misplaced commas ("1,2,3", ",5") give `None`.
fn strip_thousands(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }
    let (integer, fraction) = text.split_once('.').unwrap_or((text, ""));
    if fraction.contains(',') {
        return None;
    }

    let digits = integer.strip_prefix(['-', '+']).unwrap_or(integer);
    let all_digits = |group: &str| group.bytes().all(|b| b.is_ascii_digit());
    let mut groups = digits.split(',');
    let lead_ok = groups
        .next()
        .is_some_and(|lead| (1..=3).contains(&lead.len()) && all_digits(lead));
    if !lead_ok || !groups.all(|group| group.len() == 3 && all_digits(group)) {
        return None;
    }

    Some(text.replace(',', ""))
}

/// Parses a money or rate field. Blank text is `Ok(None)`.
///
/// Thousand separators (`,`) are accepted when they group digits by three.
pub fn parse_amount(field: &'static str, raw: Option<&str>) -> Result<Option<Decimal>, PricingError> {
    let Some(text) = trimmed(raw) else {
        return Ok(None);
    };
    let invalid = || PricingError::InvalidNumber {
        field,
        value: text.to_string(),
    };

    let cleaned = strip_thousands(text).ok_or_else(invalid)?;
    Decimal::from_str(&cleaned).map(Some).map_err(|_| invalid())
}

/// Parses a whole number of months. Blank text is `Ok(None)`.
///
/// "12" and "12.0" are fine, "12.5" is an error rather than a silent
/// truncation.
pub fn parse_months(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, PricingError> {
    let Some(text) = trimmed(raw) else {
        return Ok(None);
    };
    let invalid = || PricingError::InvalidNumber {
        field,
        value: text.to_string(),
    };

    if let Ok(months) = text.parse::<i64>() {
        return Ok(Some(months));
    }
    let value = Decimal::from_str(text).map_err(|_| invalid())?;
    if !value.fract().is_zero() {
        return Err(invalid());
    }
    value.to_i64().map(Some).ok_or_else(invalid)
}

fn required<T>(field: &'static str, value: Option<T>) -> Result<T, PricingError> {
    value.ok_or(PricingError::MissingField { field })
}

impl PlanForm {
    /// Builds a typed [`PlanInput`].
    ///
    /// Price, tenure and rate are required; down payment and markup default
    /// to zero and the interest method to reducing balance.
    pub fn to_input(&self) -> Result<PlanInput, PricingError> {
        let product_price = required(
            "productPrice",
            parse_amount("productPrice", self.product_price.as_deref())?,
        )?;
        let down_payment = parse_amount("downPayment", self.down_payment.as_deref())?.unwrap_or_default();
        let markup = parse_amount("markup", self.markup.as_deref())?.unwrap_or_default();
        let tenure_months = required(
            "tenureMonths",
            parse_months("tenureMonths", self.tenure_months.as_deref())?,
        )?;
        let annual_rate_percent = required(
            "annualRate",
            parse_amount("annualRate", self.annual_rate.as_deref())?,
        )?;
        let interest_method = match trimmed(self.interest_method.as_deref()) {
            Some(label) => label.parse::<InterestMethod>()?,
            None => InterestMethod::default(),
        };

        Ok(PlanInput {
            product_price,
            down_payment,
            markup,
            tenure_months,
            annual_rate_percent,
            interest_method,
        })
    }
}
