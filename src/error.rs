use thiserror::Error;

/// Errors raised while turning raw form values, tiers or configuration into
/// something the engine can price.
///
/// The engine itself never returns these: [`crate::PricingEngine::recalculate_form`]
/// folds them into a not-computable result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("required field `{field}` is missing")]
    MissingField { field: &'static str },
    #[error("field `{field}` is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown interest method: {0:?}")]
    UnknownInterestMethod(String),
    #[error("tier {index} does not exist (product has {len} tiers)")]
    TierNotFound { index: usize, len: usize },
    #[error("invalid pricing config: {0}")]
    InvalidConfig(String),
}

impl PricingError {
    /// Name of the form field this error is about, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field } | Self::InvalidNumber { field, .. } => Some(*field),
            Self::UnknownInterestMethod(_) => Some("interestMethod"),
            Self::TierNotFound { .. } | Self::InvalidConfig(_) => None,
        }
    }
}
