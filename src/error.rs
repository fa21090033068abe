use thiserror::Error;

/// Failures raised by the treaty engine.
///
/// Every variant is a deterministic consequence of bad input: nothing is
/// retried and no partial output accompanies an error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreatyError {
    /// A treaty term violates its range or consistency constraints.
    #[error("invalid treaty terms: {field} {reason}")]
    InvalidTerms { field: &'static str, reason: String },

    /// A period carries figures the engine cannot allocate.
    #[error("invalid period '{period_label}': {reason}")]
    InvalidPeriod { period_label: String, reason: String },

    /// A cashflow or summary was requested over zero periods.
    #[error("at least one period is required")]
    SequenceEmpty,
}

pub type Result<T, E = TreatyError> = std::result::Result<T, E>;

/// Rates are percentages and must lie in [0, 100].
pub(crate) fn check_rate(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(TreatyError::InvalidTerms {
            field,
            reason: format!("must be a percentage in [0, 100], got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TreatyError::InvalidTerms {
            field,
            reason: format!("must be a non-negative amount, got {value}"),
        });
    }
    Ok(())
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(TreatyError::InvalidTerms {
            field,
            reason: format!("must be a positive amount, got {value}"),
        });
    }
    Ok(())
}
