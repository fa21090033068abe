use serde::{Deserialize, Serialize};

use crate::error::{Result, TreatyError};

/// Gross figures for one accounting period, as supplied by the caller.
///
/// A sequence of periods is processed in the order given; the engine never
/// sorts by label. `is_new_annual_cycle` marks the first period of a new
/// treaty year, which resets aggregate limits, cumulative totals and XOL
/// layer consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodInput {
    pub period_label: String,
    pub gross_premium: f64,
    pub gross_claims: f64,
    #[serde(default)]
    pub is_new_annual_cycle: bool,
}

impl PeriodInput {
    pub fn new(period_label: impl Into<String>, gross_premium: f64, gross_claims: f64) -> Self {
        PeriodInput {
            period_label: period_label.into(),
            gross_premium,
            gross_claims,
            is_new_annual_cycle: false,
        }
    }

    /// Mark this period as the opening period of a new annual cycle.
    pub fn starting_new_cycle(mut self) -> Self {
        self.is_new_annual_cycle = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("gross_premium", self.gross_premium),
            ("gross_claims", self.gross_claims),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TreatyError::InvalidPeriod {
                    period_label: self.period_label.clone(),
                    reason: format!("{name} must be a non-negative amount, got {value}"),
                });
            }
        }
        Ok(())
    }
}
