use crate::aggregator::{self, CashflowRow};
use crate::error::{Result, TreatyError};
use crate::period::PeriodInput;
use crate::terms::TreatyTerms;

/// A treaty bound to its terms: the single entry point callers use.
#[derive(Debug, Clone, PartialEq)]
pub struct Treaty {
    terms: TreatyTerms,
}

impl Treaty {
    pub fn new(terms: impl Into<TreatyTerms>) -> Self {
        Treaty { terms: terms.into() }
    }

    pub fn terms(&self) -> &TreatyTerms {
        &self.terms
    }

    /// One period on its own, as the opening period of a fresh cycle.
    pub fn calculate_premium(&self, period: &PeriodInput) -> Result<CashflowRow> {
        aggregator::aggregate(&self.terms, std::slice::from_ref(period))?
            .pop()
            .ok_or(TreatyError::SequenceEmpty)
    }

    pub fn calculate_cashflow(&self, periods: &[PeriodInput]) -> Result<Vec<CashflowRow>> {
        aggregator::aggregate(&self.terms, periods)
    }
}

impl From<TreatyTerms> for Treaty {
    fn from(terms: TreatyTerms) -> Self {
        Treaty::new(terms)
    }
}
