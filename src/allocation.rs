use serde::Serialize;

use crate::error::Result;
use crate::period::PeriodInput;
use crate::terms::{ExcessOfLossTerms, QuotaShareTerms, SurplusShareTerms, TreatyTerms};

/// Cycle-to-date figures visible to an allocation, taken before the period
/// being allocated. Allocations only read this; the aggregator owns the
/// running state and advances it from each result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleTotals {
    /// Ceded claims already booked in the current annual cycle.
    pub ceded_claims: f64,
    /// XOL layer capacity already consumed in the current annual cycle.
    pub layer_consumed: f64,
    /// True for the period that opens an annual cycle; XOL layer premium is
    /// charged there and nowhere else.
    pub opens_cycle: bool,
}

impl CycleTotals {
    /// Totals for a fresh cycle with nothing carried forward.
    pub fn opening() -> Self {
        CycleTotals { opens_cycle: true, ..Default::default() }
    }
}

/// Split of one period's gross figures between cedent and reinsurer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationResult {
    pub ceded_premium: f64,
    pub ceded_claims: f64,
    pub retained_premium: f64,
    pub retained_claims: f64,
    /// Portion of `ceded_premium` that pays for reinstating the XOL layer.
    pub reinstatement_premium: f64,
}

impl AllocationResult {
    fn from_ceded(period: &PeriodInput, ceded_premium: f64, ceded_claims: f64) -> Self {
        AllocationResult {
            ceded_premium,
            ceded_claims,
            retained_premium: period.gross_premium - ceded_premium,
            retained_claims: period.gross_claims - ceded_claims,
            reinstatement_premium: 0.0,
        }
    }

    /// Ceded premium net of ceding commission and reinstatement premium.
    pub fn net_premium_to_reinsurer(&self, ceding_commission: f64) -> f64 {
        self.ceded_premium - ceding_commission - self.reinstatement_premium
    }
}

/// Per-treaty-type allocation rule.
pub trait Allocate {
    fn allocate(&self, period: &PeriodInput, totals: &CycleTotals) -> Result<AllocationResult>;
}

impl Allocate for QuotaShareTerms {
    fn allocate(&self, period: &PeriodInput, totals: &CycleTotals) -> Result<AllocationResult> {
        period.validate()?;
        let share = self.cession_rate() / 100.0;
        let ceded_premium = period.gross_premium * share;
        let mut ceded_claims = period.gross_claims * share;
        if let Some(limit) = self.annual_aggregate_limit() {
            let headroom = (limit - totals.ceded_claims).max(0.0);
            ceded_claims = ceded_claims.min(headroom);
        }
        Ok(AllocationResult::from_ceded(period, ceded_premium, ceded_claims))
    }
}

impl Allocate for SurplusShareTerms {
    fn allocate(&self, period: &PeriodInput, _totals: &CycleTotals) -> Result<AllocationResult> {
        period.validate()?;
        let capacity = self.capacity();
        // Gross premium stands in for the period's exposure.
        let ceded_premium = (period.gross_premium - self.retention_limit()).clamp(0.0, capacity);
        let fraction = if period.gross_premium > 0.0 {
            ceded_premium / period.gross_premium
        } else {
            0.0
        };
        let ceded_claims = (period.gross_claims * fraction).min(capacity);
        Ok(AllocationResult::from_ceded(period, ceded_premium, ceded_claims))
    }
}

impl Allocate for ExcessOfLossTerms {
    fn allocate(&self, period: &PeriodInput, totals: &CycleTotals) -> Result<AllocationResult> {
        period.validate()?;
        let limit = self.layer_limit();
        let attachment = self.attachment_point();

        // Aggregate period claims are treated as a single loss event.
        let event_loss = (period.gross_claims.min(attachment + limit) - attachment).max(0.0);
        let remaining = (self.aggregate_capacity() - totals.layer_consumed).max(0.0);
        let ceded_claims = event_loss.min(remaining);

        let reinstatable = limit * self.reinstatements() as f64;
        let reinstated = (totals.layer_consumed + ceded_claims).min(reinstatable)
            - totals.layer_consumed.min(reinstatable);
        let reinstatement_premium =
            self.reinstatement_premium_rate() / 100.0 * self.layer_premium() * (reinstated / limit);

        let base_premium = if totals.opens_cycle { self.layer_premium() } else { 0.0 };
        let mut result =
            AllocationResult::from_ceded(period, base_premium + reinstatement_premium, ceded_claims);
        result.reinstatement_premium = reinstatement_premium;
        Ok(result)
    }
}

impl Allocate for TreatyTerms {
    fn allocate(&self, period: &PeriodInput, totals: &CycleTotals) -> Result<AllocationResult> {
        match self {
            TreatyTerms::QuotaShare(t) => t.allocate(period, totals),
            TreatyTerms::SurplusShare(t) => t.allocate(period, totals),
            TreatyTerms::ExcessOfLoss(t) => t.allocate(period, totals),
        }
    }
}
