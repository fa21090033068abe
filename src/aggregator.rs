use serde::Serialize;

use crate::allocation::{Allocate, AllocationResult, CycleTotals};
use crate::commission::{self, CommissionResult};
use crate::error::{Result, TreatyError};
use crate::period::PeriodInput;
use crate::terms::TreatyTerms;

/// One period of the cashflow table: the period's inputs, its allocation,
/// its commission, and cycle-to-date totals up to and including this row.
///
/// Flat so that report writers (CSV, NDJSON) can serialise it directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowRow {
    pub period_label: String,
    pub is_new_annual_cycle: bool,
    pub gross_premium: f64,
    pub gross_claims: f64,
    pub ceded_premium: f64,
    pub ceded_claims: f64,
    pub retained_premium: f64,
    pub retained_claims: f64,
    pub reinstatement_premium: f64,
    pub ceding_commission: f64,
    pub profit_commission: f64,
    pub reinsurer_technical_result: f64,
    pub net_premium_to_reinsurer: f64,
    /// Ceded premium (reinstatement premium included) less ceding commission,
    /// ceded claims and profit commission.
    pub reinsurer_net_position: f64,
    /// Fraction, not percent: 0.594 is 59.4%.
    pub loss_ratio: f64,
    pub cumulative_ceded_premium: f64,
    pub cumulative_ceded_claims: f64,
    /// XOL only: layer capacity consumed so far this cycle.
    pub layer_consumed: f64,
    /// XOL only: reinstatements used so far this cycle (may be fractional).
    pub reinstatements_used: f64,
}

impl CashflowRow {
    fn new(
        period: &PeriodInput,
        allocation: &AllocationResult,
        commission: &CommissionResult,
        acc: &CycleAccumulator,
    ) -> Self {
        let net_premium_to_reinsurer =
            allocation.net_premium_to_reinsurer(commission.ceding_commission);
        CashflowRow {
            period_label: period.period_label.clone(),
            is_new_annual_cycle: period.is_new_annual_cycle,
            gross_premium: period.gross_premium,
            gross_claims: period.gross_claims,
            ceded_premium: allocation.ceded_premium,
            ceded_claims: allocation.ceded_claims,
            retained_premium: allocation.retained_premium,
            retained_claims: allocation.retained_claims,
            reinstatement_premium: allocation.reinstatement_premium,
            ceding_commission: commission.ceding_commission,
            profit_commission: commission.profit_commission,
            reinsurer_technical_result: commission.reinsurer_technical_result,
            net_premium_to_reinsurer,
            reinsurer_net_position: commission.reinsurer_technical_result
                - commission.profit_commission,
            loss_ratio: commission::loss_ratio(allocation.ceded_claims, allocation.ceded_premium),
            cumulative_ceded_premium: acc.ceded_premium,
            cumulative_ceded_claims: acc.ceded_claims,
            layer_consumed: acc.layer_consumed,
            reinstatements_used: acc.reinstatements_used,
        }
    }
}

/// Running state for one aggregation call. Created on entry, dropped on
/// return; never shared between calls.
#[derive(Debug, Default)]
struct CycleAccumulator {
    ceded_premium: f64,
    ceded_claims: f64,
    layer_consumed: f64,
    reinstatements_used: f64,
    periods_in_cycle: usize,
}

impl CycleAccumulator {
    fn begin_period(&mut self, period: &PeriodInput) -> CycleTotals {
        if period.is_new_annual_cycle && self.periods_in_cycle > 0 {
            *self = CycleAccumulator::default();
        }
        CycleTotals {
            ceded_claims: self.ceded_claims,
            layer_consumed: self.layer_consumed,
            opens_cycle: self.periods_in_cycle == 0,
        }
    }

    fn record(&mut self, terms: &TreatyTerms, allocation: &AllocationResult) {
        self.periods_in_cycle += 1;
        self.ceded_premium += allocation.ceded_premium;
        self.ceded_claims += allocation.ceded_claims;
        if let TreatyTerms::ExcessOfLoss(xol) = terms {
            self.layer_consumed += allocation.ceded_claims;
            let reinstatable = xol.layer_limit() * xol.reinstatements() as f64;
            self.reinstatements_used = self.layer_consumed.min(reinstatable) / xol.layer_limit();
        }
    }
}

/// Allocate, commission and accumulate `periods` in the order given.
///
/// Fails with `SequenceEmpty` for an empty slice. Any invalid period aborts
/// the whole call; no rows are returned alongside an error.
pub fn aggregate(terms: &TreatyTerms, periods: &[PeriodInput]) -> Result<Vec<CashflowRow>> {
    if periods.is_empty() {
        return Err(TreatyError::SequenceEmpty);
    }
    let mut acc = CycleAccumulator::default();
    periods
        .iter()
        .map(|period| -> Result<CashflowRow> {
            let totals = acc.begin_period(period);
            let allocation = terms.allocate(period, &totals)?;
            let commission = commission::compute(terms, &allocation);
            acc.record(terms, &allocation);
            Ok(CashflowRow::new(period, &allocation, &commission, &acc))
        })
        .collect()
}
