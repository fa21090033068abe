use serde::Serialize;

use crate::aggregator::CashflowRow;
use crate::commission;
use crate::error::{Result, TreatyError};
use crate::period::PeriodInput;
use crate::treaty::Treaty;

/// Totals across every row of a cashflow table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashflowSummary {
    pub periods: usize,
    pub gross_premium: f64,
    pub gross_claims: f64,
    pub ceded_premium: f64,
    pub ceded_claims: f64,
    pub ceding_commission: f64,
    pub profit_commission: f64,
    pub reinstatement_premium: f64,
    /// Sum of per-row reinsurer net positions.
    pub reinsurer_net_result: f64,
    /// Mean of the per-row loss ratios (each row weighted equally).
    pub mean_loss_ratio: f64,
}

impl CashflowSummary {
    pub fn from_rows(rows: &[CashflowRow]) -> Result<Self> {
        if rows.is_empty() {
            return Err(TreatyError::SequenceEmpty);
        }
        let sum = |f: fn(&CashflowRow) -> f64| rows.iter().map(f).sum::<f64>();
        Ok(CashflowSummary {
            periods: rows.len(),
            gross_premium: sum(|r| r.gross_premium),
            gross_claims: sum(|r| r.gross_claims),
            ceded_premium: sum(|r| r.ceded_premium),
            ceded_claims: sum(|r| r.ceded_claims),
            ceding_commission: sum(|r| r.ceding_commission),
            profit_commission: sum(|r| r.profit_commission),
            reinstatement_premium: sum(|r| r.reinstatement_premium),
            reinsurer_net_result: sum(|r| r.reinsurer_net_position),
            mean_loss_ratio: sum(|r| r.loss_ratio) / rows.len() as f64,
        })
    }

    /// Total ceded claims / total ceded premium. Zero if nothing was ceded.
    pub fn loss_ratio(&self) -> f64 {
        commission::loss_ratio(self.ceded_claims, self.ceded_premium)
    }

    /// Share of gross premium passed to the reinsurer. Zero without premium.
    pub fn cession_ratio(&self) -> f64 {
        if self.gross_premium > 0.0 { self.ceded_premium / self.gross_premium } else { 0.0 }
    }
}

/// One named structure's result in a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureComparison {
    pub name: String,
    pub treaty_kind: &'static str,
    pub summary: CashflowSummary,
}

/// Run every structure over the same periods, preserving input order.
/// The first failing structure aborts the comparison.
pub fn compare_structures(
    structures: &[(String, Treaty)],
    periods: &[PeriodInput],
) -> Result<Vec<StructureComparison>> {
    structures
        .iter()
        .map(|(name, treaty)| -> Result<StructureComparison> {
            let rows = treaty.calculate_cashflow(periods)?;
            Ok(StructureComparison {
                name: name.clone(),
                treaty_kind: treaty.terms().kind(),
                summary: CashflowSummary::from_rows(&rows)?,
            })
        })
        .collect()
}
