use serde::Serialize;

use crate::allocation::AllocationResult;
use crate::terms::TreatyTerms;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommissionResult {
    pub ceding_commission: f64,
    /// Zero unless the reinsurer's technical result is positive.
    pub profit_commission: f64,
    /// Ceded premium − ceded claims − ceding commission.
    pub reinsurer_technical_result: f64,
}

/// Ceded claims over ceded premium; zero when nothing was ceded.
pub fn loss_ratio(ceded_claims: f64, ceded_premium: f64) -> f64 {
    if ceded_premium > 0.0 { ceded_claims / ceded_premium } else { 0.0 }
}

/// Ceding and profit commission for one period's allocation.
///
/// XOL carries no ceding commission. Profit commission only exists on quota
/// share terms that define a rate, and only when the technical result is
/// positive (and, if a threshold is set, the loss ratio is below it).
pub fn compute(terms: &TreatyTerms, allocation: &AllocationResult) -> CommissionResult {
    let commission_rate = match terms {
        TreatyTerms::QuotaShare(t) => t.commission_rate(),
        TreatyTerms::SurplusShare(t) => t.commission_rate(),
        TreatyTerms::ExcessOfLoss(_) => 0.0,
    };
    let ceding_commission = allocation.ceded_premium * commission_rate / 100.0;
    let technical =
        allocation.ceded_premium - allocation.ceded_claims - ceding_commission;

    let profit_commission = match terms {
        TreatyTerms::QuotaShare(t) => match t.profit_commission_rate() {
            Some(rate) if technical > 0.0 => {
                let below_threshold = t.profit_commission_threshold().is_none_or(|threshold| {
                    loss_ratio(allocation.ceded_claims, allocation.ceded_premium) * 100.0 < threshold
                });
                if below_threshold { technical * rate / 100.0 } else { 0.0 }
            }
            _ => 0.0,
        },
        _ => 0.0,
    };

    CommissionResult {
        ceding_commission,
        profit_commission,
        reinsurer_technical_result: technical,
    }
}
