use serde::Serialize;

use crate::error::{Result, TreatyError, check_non_negative, check_positive, check_rate};

/// Proportional treaty ceding a fixed share of every risk.
/// All rates are percentages (27.5 = 27.5%).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaShareTerms {
    cession_rate: f64,
    commission_rate: f64,
    profit_commission_rate: Option<f64>,
    /// Loss ratio (percent) the period must stay strictly below for
    /// profit commission to be payable. `None` = no loss-ratio gate.
    profit_commission_threshold: Option<f64>,
    annual_aggregate_limit: Option<f64>,
}

impl QuotaShareTerms {
    pub fn new(cession_rate: f64, commission_rate: f64) -> Result<Self> {
        check_rate("cession_rate", cession_rate)?;
        check_rate("commission_rate", commission_rate)?;
        Ok(QuotaShareTerms {
            cession_rate,
            commission_rate,
            profit_commission_rate: None,
            profit_commission_threshold: None,
            annual_aggregate_limit: None,
        })
    }

    pub fn with_profit_commission(mut self, rate: f64) -> Result<Self> {
        check_rate("profit_commission_rate", rate)?;
        self.profit_commission_rate = Some(rate);
        Ok(self)
    }

    pub fn with_profit_commission_threshold(mut self, loss_ratio_pct: f64) -> Result<Self> {
        check_rate("profit_commission_threshold", loss_ratio_pct)?;
        self.profit_commission_threshold = Some(loss_ratio_pct);
        Ok(self)
    }

    pub fn with_annual_aggregate_limit(mut self, limit: f64) -> Result<Self> {
        check_non_negative("annual_aggregate_limit", limit)?;
        self.annual_aggregate_limit = Some(limit);
        Ok(self)
    }

    pub fn cession_rate(&self) -> f64 {
        self.cession_rate
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    pub fn profit_commission_rate(&self) -> Option<f64> {
        self.profit_commission_rate
    }

    pub fn profit_commission_threshold(&self) -> Option<f64> {
        self.profit_commission_threshold
    }

    pub fn annual_aggregate_limit(&self) -> Option<f64> {
        self.annual_aggregate_limit
    }
}

/// Proportional treaty ceding the portion of exposure above the cedent's
/// retention, up to `number_of_lines` multiples of that retention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurplusShareTerms {
    retention_limit: f64,
    number_of_lines: u32,
    commission_rate: f64,
}

impl SurplusShareTerms {
    pub fn new(retention_limit: f64, number_of_lines: u32, commission_rate: f64) -> Result<Self> {
        check_positive("retention_limit", retention_limit)?;
        if number_of_lines < 1 {
            return Err(TreatyError::InvalidTerms {
                field: "number_of_lines",
                reason: "must be at least 1".to_string(),
            });
        }
        check_rate("commission_rate", commission_rate)?;
        Ok(SurplusShareTerms { retention_limit, number_of_lines, commission_rate })
    }

    pub fn retention_limit(&self) -> f64 {
        self.retention_limit
    }

    pub fn number_of_lines(&self) -> u32 {
        self.number_of_lines
    }

    pub fn commission_rate(&self) -> f64 {
        self.commission_rate
    }

    /// Maximum amount the reinsurer accepts: retention × lines.
    pub fn capacity(&self) -> f64 {
        self.retention_limit * self.number_of_lines as f64
    }
}

/// Non-proportional layer `layer_limit xs attachment_point`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcessOfLossTerms {
    attachment_point: f64,
    layer_limit: f64,
    reinstatements: u32,
    reinstatement_premium_rate: f64,
    /// Layer price as a percentage of `layer_limit`.
    rate_on_line: f64,
    /// Overrides the rate-on-line price when the layer premium was negotiated directly.
    layer_premium: Option<f64>,
}

impl ExcessOfLossTerms {
    pub fn new(
        attachment_point: f64,
        layer_limit: f64,
        reinstatements: u32,
        reinstatement_premium_rate: f64,
        rate_on_line: f64,
    ) -> Result<Self> {
        check_non_negative("attachment_point", attachment_point)?;
        check_positive("layer_limit", layer_limit)?;
        check_rate("reinstatement_premium_rate", reinstatement_premium_rate)?;
        check_rate("rate_on_line", rate_on_line)?;
        Ok(ExcessOfLossTerms {
            attachment_point,
            layer_limit,
            reinstatements,
            reinstatement_premium_rate,
            rate_on_line,
            layer_premium: None,
        })
    }

    pub fn with_layer_premium(mut self, premium: f64) -> Result<Self> {
        check_non_negative("layer_premium", premium)?;
        self.layer_premium = Some(premium);
        Ok(self)
    }

    pub fn attachment_point(&self) -> f64 {
        self.attachment_point
    }

    pub fn layer_limit(&self) -> f64 {
        self.layer_limit
    }

    pub fn reinstatements(&self) -> u32 {
        self.reinstatements
    }

    pub fn reinstatement_premium_rate(&self) -> f64 {
        self.reinstatement_premium_rate
    }

    pub fn rate_on_line(&self) -> f64 {
        self.rate_on_line
    }

    /// Premium for one annual cycle of the layer.
    pub fn layer_premium(&self) -> f64 {
        self.layer_premium
            .unwrap_or(self.rate_on_line / 100.0 * self.layer_limit)
    }

    /// Layer limit plus every reinstatement: the most the layer can pay in a cycle.
    pub fn aggregate_capacity(&self) -> f64 {
        self.layer_limit * (1.0 + self.reinstatements as f64)
    }
}

/// The closed set of treaty structures the engine prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreatyTerms {
    QuotaShare(QuotaShareTerms),
    SurplusShare(SurplusShareTerms),
    ExcessOfLoss(ExcessOfLossTerms),
}

impl TreatyTerms {
    pub fn kind(&self) -> &'static str {
        match self {
            TreatyTerms::QuotaShare(_) => "quota share",
            TreatyTerms::SurplusShare(_) => "surplus share",
            TreatyTerms::ExcessOfLoss(_) => "excess of loss",
        }
    }
}

impl From<QuotaShareTerms> for TreatyTerms {
    fn from(t: QuotaShareTerms) -> Self {
        TreatyTerms::QuotaShare(t)
    }
}

impl From<SurplusShareTerms> for TreatyTerms {
    fn from(t: SurplusShareTerms) -> Self {
        TreatyTerms::SurplusShare(t)
    }
}

impl From<ExcessOfLossTerms> for TreatyTerms {
    fn from(t: ExcessOfLossTerms) -> Self {
        TreatyTerms::ExcessOfLoss(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(err: TreatyError) -> &'static str {
        match err {
            TreatyError::InvalidTerms { field, .. } => field,
            other => panic!("expected InvalidTerms, got {other:?}"),
        }
    }

    #[test]
    fn quota_share_rejects_out_of_range_rates() {
        assert_eq!(invalid_field(QuotaShareTerms::new(101.0, 10.0).unwrap_err()), "cession_rate");
        assert_eq!(invalid_field(QuotaShareTerms::new(50.0, -1.0).unwrap_err()), "commission_rate");
        let qs = QuotaShareTerms::new(50.0, 30.0).unwrap();
        assert_eq!(
            invalid_field(qs.clone().with_profit_commission(150.0).unwrap_err()),
            "profit_commission_rate"
        );
        assert_eq!(
            invalid_field(qs.with_annual_aggregate_limit(-5.0).unwrap_err()),
            "annual_aggregate_limit"
        );
    }

    #[test]
    fn quota_share_optional_terms_default_to_none() {
        let qs = QuotaShareTerms::new(40.0, 27.5).unwrap();
        assert_eq!(qs.profit_commission_rate(), None);
        assert_eq!(qs.profit_commission_threshold(), None);
        assert_eq!(qs.annual_aggregate_limit(), None);
    }

    #[test]
    fn surplus_requires_positive_retention_and_a_line() {
        assert_eq!(invalid_field(SurplusShareTerms::new(0.0, 3, 20.0).unwrap_err()), "retention_limit");
        assert_eq!(invalid_field(SurplusShareTerms::new(100.0, 0, 20.0).unwrap_err()), "number_of_lines");
        let s = SurplusShareTerms::new(250_000.0, 4, 20.0).unwrap();
        assert_eq!(s.capacity(), 1_000_000.0);
    }

    #[test]
    fn xol_layer_premium_from_rate_on_line() {
        let x = ExcessOfLossTerms::new(1_000_000.0, 4_000_000.0, 1, 100.0, 12.5).unwrap();
        assert_eq!(x.layer_premium(), 500_000.0);
        assert_eq!(x.aggregate_capacity(), 8_000_000.0);
    }

    #[test]
    fn xol_explicit_premium_overrides_rate_on_line() {
        let x = ExcessOfLossTerms::new(0.0, 1_000.0, 0, 0.0, 10.0)
            .unwrap()
            .with_layer_premium(250.0)
            .unwrap();
        assert_eq!(x.layer_premium(), 250.0);
    }

    #[test]
    fn xol_rejects_zero_limit() {
        assert_eq!(
            invalid_field(ExcessOfLossTerms::new(0.0, 0.0, 1, 100.0, 10.0).unwrap_err()),
            "layer_limit"
        );
    }

    #[test]
    fn terms_serialize_with_type_tag() {
        let t: TreatyTerms = QuotaShareTerms::new(50.0, 30.0).unwrap().into();
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["type"], "quota_share");
        assert_eq!(v["cession_rate"], 50.0);
    }
}
