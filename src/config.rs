use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::TreatyError;
use crate::period::PeriodInput;
use crate::terms::{ExcessOfLossTerms, QuotaShareTerms, SurplusShareTerms, TreatyTerms};
use crate::treaty::Treaty;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Terms(#[from] TreatyError),
}

/// Raw treaty parameters as written in a scenario file. Nothing here is
/// validated until [`TreatyConfig::build`].
///
/// Line and reinstatement counts are read as plain numbers so that a value
/// like `2.5` surfaces as an invalid term rather than a parse error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreatyConfig {
    QuotaShare {
        cession_rate: f64,
        commission_rate: f64,
        #[serde(default)]
        profit_commission_rate: Option<f64>,
        #[serde(default)]
        profit_commission_threshold: Option<f64>,
        #[serde(default)]
        annual_aggregate_limit: Option<f64>,
    },
    SurplusShare {
        retention_limit: f64,
        number_of_lines: f64,
        commission_rate: f64,
    },
    ExcessOfLoss {
        attachment_point: f64,
        layer_limit: f64,
        reinstatements: f64,
        reinstatement_premium_rate: f64,
        rate_on_line: f64,
        #[serde(default)]
        layer_premium: Option<f64>,
    },
}

fn whole_count(field: &'static str, value: f64) -> Result<u32, TreatyError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(TreatyError::InvalidTerms {
            field,
            reason: format!("must be a non-negative whole number, got {value}"),
        });
    }
    Ok(value as u32)
}

impl TreatyConfig {
    pub fn build(&self) -> Result<TreatyTerms, TreatyError> {
        let terms: TreatyTerms = match *self {
            TreatyConfig::QuotaShare {
                cession_rate,
                commission_rate,
                profit_commission_rate,
                profit_commission_threshold,
                annual_aggregate_limit,
            } => {
                let mut t = QuotaShareTerms::new(cession_rate, commission_rate)?;
                if let Some(rate) = profit_commission_rate {
                    t = t.with_profit_commission(rate)?;
                }
                if let Some(threshold) = profit_commission_threshold {
                    t = t.with_profit_commission_threshold(threshold)?;
                }
                if let Some(limit) = annual_aggregate_limit {
                    t = t.with_annual_aggregate_limit(limit)?;
                }
                t.into()
            }
            TreatyConfig::SurplusShare { retention_limit, number_of_lines, commission_rate } => {
                let lines = whole_count("number_of_lines", number_of_lines)?;
                SurplusShareTerms::new(retention_limit, lines, commission_rate)?.into()
            }
            TreatyConfig::ExcessOfLoss {
                attachment_point,
                layer_limit,
                reinstatements,
                reinstatement_premium_rate,
                rate_on_line,
                layer_premium,
            } => {
                let reinstatements = whole_count("reinstatements", reinstatements)?;
                let mut t = ExcessOfLossTerms::new(
                    attachment_point,
                    layer_limit,
                    reinstatements,
                    reinstatement_premium_rate,
                    rate_on_line,
                )?;
                if let Some(premium) = layer_premium {
                    t = t.with_layer_premium(premium)?;
                }
                t.into()
            }
        };
        Ok(terms)
    }
}

/// An alternative structure to price over the scenario's periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTreatyConfig {
    pub name: String,
    pub treaty: TreatyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub treaty: TreatyConfig,
    pub periods: Vec<PeriodInput>,
    #[serde(default)]
    pub alternatives: Vec<NamedTreatyConfig>,
}

impl ScenarioConfig {
    /// The README quarterly walkthrough: a 50% quota share with 30% ceding
    /// commission, 20% profit commission below a 60% loss ratio and a 10M
    /// annual aggregate, plus surplus and XOL alternatives for comparison.
    pub fn canonical() -> Self {
        let quarters = [
            ("Q1 2024", 2_500_000.0, 1_500_000.0),
            ("Q2 2024", 3_000_000.0, 1_800_000.0),
            ("Q3 2024", 2_800_000.0, 2_100_000.0),
            ("Q4 2024", 3_200_000.0, 1_900_000.0),
        ];
        ScenarioConfig {
            name: "README quarterly quota share".to_string(),
            treaty: TreatyConfig::QuotaShare {
                cession_rate: 50.0,
                commission_rate: 30.0,
                profit_commission_rate: Some(20.0),
                profit_commission_threshold: Some(60.0),
                annual_aggregate_limit: Some(10_000_000.0),
            },
            periods: quarters
                .iter()
                .map(|&(label, premium, claims)| PeriodInput::new(label, premium, claims))
                .collect(),
            alternatives: vec![
                NamedTreatyConfig {
                    name: "Surplus 1M retention, 4 lines".to_string(),
                    treaty: TreatyConfig::SurplusShare {
                        retention_limit: 1_000_000.0,
                        number_of_lines: 4.0,
                        commission_rate: 25.0,
                    },
                },
                NamedTreatyConfig {
                    name: "XOL 1M xs 1M, 1 @ 100%".to_string(),
                    treaty: TreatyConfig::ExcessOfLoss {
                        attachment_point: 1_000_000.0,
                        layer_limit: 1_000_000.0,
                        reinstatements: 1.0,
                        reinstatement_premium_rate: 100.0,
                        rate_on_line: 15.0,
                        layer_premium: None,
                    },
                },
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = serde_json::from_str(json)?;
        debug!(
            scenario = %config.name,
            periods = config.periods.len(),
            alternatives = config.alternatives.len(),
            "parsed scenario"
        );
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading scenario");
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&text)
    }

    pub fn treaty(&self) -> Result<Treaty, ConfigError> {
        Ok(Treaty::new(self.treaty.build()?))
    }

    /// The primary treaty followed by every alternative, each under its name.
    pub fn structures(&self) -> Result<Vec<(String, Treaty)>, ConfigError> {
        let mut out = vec![(self.name.clone(), self.treaty()?)];
        for alt in &self.alternatives {
            out.push((alt.name.clone(), Treaty::new(alt.treaty.build()?)));
        }
        Ok(out)
    }
}
