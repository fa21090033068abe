//! Premium, claims and commission allocation between a cedent and its
//! reinsurer under quota share, surplus share and excess-of-loss treaties,
//! period by period.
//!
//! Data flows one way: [`terms`] → [`allocation`] → [`commission`] →
//! [`aggregator`], with [`treaty::Treaty`] as the entry point.

pub mod aggregator;
pub mod allocation;
pub mod commission;
pub mod config;
pub mod error;
pub mod period;
pub mod report;
pub mod summary;
pub mod terms;
pub mod treaty;

pub use aggregator::CashflowRow;
pub use allocation::{Allocate, AllocationResult, CycleTotals};
pub use commission::CommissionResult;
pub use error::{Result, TreatyError};
pub use period::PeriodInput;
pub use summary::{CashflowSummary, StructureComparison};
pub use terms::{ExcessOfLossTerms, QuotaShareTerms, SurplusShareTerms, TreatyTerms};
pub use treaty::Treaty;
