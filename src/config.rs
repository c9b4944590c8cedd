//! Engine configuration
//!
//! Loop caps and boundary defaults live here rather than inside the engines,
//! so callers can tighten them without touching calculation code.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::Result;

/// Default annual return (%) when a retirement scenario gives none
pub const DEFAULT_RETIREMENT_RETURN_RATE: f64 = 7.0;

/// Default length of the withdrawal phase in years
pub const DEFAULT_RETIREMENT_YEARS: u32 = 30;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Configuration shared by the engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Months of back-calculated history in the accumulation chart
    pub historical_months: u32,

    /// Cap on forward months in the accumulation chart
    pub future_months_limit: u32,

    /// Length of the withdrawal phase in years
    pub retirement_years: u32,

    /// Hard cap on withdrawal-phase months regardless of `retirement_years`
    pub max_withdrawal_months: u32,

    /// Annual return (%) applied when a scenario omits one
    pub default_return_rate: f64,

    /// Months covered by net-worth trends
    pub trend_months: u32,

    /// Longest loan term accepted, in years
    pub max_term_years: f64,

    /// Days covered by the savings chart
    pub savings_chart_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            historical_months: 24,
            future_months_limit: 60,
            retirement_years: DEFAULT_RETIREMENT_YEARS,
            max_withdrawal_months: 360,
            default_return_rate: DEFAULT_RETIREMENT_RETURN_RATE,
            trend_months: 12,
            max_term_years: 100.0,
            savings_chart_days: 365,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
