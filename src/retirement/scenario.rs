//! Retirement scenario inputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, MONTHS_PER_YEAR};
use crate::error::{CalcError, Result};
use crate::values::add_months;

/// Fully resolved scenario consumed by the projection engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementScenario {
    pub current_savings: f64,
    pub monthly_contribution: f64,
    pub target_amount: f64,
    /// Annual return in percent
    pub expected_return_rate: f64,
    pub target_date: NaiveDate,
}

impl RetirementScenario {
    pub fn new(
        current_savings: f64,
        monthly_contribution: f64,
        target_amount: f64,
        expected_return_rate: f64,
        target_date: NaiveDate,
    ) -> Result<Self> {
        let scenario = Self {
            current_savings,
            monthly_contribution,
            target_amount,
            expected_return_rate,
            target_date,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("current savings", self.current_savings)?;
        non_negative("monthly contribution", self.monthly_contribution)?;
        non_negative("expected return rate", self.expected_return_rate)?;
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(CalcError::invalid("target amount must be positive"));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CalcError::invalid(format!("{field} must be non-negative")));
    }
    Ok(())
}

/// Loosely specified scenario as a caller might store it
///
/// Every field is optional; [`ScenarioInput::resolve`] applies the defaults
/// and derivations in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioInput {
    pub current_savings: Option<f64>,
    pub monthly_contribution: Option<f64>,
    /// Used when `monthly_contribution` is absent
    pub annual_contribution: Option<f64>,
    pub target_amount: Option<f64>,
    /// With `withdrawal_rate`, derives the target when `target_amount` is absent
    pub annual_withdrawal: Option<f64>,
    /// Sustainable withdrawal rate in percent (4.0 = 4%)
    pub withdrawal_rate: Option<f64>,
    pub expected_return_rate: Option<f64>,
    pub target_date: Option<NaiveDate>,
    /// With `retirement_age`, derives the target date when `target_date` is absent
    pub current_age: Option<u32>,
    pub retirement_age: Option<u32>,
}

impl ScenarioInput {
    /// Resolve into a typed scenario relative to `as_of`
    ///
    /// - return rate falls back to `config.default_return_rate`
    /// - contribution falls back to `annual_contribution / 12`, then 0
    /// - target falls back to `annual_withdrawal / (withdrawal_rate / 100)`
    /// - target date falls back to `as_of + (retirement_age - current_age)` years,
    ///   then to `as_of` itself
    pub fn resolve(&self, config: &EngineConfig, as_of: NaiveDate) -> Result<RetirementScenario> {
        let monthly_contribution = match (self.monthly_contribution, self.annual_contribution) {
            (Some(monthly), _) => monthly,
            (None, Some(annual)) => annual / MONTHS_PER_YEAR as f64,
            (None, None) => 0.0,
        };

        let target_amount = match (self.target_amount, self.annual_withdrawal, self.withdrawal_rate) {
            (Some(target), _, _) => target,
            (None, Some(withdrawal), Some(rate)) if rate > 0.0 => withdrawal / (rate / 100.0),
            _ => {
                return Err(CalcError::invalid(
                    "target amount is required (directly or via annual withdrawal and withdrawal rate)",
                ))
            }
        };

        let target_date = match (self.target_date, self.current_age, self.retirement_age) {
            (Some(date), _, _) => date,
            (None, Some(current), Some(retirement)) => {
                let years = retirement.saturating_sub(current) as i32;
                add_months(as_of, years * MONTHS_PER_YEAR as i32)?
            }
            _ => as_of,
        };

        RetirementScenario::new(
            self.current_savings.unwrap_or(0.0),
            monthly_contribution,
            target_amount,
            self.expected_return_rate.unwrap_or(config.default_return_rate),
            target_date,
        )
    }
}
