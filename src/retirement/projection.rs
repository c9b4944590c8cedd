//! Compound-growth projection for a retirement scenario

use chrono::{Datelike, Local, NaiveDate};
use log::debug;
use serde::Serialize;

use super::scenario::RetirementScenario;
use crate::config::MONTHS_PER_YEAR;
use crate::values::round2;

/// Headline figures for a scenario, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetirementSummary {
    /// Progress toward the goal in percent, capped at 100
    pub current_progress: f64,
    pub saved_amount: f64,
    pub goal_amount: f64,
    pub years_to_goal: u32,
    pub expected_return_rate: f64,
    pub projected_value: f64,
    /// Projected value minus target; negative means a shortfall
    pub gap_to_goal: f64,
    pub monthly_contribution_needed: f64,
    pub monthly_contribution_actual: f64,
}

/// Projection of a scenario as seen from a fixed date
#[derive(Debug, Clone)]
pub struct RetirementProjection {
    pub(super) scenario: RetirementScenario,
    pub(super) as_of: NaiveDate,
}

impl RetirementProjection {
    pub fn new(scenario: RetirementScenario, as_of: NaiveDate) -> Self {
        Self { scenario, as_of }
    }

    /// Project from the local calendar date
    pub fn from_today(scenario: RetirementScenario) -> Self {
        Self::new(scenario, Local::now().date_naive())
    }

    pub fn scenario(&self) -> &RetirementScenario {
        &self.scenario
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Whole calendar years until the target date; past dates give 0
    pub fn years_to_goal(&self) -> u32 {
        (self.scenario.target_date.year() - self.as_of.year()).max(0) as u32
    }

    pub fn months_to_goal(&self) -> u32 {
        self.years_to_goal() * MONTHS_PER_YEAR
    }

    pub fn monthly_rate(&self) -> f64 {
        self.scenario.expected_return_rate / 100.0 / MONTHS_PER_YEAR as f64
    }

    /// Savings at the target date with the scenario's own contribution
    pub fn projected_value(&self) -> f64 {
        if self.years_to_goal() == 0 {
            return self.scenario.current_savings;
        }
        future_value(
            self.scenario.current_savings,
            self.scenario.monthly_contribution,
            self.monthly_rate(),
            self.months_to_goal(),
        )
    }

    /// Monthly contribution that reaches the target exactly at the target date
    pub fn monthly_contribution_needed(&self) -> f64 {
        let months = self.months_to_goal();
        let current = self.scenario.current_savings;
        let target = self.scenario.target_amount;
        if months == 0 || target <= current {
            return 0.0;
        }

        let r = self.monthly_rate();
        if r == 0.0 {
            return (target - current) / months as f64;
        }

        let growth = (1.0 + r).powi(months as i32);
        let remaining = target - current * growth;
        if remaining <= 0.0 {
            return 0.0;
        }
        remaining * r / (growth - 1.0)
    }

    /// Savings at the target date when contributing the required amount
    pub fn target_value_at_retirement(&self) -> f64 {
        if self.years_to_goal() == 0 {
            return self.scenario.current_savings;
        }
        future_value(
            self.scenario.current_savings,
            self.monthly_contribution_needed(),
            self.monthly_rate(),
            self.months_to_goal(),
        )
    }

    pub fn gap_to_goal(&self) -> f64 {
        self.projected_value() - self.scenario.target_amount
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.scenario.target_amount <= 0.0 {
            return 0.0;
        }
        (self.projected_value() / self.scenario.target_amount * 100.0).min(100.0)
    }

    pub fn summary(&self) -> RetirementSummary {
        let projected = self.projected_value();
        let needed = self.monthly_contribution_needed();
        debug!(
            "retirement projection: {} years, projected {:.2}, needed {:.2}/month",
            self.years_to_goal(),
            projected,
            needed
        );

        RetirementSummary {
            current_progress: round2(self.progress_percentage()),
            saved_amount: round2(self.scenario.current_savings),
            goal_amount: round2(self.scenario.target_amount),
            years_to_goal: self.years_to_goal(),
            expected_return_rate: self.scenario.expected_return_rate,
            projected_value: round2(projected),
            gap_to_goal: round2(projected - self.scenario.target_amount),
            monthly_contribution_needed: round2(needed),
            monthly_contribution_actual: round2(self.scenario.monthly_contribution),
        }
    }
}

/// Future value of a balance plus level monthly contributions
fn future_value(present: f64, contribution: f64, monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return present + contribution * months as f64;
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    present * growth + contribution * ((growth - 1.0) / monthly_rate)
}
