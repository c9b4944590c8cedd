//! Accumulation and withdrawal chart series for a projection

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use super::projection::RetirementProjection;
use crate::charts::ChartSeries;
use crate::config::MONTHS_PER_YEAR;
use crate::error::{CalcError, Result};
use crate::values::{add_months, unix_timestamp};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccumulationChart {
    /// Back-calculated history ending with today's balance
    pub actual_savings: ChartSeries,
    /// Forward path with the scenario's contribution
    pub projected_savings: ChartSeries,
    /// Forward path with the required contribution
    pub target_savings: ChartSeries,
    pub today_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalChart {
    pub projected_savings: ChartSeries,
    pub target_savings: ChartSeries,
    pub retirement_start_timestamp: i64,
    pub retirement_end_timestamp: i64,
}

impl RetirementProjection {
    /// Savings history and forward paths around `as_of`
    ///
    /// History walks back `historical_months` months by removing the
    /// contribution and discounting one month at a time. Forward paths run
    /// for the months to goal, capped at `future_months_limit`.
    pub fn chart_data(&self, historical_months: u32, future_months_limit: u32) -> Result<AccumulationChart> {
        let r = self.monthly_rate();
        let contribution = self.scenario.monthly_contribution;

        let mut history = Vec::with_capacity(historical_months as usize);
        let mut value = self.scenario.current_savings;
        for i in 1..=historical_months {
            value -= contribution;
            if r > 0.0 {
                value /= 1.0 + r;
            }
            history.push((self.month_offset(-(i as i32))?, value));
        }

        let mut actual_savings = ChartSeries::with_capacity(history.len() + 1);
        for (date, value) in history.into_iter().rev() {
            actual_savings.push_date(date, value.max(0.0))?;
        }
        actual_savings.push_date(self.as_of, self.scenario.current_savings)?;

        let months = self.months_to_goal().min(future_months_limit);
        let projected_savings = self.accumulate(contribution, months)?;
        let target_savings = self.accumulate(self.monthly_contribution_needed(), months)?;

        debug!(
            "accumulation chart: {} historical points, {} projected months",
            actual_savings.len(),
            months
        );

        Ok(AccumulationChart {
            actual_savings,
            projected_savings,
            target_savings,
            today_timestamp: unix_timestamp(self.as_of),
        })
    }

    /// Balance paths while drawing `monthly_withdrawal` after retirement
    ///
    /// Starts from the projected and target values at retirement and covers
    /// `retirement_years`, capped at `max_months` months.
    pub fn withdrawal_data(
        &self,
        retirement_years: u32,
        monthly_withdrawal: f64,
        max_months: u32,
    ) -> Result<WithdrawalChart> {
        if !monthly_withdrawal.is_finite() || monthly_withdrawal < 0.0 {
            return Err(CalcError::invalid("monthly withdrawal must be non-negative"));
        }

        let start = self.month_offset(self.months_to_goal() as i32)?;
        let total_months = retirement_years.saturating_mul(MONTHS_PER_YEAR);
        let end = add_months(start, total_months as i32)?;
        let months = total_months.min(max_months);

        let projected_savings = self.draw_down(start, self.projected_value(), monthly_withdrawal, months)?;
        let target_savings = self.draw_down(start, self.target_value_at_retirement(), monthly_withdrawal, months)?;

        Ok(WithdrawalChart {
            projected_savings,
            target_savings,
            retirement_start_timestamp: unix_timestamp(start),
            retirement_end_timestamp: unix_timestamp(end),
        })
    }

    fn month_offset(&self, months: i32) -> Result<NaiveDate> {
        add_months(self.as_of, months)
    }

    fn accumulate(&self, contribution: f64, months: u32) -> Result<ChartSeries> {
        let r = self.monthly_rate();
        let mut series = ChartSeries::with_capacity(months as usize);
        let mut value = self.scenario.current_savings;
        for i in 1..=months {
            value = value * (1.0 + r) + contribution;
            series.push_date(self.month_offset(i as i32)?, value.max(0.0))?;
        }
        Ok(series)
    }

    fn draw_down(&self, start: NaiveDate, opening: f64, withdrawal: f64, months: u32) -> Result<ChartSeries> {
        let r = self.monthly_rate();
        let mut series = ChartSeries::with_capacity(months as usize + 1);
        let mut value = opening;
        for i in 0..=months {
            value = (value * (1.0 + r) - withdrawal).max(0.0);
            series.push_date(add_months(start, i as i32)?, value)?;
        }
        Ok(series)
    }
}
