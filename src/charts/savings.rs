//! Daily savings, spending and net-savings series from monthly snapshots

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::series::ChartSeries;
use crate::error::{CalcError, Result};
use crate::values::month_start;

/// Snapshots further than this many months from a day are ignored
const NEAREST_SNAPSHOT_MONTHS: i32 = 3;

/// A balance recorded for one account or expense in some month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySnapshot {
    pub recorded_at: NaiveDate,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsChartData {
    pub savings: ChartSeries,
    pub spending: ChartSeries,
    pub net_savings: ChartSeries,
}

/// Snapshot totals keyed by month start
#[derive(Debug, Clone, Default)]
struct MonthlyTotals(BTreeMap<NaiveDate, f64>);

impl MonthlyTotals {
    fn from_snapshots(snapshots: &[MonthlySnapshot]) -> Self {
        let mut totals = BTreeMap::new();
        for s in snapshots {
            *totals.entry(month_start(s.recorded_at)).or_insert(0.0) += s.balance;
        }
        Self(totals)
    }

    /// Total for the day's month, else the nearest month within range, else 0
    fn value_for(&self, date: NaiveDate) -> f64 {
        let month = month_start(date);
        if let Some(total) = self.0.get(&month) {
            return *total;
        }
        self.0
            .iter()
            .map(|(m, total)| (month_distance(*m, month), *total))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance < NEAREST_SNAPSHOT_MONTHS)
            .map(|(_, total)| total)
            .unwrap_or(0.0)
    }
}

fn month_distance(a: NaiveDate, b: NaiveDate) -> i32 {
    ((a.year() - b.year()) * 12 + a.month() as i32 - b.month() as i32).abs()
}

/// Build the three daily series for the `days` days before `as_of`
pub fn savings_chart(
    savings: &[MonthlySnapshot],
    expenses: &[MonthlySnapshot],
    as_of: NaiveDate,
    days: u32,
) -> Result<SavingsChartData> {
    let start = as_of
        .checked_sub_days(Days::new(days as u64))
        .ok_or_else(|| CalcError::invalid(format!("{days} days before {as_of} is out of range")))?;

    let savings_totals = MonthlyTotals::from_snapshots(savings);
    let expense_totals = MonthlyTotals::from_snapshots(expenses);

    let mut data = SavingsChartData {
        savings: ChartSeries::with_capacity(days as usize),
        spending: ChartSeries::with_capacity(days as usize),
        net_savings: ChartSeries::with_capacity(days as usize),
    };

    for date in start.iter_days().take(days as usize) {
        let saved = savings_totals.value_for(date);
        let spent = expense_totals.value_for(date);
        data.savings.push_date(date, saved)?;
        data.spending.push_date(date, spent)?;
        data.net_savings.push_date(date, saved - spent)?;
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::unix_timestamp;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn snap(y: i32, m: u32, balance: f64) -> MonthlySnapshot {
        MonthlySnapshot {
            recorded_at: d(y, m, 1),
            balance,
        }
    }

    #[test]
    fn test_daily_values_from_monthly_snapshots() {
        let savings = vec![snap(2024, 5, 1_000.0), snap(2024, 5, 500.0), snap(2024, 6, 2_000.0)];
        let expenses = vec![snap(2024, 5, 300.0), snap(2024, 6, 400.0)];

        let data = savings_chart(&savings, &expenses, d(2024, 6, 3), 5).unwrap();
        assert_eq!(data.savings.len(), 5);

        // May 29 .. Jun 2
        let first = data.savings.first().unwrap();
        assert_eq!(first.time, unix_timestamp(d(2024, 5, 29)));
        assert_eq!(first.value, 1_500.0);
        assert_eq!(data.savings.last().unwrap().value, 2_000.0);
        assert_eq!(data.net_savings.first().unwrap().value, 1_200.0);
        assert_eq!(data.net_savings.last().unwrap().value, 1_600.0);
    }

    #[test]
    fn test_nearest_snapshot_window() {
        let savings = vec![snap(2024, 1, 800.0)];
        let totals = MonthlyTotals::from_snapshots(&savings);

        assert_eq!(totals.value_for(d(2024, 3, 15)), 800.0);
        assert_eq!(totals.value_for(d(2024, 4, 15)), 0.0);
        assert_eq!(totals.value_for(d(2023, 11, 30)), 800.0);
    }

    #[test]
    fn test_no_snapshots_is_all_zero() {
        let data = savings_chart(&[], &[], d(2024, 1, 10), 3).unwrap();
        assert!(data.savings.points().iter().all(|p| p.value == 0.0));
        assert!(data.net_savings.points().iter().all(|p| p.value == 0.0));
    }
}
