//! Net-worth aggregation across savings accounts, loans and holdings
//!
//! Every metric is computed through a fallible `try_*` method. The public
//! accessors and [`NetWorthCalculator::calculate`] guard each metric on its
//! own: a failure is logged and replaced by zero (or an empty map) so the
//! remaining figures are still reported.

use chrono::NaiveDate;
use log::error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::holdings::{Holding, PortfolioValuation};
use crate::error::{CalcError, Result};
use crate::values::{add_months, month_start, round2, FinancialPeriod};

/// A dated balance on a savings or checking account
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalances {
    pub name: String,
    #[serde(default)]
    pub balances: Vec<BalanceEntry>,
}

impl AccountBalances {
    /// Latest balance recorded within the month containing `month`
    pub fn balance_for_month(&self, month: NaiveDate) -> Option<f64> {
        let start = month_start(month);
        self.balances
            .iter()
            .filter(|b| month_start(b.date) == start)
            .max_by_key(|b| b.date)
            .map(|b| b.amount)
    }
}

/// Outstanding debt; the current balance wins over the original principal
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoanBalance {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub current_balance: Option<f64>,
    #[serde(default)]
    pub principal: Option<f64>,
}

impl LoanBalance {
    pub fn outstanding(&self) -> f64 {
        self.current_balance.or(self.principal).unwrap_or(0.0)
    }
}

/// Everything the aggregator needs, as supplied by the caller
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetWorthInput {
    pub accounts: Vec<AccountBalances>,
    pub loans: Vec<LoanBalance>,
    pub holdings: Vec<Holding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub net_worth: f64,
    pub assets: f64,
    pub liabilities: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorthSnapshot {
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub net_worth: f64,
    pub monthly_savings: f64,
    pub asset_allocation: BTreeMap<String, f64>,
    /// Keyed by month start, oldest first
    pub monthly_trends: BTreeMap<NaiveDate, MonthlyTrend>,
}

pub struct NetWorthCalculator<'a> {
    input: &'a NetWorthInput,
    as_of: NaiveDate,
}

impl<'a> NetWorthCalculator<'a> {
    pub fn new(input: &'a NetWorthInput, as_of: NaiveDate) -> Self {
        Self { input, as_of }
    }

    /// Portfolio value plus this month's savings, each guarded on its own
    pub fn total_assets(&self) -> f64 {
        self.portfolio_value() + self.total_savings_for_month(self.as_of)
    }

    pub fn portfolio_value(&self) -> f64 {
        guarded("portfolio_value", self.try_portfolio_value())
    }

    pub fn total_liabilities(&self) -> f64 {
        guarded("total_liabilities", self.try_total_liabilities())
    }

    pub fn net_worth(&self) -> f64 {
        self.total_assets() - self.total_liabilities()
    }

    pub fn monthly_savings(&self) -> f64 {
        guarded("monthly_savings", self.try_monthly_savings())
    }

    pub fn total_savings_for_month(&self, month: NaiveDate) -> f64 {
        guarded("savings_for_month", self.try_savings_for_month(month))
    }

    pub fn asset_allocation(&self) -> BTreeMap<String, f64> {
        guarded("asset_allocation", self.try_asset_allocation())
    }

    pub fn monthly_trends(&self, months: u32) -> BTreeMap<NaiveDate, MonthlyTrend> {
        guarded("monthly_trends", self.try_monthly_trends(months))
    }

    /// Full dashboard snapshot, currency figures rounded to cents
    pub fn calculate(&self, trend_months: u32) -> NetWorthSnapshot {
        let total_assets = self.total_assets();
        let total_liabilities = self.total_liabilities();
        NetWorthSnapshot {
            total_assets: round2(total_assets),
            total_liabilities: round2(total_liabilities),
            net_worth: round2(total_assets - total_liabilities),
            monthly_savings: round2(self.monthly_savings()),
            asset_allocation: self.asset_allocation(),
            monthly_trends: self.monthly_trends(trend_months),
        }
    }

    fn try_portfolio_value(&self) -> Result<f64> {
        finite("portfolio_value", PortfolioValuation::new(&self.input.holdings).total_value())
    }

    fn try_total_liabilities(&self) -> Result<f64> {
        let total = self.input.loans.iter().map(LoanBalance::outstanding).sum();
        finite("total_liabilities", total)
    }

    fn try_savings_for_month(&self, month: NaiveDate) -> Result<f64> {
        let total = self
            .input
            .accounts
            .iter()
            .filter_map(|a| a.balance_for_month(month))
            .sum();
        finite("savings_for_month", total)
    }

    fn try_monthly_savings(&self) -> Result<f64> {
        let previous = FinancialPeriod::monthly(self.as_of).previous_period()?;
        let current = self.try_savings_for_month(self.as_of)?;
        let last = self.try_savings_for_month(previous.start_of_period()?)?;
        Ok(current - last)
    }

    fn try_asset_allocation(&self) -> Result<BTreeMap<String, f64>> {
        let allocation = PortfolioValuation::new(&self.input.holdings).asset_allocation();
        for (asset_type, value) in &allocation {
            finite(asset_type, *value)?;
        }
        Ok(allocation)
    }

    /// Current portfolio value and liabilities stand in for their history
    fn try_monthly_trends(&self, months: u32) -> Result<BTreeMap<NaiveDate, MonthlyTrend>> {
        let portfolio = self.portfolio_value();
        let liabilities = self.total_liabilities();
        let this_month = month_start(self.as_of);

        let mut trends = BTreeMap::new();
        for months_ago in 0..months {
            let month = add_months(this_month, -(months_ago as i32))?;
            let assets = portfolio + self.total_savings_for_month(month);
            trends.insert(
                month,
                MonthlyTrend {
                    net_worth: round2(assets - liabilities),
                    assets: round2(assets),
                    liabilities: round2(liabilities),
                },
            );
        }
        Ok(trends)
    }
}

fn finite(metric: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::calculation(metric, format!("non-finite total {value}")))
    }
}

fn guarded<T: Default>(metric: &str, result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!("error calculating {metric}: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry(date: NaiveDate, amount: f64) -> BalanceEntry {
        BalanceEntry { date, amount }
    }

    fn sample() -> NetWorthInput {
        NetWorthInput {
            accounts: vec![
                AccountBalances {
                    name: "checking".into(),
                    balances: vec![
                        entry(d(2024, 4, 1), 2_000.0),
                        entry(d(2024, 5, 1), 2_500.0),
                        entry(d(2024, 5, 20), 3_000.0),
                    ],
                },
                AccountBalances {
                    name: "savings".into(),
                    balances: vec![entry(d(2024, 4, 1), 10_000.0), entry(d(2024, 5, 1), 10_500.0)],
                },
            ],
            loans: vec![
                LoanBalance {
                    name: Some("car".into()),
                    current_balance: Some(8_000.0),
                    principal: Some(20_000.0),
                },
                LoanBalance {
                    name: Some("student".into()),
                    current_balance: None,
                    principal: Some(5_000.0),
                },
            ],
            holdings: vec![
                Holding::new("VTI", Some("equity"), 30_000.0, 25_000.0),
                Holding::new("BND", Some("bond"), 10_000.0, 10_000.0),
            ],
        }
    }

    #[test]
    fn test_latest_balance_in_month() {
        let input = sample();
        assert_eq!(input.accounts[0].balance_for_month(d(2024, 5, 31)), Some(3_000.0));
        assert_eq!(input.accounts[0].balance_for_month(d(2024, 6, 1)), None);
    }

    #[test]
    fn test_snapshot() {
        let input = sample();
        let calc = NetWorthCalculator::new(&input, d(2024, 5, 25));
        let snapshot = calc.calculate(3);

        assert_eq!(snapshot.total_assets, 40_000.0 + 13_500.0);
        assert_eq!(snapshot.total_liabilities, 13_000.0);
        assert_eq!(snapshot.net_worth, 53_500.0 - 13_000.0);
        assert_eq!(snapshot.monthly_savings, 13_500.0 - 12_000.0);
        assert_eq!(snapshot.asset_allocation["equity"], 30_000.0);

        let months: Vec<NaiveDate> = snapshot.monthly_trends.keys().copied().collect();
        assert_eq!(months, vec![d(2024, 3, 1), d(2024, 4, 1), d(2024, 5, 1)]);
        assert_eq!(snapshot.monthly_trends[&d(2024, 3, 1)].assets, 40_000.0);
        assert_eq!(snapshot.monthly_trends[&d(2024, 4, 1)].net_worth, 52_000.0 - 13_000.0);
    }

    #[test]
    fn test_failing_metric_is_isolated() {
        let mut input = sample();
        input.loans.push(LoanBalance {
            current_balance: Some(f64::NAN),
            ..Default::default()
        });
        let calc = NetWorthCalculator::new(&input, d(2024, 5, 25));
        let snapshot = calc.calculate(2);

        assert_eq!(snapshot.total_liabilities, 0.0);
        assert_eq!(snapshot.total_assets, 53_500.0);
        assert_eq!(snapshot.net_worth, 53_500.0);
        assert_eq!(snapshot.monthly_savings, 1_500.0);
        assert_eq!(snapshot.asset_allocation.len(), 2);

        assert_eq!(snapshot.monthly_trends.len(), 2);
        let may = snapshot.monthly_trends[&d(2024, 5, 1)];
        assert_eq!(may.assets, 53_500.0);
        assert_eq!(may.liabilities, 0.0);
        assert_eq!(may.net_worth, 53_500.0);
    }

    #[test]
    fn test_bad_portfolio_keeps_savings() {
        let input = NetWorthInput {
            accounts: vec![AccountBalances {
                name: "savings".into(),
                balances: vec![entry(d(2024, 5, 1), 1_000.0)],
            }],
            loans: vec![LoanBalance {
                current_balance: Some(f64::NAN),
                ..Default::default()
            }],
            holdings: vec![Holding::new("BAD", Some("equity"), f64::INFINITY, 0.0)],
        };
        let snapshot = NetWorthCalculator::new(&input, d(2024, 5, 25)).calculate(3);

        assert_eq!(snapshot.total_assets, 1_000.0);
        assert_eq!(snapshot.total_liabilities, 0.0);
        assert_eq!(snapshot.net_worth, 1_000.0);
        assert!(snapshot.asset_allocation.is_empty());
        assert_eq!(snapshot.monthly_trends.len(), 3);
        assert_eq!(snapshot.monthly_trends[&d(2024, 5, 1)].assets, 1_000.0);
        assert_eq!(snapshot.monthly_trends[&d(2024, 4, 1)].assets, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let input = NetWorthInput::default();
        let snapshot = NetWorthCalculator::new(&input, d(2024, 1, 10)).calculate(12);
        assert_eq!(snapshot.net_worth, 0.0);
        assert_eq!(snapshot.monthly_trends.len(), 12);
        assert!(snapshot.asset_allocation.is_empty());
    }

    #[test]
    fn test_snapshot_json_keys() {
        let input = sample();
        let snapshot = NetWorthCalculator::new(&input, d(2024, 5, 25)).calculate(1);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["monthly_trends"]["2024-05-01"]["net_worth"].is_number());
    }
}
