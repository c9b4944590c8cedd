//! Holding-level portfolio valuation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::values::round2;

/// Allocation key for holdings without an asset type
pub const UNCLASSIFIED_ASSET_TYPE: &str = "other";

/// A position as supplied by the caller, valued in dollars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    #[serde(default)]
    pub asset_type: Option<String>,
    pub current_value: f64,
    #[serde(default)]
    pub cost_basis: f64,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, asset_type: Option<&str>, current_value: f64, cost_basis: f64) -> Self {
        Self {
            ticker: ticker.into(),
            asset_type: asset_type.map(str::to_string),
            current_value,
            cost_basis,
        }
    }

    pub fn asset_class(&self) -> &str {
        match self.asset_type.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => UNCLASSIFIED_ASSET_TYPE,
        }
    }
}

/// Valuation over a borrowed set of holdings
#[derive(Debug, Clone, Copy)]
pub struct PortfolioValuation<'a> {
    holdings: &'a [Holding],
}

impl<'a> PortfolioValuation<'a> {
    pub fn new(holdings: &'a [Holding]) -> Self {
        Self { holdings }
    }

    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.current_value).sum()
    }

    /// Summed value per ticker
    pub fn value_by_ticker(&self) -> BTreeMap<String, f64> {
        let mut values = BTreeMap::new();
        for h in self.holdings {
            *values.entry(h.ticker.clone()).or_insert(0.0) += h.current_value;
        }
        values
    }

    /// Summed value per asset type
    pub fn asset_allocation(&self) -> BTreeMap<String, f64> {
        let mut allocation = BTreeMap::new();
        for h in self.holdings {
            *allocation.entry(h.asset_class().to_string()).or_insert(0.0) += h.current_value;
        }
        allocation
    }

    /// Share of total value per asset type in percent; empty when the total is zero
    pub fn allocation_percentages(&self) -> BTreeMap<String, f64> {
        let total = self.total_value();
        if total == 0.0 {
            return BTreeMap::new();
        }
        self.asset_allocation()
            .into_iter()
            .map(|(asset_type, value)| (asset_type, round2(value / total * 100.0)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Holding> {
        vec![
            Holding::new("VTI", Some("equity"), 6_000.0, 5_000.0),
            Holding::new("BND", Some("bond"), 3_000.0, 3_100.0),
            Holding::new("VTI", Some("equity"), 500.0, 400.0),
            Holding::new("CASH", None, 500.0, 500.0),
        ]
    }

    #[test]
    fn test_totals() {
        let holdings = sample();
        let valuation = PortfolioValuation::new(&holdings);
        assert_eq!(valuation.total_value(), 10_000.0);
        assert_eq!(valuation.value_by_ticker()["VTI"], 6_500.0);
    }

    #[test]
    fn test_allocation() {
        let holdings = sample();
        let valuation = PortfolioValuation::new(&holdings);

        let allocation = valuation.asset_allocation();
        assert_eq!(allocation["equity"], 6_500.0);
        assert_eq!(allocation["bond"], 3_000.0);
        assert_eq!(allocation[UNCLASSIFIED_ASSET_TYPE], 500.0);

        let pct = valuation.allocation_percentages();
        assert_eq!(pct["equity"], 65.0);
        assert_eq!(pct["bond"], 30.0);
        assert_eq!(pct["other"], 5.0);
    }

    #[test]
    fn test_empty_portfolio() {
        let valuation = PortfolioValuation::new(&[]);
        assert_eq!(valuation.total_value(), 0.0);
        assert!(valuation.asset_allocation().is_empty());
        assert!(valuation.allocation_percentages().is_empty());
    }
}
