//! Insurance policy cost and coverage analysis

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::MONTHS_PER_YEAR;
use crate::error::{CalcError, Result};
use crate::values::round2;

/// Life cover is suggested at this multiple of total assets
const LIFE_COVER_ASSET_MULTIPLE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    Life,
    Health,
    Auto,
    Home,
    Other,
}

impl PolicyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Life => "life",
            PolicyType::Health => "health",
            PolicyType::Auto => "auto",
            PolicyType::Home => "home",
            PolicyType::Other => "other",
        }
    }
}

impl FromStr for PolicyType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "life" => Ok(PolicyType::Life),
            "health" => Ok(PolicyType::Health),
            "auto" => Ok(PolicyType::Auto),
            "home" => Ok(PolicyType::Home),
            "other" => Ok(PolicyType::Other),
            other => Err(CalcError::invalid(format!("invalid policy type: {other}"))),
        }
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    pub policy_type: PolicyType,
    #[serde(default)]
    pub monthly_premium: Option<f64>,
    #[serde(default)]
    pub coverage_amount: Option<f64>,
    /// Absent means a one-year term
    #[serde(default)]
    pub term_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsuranceAnalysis {
    pub monthly_premium: f64,
    pub annual_premium: f64,
    pub total_cost: f64,
    pub coverage_amount: f64,
    /// Annual premium per $1,000 of coverage
    pub cost_per_thousand: f64,
    /// Coverage as a percentage of the suggested coverage
    pub coverage_adequacy: f64,
    pub suggested_coverage: f64,
    pub months_remaining: u32,
}

impl InsurancePolicy {
    pub fn monthly_premium(&self) -> f64 {
        self.monthly_premium.unwrap_or(0.0)
    }

    pub fn annual_premium(&self) -> f64 {
        self.monthly_premium() * MONTHS_PER_YEAR as f64
    }

    pub fn term_years(&self) -> u32 {
        self.term_years.unwrap_or(1)
    }

    pub fn total_cost(&self) -> f64 {
        self.annual_premium() * self.term_years() as f64
    }

    pub fn coverage_amount(&self) -> f64 {
        self.coverage_amount.unwrap_or(0.0)
    }

    pub fn cost_per_thousand(&self) -> f64 {
        let coverage = self.coverage_amount();
        if coverage <= 0.0 {
            return 0.0;
        }
        self.annual_premium() / coverage * 1000.0
    }

    pub fn suggested_coverage(&self, total_assets: f64) -> f64 {
        match self.policy_type {
            PolicyType::Life => total_assets * LIFE_COVER_ASSET_MULTIPLE,
            _ => self.coverage_amount(),
        }
    }

    pub fn coverage_adequacy(&self, total_assets: f64) -> f64 {
        let coverage = self.coverage_amount();
        let suggested = self.suggested_coverage(total_assets);
        if coverage <= 0.0 || suggested <= 0.0 {
            return 0.0;
        }
        coverage / suggested * 100.0
    }

    pub fn months_remaining(&self) -> u32 {
        self.term_years() * MONTHS_PER_YEAR
    }

    /// Cost and adequacy figures given the holder's total assets
    pub fn analyze(&self, total_assets: f64) -> Result<InsuranceAnalysis> {
        for (field, value) in [
            ("monthly premium", self.monthly_premium()),
            ("coverage amount", self.coverage_amount()),
            ("total assets", total_assets),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CalcError::invalid(format!("{field} must be non-negative")));
            }
        }

        Ok(InsuranceAnalysis {
            monthly_premium: round2(self.monthly_premium()),
            annual_premium: round2(self.annual_premium()),
            total_cost: round2(self.total_cost()),
            coverage_amount: round2(self.coverage_amount()),
            cost_per_thousand: round2(self.cost_per_thousand()),
            coverage_adequacy: round2(self.coverage_adequacy(total_assets)),
            suggested_coverage: round2(self.suggested_coverage(total_assets)),
            months_remaining: self.months_remaining(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(policy_type: PolicyType, premium: f64, coverage: f64, term: Option<u32>) -> InsurancePolicy {
        InsurancePolicy {
            policy_type,
            monthly_premium: Some(premium),
            coverage_amount: Some(coverage),
            term_years: term,
        }
    }

    #[test]
    fn test_life_policy_analysis() {
        let analysis = policy(PolicyType::Life, 50.0, 500_000.0, Some(20))
            .analyze(100_000.0)
            .unwrap();

        assert_eq!(analysis.annual_premium, 600.0);
        assert_eq!(analysis.total_cost, 12_000.0);
        assert_eq!(analysis.cost_per_thousand, 1.2);
        assert_eq!(analysis.suggested_coverage, 200_000.0);
        assert_eq!(analysis.coverage_adequacy, 250.0);
        assert_eq!(analysis.months_remaining, 240);
    }

    #[test]
    fn test_non_life_policy_is_fully_adequate() {
        let analysis = policy(PolicyType::Auto, 120.0, 30_000.0, None).analyze(0.0).unwrap();
        assert_eq!(analysis.suggested_coverage, 30_000.0);
        assert_eq!(analysis.coverage_adequacy, 100.0);
        assert_eq!(analysis.total_cost, 1_440.0);
        assert_eq!(analysis.months_remaining, 12);
    }

    #[test]
    fn test_missing_figures_default_to_zero() {
        let p = InsurancePolicy {
            policy_type: PolicyType::Life,
            monthly_premium: None,
            coverage_amount: None,
            term_years: Some(0),
        };
        let analysis = p.analyze(50_000.0).unwrap();
        assert_eq!(analysis.cost_per_thousand, 0.0);
        assert_eq!(analysis.coverage_adequacy, 0.0);
        assert_eq!(analysis.total_cost, 0.0);
        assert_eq!(analysis.months_remaining, 0);
    }

    #[test]
    fn test_rejects_negative_inputs() {
        assert!(policy(PolicyType::Home, -1.0, 1.0, None).analyze(0.0).is_err());
        assert!(policy(PolicyType::Home, 1.0, 1.0, None).analyze(-5.0).is_err());
    }

    #[test]
    fn test_policy_type_parse() {
        assert_eq!(" Health ".parse::<PolicyType>().unwrap(), PolicyType::Health);
        assert!("pet".parse::<PolicyType>().is_err());
    }
}
