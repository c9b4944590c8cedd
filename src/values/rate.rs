//! Interest rates with APR/APY semantics and frequency conversions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, Result};

/// Whether a rate is nominal (APR) or already effective (APY)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateType {
    Apr,
    Apy,
}

impl RateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateType::Apr => "apr",
            RateType::Apy => "apy",
        }
    }
}

impl FromStr for RateType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "apr" => Ok(RateType::Apr),
            "apy" => Ok(RateType::Apy),
            other => Err(CalcError::InvalidRateType(other.to_string())),
        }
    }
}

/// How often interest compounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompoundingPeriod {
    Daily,
    Monthly,
    Quarterly,
    Annually,
}

impl CompoundingPeriod {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            CompoundingPeriod::Daily => 365,
            CompoundingPeriod::Monthly => 12,
            CompoundingPeriod::Quarterly => 4,
            CompoundingPeriod::Annually => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundingPeriod::Daily => "daily",
            CompoundingPeriod::Monthly => "monthly",
            CompoundingPeriod::Quarterly => "quarterly",
            CompoundingPeriod::Annually => "annually",
        }
    }
}

impl FromStr for CompoundingPeriod {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(CompoundingPeriod::Daily),
            "monthly" => Ok(CompoundingPeriod::Monthly),
            "quarterly" => Ok(CompoundingPeriod::Quarterly),
            "annually" => Ok(CompoundingPeriod::Annually),
            other => Err(CalcError::InvalidCompoundingPeriod(other.to_string())),
        }
    }
}

/// How often a loan payment is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Biweekly => 26,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Quarterly => "quarterly",
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(PaymentFrequency::Weekly),
            "biweekly" => Ok(PaymentFrequency::Biweekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "quarterly" => Ok(PaymentFrequency::Quarterly),
            other => Err(CalcError::invalid(format!("invalid payment frequency: {other}"))),
        }
    }
}

/// An annual interest rate in percent (5.0 = 5%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestRate {
    pub rate: f64,
    pub rate_type: RateType,
    pub compounding_period: CompoundingPeriod,
}

impl InterestRate {
    pub fn new(rate: f64, rate_type: RateType, compounding_period: CompoundingPeriod) -> Self {
        Self {
            rate,
            rate_type,
            compounding_period,
        }
    }

    /// Build from raw strings, e.g. `("apy", "quarterly")`
    pub fn parse(rate: f64, rate_type: &str, compounding_period: &str) -> Result<Self> {
        Ok(Self::new(rate, rate_type.parse()?, compounding_period.parse()?))
    }

    /// Nominal equivalent: n·((1 + r)^(1/n) − 1)
    pub fn to_apr(&self) -> InterestRate {
        if self.rate_type == RateType::Apr {
            return *self;
        }
        let n = self.compounding_period.periods_per_year() as f64;
        let apr = n * ((1.0 + self.rate / 100.0).powf(1.0 / n) - 1.0) * 100.0;
        InterestRate::new(apr, RateType::Apr, self.compounding_period)
    }

    /// Effective equivalent: (1 + r/n)^n − 1
    pub fn to_apy(&self) -> InterestRate {
        if self.rate_type == RateType::Apy {
            return *self;
        }
        let n = self.compounding_period.periods_per_year() as f64;
        let apy = ((1.0 + (self.rate / 100.0) / n).powf(n) - 1.0) * 100.0;
        InterestRate::new(apy, RateType::Apy, self.compounding_period)
    }

    /// APR as a decimal split evenly over `periods_per_year`
    pub fn periodic_rate(&self, periods_per_year: u32) -> f64 {
        self.to_apr().rate / 100.0 / periods_per_year as f64
    }

    /// Compounding-period rate re-expressed at the payment frequency, annualised (%)
    pub fn effective_annual_rate(&self, payments_per_year: u32) -> f64 {
        let compounding_per_year = self.compounding_period.periods_per_year();
        let periodic = self.periodic_rate(compounding_per_year);
        let effective = (1.0 + periodic).powf(compounding_per_year as f64 / payments_per_year as f64) - 1.0;
        effective * payments_per_year as f64 * 100.0
    }

    pub fn monthly_rate(&self) -> f64 {
        self.periodic_rate(12)
    }

    pub fn daily_rate(&self) -> f64 {
        self.periodic_rate(365)
    }
}

impl fmt::Display for InterestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}% {}", self.rate, self.rate_type.as_str().to_uppercase())
    }
}
