//! Progressive income tax estimation

use log::debug;
use serde::Serialize;

use super::brackets::{TaxBracketRegistry, TaxBracketTable};
use crate::error::{CalcError, Result};
use crate::values::round2;

/// Result of a tax estimate; currency fields rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxEstimate {
    pub income: f64,
    pub deductions: f64,
    pub taxable_income: f64,
    pub estimated_tax: f64,
    pub after_tax_income: f64,
    /// Tax as a percentage of gross income
    pub effective_rate: f64,
    /// Marginal bracket rate in percent
    pub tax_bracket: f64,
    pub bracket_min: f64,
    /// None when the marginal bracket is unbounded
    pub bracket_max: Option<f64>,
}

/// Tax engine over a set of year-keyed bracket tables
#[derive(Debug, Clone)]
pub struct TaxEngine {
    registry: TaxBracketRegistry,
}

impl TaxEngine {
    pub fn new(registry: TaxBracketRegistry) -> Self {
        Self { registry }
    }

    /// Engine using only the compiled-in tables
    pub fn builtin() -> Self {
        Self::new(TaxBracketRegistry::builtin())
    }

    pub fn available_years(&self) -> Vec<i32> {
        self.registry.available_years()
    }

    /// Estimate tax for `income` less `deductions` in `year`
    pub fn calculate(&self, income: f64, deductions: f64, year: i32) -> Result<TaxEstimate> {
        if !income.is_finite() || income < 0.0 {
            return Err(CalcError::invalid("income must be non-negative"));
        }
        if !deductions.is_finite() || deductions < 0.0 {
            return Err(CalcError::invalid("deductions must be non-negative"));
        }
        let table = self.registry.for_year(year)?;

        let taxable = taxable_income(income, deductions);
        let tax = progressive_tax(table, taxable);
        let marginal = table.marginal_bracket(taxable);
        debug!("tax {year}: taxable {taxable:.2} -> {tax:.2}");

        let effective_rate = if income <= 0.0 {
            0.0
        } else {
            round2(tax / income * 100.0)
        };

        Ok(TaxEstimate {
            income: round2(income),
            deductions: round2(deductions),
            taxable_income: round2(taxable),
            estimated_tax: round2(tax),
            after_tax_income: round2(income - tax),
            effective_rate,
            tax_bracket: round2(marginal.rate * 100.0),
            bracket_min: marginal.min,
            bracket_max: marginal.max,
        })
    }
}

impl Default for TaxEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn taxable_income(income: f64, deductions: f64) -> f64 {
    (income - deductions).max(0.0)
}

/// Accumulate tax bracket by bracket
///
/// Bounds are inclusive whole dollars, so a fully used bracket contributes
/// `(max - min + 1) * rate` and the partial one `(taxable - min + 1) * rate`.
pub fn progressive_tax(table: &TaxBracketTable, taxable: f64) -> f64 {
    if taxable <= 0.0 {
        return 0.0;
    }

    let mut total = 0.0;
    for bracket in table.brackets() {
        if taxable <= bracket.min {
            continue;
        }
        match bracket.max {
            Some(max) if taxable > max => {
                total += (max - bracket.min + 1.0) * bracket.rate;
            }
            _ => {
                total += (taxable - bracket.min + 1.0) * bracket.rate;
                break;
            }
        }
    }
    total
}
