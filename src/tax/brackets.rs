//! Progressive tax bracket tables keyed by year

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CalcError, Result};

/// One marginal bracket; `min` and `max` are inclusive whole-dollar bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Marginal rate as a fraction (0.12 = 12%)
    pub rate: f64,
    pub min: f64,
    /// None for the unbounded top bracket
    pub max: Option<f64>,
}

impl TaxBracket {
    pub fn new(rate: f64, min: f64, max: Option<f64>) -> Self {
        Self { rate, min, max }
    }
}

/// Brackets for a single year, sorted and contiguous from 0 to unbounded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxBracketTable {
    year: i32,
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Validate and build a table
    ///
    /// Brackets must start at 0, follow each other with `next.min == prev.max + 1`,
    /// and only the last one may be unbounded.
    pub fn new(year: i32, brackets: Vec<TaxBracket>) -> Result<Self> {
        let first = brackets
            .first()
            .ok_or_else(|| CalcError::invalid(format!("tax year {year} has no brackets")))?;
        if first.min != 0.0 {
            return Err(CalcError::invalid(format!(
                "tax year {year}: first bracket must start at 0, got {}",
                first.min
            )));
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if !bracket.rate.is_finite() || !(0.0..=1.0).contains(&bracket.rate) {
                return Err(CalcError::invalid(format!(
                    "tax year {year}: bracket {i} rate {} outside 0..1",
                    bracket.rate
                )));
            }
            if let Some(max) = bracket.max {
                if !max.is_finite() || max < bracket.min {
                    return Err(CalcError::invalid(format!(
                        "tax year {year}: bracket {i} max {max} below min {}",
                        bracket.min
                    )));
                }
            } else if i + 1 != brackets.len() {
                return Err(CalcError::invalid(format!(
                    "tax year {year}: only the last bracket may be unbounded"
                )));
            }
            if i > 0 {
                let prev_max = brackets[i - 1].max.unwrap_or(f64::INFINITY);
                if bracket.min != prev_max + 1.0 {
                    return Err(CalcError::invalid(format!(
                        "tax year {year}: bracket {i} starts at {} but previous ends at {prev_max}",
                        bracket.min
                    )));
                }
            }
        }

        if brackets.last().and_then(|b| b.max).is_some() {
            return Err(CalcError::invalid(format!(
                "tax year {year}: top bracket must be unbounded"
            )));
        }

        Ok(Self { year, brackets })
    }

    /// 2024 US federal single-filer brackets
    pub fn federal_2024() -> Self {
        Self {
            year: 2024,
            brackets: vec![
                TaxBracket::new(0.10, 0.0, Some(11_000.0)),
                TaxBracket::new(0.12, 11_001.0, Some(44_725.0)),
                TaxBracket::new(0.22, 44_726.0, Some(95_350.0)),
                TaxBracket::new(0.24, 95_351.0, Some(201_050.0)),
                TaxBracket::new(0.32, 201_051.0, Some(502_300.0)),
                TaxBracket::new(0.37, 502_301.0, None),
            ],
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// The bracket whose range holds `taxable_income`
    ///
    /// Amounts falling between one bracket's max and the next min (e.g. 11,000.50)
    /// belong to the lower bracket.
    pub fn marginal_bracket(&self, taxable_income: f64) -> &TaxBracket {
        self.brackets
            .iter()
            .rev()
            .find(|b| taxable_income >= b.min)
            .unwrap_or(&self.brackets[0])
    }
}

/// Year-keyed collection of bracket tables
///
/// Lookups are pure; an unknown year is always an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxBracketRegistry {
    tables: BTreeMap<i32, TaxBracketTable>,
}

impl TaxBracketRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the compiled-in 2024 table
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.insert(TaxBracketTable::federal_2024());
        registry
    }

    /// Add or replace the table for its year
    pub fn insert(&mut self, table: TaxBracketTable) {
        self.tables.insert(table.year(), table);
    }

    pub fn for_year(&self, year: i32) -> Result<&TaxBracketTable> {
        self.tables
            .get(&year)
            .ok_or_else(|| CalcError::invalid(format!("tax brackets not available for year: {year}")))
    }

    pub fn available_years(&self) -> Vec<i32> {
        self.tables.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_2024_is_valid() {
        let table = TaxBracketTable::federal_2024();
        let rebuilt = TaxBracketTable::new(2024, table.brackets().to_vec()).unwrap();
        assert_eq!(rebuilt, table);
        assert_eq!(table.brackets().len(), 6);
    }

    #[test]
    fn test_rejects_gap() {
        let brackets = vec![
            TaxBracket::new(0.10, 0.0, Some(1_000.0)),
            TaxBracket::new(0.20, 1_500.0, None),
        ];
        assert!(TaxBracketTable::new(2030, brackets).is_err());
    }

    #[test]
    fn test_rejects_bounded_top_and_bad_start() {
        let bounded = vec![TaxBracket::new(0.10, 0.0, Some(1_000.0))];
        assert!(TaxBracketTable::new(2030, bounded).is_err());

        let late_start = vec![TaxBracket::new(0.10, 5.0, None)];
        assert!(TaxBracketTable::new(2030, late_start).is_err());

        let middle_unbounded = vec![
            TaxBracket::new(0.10, 0.0, None),
            TaxBracket::new(0.20, 1.0, None),
        ];
        assert!(TaxBracketTable::new(2030, middle_unbounded).is_err());

        assert!(TaxBracketTable::new(2030, vec![]).is_err());
        assert!(TaxBracketTable::new(2030, vec![TaxBracket::new(1.5, 0.0, None)]).is_err());
    }

    #[test]
    fn test_marginal_bracket() {
        let table = TaxBracketTable::federal_2024();
        assert_eq!(table.marginal_bracket(0.0).rate, 0.10);
        assert_eq!(table.marginal_bracket(11_000.0).rate, 0.10);
        assert_eq!(table.marginal_bracket(11_000.5).rate, 0.10);
        assert_eq!(table.marginal_bracket(11_001.0).rate, 0.12);
        assert_eq!(table.marginal_bracket(30_000.0).rate, 0.12);
        assert_eq!(table.marginal_bracket(10_000_000.0).rate, 0.37);
    }

    #[test]
    fn test_registry_unknown_year() {
        let registry = TaxBracketRegistry::builtin();
        assert_eq!(registry.available_years(), vec![2024]);
        assert!(matches!(registry.for_year(1999), Err(CalcError::InvalidArgument(_))));
    }
}
