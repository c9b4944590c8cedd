//! CSV-based bracket table loader
//!
//! File layout: `year,rate,min,max`, one row per bracket, empty `max` for the
//! unbounded top bracket. Rows may appear in any order.

use csv::Reader;
use log::debug;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use super::brackets::{TaxBracket, TaxBracketRegistry, TaxBracketTable};
use crate::error::Result;

/// Default location of the shipped bracket table
pub const DEFAULT_BRACKETS_PATH: &str = "data/tax_brackets.csv";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    year: i32,
    rate: f64,
    min: f64,
    max: Option<f64>,
}

/// Load every year found in a bracket CSV file
pub fn load_bracket_tables<P: AsRef<Path>>(path: P) -> Result<TaxBracketRegistry> {
    let reader = Reader::from_path(path)?;
    collect_tables(reader)
}

/// Load bracket tables from any reader (string buffer, embedded asset)
pub fn load_bracket_tables_from_reader<R: Read>(reader: R) -> Result<TaxBracketRegistry> {
    collect_tables(Reader::from_reader(reader))
}

fn collect_tables<R: Read>(mut reader: Reader<R>) -> Result<TaxBracketRegistry> {
    let mut by_year: BTreeMap<i32, Vec<TaxBracket>> = BTreeMap::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        by_year
            .entry(row.year)
            .or_default()
            .push(TaxBracket::new(row.rate, row.min, row.max));
    }

    let mut registry = TaxBracketRegistry::empty();
    for (year, mut brackets) in by_year {
        brackets.sort_by(|a, b| a.min.total_cmp(&b.min));
        debug!("loaded {} tax brackets for {}", brackets.len(), year);
        registry.insert(TaxBracketTable::new(year, brackets)?);
    }

    Ok(registry)
}

impl TaxBracketRegistry {
    /// Load a registry from a bracket CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        load_bracket_tables(path)
    }
}
