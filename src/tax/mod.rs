//! Progressive tax estimation over year-keyed bracket tables

mod brackets;
mod engine;
pub mod loader;

pub use brackets::{TaxBracket, TaxBracketRegistry, TaxBracketTable};
pub use engine::{progressive_tax, taxable_income, TaxEngine, TaxEstimate};
pub use loader::{load_bracket_tables, load_bracket_tables_from_reader, DEFAULT_BRACKETS_PATH};
