//! fincalc - Personal-finance calculation engine
//!
//! This library provides:
//! - Currency-safe money and interest-rate value types
//! - Loan payment and amortization schedules, with parallel batch evaluation
//! - Progressive tax estimates over year-keyed bracket tables
//! - Retirement projections with accumulation and withdrawal chart series
//! - Portfolio valuation and net-worth aggregation
//! - Insurance cost and coverage analysis

pub mod charts;
pub mod config;
pub mod error;
pub mod insurance;
pub mod loan;
pub mod portfolio;
pub mod retirement;
pub mod tax;
pub mod values;

// Re-export commonly used types
pub use config::EngineConfig;
pub use error::{CalcError, Result};
pub use insurance::{InsuranceAnalysis, InsurancePolicy, PolicyType};
pub use loan::{LoanEngine, LoanRequest, LoanSummary};
pub use portfolio::{NetWorthCalculator, NetWorthInput, NetWorthSnapshot, PortfolioValuation};
pub use retirement::{RetirementProjection, RetirementScenario, ScenarioInput};
pub use tax::{TaxBracketRegistry, TaxEngine, TaxEstimate};
pub use values::{Currency, InterestRate, Money};
