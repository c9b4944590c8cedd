//! Retirement savings projection
//!
//! A loosely specified [`ScenarioInput`] resolves into a validated
//! [`RetirementScenario`]; [`RetirementProjection`] evaluates it against a
//! fixed `as_of` date and produces summary figures and chart series for the
//! accumulation and withdrawal phases.

mod charts;
mod projection;
mod scenario;

pub use charts::{AccumulationChart, WithdrawalChart};
pub use projection::{RetirementProjection, RetirementSummary};
pub use scenario::{RetirementScenario, ScenarioInput};
