//! Portfolio valuation and net-worth aggregation

mod holdings;
mod net_worth;

pub use holdings::{Holding, PortfolioValuation, UNCLASSIFIED_ASSET_TYPE};
pub use net_worth::{
    AccountBalances, BalanceEntry, LoanBalance, MonthlyTrend, NetWorthCalculator, NetWorthInput,
    NetWorthSnapshot,
};
