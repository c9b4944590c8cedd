//! Chart-ready time series

mod savings;
mod series;

pub use savings::{savings_chart, MonthlySnapshot, SavingsChartData};
pub use series::{ChartPoint, ChartSeries};
