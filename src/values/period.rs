//! Calendar periods and date helpers
//!
//! Month arithmetic clamps to the last day of shorter months
//! (Jan 31 + 1 month = Feb 28/29).

use chrono::{Datelike, Months, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, Result};

/// Granularity of a financial period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Monthly,
    Quarterly,
    Yearly,
}

impl PeriodType {
    fn months(&self) -> u32 {
        match self {
            PeriodType::Monthly => 1,
            PeriodType::Quarterly => 3,
            PeriodType::Yearly => 12,
        }
    }
}

impl FromStr for PeriodType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(PeriodType::Monthly),
            "quarterly" => Ok(PeriodType::Quarterly),
            "yearly" => Ok(PeriodType::Yearly),
            other => Err(CalcError::invalid(format!("invalid period type: {other}"))),
        }
    }
}

/// A date viewed through a monthly, quarterly or yearly period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinancialPeriod {
    pub date: NaiveDate,
    pub period_type: PeriodType,
}

impl FinancialPeriod {
    pub fn new(date: NaiveDate, period_type: PeriodType) -> Self {
        Self { date, period_type }
    }

    pub fn monthly(date: NaiveDate) -> Self {
        Self::new(date, PeriodType::Monthly)
    }

    pub fn parse(date: NaiveDate, period_type: &str) -> Result<Self> {
        Ok(Self::new(date, period_type.parse()?))
    }

    pub fn start_of_period(&self) -> Result<NaiveDate> {
        let year = self.date.year();
        match self.period_type {
            PeriodType::Monthly => first_of(year, self.date.month()),
            PeriodType::Quarterly => first_of(year, quarter_index(self.date) * 3 + 1),
            PeriodType::Yearly => first_of(year, 1),
        }
    }

    pub fn end_of_period(&self) -> Result<NaiveDate> {
        let start = self.start_of_period()?;
        let next = add_months(start, self.period_type.months() as i32)?;
        next.pred_opt()
            .ok_or_else(|| CalcError::invalid(format!("no day before {next}")))
    }

    pub fn next_period(&self) -> Result<FinancialPeriod> {
        let date = add_months(self.date, self.period_type.months() as i32)?;
        Ok(Self::new(date, self.period_type))
    }

    pub fn previous_period(&self) -> Result<FinancialPeriod> {
        let date = add_months(self.date, -(self.period_type.months() as i32))?;
        Ok(Self::new(date, self.period_type))
    }

    /// Whole periods from this date until `target`; 0 when `target` is not later
    pub fn periods_until(&self, target: NaiveDate) -> u32 {
        if target <= self.date {
            return 0;
        }
        let years = (target.year() - self.date.year()) as i64;
        let count = match self.period_type {
            PeriodType::Monthly => years * 12 + target.month() as i64 - self.date.month() as i64,
            PeriodType::Quarterly => {
                years * 4 + quarter_index(target) as i64 - quarter_index(self.date) as i64
            }
            PeriodType::Yearly => years,
        };
        count.max(0) as u32
    }

    /// Month (1-12), quarter (1-4) or year
    pub fn period_number(&self) -> i32 {
        match self.period_type {
            PeriodType::Monthly => self.date.month() as i32,
            PeriodType::Quarterly => quarter_index(self.date) as i32 + 1,
            PeriodType::Yearly => self.date.year(),
        }
    }
}

impl fmt::Display for FinancialPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.period_type {
            PeriodType::Monthly => write!(f, "{}", self.date.format("%B %Y")),
            PeriodType::Quarterly => {
                write!(f, "Q{} {}", quarter_index(self.date) + 1, self.date.year())
            }
            PeriodType::Yearly => write!(f, "{}", self.date.year()),
        }
    }
}

fn quarter_index(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3
}

fn first_of(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CalcError::invalid(format!("invalid month {year}-{month}")))
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a date by whole months, clamping the day to the target month's length
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months as u32))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or_else(|| CalcError::invalid(format!("date out of range: {date} shifted by {months} months")))
}

/// Unix seconds at midnight UTC of `date`
pub fn unix_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}
