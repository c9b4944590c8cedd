//! Time series in the `{time, value}` shape consumed by the charting front end

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{CalcError, Result};
use crate::values::{round2, unix_timestamp};

/// A single chart point: unix seconds and a finite value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: i64,
    pub value: f64,
}

/// Points in strictly ascending time order, with no missing values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ChartSeries {
    points: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Append a point; rejects non-finite values and out-of-order times
    pub fn push(&mut self, time: i64, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(CalcError::calculation("chart series", format!("non-finite value at {time}")));
        }
        if let Some(last) = self.points.last() {
            if time <= last.time {
                return Err(CalcError::calculation(
                    "chart series",
                    format!("time {time} does not follow {}", last.time),
                ));
            }
        }
        self.points.push(ChartPoint { time, value });
        Ok(())
    }

    /// Append a point for `date`, rounding the value to cents
    pub fn push_date(&mut self, date: NaiveDate, value: f64) -> Result<()> {
        self.push(unix_timestamp(date), round2(value))
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&ChartPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ChartPoint> {
        self.points.last()
    }
}
