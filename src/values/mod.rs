//! Value types shared by every engine: money, rates, periods

mod money;
mod period;
mod rate;

pub use money::{Currency, Money};
pub use period::{add_months, month_start, unix_timestamp, FinancialPeriod, PeriodType};
pub use rate::{CompoundingPeriod, InterestRate, PaymentFrequency, RateType};

/// Round half away from zero to `places` decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Round a currency figure for output
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round2(1610.4649), 1610.46);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round_to(3.14159, 3), 3.142);
    }
}
