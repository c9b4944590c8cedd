//! Currency-tagged decimal amounts

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, Result};

/// Supported currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
    Jpy,
    Chf,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Cad,
        Currency::Aud,
        Currency::Jpy,
        Currency::Chf,
    ];

    /// ISO code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd | Currency::Cad | Currency::Aud => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Chf => "CHF",
        }
    }
}

impl FromStr for Currency {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or(CalcError::InvalidCurrency(code))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An immutable amount of money in a single currency
///
/// Every operation returns a new value. Arithmetic between two amounts
/// requires the same currency.
///
/// ```
/// # use fincalc::values::{Money, Currency};
/// # use rust_decimal::Decimal;
/// let a = Money::new(Decimal::new(123450, 2), Currency::Usd);
/// assert_eq!(a.formatted(), "$1,234.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Build from an amount and a currency code such as `"usd"` or `"EUR"`
    pub fn from_code(amount: Decimal, code: &str) -> Result<Self> {
        Ok(Self::new(amount, code.parse()?))
    }

    /// Build from a float amount in decimal-dollar form
    ///
    /// Goes through the shortest decimal rendering of the float, so `0.1`
    /// becomes exactly `0.1`.
    pub fn from_f64(amount: f64, currency: Currency) -> Result<Self> {
        let parsed = Decimal::from_str(&amount.to_string())
            .map_err(|_| CalcError::invalid(format!("amount {amount} is not representable")))?;
        Ok(Self::new(parsed, currency))
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| overflow("add"))?;
        Ok(Money::new(amount, self.currency))
    }

    pub fn subtract(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or_else(|| overflow("subtract"))?;
        Ok(Money::new(amount, self.currency))
    }

    pub fn multiply(&self, factor: Decimal) -> Result<Money> {
        let amount = self
            .amount
            .checked_mul(factor)
            .ok_or_else(|| overflow("multiply"))?;
        Ok(Money::new(amount, self.currency))
    }

    pub fn divide(&self, divisor: Decimal) -> Result<Money> {
        if divisor.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        let amount = self
            .amount
            .checked_div(divisor)
            .ok_or_else(|| overflow("divide"))?;
        Ok(Money::new(amount, self.currency))
    }

    /// Round half away from zero to `places` decimal places
    pub fn round(&self, places: u32) -> Money {
        Money::new(
            self.amount
                .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero),
            self.currency,
        )
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.amount.is_zero() && self.amount.is_sign_negative()
    }

    pub fn is_positive(&self) -> bool {
        !self.amount.is_zero() && self.amount.is_sign_positive()
    }

    pub fn to_f64(&self) -> f64 {
        self.amount.to_f64().unwrap_or(0.0)
    }

    /// Order two amounts of the same currency
    pub fn compare(&self, other: &Money) -> Result<Ordering> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Render with thousands separators and the currency's symbol placement
    pub fn formatted(&self) -> String {
        let number = self.formatted_plain();
        match self.currency {
            Currency::Usd | Currency::Cad | Currency::Aud | Currency::Gbp | Currency::Jpy => {
                format!("{}{}", self.currency.symbol(), number)
            }
            Currency::Eur => format!("{}{}", number, self.currency.symbol()),
            Currency::Chf => format!("{} {}", number, self.currency.symbol()),
        }
    }

    /// Render with thousands separators and no currency marker
    pub fn formatted_plain(&self) -> String {
        let mut text = self.amount.normalize().to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
        format!("{}.{}", with_delimiter(int_part, ','), frac_part)
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(CalcError::CurrencyMismatch {
                left: self.currency.code().to_string(),
                right: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl PartialOrd for Money {
    /// Amounts in different currencies are unordered
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

fn overflow(op: &str) -> CalcError {
    CalcError::calculation(format!("money {op}"), "decimal overflow")
}

/// Insert `delimiter` between every group of three digits, leaving a sign alone
fn with_delimiter(int_part: &str, delimiter: char) -> String {
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(delimiter);
        }
        out.push(ch);
    }
    format!("{sign}{out}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd(amount: Decimal) -> Money {
        Money::new(amount, Currency::Usd)
    }

    #[test]
    fn test_unknown_currency() {
        let err = Money::from_code(dec!(10), "XYZ").unwrap_err();
        assert!(matches!(err, CalcError::InvalidCurrency(code) if code == "XYZ"));
    }

    #[test]
    fn test_currency_code_is_case_insensitive() {
        let m = Money::from_code(dec!(10), " eur ").unwrap();
        assert_eq!(m.currency(), Currency::Eur);
    }

    #[test]
    fn test_add_and_subtract() {
        let a = usd(dec!(100.25));
        let b = usd(dec!(0.75));
        assert_eq!(a.add(&b).unwrap().amount(), dec!(101.00));
        assert_eq!(a.subtract(&b).unwrap().amount(), dec!(99.50));
    }

    #[test]
    fn test_currency_mismatch() {
        let a = usd(dec!(1));
        let b = Money::new(dec!(1), Currency::Eur);
        assert!(matches!(a.add(&b), Err(CalcError::CurrencyMismatch { .. })));
        assert!(matches!(a.subtract(&b), Err(CalcError::CurrencyMismatch { .. })));
        assert!(a.partial_cmp(&b).is_none());
    }

    #[test]
    fn test_divide_by_zero() {
        let a = usd(dec!(50));
        assert!(matches!(a.divide(Decimal::ZERO), Err(CalcError::DivisionByZero)));
        assert_eq!(a.divide(dec!(4)).unwrap().amount(), dec!(12.5));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(usd(dec!(2.345)).round(2).amount(), dec!(2.35));
        assert_eq!(usd(dec!(-2.345)).round(2).amount(), dec!(-2.35));
    }

    #[test]
    fn test_ordering_and_equality() {
        assert!(usd(dec!(1.50)) < usd(dec!(2)));
        assert_eq!(usd(dec!(1.5)), usd(dec!(1.50)));
        assert_ne!(usd(dec!(1)), Money::new(dec!(1), Currency::Cad));
    }

    #[test]
    fn test_predicates() {
        assert!(usd(Decimal::ZERO).is_zero());
        assert!(usd(dec!(-3)).is_negative());
        assert!(usd(dec!(3)).is_positive());
        assert!(!usd(Decimal::ZERO).is_positive());
    }

    #[test]
    fn test_formatted_by_currency() {
        let amount = dec!(1234567.5);
        assert_eq!(Money::new(amount, Currency::Usd).formatted(), "$1,234,567.5");
        assert_eq!(Money::new(amount, Currency::Cad).formatted(), "$1,234,567.5");
        assert_eq!(Money::new(amount, Currency::Aud).formatted(), "$1,234,567.5");
        assert_eq!(Money::new(amount, Currency::Gbp).formatted(), "£1,234,567.5");
        assert_eq!(Money::new(amount, Currency::Jpy).formatted(), "¥1,234,567.5");
        assert_eq!(Money::new(amount, Currency::Eur).formatted(), "1,234,567.5€");
        assert_eq!(Money::new(amount, Currency::Chf).formatted(), "1,234,567.5 CHF");
    }

    #[test]
    fn test_from_f64_uses_shortest_decimal() {
        let dime = Money::from_f64(0.1, Currency::Usd).unwrap();
        assert_eq!(dime.amount(), dec!(0.1));
        assert_eq!(dime.formatted(), "$0.1");

        let m = Money::from_f64(1234.56, Currency::Usd).unwrap();
        assert_eq!(m.amount(), dec!(1234.56));
        assert_eq!(m.formatted(), "$1,234.56");

        assert_eq!(Money::from_f64(-2.5, Currency::Eur).unwrap().formatted(), "-2.5€");
        assert!(Money::from_f64(f64::NAN, Currency::Usd).is_err());
        assert!(Money::from_f64(f64::INFINITY, Currency::Usd).is_err());
    }

    #[test]
    fn test_formatted_plain() {
        assert_eq!(usd(dec!(1000)).formatted_plain(), "1,000.0");
        assert_eq!(usd(dec!(999.99)).formatted_plain(), "999.99");
        assert_eq!(usd(dec!(-1234.5)).formatted(), "$-1,234.5");
        assert_eq!(usd(dec!(12.50)).to_string(), "$12.5");
    }
}
