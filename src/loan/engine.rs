//! Loan payment and amortization engine

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationRow, LoanSummary};
use crate::config::EngineConfig;
use crate::error::{CalcError, Result};
use crate::values::{round2, CompoundingPeriod, InterestRate, PaymentFrequency, RateType};

/// Inputs for a single loan calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Amount borrowed, in decimal dollars
    pub principal: f64,

    /// Annual rate in percent
    pub interest_rate: f64,

    /// Term in years; fractional terms are allowed
    pub term_years: f64,

    #[serde(default = "default_rate_type")]
    pub rate_type: RateType,

    #[serde(default = "default_payment_frequency")]
    pub payment_frequency: PaymentFrequency,

    #[serde(default = "default_compounding_period")]
    pub compounding_period: CompoundingPeriod,
}

fn default_rate_type() -> RateType {
    RateType::Apr
}

fn default_payment_frequency() -> PaymentFrequency {
    PaymentFrequency::Monthly
}

fn default_compounding_period() -> CompoundingPeriod {
    CompoundingPeriod::Monthly
}

impl LoanRequest {
    /// Monthly-payment, monthly-compounding APR loan
    pub fn monthly(principal: f64, interest_rate: f64, term_years: f64) -> Self {
        Self {
            principal,
            interest_rate,
            term_years,
            rate_type: default_rate_type(),
            payment_frequency: default_payment_frequency(),
            compounding_period: default_compounding_period(),
        }
    }

    /// Build from raw strings; any unrecognized value is an `InvalidArgument`
    pub fn from_raw(
        principal: f64,
        interest_rate: f64,
        term_years: f64,
        rate_type: &str,
        payment_frequency: &str,
        compounding_period: &str,
    ) -> Result<Self> {
        Ok(Self {
            principal,
            interest_rate,
            term_years,
            rate_type: rate_type.parse().map_err(CalcError::into_invalid_argument)?,
            payment_frequency: payment_frequency.parse()?,
            compounding_period: compounding_period
                .parse()
                .map_err(CalcError::into_invalid_argument)?,
        })
    }

    pub fn interest_rate(&self) -> InterestRate {
        InterestRate::new(self.interest_rate, self.rate_type, self.compounding_period)
    }
}

/// Loan engine
#[derive(Debug, Clone)]
pub struct LoanEngine {
    max_term_years: f64,
}

impl LoanEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_term_years: config.max_term_years,
        }
    }

    /// Compute the periodic payment, full schedule and totals
    pub fn calculate(&self, request: &LoanRequest) -> Result<LoanSummary> {
        self.validate(request)?;

        let apr = request.interest_rate().to_apr();
        let payments_per_year = request.payment_frequency.periods_per_year();
        let compounding_per_year = request.compounding_period.periods_per_year();

        let total_payments = (request.term_years * payments_per_year as f64).floor() as u32;
        if total_payments == 0 {
            return Err(CalcError::invalid(format!(
                "term of {} years yields no {} payments",
                request.term_years,
                request.payment_frequency.as_str()
            )));
        }

        let periodic_rate = apr.periodic_rate(compounding_per_year);
        let effective_rate = payment_period_rate(periodic_rate, compounding_per_year, payments_per_year);
        let payment = periodic_payment(request.principal, effective_rate, total_payments);
        debug!(
            "loan: {total_payments} payments, effective periodic rate {effective_rate:.8}, payment {payment:.4}"
        );

        let schedule = amortize(request.principal, payment, effective_rate, total_payments);
        let total_interest: f64 = schedule.iter().map(|row| row.interest_portion).sum();
        if (schedule.len() as u32) < total_payments {
            warn!(
                "loan schedule paid off after {} of {} payments",
                schedule.len(),
                total_payments
            );
        }

        let principal = request.principal;
        let n = total_payments as f64;
        Ok(LoanSummary {
            periodic_payment: round2(payment),
            total_payments,
            total_principal: round2(principal),
            total_interest: round2(total_interest),
            total_amount: round2(principal + total_interest),
            principal_per_payment: round2(principal / n),
            interest_per_payment: round2(total_interest / n),
            effective_rate: round2(apr.effective_annual_rate(payments_per_year)),
            amortization_schedule: schedule,
        })
    }

    fn validate(&self, request: &LoanRequest) -> Result<()> {
        if !request.principal.is_finite() || request.principal <= 0.0 {
            return Err(CalcError::invalid("principal must be positive"));
        }
        if !request.interest_rate.is_finite() || request.interest_rate < 0.0 {
            return Err(CalcError::invalid("interest rate must be non-negative"));
        }
        if !request.term_years.is_finite() || request.term_years <= 0.0 {
            return Err(CalcError::invalid("term years must be positive"));
        }
        if request.term_years > self.max_term_years {
            return Err(CalcError::invalid(format!(
                "term years must not exceed {}",
                self.max_term_years
            )));
        }
        Ok(())
    }
}

impl Default for LoanEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// Re-express a compounding-period rate at the payment frequency
pub fn payment_period_rate(periodic_rate: f64, compounding_per_year: u32, payments_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powf(compounding_per_year as f64 / payments_per_year as f64) - 1.0
}

/// Level annuity payment; straight-line when the rate is zero
pub fn periodic_payment(principal: f64, rate: f64, payments: u32) -> f64 {
    if rate == 0.0 {
        return principal / payments as f64;
    }
    let growth = (1.0 + rate).powi(payments as i32);
    principal * (rate * growth) / (growth - 1.0)
}

/// Build the schedule; rows carry cent-rounded portions
///
/// Stops as soon as the balance reaches zero; the final principal portion is
/// trimmed so the balance never goes negative.
fn amortize(principal: f64, payment: f64, rate: f64, payments: u32) -> Vec<AmortizationRow> {
    let mut balance = principal;
    let mut schedule = Vec::with_capacity(payments as usize);

    for number in 1..=payments {
        let interest = balance * rate;
        let mut principal_portion = payment - interest;
        balance -= principal_portion;

        if balance < 0.0 {
            principal_portion += balance;
            balance = 0.0;
        }

        schedule.push(AmortizationRow::new(number, payment, principal_portion, interest, balance));

        if balance <= 0.0 {
            break;
        }
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn engine() -> LoanEngine {
        LoanEngine::default()
    }

    #[test]
    fn test_standard_thirty_year_mortgage() {
        let summary = engine().calculate(&LoanRequest::monthly(300_000.0, 5.0, 30.0)).unwrap();

        assert_eq!(summary.total_payments, 360);
        assert_abs_diff_eq!(summary.periodic_payment, 1_610.46, epsilon = 1.0);
        assert_eq!(summary.schedule_len(), 360);
        assert_eq!(summary.final_balance(), 0.0);
        assert_abs_diff_eq!(summary.total_interest, 279_767.0, epsilon = 5.0);
        assert_abs_diff_eq!(
            summary.total_amount,
            summary.total_principal + summary.total_interest,
            epsilon = 0.011
        );
        assert_abs_diff_eq!(summary.effective_rate, 5.0, epsilon = 1e-9);

        let first = &summary.amortization_schedule[0];
        assert_eq!(first.payment_number, 1);
        assert_abs_diff_eq!(first.interest_portion, 1_250.0, epsilon = 1e-9);
        assert_abs_diff_eq!(first.principal_portion, 360.46, epsilon = 0.011);
    }

    #[test]
    fn test_total_interest_matches_schedule_rows() {
        for request in [
            LoanRequest::monthly(300_000.0, 5.0, 30.0),
            LoanRequest::monthly(25_000.0, 6.5, 5.0),
        ] {
            let summary = engine().calculate(&request).unwrap();
            let row_total: f64 = summary
                .amortization_schedule
                .iter()
                .map(|r| r.interest_portion)
                .sum();
            assert_eq!(summary.total_interest, round2(row_total));
        }

        let mortgage = engine().calculate(&LoanRequest::monthly(300_000.0, 5.0, 30.0)).unwrap();
        assert_abs_diff_eq!(mortgage.total_interest, 279_767.31, epsilon = 0.005);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let summary = engine().calculate(&LoanRequest::monthly(12_000.0, 0.0, 1.0)).unwrap();

        assert_eq!(summary.periodic_payment, 1_000.0);
        assert_eq!(summary.total_interest, 0.0);
        assert_eq!(summary.total_amount, 12_000.0);
        assert_eq!(summary.interest_per_payment, 0.0);
        assert!(summary
            .amortization_schedule
            .iter()
            .all(|r| r.interest_portion == 0.0 && r.principal_portion == 1_000.0));
        assert_eq!(summary.final_balance(), 0.0);
    }

    #[test]
    fn test_zero_rate_uneven_division() {
        let summary = engine().calculate(&LoanRequest::monthly(1_000.0, 0.0, 0.25)).unwrap();
        assert_eq!(summary.total_payments, 3);
        assert_abs_diff_eq!(summary.periodic_payment, 333.33, epsilon = 1e-9);
        assert_eq!(summary.final_balance(), 0.0);
    }

    #[test]
    fn test_principal_sums_across_frequencies() {
        let rate_types = [RateType::Apr, RateType::Apy];
        let frequencies = [
            PaymentFrequency::Weekly,
            PaymentFrequency::Biweekly,
            PaymentFrequency::Monthly,
            PaymentFrequency::Quarterly,
        ];
        let periods = [
            CompoundingPeriod::Daily,
            CompoundingPeriod::Monthly,
            CompoundingPeriod::Quarterly,
            CompoundingPeriod::Annually,
        ];

        for rate_type in rate_types {
            for payment_frequency in frequencies {
                for compounding_period in periods {
                    let request = LoanRequest {
                        principal: 25_000.0,
                        interest_rate: 6.5,
                        term_years: 5.0,
                        rate_type,
                        payment_frequency,
                        compounding_period,
                    };
                    let summary = engine().calculate(&request).unwrap();
                    let tolerance = summary.schedule_len() as f64 * 0.005 + 1e-6;

                    assert_eq!(summary.final_balance(), 0.0, "{request:?}");
                    assert_abs_diff_eq!(summary.scheduled_principal(), 25_000.0, epsilon = tolerance);
                    assert!(summary
                        .amortization_schedule
                        .iter()
                        .all(|r| r.remaining_balance >= 0.0));
                }
            }
        }
    }

    #[test]
    fn test_extreme_principals() {
        let tiny = engine().calculate(&LoanRequest::monthly(0.01, 5.0, 1.0)).unwrap();
        assert!(tiny.periodic_payment.is_finite());
        assert_eq!(tiny.final_balance(), 0.0);

        let huge = engine().calculate(&LoanRequest::monthly(1.0e12, 12.0, 40.0)).unwrap();
        assert!(huge.periodic_payment.is_finite());
        assert!(huge.total_interest.is_finite());
        assert_eq!(huge.final_balance(), 0.0);
    }

    #[test]
    fn test_validation() {
        let e = engine();
        for bad in [
            LoanRequest::monthly(0.0, 5.0, 30.0),
            LoanRequest::monthly(-10.0, 5.0, 30.0),
            LoanRequest::monthly(1_000.0, -0.1, 30.0),
            LoanRequest::monthly(1_000.0, 5.0, 0.0),
            LoanRequest::monthly(1_000.0, 5.0, 150.0),
            LoanRequest::monthly(1_000.0, 5.0, 0.01),
        ] {
            assert!(
                matches!(e.calculate(&bad), Err(CalcError::InvalidArgument(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_from_raw_rejects_unknown_enums() {
        for (rate_type, frequency, period) in [
            ("apz", "monthly", "monthly"),
            ("apr", "daily", "monthly"),
            ("apr", "monthly", "weekly"),
        ] {
            assert!(matches!(
                LoanRequest::from_raw(1_000.0, 5.0, 1.0, rate_type, frequency, period),
                Err(CalcError::InvalidArgument(_))
            ));
        }
        let ok = LoanRequest::from_raw(1_000.0, 5.0, 1.0, "APY", "Biweekly", "daily").unwrap();
        assert_eq!(ok.payment_frequency, PaymentFrequency::Biweekly);
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: LoanRequest =
            serde_json::from_str(r#"{"principal": 5000, "interest_rate": 4.0, "term_years": 2}"#).unwrap();
        assert_eq!(request, LoanRequest::monthly(5_000.0, 4.0, 2.0));
    }
}
