//! Amortization output structures

use serde::Serialize;

use crate::values::round2;

/// One payment in an amortization schedule, rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationRow {
    /// 1-indexed
    pub payment_number: u32,
    pub payment_amount: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub remaining_balance: f64,
}

impl AmortizationRow {
    pub fn new(
        payment_number: u32,
        payment_amount: f64,
        principal_portion: f64,
        interest_portion: f64,
        remaining_balance: f64,
    ) -> Self {
        Self {
            payment_number,
            payment_amount: round2(payment_amount),
            principal_portion: round2(principal_portion),
            interest_portion: round2(interest_portion),
            remaining_balance: round2(remaining_balance),
        }
    }
}

/// Complete loan calculation result
#[derive(Debug, Clone, Serialize)]
pub struct LoanSummary {
    pub periodic_payment: f64,
    /// Nominal number of payments; the schedule may be shorter
    pub total_payments: u32,
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_amount: f64,
    /// Average principal per nominal payment
    pub principal_per_payment: f64,
    /// Average interest per nominal payment
    pub interest_per_payment: f64,
    /// Effective annual rate at the payment frequency, in percent
    pub effective_rate: f64,
    pub amortization_schedule: Vec<AmortizationRow>,
}

impl LoanSummary {
    /// Balance after the last scheduled payment
    pub fn final_balance(&self) -> f64 {
        self.amortization_schedule
            .last()
            .map(|r| r.remaining_balance)
            .unwrap_or(self.total_principal)
    }

    /// Number of payments actually scheduled
    pub fn schedule_len(&self) -> usize {
        self.amortization_schedule.len()
    }

    pub fn scheduled_principal(&self) -> f64 {
        self.amortization_schedule.iter().map(|r| r.principal_portion).sum()
    }
}
