//! Loan payment, amortization schedule and batch evaluation

mod engine;
mod schedule;

pub use engine::{payment_period_rate, periodic_payment, LoanEngine, LoanRequest};
pub use schedule::{AmortizationRow, LoanSummary};

use rayon::prelude::*;

use crate::error::Result;

/// Evaluate independent loan requests in parallel
///
/// Results keep the order of `requests`; one failing request does not
/// affect the others.
pub fn calculate_batch(engine: &LoanEngine, requests: &[LoanRequest]) -> Vec<Result<LoanSummary>> {
    requests
        .par_iter()
        .map(|request| engine.calculate(request))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order_and_isolates_errors() {
        let engine = LoanEngine::default();
        let requests = vec![
            LoanRequest::monthly(10_000.0, 5.0, 5.0),
            LoanRequest::monthly(-1.0, 5.0, 5.0),
            LoanRequest::monthly(20_000.0, 5.0, 5.0),
        ];

        let results = calculate_batch(&engine, &requests);
        assert_eq!(results.len(), 3);
        assert!(results[1].is_err());

        let first = results[0].as_ref().unwrap();
        let third = results[2].as_ref().unwrap();
        assert!((third.periodic_payment - 2.0 * first.periodic_payment).abs() < 0.02);
    }
}
