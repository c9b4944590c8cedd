//! Evaluate a block of loans from CSV in parallel
//!
//! Reads `loan_id,principal,interest_rate,term_years[,rate_type,payment_frequency,compounding_period]`
//! rows and writes one summary row per loan. Failed loans are reported with
//! their error instead of a summary.

use anyhow::{Context, Result};
use clap::Parser;
use fincalc::{
    loan::calculate_batch,
    values::{CompoundingPeriod, PaymentFrequency, RateType},
    EngineConfig, LoanEngine, LoanRequest,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;

const DEFAULT_LOANS_PATH: &str = "data/loans.csv";

#[derive(Debug, Parser)]
#[command(name = "loan_batch")]
struct Cli {
    /// Input CSV of loan requests
    #[arg(default_value = DEFAULT_LOANS_PATH)]
    input: PathBuf,

    /// Output CSV of loan summaries
    #[arg(short, long, default_value = "loan_batch_output.csv")]
    output: PathBuf,

    /// Engine configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Raw CSV row; enum columns may be omitted
#[derive(Debug, Deserialize)]
struct LoanCsvRow {
    loan_id: String,
    principal: f64,
    interest_rate: f64,
    term_years: f64,
    #[serde(default)]
    rate_type: Option<RateType>,
    #[serde(default)]
    payment_frequency: Option<PaymentFrequency>,
    #[serde(default)]
    compounding_period: Option<CompoundingPeriod>,
}

impl LoanCsvRow {
    fn to_request(&self) -> LoanRequest {
        LoanRequest {
            principal: self.principal,
            interest_rate: self.interest_rate,
            term_years: self.term_years,
            rate_type: self.rate_type.unwrap_or(RateType::Apr),
            payment_frequency: self.payment_frequency.unwrap_or(PaymentFrequency::Monthly),
            compounding_period: self.compounding_period.unwrap_or(CompoundingPeriod::Monthly),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct SummaryRow {
    loan_id: String,
    periodic_payment: Option<f64>,
    total_payments: Option<u32>,
    total_interest: Option<f64>,
    total_amount: Option<f64>,
    effective_rate: Option<f64>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_path(path)?,
        None => EngineConfig::default(),
    };

    let start = Instant::now();
    let mut reader = csv::Reader::from_path(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<LoanCsvRow>, _>>()
        .with_context(|| format!("reading {}", cli.input.display()))?;
    info!("loaded {} loans in {:?}", rows.len(), start.elapsed());

    let requests: Vec<LoanRequest> = rows.iter().map(LoanCsvRow::to_request).collect();
    let engine = LoanEngine::new(&config);
    let results = calculate_batch(&engine, &requests);

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let mut failures = 0;
    let mut total_interest = 0.0;
    for (row, result) in rows.iter().zip(results) {
        let summary_row = match result {
            Ok(summary) => {
                total_interest += summary.total_interest;
                SummaryRow {
                    loan_id: row.loan_id.clone(),
                    periodic_payment: Some(summary.periodic_payment),
                    total_payments: Some(summary.total_payments),
                    total_interest: Some(summary.total_interest),
                    total_amount: Some(summary.total_amount),
                    effective_rate: Some(summary.effective_rate),
                    error: None,
                }
            }
            Err(e) => {
                failures += 1;
                warn!("loan {} failed: {e}", row.loan_id);
                SummaryRow {
                    loan_id: row.loan_id.clone(),
                    error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        };
        writer.serialize(summary_row)?;
    }
    writer.flush()?;

    println!("Output written to {}", cli.output.display());
    println!("\nBatch Summary:");
    println!("  Loans:          {}", rows.len());
    println!("  Failed:         {failures}");
    println!("  Total interest: ${total_interest:.2}");
    println!("  Elapsed:        {:?}", start.elapsed());

    Ok(())
}
