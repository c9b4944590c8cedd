//! fincalc CLI
//!
//! Runs a single calculation and prints the result as JSON

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use fincalc::{
    charts::{savings_chart, MonthlySnapshot},
    tax::DEFAULT_BRACKETS_PATH, EngineConfig, InsurancePolicy, LoanEngine, LoanRequest,
    NetWorthCalculator, NetWorthInput, RetirementProjection, ScenarioInput, TaxBracketRegistry,
    TaxEngine,
};
use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Personal-finance calculations: loans, tax, retirement, net worth, insurance
#[derive(Debug, Parser)]
#[command(name = "fincalc", version)]
struct Cli {
    /// Engine configuration (JSON); missing fields use defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tax bracket table (CSV: year,rate,min,max)
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Evaluate as of this date instead of today (YYYY-MM-DD)
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Periodic payment and amortization schedule
    Loan(LoanArgs),
    /// Progressive tax estimate
    Tax(TaxArgs),
    /// Retirement summary and accumulation chart
    Retirement(ScenarioArgs),
    /// Withdrawal-phase chart
    Withdrawal(WithdrawalArgs),
    /// Net-worth snapshot from a JSON file of accounts, loans and holdings
    NetWorth(NetWorthArgs),
    /// Insurance policy analysis
    Insurance(InsuranceArgs),
    /// Daily savings, spending and net-savings series from monthly snapshots
    Savings(SavingsArgs),
}

#[derive(Debug, Args)]
struct LoanArgs {
    #[arg(long)]
    principal: f64,
    /// Annual rate in percent
    #[arg(long)]
    rate: f64,
    #[arg(long)]
    years: f64,
    #[arg(long, default_value = "apr")]
    rate_type: String,
    #[arg(long, default_value = "monthly")]
    frequency: String,
    #[arg(long, default_value = "monthly")]
    compounding: String,
    /// Omit the amortization schedule from the output
    #[arg(long)]
    summary_only: bool,
}

#[derive(Debug, Args)]
struct TaxArgs {
    #[arg(long)]
    income: f64,
    #[arg(long, default_value_t = 0.0)]
    deductions: f64,
    #[arg(long, default_value_t = 2024)]
    year: i32,
}

#[derive(Debug, Args)]
struct ScenarioArgs {
    /// Scenario JSON; fields may be absent and fall back to defaults
    scenario: PathBuf,
}

#[derive(Debug, Args)]
struct WithdrawalArgs {
    scenario: PathBuf,
    #[arg(long)]
    monthly_withdrawal: f64,
    /// Defaults to the configured retirement length
    #[arg(long)]
    years: Option<u32>,
}

#[derive(Debug, Args)]
struct NetWorthArgs {
    input: PathBuf,
}

#[derive(Debug, Args)]
struct InsuranceArgs {
    /// Policy JSON
    policy: PathBuf,
    #[arg(long, default_value_t = 0.0)]
    total_assets: f64,
}

#[derive(Debug, Args)]
struct SavingsArgs {
    /// JSON with `savings` and `expenses` snapshot arrays
    input: PathBuf,
    /// Defaults to the configured chart length
    #[arg(long)]
    days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SavingsInput {
    savings: Vec<MonthlySnapshot>,
    expenses: Vec<MonthlySnapshot>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_tax_engine(path: Option<&Path>) -> Result<TaxEngine> {
    let registry = match path {
        Some(path) => TaxBracketRegistry::from_csv_path(path)
            .with_context(|| format!("loading brackets {}", path.display()))?,
        None if Path::new(DEFAULT_BRACKETS_PATH).exists() => {
            TaxBracketRegistry::from_csv_path(Path::new(DEFAULT_BRACKETS_PATH))?
        }
        None => TaxBracketRegistry::builtin(),
    };
    Ok(TaxEngine::new(registry))
}

fn projection(path: &Path, config: &EngineConfig, as_of: NaiveDate) -> Result<RetirementProjection> {
    let input: ScenarioInput = read_json(path)?;
    let scenario = input.resolve(config, as_of)?;
    Ok(RetirementProjection::new(scenario, as_of))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    debug!("running {:?} as of {as_of}", cli.command);

    match &cli.command {
        Command::Loan(args) => {
            let request = LoanRequest::from_raw(
                args.principal,
                args.rate,
                args.years,
                &args.rate_type,
                &args.frequency,
                &args.compounding,
            )?;
            let mut summary = LoanEngine::new(&config).calculate(&request)?;
            if args.summary_only {
                summary.amortization_schedule.clear();
            }
            print_json(&summary)
        }
        Command::Tax(args) => {
            let engine = load_tax_engine(cli.brackets.as_deref())?;
            print_json(&engine.calculate(args.income, args.deductions, args.year)?)
        }
        Command::Retirement(args) => {
            let projection = projection(&args.scenario, &config, as_of)?;
            let chart = projection.chart_data(config.historical_months, config.future_months_limit)?;
            print_json(&serde_json::json!({
                "summary": projection.summary(),
                "chart": chart,
            }))
        }
        Command::Withdrawal(args) => {
            let projection = projection(&args.scenario, &config, as_of)?;
            let years = args.years.unwrap_or(config.retirement_years);
            print_json(&projection.withdrawal_data(years, args.monthly_withdrawal, config.max_withdrawal_months)?)
        }
        Command::NetWorth(args) => {
            let input: NetWorthInput = read_json(&args.input)?;
            let snapshot = NetWorthCalculator::new(&input, as_of).calculate(config.trend_months);
            print_json(&snapshot)
        }
        Command::Insurance(args) => {
            let policy: InsurancePolicy = read_json(&args.policy)?;
            print_json(&policy.analyze(args.total_assets)?)
        }
        Command::Savings(args) => {
            let input: SavingsInput = read_json(&args.input)?;
            let days = args.days.unwrap_or(config.savings_chart_days);
            print_json(&savings_chart(&input.savings, &input.expenses, as_of, days)?)
        }
    }
}
