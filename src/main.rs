//! Mortgage Simulator CLI
//!
//! Command-line host for the simulation engines: resolves "today" and the
//! current index value, maps flags onto parameters and renders results.

use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use mortgage_simulator::amortization::{IndexedEngineConfig, FixedEngineConfig};
use mortgage_simulator::index::{Clock, FixedClock, FixedIndexValue, IndexValueSource, SystemClock};
use mortgage_simulator::loan::{load_prepayments, PrepaidTotal};
use mortgage_simulator::scenario::PrepaymentPlan;
use mortgage_simulator::{
    FuturePrepaymentPlan, IndexedLoanParameters, IndexedSimulationResult, LoanParameters, PastPrepayment,
    ScenarioRunner, SimulationResult,
};

#[derive(Parser)]
#[command(name = "mortgage-sim", version, about = "Amortization simulator for fixed and indexed mortgages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value = "summary", global = true)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Currency loan with optional periodic prepayments
    Fixed(FixedArgs),
    /// Index-denominated loan with past and future prepayments
    Indexed(IndexedArgs),
    /// Compare several prepayment amounts on the same loan
    Compare(CompareArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TotalUnit {
    Currency,
    Units,
}

#[derive(Args)]
struct FixedArgs {
    #[arg(long)]
    principal: f64,
    /// Annual interest rate in percent
    #[arg(long)]
    rate: f64,
    #[arg(long)]
    years: u32,
    #[arg(long, default_value_t = 0.0)]
    prepayment_amount: f64,
    #[arg(long, default_value_t = 0)]
    prepayment_frequency: u32,
    /// Fee in percent of each prepayment
    #[arg(long, default_value_t = 0.0)]
    prepayment_fee: f64,
}

#[derive(Args)]
struct IndexedArgs {
    /// Principal in index units
    #[arg(long)]
    units: f64,
    #[arg(long)]
    rate: f64,
    #[arg(long)]
    years: u32,
    /// Loan start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: NaiveDate,
    /// Valuation date, defaults to today
    #[arg(long)]
    valuation_date: Option<NaiveDate>,
    /// Current index value, falls back to a fixed figure when omitted
    #[arg(long)]
    index_value: Option<f64>,
    /// CSV file with past prepayments (date,amount)
    #[arg(long)]
    prepayments: Option<PathBuf>,
    /// Single "total prepaid so far" figure instead of itemized history
    #[arg(long, conflicts_with = "prepayments")]
    total_prepaid: Option<f64>,
    #[arg(long, value_enum, default_value = "currency")]
    total_prepaid_unit: TotalUnit,
    #[arg(long, default_value_t = 0.0)]
    future_amount: f64,
    #[arg(long, default_value_t = 0)]
    future_frequency: u32,
    #[arg(long, default_value_t = 0.0)]
    future_fee: f64,
    /// Assumed monthly index growth used for historical estimates
    #[arg(long)]
    growth_rate: Option<f64>,
    #[arg(long)]
    initial_index_value: Option<f64>,
}

#[derive(Args)]
struct CompareArgs {
    #[arg(long)]
    principal: f64,
    #[arg(long)]
    rate: f64,
    #[arg(long)]
    years: u32,
    /// Prepayment amounts to compare, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    amounts: Vec<f64>,
    #[arg(long, default_value_t = 12)]
    frequency: u32,
    #[arg(long, default_value_t = 0.0)]
    fee: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fixed(args) => run_fixed(args, cli.format),
        Commands::Indexed(args) => run_indexed(args, cli.format),
        Commands::Compare(args) => run_compare(args, cli.format),
    }
}

fn run_fixed(args: FixedArgs, format: OutputFormat) -> Result<()> {
    let params = LoanParameters::new(args.principal, args.rate, args.years)
        .with_prepayments(args.prepayment_amount, args.prepayment_frequency, args.prepayment_fee);

    let result = ScenarioRunner::new()
        .run_fixed(&params)
        .context("Fixed simulation failed")?;
    info!("Fixed simulation: {} months until payoff", result.months_until_payoff);

    match format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => write_csv(&result.schedule),
        OutputFormat::Summary => {
            print_fixed_summary(&result);
            Ok(())
        }
    }
}

fn run_indexed(args: IndexedArgs, format: OutputFormat) -> Result<()> {
    let valuation_date = match args.valuation_date {
        Some(date) => FixedClock(date).today(),
        None => SystemClock.today(),
    };
    let current_index_value = FixedIndexValue(args.index_value).current_value_or_fallback();

    let past_prepayments = match (&args.prepayments, args.total_prepaid) {
        (Some(path), _) => load_prepayments(path)
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("Failed to load prepayments from {}", path.display()))?,
        (None, Some(total)) => {
            let total = match args.total_prepaid_unit {
                TotalUnit::Currency => PrepaidTotal::Currency(total),
                TotalUnit::Units => PrepaidTotal::IndexUnits(total),
            };
            vec![PastPrepayment::total_to_date(total, valuation_date, current_index_value)]
        }
        (None, None) => Vec::new(),
    };

    let future = if args.future_amount > 0.0 {
        FuturePrepaymentPlan::new(args.future_amount, args.future_frequency, args.future_fee)
    } else {
        FuturePrepaymentPlan::disabled()
    };

    let params = IndexedLoanParameters::new(
        args.units,
        args.rate,
        args.years,
        args.start_date,
        valuation_date,
        current_index_value,
    )
    .with_past_prepayments(past_prepayments)
    .with_future_prepayments(future);

    let mut config = IndexedEngineConfig::default();
    if let Some(rate) = args.growth_rate {
        config.monthly_index_growth_rate = rate;
    }
    if let Some(value) = args.initial_index_value {
        config.initial_index_value = value;
    }

    let runner = ScenarioRunner::with_configs(FixedEngineConfig::default(), config);
    let result = runner.run_indexed(&params).context("Indexed simulation failed")?;
    info!(
        "Indexed simulation: {}/{} installments paid, {} remaining",
        result.paid_installments, result.total_installments, result.remaining_months
    );

    match format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Csv => write_csv(&result.schedule),
        OutputFormat::Summary => {
            print_indexed_summary(&result);
            Ok(())
        }
    }
}

fn run_compare(args: CompareArgs, format: OutputFormat) -> Result<()> {
    let base = LoanParameters::new(args.principal, args.rate, args.years);
    let plans: Vec<PrepaymentPlan> = args
        .amounts
        .iter()
        .map(|&amount| PrepaymentPlan {
            amount,
            frequency_months: args.frequency,
            fee_percentage: args.fee,
        })
        .collect();

    let comparisons = ScenarioRunner::new()
        .compare_prepayment_plans(&base, &plans)
        .context("Comparison failed")?;

    match format {
        OutputFormat::Json => print_json(&comparisons),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(["amount", "months_until_payoff", "time_saved_months", "interest_saved", "fees", "net_saving"])?;
            for c in &comparisons {
                writer.write_record([
                    c.plan.amount.to_string(),
                    c.months_until_payoff.to_string(),
                    c.time_saved_months.to_string(),
                    format!("{:.2}", c.interest_saved),
                    format!("{:.2}", c.total_prepayment_fees),
                    format!("{:.2}", c.net_saving),
                ])?;
            }
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Summary => {
            println!("{:>14} {:>8} {:>8} {:>16} {:>14} {:>16}", "Amount", "Months", "Saved", "InterestSaved", "Fees", "NetSaving");
            println!("{}", "-".repeat(82));
            for c in &comparisons {
                println!("{:>14.2} {:>8} {:>8} {:>16.2} {:>14.2} {:>16.2}",
                    c.plan.amount,
                    c.months_until_payoff,
                    c.time_saved_months,
                    c.interest_saved,
                    c.total_prepayment_fees,
                    c.net_saving,
                );
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_fixed_summary(result: &SimulationResult) {
    println!("Monthly payment:      {:.2}", result.monthly_payment);
    println!("Months until payoff:  {} ({:.1} years)", result.months_until_payoff, result.years_until_payoff);
    println!("Total paid:           {:.2}", result.total_paid);
    println!("Total interest:       {:.2}", result.total_interest);
    println!("Prepayments made:     {} ({:.2} prepaid, {:.2} fees)",
        result.prepayments_made, result.total_prepaid, result.total_prepayment_fees);
    println!("\nWithout prepayments:");
    println!("  Total paid:         {:.2}", result.baseline.total_paid);
    println!("  Total interest:     {:.2}", result.baseline.total_interest);
    println!("\nSavings:");
    println!("  Time:               {} months ({:.1} years)", result.time_saved_months, result.time_saved_years);
    println!("  Interest:           {:.2}", result.interest_saved);
    print_warnings(&result.warnings);
}

fn print_indexed_summary(result: &IndexedSimulationResult) {
    println!("Installment:          {:.4} units ({:.2} at current value)", result.installment_units, result.installment_currency);
    println!("Installments paid:    {} of {}", result.paid_installments, result.total_installments);
    println!("Remaining balance:    {:.4} units ({:.2})", result.remaining_balance_units, result.remaining_balance_currency);
    println!("Remaining months:     {}", result.remaining_months);
    println!("Remaining payments:   {:.2}", result.total_remaining_payments);
    println!("Original loan amount: {:.2}", result.original_loan_amount);
    println!("Index value:          {:.2} (initial {:.2}, {:+.2}%)",
        result.current_index_value, result.initial_index_value, result.index_variation_percentage);

    println!("\nPast prepayments:");
    println!("  Total:              {:.2} ({:.4} units applied)", result.past.total_currency, result.past.total_units);
    println!("  Time saved:         {} months", result.past.time_already_saved_months);
    println!("  Interest saved:     {:.2}", result.past.interest_already_saved);

    if result.future.enabled {
        println!("\nFuture prepayments ({:.2} every {} months):", result.future.amount, result.future.frequency_months);
        println!("  Remaining months:   {}", result.future.remaining_months_with_prepayments);
        println!("  Time saved:         {} months", result.future.time_saved_months);
        println!("  Remaining payments: {:.2}", result.future.total_remaining_with_prepayments);
        println!("  Fees:               {:.2}", result.future.total_fees);
        println!("  Interest saved:     {:.2}", result.future.interest_saved);
    }
    print_warnings(&result.warnings);
}

fn print_warnings<T: std::fmt::Debug>(warnings: &[T]) {
    for warning in warnings {
        println!("Warning: {:?}", warning);
    }
}
