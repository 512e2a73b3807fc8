use std::{io, path::PathBuf, process};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use installment_ledger_lib::{
    parse_timestamp, process_ledger, Interval, LedgerConfig, ReportKind, Result, RunOptions,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Report {
    Installments,
    Weekly,
    Monthly,
    Trend,
    Summary,
}

impl From<Report> for ReportKind {
    fn from(report: Report) -> Self {
        match report {
            Report::Installments => ReportKind::Installments,
            Report::Weekly => ReportKind::Weekly,
            Report::Monthly => ReportKind::Monthly,
            Report::Trend => ReportKind::Trend,
            Report::Summary => ReportKind::Summary,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "installment_ledger",
    version,
    about = "Replay installment purchases and payments, then print a ledger report as CSV"
)]
struct Cli {
    /// Events CSV (type,customer,purchase,amount,quantity,date,username,first_name,last_name,email)
    events: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Report::Installments)]
    report: Report,

    /// Report reference time; defaults to now
    #[arg(long)]
    as_of: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Installments per purchase, overrides the config file
    #[arg(long)]
    count: Option<u32>,

    /// Gap between due dates: daily, weekly, monthly or days:N / weeks:N / months:N
    #[arg(long)]
    cadence: Option<Interval>,

    /// Delay before the first due date, same syntax as --cadence
    #[arg(long)]
    first_due_offset: Option<Interval>,
}

fn init_tracing() {
    let log_format = std::env::var("LEDGER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}

fn options(cli: &Cli) -> Result<RunOptions> {
    let mut config = match &cli.config {
        Some(path) => LedgerConfig::from_json_file(path)?,
        None => LedgerConfig::default(),
    };
    if let Some(count) = cli.count {
        config.schedule.count = count;
    }
    if let Some(cadence) = cli.cadence {
        config.schedule.cadence = cadence;
    }
    if let Some(offset) = cli.first_due_offset {
        config.schedule.first_due_offset = offset;
    }
    let as_of = match &cli.as_of {
        Some(raw) => parse_timestamp(raw)?,
        None => Utc::now(),
    };
    Ok(RunOptions {
        report: cli.report.into(),
        as_of,
        config,
    })
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match options(&cli).and_then(|options| process_ledger(&cli.events, &options)) {
        Ok(result) => {
            print!("{}", result);
            process::exit(0);
        }
        Err(e) => {
            // error occurred
            eprintln!("an error occurred: {}", e);
            process::exit(1);
        }
    }
}
