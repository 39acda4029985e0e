//! Command-line driver.
//!
//! Run with:
//! ```bash
//! cargo run --release -- [WORKERS] [CAPACITY] [MATRICES] [MODE] [OPTIONS]
//! cargo run --release -- --help
//! ```

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use pcmatrix::config::{
    Config, DEFAULT_CAPACITY, DEFAULT_MATRIX_COUNT, DEFAULT_MODE, DEFAULT_WORKERS,
};
use pcmatrix::coordinator::PairingPolicy;
use pcmatrix::report::json::JsonReport;
use pcmatrix::report::table::{TableReport, TableStyle};
use tracing::Level;

/// Output format for the final statistics.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Two-line summary
    Text,
    /// Name/value table
    Table,
    /// JSON snapshot
    Json,
}

/// Table style selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StyleChoice {
    Ascii,
    #[default]
    Rounded,
    Sharp,
    Markdown,
    Blank,
}

impl From<StyleChoice> for TableStyle {
    fn from(choice: StyleChoice) -> Self {
        match choice {
            StyleChoice::Ascii => TableStyle::Ascii,
            StyleChoice::Rounded => TableStyle::Rounded,
            StyleChoice::Sharp => TableStyle::Sharp,
            StyleChoice::Markdown => TableStyle::Markdown,
            StyleChoice::Blank => TableStyle::Blank,
        }
    }
}

/// Consumer pairing policy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyChoice {
    /// Pair only with the very next matrix
    Adjacent,
    /// Discard incompatible matrices until a partner is found
    Search,
}

impl From<PolicyChoice> for PairingPolicy {
    fn from(choice: PolicyChoice) -> Self {
        match choice {
            PolicyChoice::Adjacent => PairingPolicy::Adjacent,
            PolicyChoice::Search => PairingPolicy::Search,
        }
    }
}

/// Bounded-buffer producer/consumer matrix multiplier.
///
/// Producers generate random matrices into a shared buffer; consumers take
/// them out and multiply adjacent compatible pairs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of producer/consumer thread pairs
    #[arg(default_value_t = DEFAULT_WORKERS as i64, allow_negative_numbers = true)]
    workers: i64,

    /// Number of slots in the bounded buffer
    #[arg(default_value_t = DEFAULT_CAPACITY as i64, allow_negative_numbers = true)]
    capacity: i64,

    /// Matrices generated by each producer
    #[arg(default_value_t = DEFAULT_MATRIX_COUNT as i64, allow_negative_numbers = true)]
    matrices: i64,

    /// Matrix mode: 0 for random sizes, N for NxN matrices
    #[arg(default_value_t = DEFAULT_MODE, allow_negative_numbers = true)]
    mode: i64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Table style (for table format)
    #[arg(short, long, value_enum, default_value = "rounded")]
    style: StyleChoice,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Consumer pairing policy
    #[arg(short, long, value_enum, default_value = "adjacent")]
    policy: PolicyChoice,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match Config::new(args.workers, args.capacity, args.matrices, args.mode) {
        Ok(config) => config.with_policy(args.policy.into()),
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    if !matches!(args.format, OutputFormat::Json) {
        println!(
            "Producing {} matrices in mode {}.",
            config.total_matrices(),
            config.mode().code()
        );
        println!("Using a shared buffer of size={}", config.capacity());
        println!("With {} producer and consumer thread(s).\n", config.workers());
    }

    let summary = match pcmatrix::run::run(&config) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let output = match args.format {
        OutputFormat::Text => pcmatrix::report::render_text(&summary),
        OutputFormat::Table => TableReport::new()
            .with_style(args.style.into())
            .with_counters(true)
            .render(&summary),
        OutputFormat::Json => {
            let report = JsonReport::new().pretty(args.pretty);
            match report.to_json(&config, &summary) {
                Ok(json) => json,
                Err(err) => {
                    eprintln!("error: {}", pcmatrix::Error::from(err));
                    return ExitCode::FAILURE;
                }
            }
        }
    };
    println!("{output}");

    if summary.is_consistent(&config) {
        ExitCode::SUCCESS
    } else {
        eprintln!("error: produced and consumed totals do not match");
        ExitCode::FAILURE
    }
}
