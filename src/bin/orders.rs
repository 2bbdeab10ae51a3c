//! Interactive order tracker over a delimited order file.
//!
//! Usage:
//!   orders
//!   orders --file shop.csv --date-format ymd --min-year 1900 --max-year 3000

use clap::{Parser, ValueEnum};
use order_tracker::{DateFormat, DateRules, OrderStore, Shell, StoreOptions, TextLimit};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::Level;

#[derive(Clone, Copy, ValueEnum)]
enum DateLayout {
    /// DD-MM-YYYY
    Dmy,
    /// YYYY-MM-DD
    Ymd,
}

impl From<DateLayout> for DateFormat {
    fn from(layout: DateLayout) -> Self {
        match layout {
            DateLayout::Dmy => DateFormat::DayMonthYear,
            DateLayout::Ymd => DateFormat::YearMonthDay,
        }
    }
}

/// Add, search, update and delete orders in a delimited text file.
#[derive(Parser)]
#[command(name = "orders")]
struct Cli {
    /// Order file (created with a header if missing)
    #[arg(short, long, default_value = "orders.csv")]
    file: PathBuf,

    /// Layout of order dates
    #[arg(long, value_enum, default_value = "dmy")]
    date_format: DateLayout,

    /// Earliest accepted order year
    #[arg(long, default_value_t = 1999)]
    min_year: i32,

    /// Latest accepted order year
    #[arg(long, default_value_t = 2025)]
    max_year: i32,

    /// Maximum characters kept in names (0 keeps everything)
    #[arg(long, default_value_t = 49)]
    name_limit: usize,

    /// Log store activity on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(io::stderr)
        .init();

    if cli.min_year > cli.max_year {
        eprintln!(
            "Invalid year range: {} is after {}",
            cli.min_year, cli.max_year
        );
        process::exit(1);
    }

    let options = StoreOptions {
        date_rules: DateRules::default()
            .with_format(cli.date_format.into())
            .with_years(cli.min_year, cli.max_year),
        text_limit: match cli.name_limit {
            0 => TextLimit::Unbounded,
            n => TextLimit::Truncate(n),
        },
    };
    let store = OrderStore::with_options(&cli.file, options);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(store, stdin.lock(), stdout.lock());
    if let Err(e) = shell.run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
