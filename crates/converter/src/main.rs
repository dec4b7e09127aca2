pub mod config;
pub mod error;
pub mod input;
pub mod runner;

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use runner::Runner;

const INPUT_FORMAT: &str = "\
Each file should be formatted the following way:
    EUR;550;JPY
    6
    AUD;CHF;0.9661
    JPY;KRW;13.1151
    EUR;CHF;1.2053
    AUD;JPY;86.0305
    EUR;USD;1.2989
    JPY;INR;0.6571
The first line means that you want to convert 550 EUR to JPY.
The second line is the number of exchange rates that follow.
Each following line is an exchange rate: 'AUD;CHF;0.9661' means 1 AUD buys 0.9661 CHF.";

/// Converts an amount between currencies through a chain of exchange rates.
#[derive(Debug, Parser)]
#[command(
    name = "currency_converter",
    version,
    after_help = INPUT_FORMAT,
    arg_required_else_help = true
)]
struct Cli {
    /// Configuration file (TOML). Defaults to crates/converter/Config.toml when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Input files, processed one after another.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.run.log_filter);

    let runner = Runner::from_config(&config);
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    match runner.run(&cli.files, &mut stdout, &mut stderr) {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries converted amounts.
fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
