use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod error;
mod output;
mod private;
mod public;
mod utils;

use error::Result;

#[derive(Parser)]
#[command(name = "pemrsa")]
#[command(about = "Decode RSA keys from PEM files", long_about = None)]
struct Cli {
    /// Log pipeline stages to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a PKCS#1 `RSA PRIVATE KEY` block
    Private {
        #[command(flatten)]
        config: private::Config,
    },
    /// Decode an RSA key from a `PUBLIC KEY` (SubjectPublicKeyInfo) block
    Public {
        #[command(flatten)]
        config: public::Config,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Private { config } => private::execute(config),
        Commands::Public { config } => public::execute(config),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
