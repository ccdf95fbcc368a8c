mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("❌ Error: {}", e.one_line());
        std::process::exit(e.exit_code());
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("🚀 autotutor v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    match commands::generate::run(&cli) {
        Ok(outcome) => {
            info!(
                "✅ Tutorial bundle with {} files written to {}.",
                outcome.bundle.files.len(),
                outcome.bundle.path.display()
            );
            if !cli.quiet {
                eprintln!("✅ Wrote {}", outcome.bundle.files.join(", "));
            }
            println!("{}", outcome.bundle.path.display());
            Ok(())
        }
        Err(e) => {
            debug!("Command failed: {:?}", e);
            Err(e)
        }
    }
}
