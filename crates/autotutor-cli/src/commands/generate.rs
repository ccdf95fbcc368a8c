use crate::cli::Cli;
use crate::config::builder::build_config;
use crate::config::locations::SearchPaths;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use autotutor::engine::converter::OpsinResolver;
use autotutor::engine::progress::ProgressReporter;
use autotutor::workflows::tutorial::{self, TutorialOutcome};
use tracing::{debug, info};

pub fn run(args: &Cli) -> Result<TutorialOutcome> {
    let paths = SearchPaths::discover();
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app = build_config(args, &paths)?;

    let resolver = OpsinResolver::from_config(&app.core_config.converter);

    let progress_handler = CliProgressHandler::new();
    let reporter = if args.quiet {
        ProgressReporter::new()
    } else {
        ProgressReporter::with_callback(progress_handler.get_callback())
    };

    info!("Invoking the tutorial workflow...");
    let result = tutorial::run(&app.selectors, &app.core_config, &resolver, &reporter);
    progress_handler.clear();
    let outcome = result?;
    debug!("Files reported while writing: {:?}", progress_handler.written_files());

    if outcome.formula_only {
        info!("Formula-only bundle: provide --name, --smiles or --inchi for a 3D model.");
    }
    Ok(outcome)
}
